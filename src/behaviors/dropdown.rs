use std::any::Any;

use tracing::debug;

use super::{Behavior, select_one};
use crate::config::DropdownConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{Event, EventType};
use crate::{Error, Result};

/// Mobile navigation menu opened and closed by a toggle button.
#[derive(Debug, Clone)]
pub struct Dropdown {
    nav: NodeId,
    toggle: NodeId,
    closed_class: String,
    opened_class: String,
}

impl Dropdown {
    /// Binds to the navigation container and its toggle. The container must
    /// carry exactly one of the closed/opened markers.
    pub fn new(dom: &Dom, config: &DropdownConfig) -> Result<Self> {
        let nav = select_one(dom, &config.nav_selector)?;
        let toggle = select_one(dom, &config.toggle_selector)?;

        let closed = dom.class_contains(nav, &config.closed_class)?;
        let opened = dom.class_contains(nav, &config.opened_class)?;
        if closed == opened {
            return Err(Error::Markup(format!(
                "{} must carry exactly one of `{}` and `{}`",
                config.nav_selector, config.closed_class, config.opened_class
            )));
        }

        Ok(Self {
            nav,
            toggle,
            closed_class: config.closed_class.clone(),
            opened_class: config.opened_class.clone(),
        })
    }

    pub fn is_open(&self, dom: &Dom) -> Result<bool> {
        dom.class_contains(self.nav, &self.opened_class)
    }

    /// Flips both markers and returns whether the menu is now open.
    pub fn toggle(&self, dom: &mut Dom) -> Result<bool> {
        dom.class_toggle(self.nav, &self.closed_class)?;
        let opened = dom.class_toggle(self.nav, &self.opened_class)?;
        debug!(opened, "navigation dropdown toggled");
        Ok(opened)
    }
}

impl Behavior for Dropdown {
    fn name(&self) -> &'static str {
        "dropdown"
    }

    fn listeners(&self) -> Vec<(NodeId, EventType)> {
        vec![(self.toggle, EventType::Click)]
    }

    fn handle_event(&mut self, dom: &mut Dom, event: &Event) -> Result<()> {
        if event.kind == EventType::Click && event.current_target == self.toggle {
            self.toggle(dom)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
