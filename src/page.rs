use tracing::{debug, trace};

use crate::behaviors::{Behavior, Carousel, Dropdown, PriceRange, select_one};
use crate::config::PageConfig;
use crate::dom::{Dom, NodeId, truncate_chars};
use crate::events::{BehaviorId, Event, EventType, ListenerStore};
use crate::html::parse_html;
use crate::{Error, Result};

/// A loaded page: the document, the mounted behaviors, and user-level actions
/// that drive them.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    listeners: ListenerStore,
    behaviors: Vec<Box<dyn Behavior>>,
}

impl Page {
    /// Parses `html` without mounting any behavior.
    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::from_dom(parse_html(html)?))
    }

    pub fn from_dom(dom: Dom) -> Self {
        Self {
            dom,
            listeners: ListenerStore::default(),
            behaviors: Vec::new(),
        }
    }

    /// Parses `html` and mounts the dropdown, the hero carousel and the price
    /// range. Markup that any of them cannot bind to is an error.
    pub fn boot(html: &str, config: &PageConfig) -> Result<Self> {
        let mut page = Self::from_html(html)?;
        page.boot_behaviors(config)?;
        Ok(page)
    }

    pub fn boot_behaviors(&mut self, config: &PageConfig) -> Result<()> {
        let dropdown = Dropdown::new(&self.dom, &config.dropdown)?;
        self.mount(dropdown);
        let carousel = Carousel::new(&mut self.dom, &config.carousel)?;
        self.mount(carousel);
        let price_range = PriceRange::new(&mut self.dom, &config.price_range)?;
        self.mount(price_range);
        Ok(())
    }

    pub fn mount<B: Behavior + 'static>(&mut self, behavior: B) -> BehaviorId {
        let id = BehaviorId(self.behaviors.len());
        for (node, event) in behavior.listeners() {
            self.listeners.add(node, event, id);
        }
        debug!(behavior = behavior.name(), listeners = self.listeners.len(), "behavior mounted");
        self.behaviors.push(Box::new(behavior));
        id
    }

    /// First mounted behavior of type `B`.
    pub fn behavior<B: Behavior + 'static>(&self) -> Option<&B> {
        self.behaviors
            .iter()
            .find_map(|behavior| behavior.as_any().downcast_ref::<B>())
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.behavior::<Carousel>()
    }

    pub fn dropdown(&self) -> Option<&Dropdown> {
        self.behavior::<Dropdown>()
    }

    pub fn price_range(&self) -> Option<&PriceRange> {
        self.behavior::<PriceRange>()
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// Clicks the first match of `selector`. Disabled controls swallow the
    /// click.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            trace!(target = %self.dom.node_label(target), "click on disabled control ignored");
            return Ok(());
        }
        stacker::grow(32 * 1024 * 1024, || {
            self.dispatch_event(target, EventType::Click)
        })
    }

    /// Replaces the text of an input and fires `input`.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_text_control(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        stacker::grow(32 * 1024 * 1024, || {
            self.dom.set_value(target, text)?;
            self.dispatch_event(target, EventType::Input)
        })
    }

    /// Types `text` and commits it, firing `input` then `change`, as leaving
    /// an edited field does.
    pub fn commit_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_text_control(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        stacker::grow(32 * 1024 * 1024, || {
            self.dom.set_value(target, text)?;
            self.dispatch_event(target, EventType::Input)?;
            self.dispatch_event(target, EventType::Change)
        })
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, EventType::parse(event))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.check(selector, target, expected.to_string(), actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.check(selector, target, expected.to_string(), actual)
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        let describe = |present: bool| {
            if present {
                format!("class {class_name}")
            } else {
                format!("no class {class_name}")
            }
        };
        self.check(selector, target, describe(expected), describe(actual))
    }

    pub fn assert_disabled(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.disabled(target);
        self.check(selector, target, format!("disabled={expected}"), format!("disabled={actual}"))
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn check(&self, selector: &str, target: NodeId, expected: String, actual: String) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected,
                actual,
                dom_snippet: truncate_chars(&self.dom.dump_node(target), 200),
            });
        }
        Ok(())
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        select_one(&self.dom, selector)
    }

    fn select_text_control(&self, selector: &str) -> Result<NodeId> {
        let target = self.select_one(selector)?;
        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: "non-element".into(),
            })?;
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag.to_string(),
            });
        }
        Ok(target)
    }

    /// Runs listeners on the target, then on each ancestor.
    fn dispatch_event(&mut self, target: NodeId, kind: EventType) -> Result<()> {
        let path = std::iter::once(target)
            .chain(self.dom.ancestors(target))
            .collect::<Vec<_>>();

        for node in path {
            for id in self.listeners.get(node, &kind) {
                let event = Event {
                    kind: kind.clone(),
                    target,
                    current_target: node,
                };
                let behavior = self
                    .behaviors
                    .get_mut(id.0)
                    .ok_or_else(|| Error::Markup(format!("listener for unmounted behavior {}", id.0)))?;
                trace!(
                    event = %kind,
                    behavior = behavior.name(),
                    target = %self.dom.node_label(target),
                    current = %self.dom.node_label(node),
                    "dispatch"
                );
                behavior.handle_event(&mut self.dom, &event)?;
            }
        }
        Ok(())
    }
}
