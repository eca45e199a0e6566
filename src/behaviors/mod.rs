//! Page behaviors. Each one resolves its elements once when constructed,
//! declares the events it listens to, and reacts to those events.

use std::any::Any;
use std::fmt;

use crate::dom::{Dom, NodeId};
use crate::events::{Event, EventType};
use crate::{Error, Result};

mod carousel;
mod dropdown;
mod price_range;

pub use carousel::{Carousel, SlideCursor, Transition};
pub use dropdown::Dropdown;
pub use price_range::PriceRange;

pub trait Behavior: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Nodes and event types this behavior wants to receive.
    fn listeners(&self) -> Vec<(NodeId, EventType)>;

    fn handle_event(&mut self, dom: &mut Dom, event: &Event) -> Result<()>;

    fn as_any(&self) -> &dyn Any;
}

pub(crate) fn select_one(dom: &Dom, selector: &str) -> Result<NodeId> {
    dom.query_selector(selector)?
        .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
}

pub(crate) fn select_all(dom: &Dom, selector: &str) -> Result<Vec<NodeId>> {
    let nodes = dom.query_selector_all(selector)?;
    if nodes.is_empty() {
        return Err(Error::SelectorNotFound(selector.to_string()));
    }
    Ok(nodes)
}
