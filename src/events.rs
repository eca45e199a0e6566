use std::collections::HashMap;
use std::fmt;

use crate::dom::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Input,
    Change,
    Other(String),
}

impl EventType {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "click" => Self::Click,
            "input" => Self::Input,
            "change" => Self::Change,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::Change => "change",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dispatched event as seen by one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventType,
    /// Node the event was dispatched to.
    pub target: NodeId,
    /// Node whose listener is running.
    pub current_target: NodeId,
}

/// Index of a mounted behavior inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BehaviorId(pub(crate) usize);

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<EventType, Vec<BehaviorId>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: EventType, behavior: BehaviorId) {
        let listeners = self
            .map
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default();
        // addEventListener ignores an identical second registration.
        if !listeners.contains(&behavior) {
            listeners.push(behavior);
        }
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &EventType) -> Vec<BehaviorId> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.map
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut store = ListenerStore::default();
        store.add(NodeId(3), EventType::Click, BehaviorId(0));
        store.add(NodeId(3), EventType::Click, BehaviorId(0));
        store.add(NodeId(3), EventType::Click, BehaviorId(1));
        assert_eq!(
            store.get(NodeId(3), &EventType::Click),
            vec![BehaviorId(0), BehaviorId(1)]
        );
        assert!(store.get(NodeId(3), &EventType::Change).is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn event_names_are_case_insensitive() {
        assert_eq!(EventType::parse("CLICK"), EventType::Click);
        assert_eq!(EventType::parse("focus").as_str(), "focus");
    }
}
