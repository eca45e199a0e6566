pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    /// The page markup does not have the shape a behavior needs.
    #[error("markup error: {0}")]
    Markup(String),
    #[error("range widget error: {0}")]
    Widget(String),
    #[error("config error: {0}")]
    Config(String),
}

pub mod behaviors;
pub mod config;
pub mod dom;
pub mod events;
pub mod html;
pub mod number;
pub mod page;
mod selector;
pub mod widget;

pub use behaviors::{Behavior, Carousel, Dropdown, PriceRange, SlideCursor, Transition};
pub use config::{
    CarouselConfig, CssClasses, DropdownConfig, PageConfig, PriceRangeConfig, SliderOptions,
    SliderRange,
};
pub use dom::{Dom, NodeId};
pub use events::{BehaviorId, Event, EventType};
pub use html::parse_html;
pub use page::Page;
pub use widget::{RangeSlider, RangeWidget, SliderUpdate, SparseValues, UpdateListener};
