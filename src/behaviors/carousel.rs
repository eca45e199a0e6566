use std::any::Any;

use tracing::debug;

use super::{Behavior, select_all, select_one};
use crate::config::CarouselConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{Event, EventType};
use crate::{Error, Result};

/// A move of the active marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

/// Active position within a fixed-length slide sequence.
///
/// Requests that would leave `0..len` or stay in place return `None` and do
/// not change the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideCursor {
    len: usize,
    active: usize,
}

impl SlideCursor {
    pub fn new(len: usize, active: usize) -> Result<Self> {
        if active >= len {
            return Err(Error::Markup(format!(
                "active slide {active} is outside a sequence of {len}"
            )));
        }
        Ok(Self { len, active })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_first(&self) -> bool {
        self.active == 0
    }

    pub fn is_last(&self) -> bool {
        self.active + 1 == self.len
    }

    pub fn previous(&mut self) -> Option<Transition> {
        if self.is_first() {
            return None;
        }
        self.jump(self.active - 1)
    }

    pub fn next(&mut self) -> Option<Transition> {
        if self.is_last() {
            return None;
        }
        self.jump(self.active + 1)
    }

    pub fn jump(&mut self, target: usize) -> Option<Transition> {
        if target >= self.len || target == self.active {
            return None;
        }
        let transition = Transition {
            from: self.active,
            to: target,
        };
        self.active = target;
        Some(transition)
    }
}

/// Hero carousel: slides with index-aligned pagination items and
/// previous/next buttons that disable at the ends.
#[derive(Debug, Clone)]
pub struct Carousel {
    previous_button: NodeId,
    next_button: NodeId,
    slides: Vec<NodeId>,
    pages: Vec<NodeId>,
    pagination_selector: String,
    cursor: SlideCursor,
    slide_active_class: String,
    pagination_active_class: String,
}

impl Carousel {
    /// Binds to the carousel markup and takes the slide carrying the active
    /// marker as the starting position.
    ///
    /// Exactly one slide must be active and every slide needs a pagination
    /// item. Pagination markers and button states are brought in line with
    /// the active slide.
    pub fn new(dom: &mut Dom, config: &CarouselConfig) -> Result<Self> {
        let previous_button = select_one(dom, &config.previous_selector)?;
        let next_button = select_one(dom, &config.next_selector)?;
        let slides = select_all(dom, &config.slide_selector)?;
        let pages = select_all(dom, &config.pagination_selector)?;

        if slides.len() != pages.len() {
            return Err(Error::Markup(format!(
                "{} slides but {} pagination items",
                slides.len(),
                pages.len()
            )));
        }

        let mut active = Vec::new();
        for (index, slide) in slides.iter().enumerate() {
            if dom.class_contains(*slide, &config.slide_active_class)? {
                active.push(index);
            }
        }
        let [active] = active.as_slice() else {
            return Err(Error::Markup(format!(
                "expected exactly one `{}` slide, found {}",
                config.slide_active_class,
                active.len()
            )));
        };

        let carousel = Self {
            previous_button,
            next_button,
            cursor: SlideCursor::new(slides.len(), *active)?,
            slides,
            pages,
            pagination_selector: config.pagination_selector.clone(),
            slide_active_class: config.slide_active_class.clone(),
            pagination_active_class: config.pagination_active_class.clone(),
        };

        for (index, page) in carousel.pages.iter().enumerate() {
            if index == carousel.cursor.active() {
                dom.class_add(*page, &carousel.pagination_active_class)?;
            } else {
                dom.class_remove(*page, &carousel.pagination_active_class)?;
            }
        }
        carousel.sync_buttons(dom)?;
        debug!(
            slides = carousel.slides.len(),
            active = carousel.cursor.active(),
            "hero carousel mounted"
        );
        Ok(carousel)
    }

    pub fn active_index(&self) -> usize {
        self.cursor.active()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Returns whether the active slide moved.
    pub fn previous(&mut self, dom: &mut Dom) -> Result<bool> {
        let transition = self.cursor.previous();
        self.apply(dom, transition)
    }

    pub fn next(&mut self, dom: &mut Dom) -> Result<bool> {
        let transition = self.cursor.next();
        self.apply(dom, transition)
    }

    /// Activates the slide for the pagination item at or above `target`.
    /// Nodes outside the pagination are ignored.
    pub fn jump(&mut self, dom: &mut Dom, target: NodeId) -> Result<bool> {
        let Some(index) = self.page_index(dom, target)? else {
            return Ok(false);
        };
        let transition = self.cursor.jump(index);
        self.apply(dom, transition)
    }

    fn page_index(&self, dom: &Dom, target: NodeId) -> Result<Option<usize>> {
        let item = dom.closest(target, &self.pagination_selector)?;
        Ok(item.and_then(|item| self.pages.iter().position(|page| *page == item)))
    }

    fn apply(&mut self, dom: &mut Dom, transition: Option<Transition>) -> Result<bool> {
        let Some(Transition { from, to }) = transition else {
            return Ok(false);
        };

        dom.class_remove(self.slides[from], &self.slide_active_class)?;
        dom.class_remove(self.pages[from], &self.pagination_active_class)?;
        dom.class_add(self.slides[to], &self.slide_active_class)?;
        dom.class_add(self.pages[to], &self.pagination_active_class)?;
        self.sync_buttons(dom)?;

        debug!(from, to, "hero carousel moved");
        Ok(true)
    }

    fn sync_buttons(&self, dom: &mut Dom) -> Result<()> {
        dom.set_disabled(self.previous_button, self.cursor.is_first())?;
        dom.set_disabled(self.next_button, self.cursor.is_last())
    }
}

impl Behavior for Carousel {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn listeners(&self) -> Vec<(NodeId, EventType)> {
        let mut out = vec![
            (self.previous_button, EventType::Click),
            (self.next_button, EventType::Click),
        ];
        out.extend(self.pages.iter().map(|page| (*page, EventType::Click)));
        out
    }

    fn handle_event(&mut self, dom: &mut Dom, event: &Event) -> Result<()> {
        if event.kind != EventType::Click {
            return Ok(());
        }
        if event.current_target == self.previous_button {
            self.previous(dom)?;
        } else if event.current_target == self.next_button {
            self.next(dom)?;
        } else if self.pages.contains(&event.current_target) {
            self.jump(dom, event.target)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
