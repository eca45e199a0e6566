use std::any::Any;

use tracing::{debug, trace};

use super::{Behavior, select_one};
use crate::config::PriceRangeConfig;
use crate::dom::{Dom, NodeId};
use crate::events::{Event, EventType};
use crate::number::{format_number, parse_number};
use crate::widget::{HANDLE_COUNT, RangeSlider, RangeWidget, SliderUpdate, SparseValues};
use crate::{Error, Result};

/// Catalog price filter: a range widget mirrored into min/max text fields.
///
/// The widget owns the values. Its update notifications rewrite the fields,
/// and a committed field edit is pushed back to the widget for that handle
/// only.
#[derive(Debug)]
pub struct PriceRange {
    widget: Box<dyn RangeWidget>,
    fields: [NodeId; HANDLE_COUNT],
}

impl PriceRange {
    /// Creates a [`RangeSlider`] on the configured target and wires it to the
    /// fields.
    pub fn new(dom: &mut Dom, config: &PriceRangeConfig) -> Result<Self> {
        let target = select_one(dom, &config.slider_selector)?;
        let widget = RangeSlider::create(dom, target, config.slider.clone())?;
        Self::with_widget(dom, config, Box::new(widget))
    }

    /// Wires an already created widget to the fields.
    pub fn with_widget(
        dom: &mut Dom,
        config: &PriceRangeConfig,
        mut widget: Box<dyn RangeWidget>,
    ) -> Result<Self> {
        let fields = [
            select_one(dom, &config.min_input_selector)?,
            select_one(dom, &config.max_input_selector)?,
        ];
        widget.on_update(
            dom,
            Box::new(move |dom, update| write_field(dom, &fields, update)),
        )?;
        debug!(values = ?widget.get(), "price range mounted");
        Ok(Self { widget, fields })
    }

    pub fn values(&self) -> [String; HANDLE_COUNT] {
        self.widget.get()
    }

    pub fn widget(&self) -> &dyn RangeWidget {
        self.widget.as_ref()
    }

    /// Pushes the committed text of field `index` to its handle.
    pub fn commit_field(&mut self, dom: &mut Dom, index: usize) -> Result<()> {
        let field = *self
            .fields
            .get(index)
            .ok_or_else(|| Error::Widget(format!("no price field for handle {index}")))?;
        let mut values: SparseValues = Default::default();
        values[index] = Some(dom.value(field)?);
        trace!(index, values = ?values, "price field committed");
        self.widget.set(dom, values)
    }
}

fn write_field(dom: &mut Dom, fields: &[NodeId; HANDLE_COUNT], update: &SliderUpdate) -> Result<()> {
    let (Some(field), Some(value)) = (fields.get(update.handle), update.values.get(update.handle))
    else {
        return Err(Error::Widget(format!(
            "update for unknown handle {}",
            update.handle
        )));
    };
    dom.set_value(*field, &format_number(parse_number(value)))
}

impl Behavior for PriceRange {
    fn name(&self) -> &'static str {
        "price-range"
    }

    fn listeners(&self) -> Vec<(NodeId, EventType)> {
        self.fields
            .iter()
            .map(|field| (*field, EventType::Change))
            .collect()
    }

    fn handle_event(&mut self, dom: &mut Dom, event: &Event) -> Result<()> {
        if event.kind != EventType::Change {
            return Ok(());
        }
        if let Some(index) = self
            .fields
            .iter()
            .position(|field| *field == event.current_target)
        {
            self.commit_field(dom, index)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
