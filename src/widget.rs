//! Dual-handle range widget: the contract the price filter talks to, and
//! [`RangeSlider`], the widget used on storefront pages.

use std::fmt;

use tracing::trace;

use crate::config::SliderOptions;
use crate::dom::{Dom, NodeId};
use crate::number::parse_number;
use crate::{Error, Result};

pub const HANDLE_COUNT: usize = 2;

/// Per-handle values for [`RangeWidget::set`]. `None` leaves a handle where
/// it is.
pub type SparseValues = [Option<String>; HANDLE_COUNT];

/// Payload of an `update` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderUpdate {
    /// Formatted values of all handles, lower first.
    pub values: [String; HANDLE_COUNT],
    /// Handle the notification is about.
    pub handle: usize,
}

pub type UpdateListener = Box<dyn FnMut(&mut Dom, &SliderUpdate) -> Result<()>>;

pub trait RangeWidget: fmt::Debug {
    /// Current formatted values, lower handle first.
    fn get(&self) -> [String; HANDLE_COUNT];

    /// Moves the handles given in `values`. Every call notifies update
    /// listeners once per handle, whether or not it moved.
    fn set(&mut self, dom: &mut Dom, values: SparseValues) -> Result<()>;

    /// Registers an update listener. Binding notifies all update listeners
    /// once per handle with the current values.
    fn on_update(&mut self, dom: &mut Dom, listener: UpdateListener) -> Result<()>;
}

/// Range slider rendered into a target element.
///
/// Values snap to the configured step, stay inside the range, and the lower
/// handle never passes the upper one. Text goes through `Number(text)`, so
/// blank text means 0 and text that is not a number leaves its handle
/// untouched.
pub struct RangeSlider {
    options: SliderOptions,
    target: NodeId,
    handles: [NodeId; HANDLE_COUNT],
    positions: [f64; HANDLE_COUNT],
    listeners: Vec<UpdateListener>,
}

impl fmt::Debug for RangeSlider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeSlider")
            .field("target", &self.target)
            .field("handles", &self.handles)
            .field("positions", &self.positions)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl RangeSlider {
    /// Renders a slider into `target`. A target hosts at most one slider.
    pub fn create(dom: &mut Dom, target: NodeId, options: SliderOptions) -> Result<Self> {
        options.validate()?;

        let target_class = options.class_list(&options.css_classes.target);
        let marker = target_class.split_whitespace().next().unwrap_or_default();
        if dom.class_contains(target, marker)? {
            return Err(Error::Widget(format!(
                "slider was already initialized on {}",
                dom.node_label(target)
            )));
        }

        let classes = &options.css_classes;
        dom.class_add_all(target, &target_class)?;
        dom.class_add_all(target, &options.class_list(&classes.ltr))?;
        dom.class_add_all(target, &options.class_list(&classes.horizontal))?;

        let base = create_div(dom, target, &options.class_list(&classes.base))?;
        let connects = create_div(dom, base, &options.class_list(&classes.connects))?;
        if options.connect {
            create_div(dom, connects, &options.class_list(&classes.connect))?;
        }

        let mut handles = [target; HANDLE_COUNT];
        for (index, slot) in handles.iter_mut().enumerate() {
            let origin = create_div(dom, base, &options.class_list(&classes.origin))?;
            let side = if index == 0 {
                &classes.handle_lower
            } else {
                &classes.handle_upper
            };
            let handle = create_div(dom, origin, &options.class_list(&classes.handle))?;
            dom.class_add_all(handle, &options.class_list(side))?;
            for (name, value) in [
                ("data-handle", index.to_string()),
                ("tabindex", "0".to_string()),
                ("role", "slider".to_string()),
                ("aria-orientation", "horizontal".to_string()),
                ("aria-valuemin", format_value(options.range.min)),
                ("aria-valuemax", format_value(options.range.max)),
            ] {
                dom.set_attr(handle, name, &value)?;
            }
            create_div(dom, handle, &options.class_list(&classes.touch_area))?;
            *slot = handle;
        }

        let mut slider = Self {
            target,
            handles,
            positions: [options.range.min, options.range.max],
            listeners: Vec::new(),
            options,
        };
        let start = slider.options.start;
        slider.place([Some(start[0]), Some(start[1])]);
        slider.render(dom)?;
        Ok(slider)
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn positions(&self) -> [f64; HANDLE_COUNT] {
        self.positions
    }

    fn place(&mut self, values: [Option<f64>; HANDLE_COUNT]) {
        // Two passes so that moving both handles past each other settles.
        for _ in 0..2 {
            for (index, value) in values.iter().enumerate() {
                if let Some(value) = value {
                    self.positions[index] = self.constrain(index, *value);
                }
            }
        }
    }

    fn constrain(&self, index: usize, value: f64) -> f64 {
        let min = self.options.range.min;
        let max = self.options.range.max;
        let step = self.options.step;
        let snapped = min + ((value - min) / step).round() * step;
        let clamped = snapped.clamp(min, max);
        match index {
            0 => clamped.min(self.positions[1]),
            _ => clamped.max(self.positions[0]),
        }
    }

    fn render(&self, dom: &mut Dom) -> Result<()> {
        for (handle, position) in self.handles.iter().zip(self.positions) {
            let text = format_value(position);
            dom.set_attr(*handle, "aria-valuenow", &text)?;
            dom.set_attr(*handle, "aria-valuetext", &text)?;
        }
        Ok(())
    }

    fn notify_update(&mut self, dom: &mut Dom) -> Result<()> {
        let values = self.get();
        for handle in 0..HANDLE_COUNT {
            let update = SliderUpdate {
                values: values.clone(),
                handle,
            };
            trace!(handle, values = ?update.values, "range slider update");
            for listener in &mut self.listeners {
                listener(dom, &update)?;
            }
        }
        Ok(())
    }
}

impl RangeWidget for RangeSlider {
    fn get(&self) -> [String; HANDLE_COUNT] {
        self.positions.map(format_value)
    }

    fn set(&mut self, dom: &mut Dom, values: SparseValues) -> Result<()> {
        let parsed = values.map(|value| {
            value
                .map(|text| parse_number(&text))
                .filter(|number| !number.is_nan())
        });
        self.place(parsed);
        self.render(dom)?;
        self.notify_update(dom)
    }

    fn on_update(&mut self, dom: &mut Dom, listener: UpdateListener) -> Result<()> {
        self.listeners.push(listener);
        self.notify_update(dom)
    }
}

fn create_div(dom: &mut Dom, parent: NodeId, class_list: &str) -> Result<NodeId> {
    dom.create_element(parent, "div", [("class".to_string(), class_list.to_string())])
}

/// Widget values are reported with two decimals.
fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::html::parse_html;

    fn slider_dom() -> Result<(Dom, NodeId)> {
        let dom = parse_html("<div class='form__slider'></div>")?;
        let target = dom
            .query_selector(".form__slider")?
            .ok_or(Error::SelectorNotFound(".form__slider".into()))?;
        Ok((dom, target))
    }

    fn recorder(slider: &mut RangeSlider, dom: &mut Dom) -> Result<Rc<RefCell<Vec<SliderUpdate>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        slider.on_update(
            dom,
            Box::new(move |_, update| {
                sink.borrow_mut().push(update.clone());
                Ok(())
            }),
        )?;
        Ok(seen)
    }

    #[test]
    fn starts_at_configured_positions_with_two_decimals() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        let slider = RangeSlider::create(&mut dom, target, SliderOptions::default())?;
        assert_eq!(slider.get(), ["0.00".to_string(), "900.00".to_string()]);
        assert!(dom.class_contains(target, "noUi-target")?);
        let handles = dom.query_selector_all(".no-ui-slider__handle")?;
        assert_eq!(handles.len(), 2);
        assert_eq!(dom.attr(handles[1], "aria-valuenow").as_deref(), Some("900.00"));
        assert!(dom.class_contains(handles[0], "noUi-handleLower")?);
        Ok(())
    }

    #[test]
    fn binding_an_update_listener_reports_every_handle() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        let mut slider = RangeSlider::create(&mut dom, target, SliderOptions::default())?;
        let seen = recorder(&mut slider, &mut dom)?;
        let handles: Vec<usize> = seen.borrow().iter().map(|u| u.handle).collect();
        assert_eq!(handles, vec![0, 1]);
        Ok(())
    }

    #[test]
    fn set_clamps_snaps_and_keeps_handles_ordered() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        let mut slider = RangeSlider::create(&mut dom, target, SliderOptions::default())?;

        slider.set(&mut dom, [None, Some("1200".into())])?;
        assert_eq!(slider.positions(), [0.0, 980.0]);

        slider.set(&mut dom, [Some("120.4".into()), None])?;
        assert_eq!(slider.positions(), [120.0, 980.0]);

        slider.set(&mut dom, [Some("999".into()), None])?;
        assert_eq!(slider.positions(), [980.0, 980.0]);

        slider.set(&mut dom, [Some("-5".into()), Some("10".into())])?;
        assert_eq!(slider.positions(), [0.0, 10.0]);
        Ok(())
    }

    #[test]
    fn unparseable_text_leaves_handle_and_still_notifies() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        let mut slider = RangeSlider::create(&mut dom, target, SliderOptions::default())?;
        let seen = recorder(&mut slider, &mut dom)?;
        seen.borrow_mut().clear();

        slider.set(&mut dom, [Some("cheap".into()), Some("12px".into())])?;
        assert_eq!(slider.positions(), [0.0, 900.0]);
        assert_eq!(seen.borrow().len(), 2);
        Ok(())
    }

    #[test]
    fn blank_text_moves_handle_to_zero() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        let mut slider = RangeSlider::create(&mut dom, target, SliderOptions::default())?;
        slider.set(&mut dom, [Some("250".into()), None])?;

        slider.set(&mut dom, [Some("   ".into()), None])?;
        assert_eq!(slider.positions(), [0.0, 900.0]);
        slider.set(&mut dom, [None, Some(String::new())])?;
        assert_eq!(slider.positions(), [0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn moving_both_handles_past_each_other_settles() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        let mut slider = RangeSlider::create(&mut dom, target, SliderOptions::default())?;
        slider.set(&mut dom, [Some("10".into()), Some("20".into())])?;
        slider.set(&mut dom, [Some("800".into()), Some("900".into())])?;
        assert_eq!(slider.positions(), [800.0, 900.0]);
        Ok(())
    }

    #[test]
    fn second_slider_on_same_target_is_rejected() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        RangeSlider::create(&mut dom, target, SliderOptions::default())?;
        let err = RangeSlider::create(&mut dom, target, SliderOptions::default())
            .expect_err("second slider should fail");
        assert!(matches!(err, Error::Widget(_)));
        Ok(())
    }

    #[test]
    fn listener_errors_propagate_out_of_set() -> Result<()> {
        let (mut dom, target) = slider_dom()?;
        let mut slider = RangeSlider::create(&mut dom, target, SliderOptions::default())?;
        let mut calls = 0;
        let bound = slider.on_update(
            &mut dom,
            Box::new(move |_, _| {
                calls += 1;
                if calls > 2 {
                    Err(Error::Widget("listener failed".into()))
                } else {
                    Ok(())
                }
            }),
        );
        assert!(bound.is_ok());
        assert_eq!(
            slider.set(&mut dom, [Some("5".into()), None]),
            Err(Error::Widget("listener failed".into()))
        );
        Ok(())
    }
}
