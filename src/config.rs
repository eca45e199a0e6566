//! Page configuration: which markup each behavior binds to, and the price
//! slider options.
//!
//! Every field has a default matching the storefront templates, so an empty
//! TOML document (or `PageConfig::default()`) boots the stock page. A partial
//! document only overrides what it names:
//!
//! ```toml
//! [carousel]
//! slide_selector = ".promo__slide"
//!
//! [price_range.slider]
//! start = [100.0, 500.0]
//! ```

use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub dropdown: DropdownConfig,
    pub carousel: CarouselConfig,
    pub price_range: PriceRangeConfig,
}

impl PageConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src).map_err(|err| Error::Config(err.to_string()))?;
        config.price_range.slider.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    pub nav_selector: String,
    pub toggle_selector: String,
    pub closed_class: String,
    pub opened_class: String,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            nav_selector: ".main-nav".into(),
            toggle_selector: ".main-nav__toggle".into(),
            closed_class: "main-nav--closed".into(),
            opened_class: "main-nav--opened".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub previous_selector: String,
    pub next_selector: String,
    pub slide_selector: String,
    pub pagination_selector: String,
    pub slide_active_class: String,
    pub pagination_active_class: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            previous_selector: ".hero__page-button--before".into(),
            next_selector: ".hero__page-button--after".into(),
            slide_selector: ".hero__item".into(),
            pagination_selector: ".hero__pagination-item".into(),
            slide_active_class: "hero__item--active".into(),
            pagination_active_class: "hero__pagination-item--active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriceRangeConfig {
    pub slider_selector: String,
    pub min_input_selector: String,
    pub max_input_selector: String,
    pub slider: SliderOptions,
}

impl Default for PriceRangeConfig {
    fn default() -> Self {
        Self {
            slider_selector: ".form__slider".into(),
            min_input_selector: ".form__slider-min".into(),
            max_input_selector: ".form__slider-max".into(),
            slider: SliderOptions::default(),
        }
    }
}

pub const PRICE_MIN: f64 = 0.0;
pub const PRICE_MAX: f64 = 980.0;
pub const PRICE_STEP: f64 = 1.0;
pub const PRICE_START: [f64; 2] = [0.0, 900.0];

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
}

/// Options handed to the range widget when it is created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SliderOptions {
    pub range: SliderRange,
    pub step: f64,
    pub start: [f64; 2],
    /// Fill the track between the two handles.
    pub connect: bool,
    pub css_prefix: String,
    pub css_classes: CssClasses,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            range: SliderRange {
                min: PRICE_MIN,
                max: PRICE_MAX,
            },
            step: PRICE_STEP,
            start: PRICE_START,
            connect: true,
            css_prefix: "noUi-".into(),
            css_classes: CssClasses::default(),
        }
    }
}

impl SliderOptions {
    pub fn validate(&self) -> Result<()> {
        let SliderRange { min, max } = self.range;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::Config(format!(
                "slider range must satisfy min < max, got [{min}, {max}]"
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(Error::Config(format!(
                "slider step must be positive, got {}",
                self.step
            )));
        }
        if self.start.iter().any(|value| !value.is_finite()) {
            return Err(Error::Config(format!(
                "slider start values must be finite, got {:?}",
                self.start
            )));
        }
        Ok(())
    }

    /// Class list for one widget part. The prefix is prepended to the
    /// configured string as a whole, so only its first token is prefixed.
    pub(crate) fn class_list(&self, classes: &str) -> String {
        format!("{}{}", self.css_prefix, classes.trim())
    }
}

/// Class names for the widget's rendered parts. Styling only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CssClasses {
    pub target: String,
    pub base: String,
    pub origin: String,
    pub handle: String,
    pub handle_lower: String,
    pub handle_upper: String,
    pub touch_area: String,
    pub horizontal: String,
    pub ltr: String,
    pub connect: String,
    pub connects: String,
}

impl Default for CssClasses {
    fn default() -> Self {
        Self {
            target: "target".into(),
            base: "base".into(),
            origin: "origin".into(),
            handle: "handle no-ui-slider__handle".into(),
            handle_lower: "handleLower".into(),
            handle_upper: "handleUpper".into(),
            touch_area: "touch-area no-ui-slider__touch-area".into(),
            horizontal: "horizontal".into(),
            ltr: "ltr".into(),
            connect: "connect no-ui-slider__connect".into(),
            connects: "connects no-ui-slider__connects".into(),
        }
    }
}
