use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::geometry::{Alignment, Extent, SlideGeometry};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ButtonsConfig {
    /// Host identifier of the element wired to `go_forward`.
    pub forward: Option<String>,
    /// Host identifier of the element wired to `go_backward`.
    pub backward: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PagerConfig {
    pub wrap: Option<String>,
    pub item_class: Option<String>,
    pub active_class: Option<String>,
}

/// Raw slider configuration as read from YAML.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SliderConfig {
    /// Extent of the viewport that frames the slides.
    pub container: Option<Extent>,
    /// Slides in display order.
    pub slides: Option<Vec<SlideGeometry>>,
    pub buttons: ButtonsConfig,
    pub pager: PagerConfig,
    /// Alignment tag: left/start, center, right/end, top, middle, bottom.
    pub align: String,
    /// Wrap around at either end.
    pub cycle: bool,
    /// Auto-advance interval in milliseconds.
    pub autoslide: Option<u64>,
    /// Map the left/right arrow keys to backward/forward.
    pub keyboard_events: bool,
    /// Quiet period after the last resize before realigning.
    #[serde(with = "humantime_serde")]
    pub resize_debounce: Duration,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            container: None,
            slides: None,
            buttons: ButtonsConfig::default(),
            pager: PagerConfig::default(),
            align: Alignment::default().to_string(),
            cycle: true,
            autoslide: None,
            keyboard_events: false,
            resize_debounce: Self::default_resize_debounce(),
        }
    }
}

impl SliderConfig {
    const fn default_resize_debounce() -> Duration {
        Duration::from_millis(500)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml_str(&s)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Resolve the alignment tag and check every invariant serde cannot express.
    pub fn validated(self) -> Result<SliderSettings, ConfigError> {
        let container = self.container.ok_or(ConfigError::MissingContainer)?;
        for (what, value) in [
            ("container.width", container.width),
            ("container.height", container.height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidGeometry {
                    what: what.to_string(),
                    value,
                });
            }
        }

        let slides = match self.slides {
            Some(slides) if !slides.is_empty() => slides,
            _ => return Err(ConfigError::MissingSlides),
        };
        for (idx, slide) in slides.iter().enumerate() {
            slide.check(&format!("slides[{idx}]"))?;
        }

        let alignment: Alignment = self.align.parse()?;

        let autoslide = match self.autoslide {
            Some(0) => return Err(ConfigError::ZeroAutoslide),
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };

        Ok(SliderSettings {
            container,
            slides,
            buttons: self.buttons,
            pager: self.pager,
            alignment,
            cycle: self.cycle,
            autoslide,
            keyboard_events: self.keyboard_events,
            resize_debounce: self.resize_debounce,
        })
    }
}

/// Configuration after validation; the only form a slider accepts.
#[derive(Debug, Clone)]
pub struct SliderSettings {
    pub container: Extent,
    pub slides: Vec<SlideGeometry>,
    pub buttons: ButtonsConfig,
    pub pager: PagerConfig,
    pub alignment: Alignment,
    pub cycle: bool,
    pub autoslide: Option<Duration>,
    pub keyboard_events: bool,
    pub resize_debounce: Duration,
}

impl SliderSettings {
    /// Settings for `slides` inside `container` with every option at its default.
    pub fn new(container: Extent, slides: Vec<SlideGeometry>) -> Self {
        Self {
            container,
            slides,
            buttons: ButtonsConfig::default(),
            pager: PagerConfig::default(),
            alignment: Alignment::default(),
            cycle: true,
            autoslide: None,
            keyboard_events: false,
            resize_debounce: SliderConfig::default_resize_debounce(),
        }
    }
}
