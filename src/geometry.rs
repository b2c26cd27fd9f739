//! Slide geometry and the alignment offset formulas.
//!
//! Offsets are always recomputed from the full slide list, so calling
//! [`compute_offset`] repeatedly (for example after every resize) never
//! accumulates error.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Axis along which the container is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which edge (or the middle) of the active slide lines up with the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Center,
    End,
}

/// One of the six alignment policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub anchor: Anchor,
    pub axis: Axis,
}

impl Alignment {
    pub const LEFT: Self = Self::new(Anchor::Start, Axis::Horizontal);
    pub const CENTER: Self = Self::new(Anchor::Center, Axis::Horizontal);
    pub const RIGHT: Self = Self::new(Anchor::End, Axis::Horizontal);
    pub const TOP: Self = Self::new(Anchor::Start, Axis::Vertical);
    pub const MIDDLE: Self = Self::new(Anchor::Center, Axis::Vertical);
    pub const BOTTOM: Self = Self::new(Anchor::End, Axis::Vertical);

    const NAMES: &'static [&'static str] =
        &["left", "start", "center", "right", "end", "top", "middle", "bottom"];

    pub const fn new(anchor: Anchor, axis: Axis) -> Self {
        Self { anchor, axis }
    }

    fn as_str(&self) -> &'static str {
        match (self.anchor, self.axis) {
            (Anchor::Start, Axis::Horizontal) => "left",
            (Anchor::Center, Axis::Horizontal) => "center",
            (Anchor::End, Axis::Horizontal) => "right",
            (Anchor::Start, Axis::Vertical) => "top",
            (Anchor::Center, Axis::Vertical) => "middle",
            (Anchor::End, Axis::Vertical) => "bottom",
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::CENTER
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alignment {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "left" | "start" => Ok(Self::LEFT),
            "center" => Ok(Self::CENTER),
            "right" | "end" => Ok(Self::RIGHT),
            "top" => Ok(Self::TOP),
            "middle" => Ok(Self::MIDDLE),
            "bottom" => Ok(Self::BOTTOM),
            other => {
                tracing::debug!(tag = other, expected = ?Self::NAMES, "rejecting alignment");
                Err(ConfigError::UnknownAlignment(other.to_string()))
            }
        }
    }
}

/// Width and height of the container viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        [self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Leading plus trailing margin on `axis`.
    fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left + self.right,
            Axis::Vertical => self.top + self.bottom,
        }
    }
}

/// Measured box of a single slide panel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct SlideGeometry {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margins,
}

impl SlideGeometry {
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margins {
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
                left: 0.0,
            },
        }
    }

    pub const fn with_margin(mut self, margin: Margins) -> Self {
        self.margin = margin;
        self
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Space the slide occupies in the strip, margins included.
    pub fn footprint(&self, axis: Axis) -> f64 {
        self.extent(axis) + self.margin.along(axis)
    }

    pub(crate) fn check(&self, what: &str) -> Result<(), ConfigError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("margin.top", self.margin.top),
            ("margin.right", self.margin.right),
            ("margin.bottom", self.margin.bottom),
            ("margin.left", self.margin.left),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidGeometry {
                    what: format!("{what}.{name}"),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Offset along the alignment axis that brings slide `index` into place.
pub fn compute_offset(
    slides: &[SlideGeometry],
    alignment: Alignment,
    container: Extent,
    index: usize,
) -> f64 {
    let axis = alignment.axis;
    let before: f64 = slides
        .iter()
        .take(index)
        .map(|s| s.footprint(axis))
        .sum();
    match alignment.anchor {
        Anchor::Start => -before,
        Anchor::Center => {
            let target = slides.get(index).map_or(0.0, |s| s.extent(axis));
            -before - target / 2.0 + container.along(axis) / 2.0
        }
        Anchor::End => {
            let through = slides.get(index).map_or(0.0, |s| s.footprint(axis));
            -(before + through) + container.along(axis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize, w: f64) -> Vec<SlideGeometry> {
        vec![SlideGeometry::new(w, 80.0); n]
    }

    #[test]
    fn start_offsets_sum_preceding_slides() {
        let slides = uniform(5, 50.0);
        let container = Extent::new(300.0, 80.0);
        assert_eq!(compute_offset(&slides, Alignment::LEFT, container, 0), 0.0);
        assert_eq!(compute_offset(&slides, Alignment::LEFT, container, 3), -150.0);
    }

    #[test]
    fn center_offset_for_uniform_slides() {
        let slides = uniform(3, 100.0);
        let container = Extent::new(300.0, 80.0);
        assert_eq!(compute_offset(&slides, Alignment::CENTER, container, 1), -50.0);
        assert_eq!(compute_offset(&slides, Alignment::CENTER, container, 0), 100.0);
    }

    #[test]
    fn end_offset_includes_target_and_container() {
        let slides = uniform(3, 100.0);
        let container = Extent::new(250.0, 80.0);
        assert_eq!(compute_offset(&slides, Alignment::RIGHT, container, 0), 150.0);
        assert_eq!(compute_offset(&slides, Alignment::RIGHT, container, 2), -50.0);
    }

    #[test]
    fn margins_count_on_the_alignment_axis_only() {
        let margin = Margins {
            top: 4.0,
            right: 5.0,
            bottom: 6.0,
            left: 10.0,
        };
        let slides = vec![SlideGeometry::new(100.0, 40.0).with_margin(margin); 3];
        let container = Extent::new(200.0, 100.0);
        assert_eq!(compute_offset(&slides, Alignment::LEFT, container, 2), -230.0);
        assert_eq!(compute_offset(&slides, Alignment::TOP, container, 2), -100.0);
        // 50 - 20 - 50 = -20
        assert_eq!(compute_offset(&slides, Alignment::MIDDLE, container, 1), -20.0);
        // -(50 * 2) + 100
        assert_eq!(compute_offset(&slides, Alignment::BOTTOM, container, 1), 0.0);
    }

    #[test]
    fn mixed_widths_are_summed_exactly() {
        let slides = vec![
            SlideGeometry::new(120.0, 10.0),
            SlideGeometry::new(80.0, 10.0),
            SlideGeometry::new(200.0, 10.0),
        ];
        let container = Extent::new(400.0, 10.0);
        assert_eq!(compute_offset(&slides, Alignment::CENTER, container, 2), -100.0);
    }

    #[test]
    fn offset_is_repeatable() {
        let slides = uniform(4, 33.3);
        let container = Extent::new(97.0, 10.0);
        let first = compute_offset(&slides, Alignment::CENTER, container, 3);
        let second = compute_offset(&slides, Alignment::CENTER, container, 3);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn alignment_tags_parse() {
        assert_eq!("start".parse::<Alignment>().unwrap(), Alignment::LEFT);
        assert_eq!("end".parse::<Alignment>().unwrap(), Alignment::RIGHT);
        assert_eq!("middle".parse::<Alignment>().unwrap(), Alignment::MIDDLE);
        assert_eq!(
            "diagonal".parse::<Alignment>(),
            Err(ConfigError::UnknownAlignment("diagonal".into()))
        );
        assert_eq!(Alignment::BOTTOM.to_string(), "bottom");
    }

    #[test]
    fn negative_geometry_is_rejected() {
        let slide = SlideGeometry::new(-1.0, 10.0);
        assert!(matches!(
            slide.check("slides[0]"),
            Err(ConfigError::InvalidGeometry { .. })
        ));
    }
}
