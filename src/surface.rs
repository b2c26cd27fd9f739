use std::fmt;

use tracing::{debug, info};

use crate::geometry::Axis;
use crate::pager::Pager;

/// Translation applied to the container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Translate {
    pub x: f64,
    pub y: f64,
}

impl Translate {
    /// Places `offset` on `axis` and zero on the other axis.
    pub fn along(axis: Axis, offset: f64) -> Self {
        match axis {
            Axis::Horizontal => Self { x: offset, y: 0.0 },
            Axis::Vertical => Self { x: 0.0, y: offset },
        }
    }
}

impl fmt::Display for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({}px, {}px)", self.x, self.y)
    }
}

/// Host side of the slider: whatever actually moves pixels.
pub trait Surface {
    fn apply(&mut self, transform: Translate);

    /// Called after the pager is rebuilt or its highlight changes.
    fn render_pager(&mut self, _pager: &Pager) {}
}

/// Surface that only reports what it would draw.
#[derive(Debug, Default)]
pub struct TracingSurface {
    applied: usize,
}

impl TracingSurface {
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Surface for TracingSurface {
    fn apply(&mut self, transform: Translate) {
        self.applied += 1;
        info!(transform = %transform, "container transform");
    }

    fn render_pager(&mut self, pager: &Pager) {
        let row: String = pager
            .items()
            .iter()
            .map(|item| if item.active { '●' } else { '○' })
            .collect();
        debug!(wrap = pager.wrap(), %row, "pager");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_formats_as_css() {
        assert_eq!(
            Translate::along(Axis::Horizontal, -150.0).to_string(),
            "translate(-150px, 0px)"
        );
        assert_eq!(
            Translate::along(Axis::Vertical, 12.5).to_string(),
            "translate(0px, 12.5px)"
        );
    }
}
