pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod pager;
pub mod slider;
pub mod surface;
pub mod tasks {
    pub mod autoslide;
    pub mod controller;
}

pub use config::{SliderConfig, SliderSettings};
pub use error::{ConfigError, SliderError};
pub use slider::Slider;
