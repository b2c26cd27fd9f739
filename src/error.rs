use thiserror::Error;

/// Reasons a slider cannot be constructed from its configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// No container extent was supplied.
    #[error("slider configuration is missing a container")]
    MissingContainer,

    /// The slide list is absent or empty.
    #[error("slider configuration must include at least one slide")]
    MissingSlides,

    /// The alignment tag is not one of the recognized policies.
    #[error("invalid alignment '{0}'")]
    UnknownAlignment(String),

    /// `autoslide` was set to zero.
    #[error("autoslide interval must be greater than zero")]
    ZeroAutoslide,

    /// A width, height or margin is negative or not finite.
    #[error("invalid geometry for {what}: {value}")]
    InvalidGeometry { what: String, value: f64 },
}

/// Runtime failures of slide list or index operations.
#[derive(Debug, Error, PartialEq)]
pub enum SliderError {
    #[error("slide index {index} out of range for {len} slides")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot remove the only remaining slide")]
    LastSlide,

    #[error("invalid container size {width}x{height}")]
    InvalidContainer { width: f64, height: f64 },
}
