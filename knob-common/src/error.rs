use compact_str::CompactString;

/// A value that has no representation on the other side of a [`Mapper`](crate::Mapper).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("value is NaN")]
    NaN,
    #[error("value {value} is not in range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("value {value} is not a multiple of {step}")]
    OffStep { value: f64, step: f64 },
    #[error("no enum key found for value {0}")]
    UnknownCode(CompactString),
    #[error("no enum value found for key {0}")]
    UnknownKey(CompactString),
    #[error("{0}")]
    Custom(CompactString),
}

impl MapError {
    pub fn custom(message: impl Into<CompactString>) -> Self {
        MapError::Custom(message.into())
    }
}

/// A mapper that was built with options it cannot work with.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("min is NaN")]
    MinNaN,
    #[error("max is NaN")]
    MaxNaN,
    #[error("step is NaN")]
    StepNaN,
    #[error("step must be positive, got {0}")]
    StepNotPositive(f64),
    #[error("tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),
    #[error("enum value {0} is used by more than one key")]
    DuplicateCode(CompactString),
    #[error("enum key {0} is listed more than once")]
    DuplicateKey(CompactString),
}
