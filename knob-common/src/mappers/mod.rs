//! Ready-made [`Mapper`](crate::Mapper)s for numeric backends

pub mod multiplier;
pub mod number_enum;
pub mod number_validate;

pub use multiplier::Multiplier;
pub use number_enum::EnumMapper;
pub use number_validate::{NumberValidate, NumberValidateOptions, STEP_TOLERANCE};
