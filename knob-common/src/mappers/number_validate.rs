use serde::{Deserialize, Serialize};

use crate::{ConfigError, MapError, Mapper};

/// Default distance, in steps, a value may be from the nearest grid point
pub const STEP_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberValidateOptions {
    /// Lowest accepted value, `-inf` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Highest accepted value, `+inf` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Values must lie on `min + n * step` (or `n * step` without a finite `min`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Whether NaN is let through
    pub nan: bool,
}

/// Checks that a number is in range and on the step grid, in both directions.
///
/// Accepted values are snapped onto the exact grid point they were close to, so repeated
/// reads and writes don't accumulate float error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberValidate {
    min: f64,
    max: f64,
    step: Option<f64>,
    nan: bool,
    tolerance: f64,
}

impl NumberValidate {
    pub fn new(
        NumberValidateOptions { min, max, step, nan }: NumberValidateOptions,
    ) -> Result<Self, ConfigError> {
        let min = min.unwrap_or(f64::NEG_INFINITY);
        let max = max.unwrap_or(f64::INFINITY);

        if min.is_nan() {
            return Err(ConfigError::MinNaN);
        }

        if max.is_nan() {
            return Err(ConfigError::MaxNaN);
        }

        if let Some(step) = step {
            if step.is_nan() {
                return Err(ConfigError::StepNaN);
            }

            if step <= 0.0 {
                return Err(ConfigError::StepNotPositive(step));
            }
        }

        Ok(Self { min, max, step, nan, tolerance: STEP_TOLERANCE })
    }

    /// Replaces [`STEP_TOLERANCE`].
    pub fn with_tolerance(self, tolerance: f64) -> Result<Self, ConfigError> {
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }

        Ok(Self { tolerance, ..self })
    }

    pub fn validate(&self, value: f64) -> Result<f64, MapError> {
        if value.is_nan() {
            return if self.nan { Ok(value) } else { Err(MapError::NaN) };
        }

        if value < self.min || value > self.max {
            return Err(MapError::OutOfRange { value, min: self.min, max: self.max });
        }

        match self.step {
            Some(step) if value.is_finite() => {
                let start = if self.min.is_finite() { self.min } else { 0.0 };
                let steps = (value - start) / step;
                let rounded = steps.round();

                // too many steps from `start` to tell grid points apart
                if !steps.is_finite() || (rounded - steps).abs() > self.tolerance {
                    return Err(MapError::OffStep { value, step });
                }

                Ok(start + rounded * step)
            }
            _ => Ok(value),
        }
    }
}

impl Mapper<f64, f64> for NumberValidate {
    fn to(&self, input: f64) -> Result<f64, MapError> {
        self.validate(input)
    }

    fn from(&self, output: f64) -> Result<f64, MapError> {
        self.validate(output)
    }
}

impl TryFrom<NumberValidateOptions> for NumberValidate {
    type Error = ConfigError;

    fn try_from(options: NumberValidateOptions) -> Result<Self, Self::Error> {
        Self::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(min: Option<f64>, max: Option<f64>, step: Option<f64>) -> NumberValidateOptions {
        NumberValidateOptions { min, max, step, ..Default::default() }
    }

    #[test]
    fn rejects_bad_config() {
        assert_eq!(NumberValidate::new(opts(Some(f64::NAN), None, None)), Err(ConfigError::MinNaN));
        assert_eq!(NumberValidate::new(opts(None, Some(f64::NAN), None)), Err(ConfigError::MaxNaN));
        assert_eq!(
            NumberValidate::new(opts(None, None, Some(f64::NAN))),
            Err(ConfigError::StepNaN)
        );
        assert_eq!(
            NumberValidate::new(opts(None, None, Some(-1.0))),
            Err(ConfigError::StepNotPositive(-1.0))
        );
        assert_eq!(
            NumberValidate::new(opts(None, None, Some(0.0))),
            Err(ConfigError::StepNotPositive(0.0))
        );
    }

    #[test]
    fn range_and_step() {
        let v = NumberValidate::new(opts(Some(0.0), Some(10.0), Some(1.0))).unwrap();

        for ok in [0.0, 5.0, 10.0] {
            assert_eq!(v.validate(ok), Ok(ok));
        }

        assert!(matches!(v.validate(-1.0), Err(MapError::OutOfRange { .. })));
        assert!(matches!(v.validate(11.0), Err(MapError::OutOfRange { .. })));
        assert!(matches!(v.validate(0.1), Err(MapError::OffStep { .. })));
        assert_eq!(v.validate(f64::NAN), Err(MapError::NaN));
    }

    #[test]
    fn nan_allowed() {
        let v = NumberValidate::new(NumberValidateOptions { nan: true, ..Default::default() })
            .unwrap();

        assert!(v.validate(f64::NAN).unwrap().is_nan());
        assert_eq!(v.validate(0.0), Ok(0.0));
        assert_eq!(v.validate(f64::INFINITY), Ok(f64::INFINITY));
    }

    #[test]
    fn step_without_min_starts_at_zero() {
        let v = NumberValidate::new(opts(None, None, Some(1.0))).unwrap();

        assert_eq!(v.validate(0.0), Ok(0.0));
        assert_eq!(v.validate(2.0), Ok(2.0));
        assert_eq!(v.validate(-7.0), Ok(-7.0));
        assert!(v.validate(0.1).is_err());
    }

    #[test]
    fn step_offset_from_min() {
        let v = NumberValidate::new(opts(Some(0.5), None, Some(1.0))).unwrap();

        assert_eq!(v.validate(2.5), Ok(2.5));
        assert!(v.validate(2.0).is_err());
    }

    #[test]
    fn snaps_to_grid() {
        let v = NumberValidate::new(opts(Some(0.0), Some(1.0), Some(0.1))).unwrap();

        // 0.1 + 0.2 is 0.30000000000000004
        assert_eq!(v.validate(0.1 + 0.2), Ok(3.0 * 0.1));
        assert_eq!(v.validate(0.7 + 0.000_001), Ok(7.0 * 0.1));
        assert!(v.validate(0.75).is_err());
    }

    #[test]
    fn step_count_overflow() {
        let v = NumberValidate::new(opts(Some(0.0), None, Some(1e-300))).unwrap();

        assert_eq!(v.validate(0.0), Ok(0.0));
        assert_eq!(v.validate(1e10), Err(MapError::OffStep { value: 1e10, step: 1e-300 }));
        assert_eq!(v.to(1e10), v.from(1e10));
    }

    #[test]
    fn custom_tolerance() {
        let v = NumberValidate::new(opts(None, None, Some(1.0)))
            .unwrap()
            .with_tolerance(0.25)
            .unwrap();

        assert_eq!(v.validate(2.2), Ok(2.0));
        assert!(v.validate(2.3).is_err());
        assert_eq!(
            v.with_tolerance(-1.0),
            Err(ConfigError::InvalidTolerance(-1.0))
        );
    }

    #[test]
    fn options_from_json() {
        let options: NumberValidateOptions =
            serde_json::from_value(serde_json::json!({ "min": 5, "max": 30, "step": 0.5 }))
                .unwrap();

        assert_eq!(options, opts(Some(5.0), Some(30.0), Some(0.5)));
        assert!(!options.nan);

        let v = NumberValidate::try_from(options).unwrap();
        assert_eq!(v.to(21.5), Ok(21.5));
        assert!(v.from(21.7).is_err());

        assert_eq!(
            serde_json::to_value(NumberValidateOptions::default()).unwrap(),
            serde_json::json!({ "nan": false })
        );
        assert!(
            serde_json::from_value::<NumberValidateOptions>(serde_json::json!({ "stpe": 1 }))
                .is_err()
        );
    }
}
