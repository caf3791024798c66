use serde::{Deserialize, Serialize};

use crate::{MapError, Mapper};

/// Scales a number by a constant factor, eg. tenths of a degree to degrees with `0.1`.
///
/// The factor must not be zero. Scaling there and back is exact for most values but may be
/// off by one ulp, as with any float multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(pub f64);

impl Multiplier {
    pub const fn new(factor: f64) -> Self {
        Self(factor)
    }
}

impl Mapper<f64, f64> for Multiplier {
    fn to(&self, input: f64) -> Result<f64, MapError> {
        Ok(input * self.0)
    }

    fn from(&self, output: f64) -> Result<f64, MapError> {
        Ok(output / self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_both_ways() {
        let m = Multiplier::new(10.0);
        assert_eq!(m.to(1.0).unwrap(), 10.0);
        assert_eq!(m.from(10.0).unwrap(), 1.0);
    }

    #[test]
    fn inverse_round_trips() {
        // exact for these; arbitrary floats may be off by an ulp
        let m = Multiplier::new(10.0).then(Multiplier::new(10.0).inverse());

        for x in [0.0, 1.0, -3.0, 0.1, 0.5, 12.5, 42.0, 1e10] {
            assert_eq!(m.to(x).unwrap(), x);
            assert_eq!(m.from(x).unwrap(), x);
        }
    }

    #[test]
    fn config_format() {
        assert_eq!(serde_json::to_value(Multiplier::new(0.1)).unwrap(), serde_json::json!(0.1));
        assert_eq!(
            serde_json::from_value::<Multiplier>(serde_json::json!(100)).unwrap(),
            Multiplier::new(100.0)
        );
    }
}
