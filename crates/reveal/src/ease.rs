//! Easing curves.

use serde::{Deserialize, Serialize};

/// Maps linear progress in [0, 1] to eased progress. The `Power2` family is
/// cubic, matching the usual animation-library naming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    Power2In,
    Power2Out,
    Power2InOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Ease; 4] = [Ease::Linear, Ease::Power2In, Ease::Power2Out, Ease::Power2InOut];

    #[test]
    fn endpoints_are_fixed() {
        for ease in ALL {
            assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
        }
    }

    #[test]
    fn in_lags_and_out_leads() {
        assert_eq!(Ease::Power2In.apply(0.5), 0.125);
        assert_eq!(Ease::Power2Out.apply(0.5), 0.875);
        assert_eq!(Ease::Power2InOut.apply(0.5), 0.5);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Ease::Power2Out.apply(-1.0), 0.0);
        assert_eq!(Ease::Power2In.apply(3.0), 1.0);
    }

    proptest! {
        #[test]
        fn curves_are_monotonic(a in 0.0_f64..=1.0, b in 0.0_f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for ease in ALL {
                prop_assert!(ease.apply(lo) <= ease.apply(hi) + 1e-12);
            }
        }
    }
}
