// Battery state-of-charge domain model
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 12 V lead-acid open-circuit voltage curve.
pub const LEAD_ACID_12V: [SocAnchor; 6] = [
    SocAnchor::new(11.6, 0.0),
    SocAnchor::new(11.8, 20.0),
    SocAnchor::new(12.1, 40.0),
    SocAnchor::new(12.2, 50.0),
    SocAnchor::new(12.4, 70.0),
    SocAnchor::new(12.7, 100.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct SocAnchor {
    pub voltage: f64,
    pub soc: f64,
}

impl SocAnchor {
    pub const fn new(voltage: f64, soc: f64) -> Self {
        Self { voltage, soc }
    }
}

impl From<(f64, f64)> for SocAnchor {
    fn from((voltage, soc): (f64, f64)) -> Self {
        Self::new(voltage, soc)
    }
}

impl From<SocAnchor> for (f64, f64) {
    fn from(anchor: SocAnchor) -> Self {
        (anchor.voltage, anchor.soc)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SocMapError {
    #[error("SOC table needs at least 2 anchors, got {0}")]
    TooFewAnchors(usize),
    #[error("SOC anchor {index} is not a finite number")]
    NotFinite { index: usize },
    #[error("SOC anchor {index} breaks ordering (voltage must increase, soc must not decrease)")]
    NotMonotonic { index: usize },
}

/// Piecewise-linear voltage to state-of-charge mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct VoltageSocMap {
    anchors: Vec<SocAnchor>,
}

impl Default for VoltageSocMap {
    fn default() -> Self {
        Self {
            anchors: LEAD_ACID_12V.to_vec(),
        }
    }
}

impl VoltageSocMap {
    /// Build a map from a configured anchor table, rejecting tables that are
    /// too short or not ordered.
    pub fn new(anchors: Vec<SocAnchor>) -> Result<Self, SocMapError> {
        if anchors.len() < 2 {
            return Err(SocMapError::TooFewAnchors(anchors.len()));
        }
        for (index, anchor) in anchors.iter().enumerate() {
            if !anchor.voltage.is_finite() || !anchor.soc.is_finite() {
                return Err(SocMapError::NotFinite { index });
            }
        }
        for (index, pair) in anchors.windows(2).enumerate() {
            if pair[1].voltage <= pair[0].voltage || pair[1].soc < pair[0].soc {
                return Err(SocMapError::NotMonotonic { index: index + 1 });
            }
        }
        Ok(Self { anchors })
    }

    pub fn anchors(&self) -> &[SocAnchor] {
        &self.anchors
    }

    /// State of charge in percent for a battery voltage, always within [0, 100].
    ///
    /// Non-finite input maps to 0 so that missing telemetry never poisons a gauge.
    pub fn soc(&self, voltage: f64) -> f64 {
        if !voltage.is_finite() {
            return 0.0;
        }
        let (Some(first), Some(last)) = (self.anchors.first(), self.anchors.last()) else {
            return 0.0;
        };

        let soc = if voltage <= first.voltage {
            first.soc
        } else if voltage >= last.voltage {
            last.soc
        } else {
            self.anchors
                .windows(2)
                .find(|pair| pair[0].voltage <= voltage && voltage < pair[1].voltage)
                .map(|pair| {
                    let (lower, upper) = (pair[0], pair[1]);
                    lower.soc
                        + (voltage - lower.voltage) / (upper.voltage - lower.voltage)
                            * (upper.soc - lower.soc)
                })
                .unwrap_or(last.soc)
        };

        soc.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_anchor_values() {
        let map = VoltageSocMap::default();
        for anchor in LEAD_ACID_12V {
            assert!(approx(map.soc(anchor.voltage), anchor.soc), "{anchor:?}");
        }
    }

    #[test]
    fn test_interpolates_between_anchors() {
        let map = VoltageSocMap::default();
        assert!(approx(map.soc(11.7), 10.0));
        assert!(approx(map.soc(12.3), 60.0));
        assert!(approx(map.soc(12.55), 85.0));
    }

    #[test]
    fn test_saturates_outside_table() {
        let map = VoltageSocMap::default();
        assert_eq!(map.soc(12.7), 100.0);
        assert_eq!(map.soc(14.4), 100.0);
        assert_eq!(map.soc(11.6), 0.0);
        assert_eq!(map.soc(0.0), 0.0);
        assert_eq!(map.soc(-3.0), 0.0);
    }

    #[test]
    fn test_non_finite_voltage_is_zero() {
        let map = VoltageSocMap::default();
        assert_eq!(map.soc(f64::NAN), 0.0);
        assert_eq!(map.soc(f64::INFINITY), 0.0);
        assert_eq!(map.soc(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let map = VoltageSocMap::default();
        let mut previous = map.soc(11.0);
        let mut voltage = 11.0;
        while voltage <= 13.5 {
            let soc = map.soc(voltage);
            assert!((0.0..=100.0).contains(&soc), "soc {soc} at {voltage}");
            assert!(soc >= previous, "soc dropped at {voltage}");
            previous = soc;
            voltage += 0.01;
        }
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert_eq!(
            VoltageSocMap::new(vec![SocAnchor::new(12.0, 50.0)]),
            Err(SocMapError::TooFewAnchors(1))
        );
        assert_eq!(
            VoltageSocMap::new(vec![SocAnchor::new(12.0, 50.0), SocAnchor::new(11.0, 60.0)]),
            Err(SocMapError::NotMonotonic { index: 1 })
        );
        assert_eq!(
            VoltageSocMap::new(vec![SocAnchor::new(f64::NAN, 0.0), SocAnchor::new(11.0, 60.0)]),
            Err(SocMapError::NotFinite { index: 0 })
        );
    }

    #[test]
    fn test_clamps_out_of_range_table() {
        let map =
            VoltageSocMap::new(vec![SocAnchor::new(10.0, -20.0), SocAnchor::new(13.0, 140.0)])
                .unwrap();
        assert_eq!(map.soc(9.0), 0.0);
        assert_eq!(map.soc(14.0), 100.0);
        assert!(approx(map.soc(11.5), 60.0));
    }
}
