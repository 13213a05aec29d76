use crate::error::{KcResult, KeycraftError};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Optimiser settings exposed on the command line.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Generation budget (search steps plus breakouts).
    #[arg(long, default_value_t = 1000)]
    pub generations: usize,
    /// Wall-clock budget in minutes.
    #[arg(long, default_value_t = 5.0)]
    pub time_minutes: f64,
    /// 0 picks a seed from the clock.
    #[arg(short = 'S', long, default_value_t = 0)]
    pub seed: u64,
    /// Maximum swaps evaluated per search step before subsampling kicks in.
    #[arg(long, default_value_t = 1000)]
    pub neighbourhood: usize,
    /// Characters that must stay where they are.
    #[arg(long, default_value = "")]
    pub pin: String,
    /// If set, only these characters may move.
    #[arg(long, default_value = "")]
    pub free: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            generations: 1000,
            time_minutes: 5.0,
            seed: 0,
            neighbourhood: 1000,
            pin: String::new(),
            free: String::new(),
        }
    }
}

/// Signed weight per metric name. Positive rewards a higher metric value,
/// negative penalises it. Unknown names weigh zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights {
    values: BTreeMap<String, f64>,
}

impl Default for Weights {
    fn default() -> Self {
        Self::from_pairs(&[
            ("SFB", -1.0),
            ("LSB", -0.5),
            ("FSB", -0.8),
            ("HSB", -0.3),
            ("SFS", -0.3),
            ("LSS", -0.1),
            ("FSS", -0.2),
            ("HSS", -0.1),
            ("ALT-NML", 0.1),
            ("ALT-SFS", -0.2),
            ("2RL-IN", 0.2),
            ("2RL-OUT", 0.1),
            ("2RL-SFB", -0.2),
            ("3RL-IN", 0.1),
            ("3RL-OUT", 0.05),
            ("3RL-SFB", -0.2),
            ("RED-NML", -0.2),
            ("RED-WEAK", -0.5),
            ("RED-SFS", -0.4),
            ("HDEV", -0.1),
            ("FDEV", -0.1),
            ("RDEV", -0.1),
            ("PDEV", -0.2),
        ])
    }
}

impl Weights {
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[inline]
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    /// Non-zero weights in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter(|(_, v)| **v != 0.0)
            .map(|(k, v)| (k.as_str(), *v))
    }

    pub fn scaled(&self, k: f64) -> Self {
        Self {
            values: self.values.iter().map(|(n, v)| (n.clone(), v * k)).collect(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KeycraftError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Applies `NAME=value` overrides separated by commas, e.g. `SFB=-2,LSB=-1`.
    pub fn merge_overrides(&mut self, overrides: &str) -> KcResult<()> {
        for part in overrides.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = part.split_once('=').ok_or_else(|| {
                KeycraftError::Config(format!("Weight override '{}' is not NAME=value", part))
            })?;
            let value: f64 = value.trim().parse().map_err(|_| {
                KeycraftError::Config(format!("Invalid number in weight override '{}'", part))
            })?;
            self.set(name.trim(), value);
        }
        Ok(())
    }
}

/// Ideal load distribution feeding the deviation metrics (percentages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetLoads {
    pub hand: [f64; 2],
    pub finger: [f64; 10],
    pub row: [f64; 3],
    /// Per pinky slot, ordered as `geometry::PINKY_SLOTS`.
    pub pinky_penalties: [f64; 12],
}

impl Default for TargetLoads {
    fn default() -> Self {
        Self {
            hand: [50.0, 50.0],
            finger: [8.0, 11.0, 16.0, 15.0, 0.0, 0.0, 15.0, 16.0, 11.0, 8.0],
            row: [18.5, 73.0, 8.5],
            pinky_penalties: [2.0, 1.0, 1.0, 0.0, 2.0, 1.0, 2.0, 1.0, 1.0, 0.0, 2.0, 1.0],
        }
    }
}

impl TargetLoads {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KeycraftError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let targets: TargetLoads = serde_json::from_str(&content)?;
        targets.validate()?;
        Ok(targets)
    }

    pub fn validate(&self) -> KcResult<()> {
        let all = self
            .hand
            .iter()
            .chain(&self.finger)
            .chain(&self.row)
            .chain(&self.pinky_penalties);
        for v in all {
            if !v.is_finite() || *v < 0.0 {
                return Err(KeycraftError::Config(format!(
                    "Target loads must be finite and non-negative, found {}",
                    v
                )));
            }
        }
        Ok(())
    }

    pub fn set_finger_targets(&mut self, s: &str) -> KcResult<()> {
        self.finger = parse_f64_array::<10>(s, "finger")?;
        Ok(())
    }
}

pub fn parse_f64_array<const N: usize>(s: &str, name: &str) -> KcResult<[f64; N]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(KeycraftError::Config(format!(
            "--{} requires {} values",
            name, N
        )));
    }
    let mut arr = [0.0; N];
    for (i, p) in parts.iter().enumerate() {
        arr[i] = p
            .trim()
            .parse()
            .map_err(|_| KeycraftError::Config(format!("Invalid number in {}", name)))?;
    }
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_weight_is_zero() {
        let w = Weights::default();
        assert_eq!(w.get("NOT-A-METRIC"), 0.0);
        assert_eq!(w.get("SFB"), -1.0);
    }

    #[test]
    fn test_merge_overrides() {
        let mut w = Weights::empty();
        w.merge_overrides("SFB=-2.5, 2RL-IN=1").unwrap();
        assert_eq!(w.get("SFB"), -2.5);
        assert_eq!(w.get("2RL-IN"), 1.0);
        assert!(w.merge_overrides("SFB").is_err());
        assert!(w.merge_overrides("SFB=abc").is_err());
    }

    #[test]
    fn test_iter_skips_zero_weights() {
        let w = Weights::from_pairs(&[("SFB", -1.0), ("LSB", 0.0)]);
        let names: Vec<&str> = w.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["SFB"]);
    }

    #[test]
    fn test_weights_json_is_flat_map() {
        let w: Weights = serde_json::from_str(r#"{"SFB": -3.0, "FLW": 0.5}"#).unwrap();
        assert_eq!(w.get("SFB"), -3.0);
        assert_eq!(w.get("FLW"), 0.5);
    }

    #[test]
    fn test_partial_targets_use_defaults() {
        let t: TargetLoads = serde_json::from_str(r#"{"hand": [45.0, 55.0]}"#).unwrap();
        assert_eq!(t.hand, [45.0, 55.0]);
        assert_eq!(t.row, TargetLoads::default().row);
    }

    #[test]
    fn test_parse_f64_array() {
        let a = parse_f64_array::<3>("1, 2.5,3", "row").unwrap();
        assert_eq!(a, [1.0, 2.5, 3.0]);
        assert!(parse_f64_array::<3>("1,2", "row").is_err());
    }
}
