//! Dispatcher Configuration
//!
//! The only tunable is the reflex threshold. Out-of-range values are
//! clamped by default; `threshold_policy: reject` turns them into an error
//! instead.
//!
//! ```yaml
//! reflex_threshold: 0.75
//! threshold_policy: clamp
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DispatchError, Result};

/// Threshold used when no configuration is supplied.
pub const DEFAULT_REFLEX_THRESHOLD: f32 = 0.75;

/// What to do with a reflex threshold outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Silently pull the value into range (logged at warn level).
    #[default]
    Clamp,
    /// Refuse to build the dispatcher.
    Reject,
}

/// Root dispatcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    #[serde(default = "default_reflex_threshold")]
    pub reflex_threshold: f32,
    #[serde(default)]
    pub threshold_policy: ThresholdPolicy,
}

fn default_reflex_threshold() -> f32 {
    DEFAULT_REFLEX_THRESHOLD
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            reflex_threshold: DEFAULT_REFLEX_THRESHOLD,
            threshold_policy: ThresholdPolicy::Clamp,
        }
    }
}

impl DispatcherConfig {
    /// Load from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DispatchError::ConfigIo {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::load_from_str(&content)
    }

    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| DispatchError::ConfigParse(e.to_string()))
    }

    /// Resolve the effective threshold according to the configured policy.
    pub fn effective_threshold(&self) -> Result<f32> {
        match self.threshold_policy {
            ThresholdPolicy::Clamp => Ok(clamp_threshold(self.reflex_threshold)),
            ThresholdPolicy::Reject => {
                if self.reflex_threshold.is_finite()
                    && (0.0..=1.0).contains(&self.reflex_threshold)
                {
                    Ok(self.reflex_threshold)
                } else {
                    Err(DispatchError::InvalidThreshold(self.reflex_threshold))
                }
            }
        }
    }
}

/// Pull a caller-supplied threshold into `[0, 1]`.
///
/// NaN has no meaningful position in the range and falls back to
/// [`DEFAULT_REFLEX_THRESHOLD`].
pub fn clamp_threshold(value: f32) -> f32 {
    if value.is_nan() {
        tracing::warn!(
            "Reflex threshold is NaN, using default {}",
            DEFAULT_REFLEX_THRESHOLD
        );
        return DEFAULT_REFLEX_THRESHOLD;
    }

    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        tracing::warn!("Reflex threshold {} clamped to {}", value, clamped);
    }
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_str_defaults() {
        let config = DispatcherConfig::load_from_str("{}").unwrap();
        assert_eq!(config, DispatcherConfig::default());
    }

    #[test]
    fn test_load_from_str_full() {
        let yaml = r#"
reflex_threshold: 0.6
threshold_policy: reject
"#;
        let config = DispatcherConfig::load_from_str(yaml).unwrap();
        assert_eq!(config.reflex_threshold, 0.6);
        assert_eq!(config.threshold_policy, ThresholdPolicy::Reject);
        assert_eq!(config.effective_threshold().unwrap(), 0.6);
    }

    #[test]
    fn test_load_from_str_bad_yaml() {
        let result = DispatcherConfig::load_from_str("reflex_threshold: [nope");
        assert!(matches!(result, Err(DispatchError::ConfigParse(_))));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = DispatcherConfig::load_from_file(Path::new("/nonexistent/dispatcher.yaml"));
        assert!(matches!(result, Err(DispatchError::ConfigIo { .. })));
    }

    #[test]
    fn test_clamp_policy() {
        let config = DispatcherConfig {
            reflex_threshold: 1.7,
            threshold_policy: ThresholdPolicy::Clamp,
        };
        assert_eq!(config.effective_threshold().unwrap(), 1.0);

        let config = DispatcherConfig {
            reflex_threshold: -0.3,
            threshold_policy: ThresholdPolicy::Clamp,
        };
        assert_eq!(config.effective_threshold().unwrap(), 0.0);
    }

    #[test]
    fn test_reject_policy() {
        let config = DispatcherConfig {
            reflex_threshold: 1.2,
            threshold_policy: ThresholdPolicy::Reject,
        };
        assert!(matches!(
            config.effective_threshold(),
            Err(DispatchError::InvalidThreshold(_))
        ));

        let config = DispatcherConfig {
            reflex_threshold: f32::NAN,
            threshold_policy: ThresholdPolicy::Reject,
        };
        assert!(config.effective_threshold().is_err());
    }

    #[test]
    fn test_clamp_nan_uses_default() {
        assert_eq!(clamp_threshold(f32::NAN), DEFAULT_REFLEX_THRESHOLD);
        assert_eq!(clamp_threshold(0.5), 0.5);
    }
}
