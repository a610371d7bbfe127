use serde::{Deserialize, Serialize};

use super::error::TrailError;

/// Saved configuration for a trail component.
///
/// Only these two integers persist. Changing `samples_per_segment` on a live
/// trail has no effect until the trail is rebuilt with `TrailComponent::new`,
/// because the geometry budget is planned once from these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailConfig {
    /// Maximum number of retained low/high sample pairs.
    #[serde(default = "default_max_points")]
    pub max_points: usize,
    /// Spline samples per Catmull-Rom segment (K). Must be at least 1.
    #[serde(default = "default_samples_per_segment")]
    pub samples_per_segment: usize,
}

fn default_max_points() -> usize {
    20
}

fn default_samples_per_segment() -> usize {
    4
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_points: default_max_points(),
            samples_per_segment: default_samples_per_segment(),
        }
    }
}

impl TrailConfig {
    pub fn new(max_points: usize, samples_per_segment: usize) -> Self {
        Self {
            max_points,
            samples_per_segment,
        }
    }

    // -- Builder pattern --

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    pub fn with_samples_per_segment(mut self, samples: usize) -> Self {
        self.samples_per_segment = samples;
        self
    }

    /// Reject values the budget planner cannot work with.
    pub fn validate(&self) -> Result<(), TrailError> {
        if self.samples_per_segment == 0 {
            return Err(TrailError::InvalidConfig(
                "samples_per_segment must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TrailError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the config to a JSON string.
    pub fn to_json(&self) -> Result<String, TrailError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = TrailConfig::default();
        assert_eq!(config.max_points, 20);
        assert_eq!(config.samples_per_segment, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let config = TrailConfig::from_json(r#"{ "max_points": 32, "samples_per_segment": 8 }"#).unwrap();
        assert_eq!(config, TrailConfig::new(32, 8));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = TrailConfig::from_json(r#"{ "max_points": 6 }"#).unwrap();
        assert_eq!(config.max_points, 6);
        assert_eq!(config.samples_per_segment, 4);
    }

    #[test]
    fn json_round_trip() {
        let config = TrailConfig::new(12, 5);
        let json = config.to_json().unwrap();
        assert_eq!(TrailConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn zero_samples_rejected() {
        let config = TrailConfig::default().with_samples_per_segment(0);
        assert!(matches!(config.validate(), Err(TrailError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = TrailConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TrailError::Config(_)));
    }
}
