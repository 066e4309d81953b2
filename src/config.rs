use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::math::COORD_TOLERANCE;

/// Tolerances and thresholds driving connectivity and edge classification.
///
/// `Default` reproduces the tuned values the classifier was calibrated with.
/// Every field may be overridden from JSON; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Degrees from the 0°/180° axis still counted as horizontal.
    pub horizontal_tolerance_deg: f64,
    /// Degrees from the 90°/270° axis still counted as vertical.
    pub vertical_tolerance_deg: f64,
    /// Per-axis coordinate tolerance (degrees) for shared endpoints.
    pub connection_tolerance_deg: f64,
    /// Average inter-edge angle below which a sloped edge is a valley.
    pub valley_max_angle_deg: f64,
    /// Average inter-edge angle above which a sloped edge is a hip.
    pub hip_min_angle_deg: f64,
    /// Upper bound of the hip band for edges with three or more connections.
    pub hip_max_angle_deg: f64,
    /// Isolated edges shorter than this are penetrations.
    pub penetration_max_length_ft: f64,
    /// Minimum confidence accepted by "accept high-confidence".
    pub high_confidence_threshold: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            horizontal_tolerance_deg: 15.0,
            vertical_tolerance_deg: 20.0,
            connection_tolerance_deg: COORD_TOLERANCE,
            valley_max_angle_deg: 100.0,
            hip_min_angle_deg: 130.0,
            hip_max_angle_deg: 160.0,
            penetration_max_length_ft: 10.0,
            high_confidence_threshold: 90,
        }
    }
}

impl ClassifierConfig {
    /// Parses a config from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Invalid` if the thresholds are inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that tolerances are positive and the angle bands are ordered.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("horizontal_tolerance_deg", self.horizontal_tolerance_deg),
            ("vertical_tolerance_deg", self.vertical_tolerance_deg),
            ("connection_tolerance_deg", self.connection_tolerance_deg),
            ("penetration_max_length_ft", self.penetration_max_length_ft),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")).into());
            }
        }
        if !(self.valley_max_angle_deg < self.hip_min_angle_deg
            && self.hip_min_angle_deg < self.hip_max_angle_deg
            && self.hip_max_angle_deg <= 180.0)
        {
            return Err(ConfigError::Invalid(format!(
                "angle bands must satisfy valley_max < hip_min < hip_max <= 180, got {} / {} / {}",
                self.valley_max_angle_deg, self.hip_min_angle_deg, self.hip_max_angle_deg
            ))
            .into());
        }
        if self.high_confidence_threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "high_confidence_threshold must be at most 100, got {}",
                self.high_confidence_threshold
            ))
            .into());
        }
        Ok(())
    }
}
