//! Main MatchConfig and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::refine::{HillClimbParams, IcpParams};

use super::sections::{PyramidSection, SearchSection};

/// Full matcher configuration loaded from YAML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct MatchConfig {
    /// Pyramid settings
    #[serde(default)]
    pub pyramid: PyramidSection,

    /// Search windows
    #[serde(default)]
    pub search: SearchSection,

    /// Hill-climbing refinement
    #[serde(default)]
    pub hill_climb: HillClimbParams,

    /// ICP refinement
    #[serde(default)]
    pub icp: IcpParams,
}

impl MatchConfig {
    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| Error::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidParameter(msg));

        if self.pyramid.levels < 2 {
            return invalid(format!("pyramid.levels must be >= 2, got {}", self.pyramid.levels));
        }
        if self.search.translation_window < 0.0 || self.search.rotation_window < 0.0 {
            return invalid("search windows must be non-negative".to_string());
        }
        if self.search.rotation_step <= 0.0 {
            return invalid(format!(
                "search.rotation_step must be positive, got {}",
                self.search.rotation_step
            ));
        }
        let hc = &self.hill_climb;
        if !(hc.shrink_factor > 0.0 && hc.shrink_factor < 1.0) {
            return invalid(format!(
                "hill_climb.shrink_factor must be in (0, 1), got {}",
                hc.shrink_factor
            ));
        }
        if hc.step_x <= 0.0 || hc.step_y <= 0.0 || hc.step_theta <= 0.0 {
            return invalid("hill_climb steps must be positive".to_string());
        }
        if self.icp.max_dist_ratio <= 0.0 {
            return invalid(format!(
                "icp.max_dist_ratio must be positive, got {}",
                self.icp.max_dist_ratio
            ));
        }
        if self.icp.trans_thresh < 0.0 || self.icp.rad_thresh < 0.0 {
            return invalid("icp thresholds must be non-negative".to_string());
        }
        Ok(())
    }
}
