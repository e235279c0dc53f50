// crates/domain/src/buster.rs

use chrono::Utc;
use std::fmt;

/// Deployment-wide cache buster.
///
/// Fixed at startup and appended to generated asset URLs so clients drop
/// cached copies after a deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentCacheBuster {
    value: String,
}

impl DeploymentCacheBuster {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Buster derived from the process start time.
    pub fn from_start_time() -> Self {
        Self::new(Utc::now().timestamp().to_string())
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for DeploymentCacheBuster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
