//! Construction-time configuration of a state machine.

use crate::builder::BuildError;
use crate::core::DEFAULT_STATE_LIMIT;
use serde::{Deserialize, Serialize};

/// Name given to machines that are not configured with one.
pub const DEFAULT_NAME: &str = "StateMachine";

/// Configuration accepted when a machine is created.
///
/// Every field is optional when deserializing; missing keys take their
/// default. Keys are camelCase.
///
/// # Example
///
/// ```rust
/// use juncture::Config;
///
/// let config = Config::from_json(r#"{ "stateLimit": 3, "strict": true }"#).unwrap();
///
/// assert_eq!(config.state_limit, 3);
/// assert!(config.strict);
/// assert_eq!(config.name, "StateMachine");
/// assert_eq!(config.log_level, None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Name used in log lines
    pub name: String,

    /// How many requested states the history keeps
    pub state_limit: usize,

    /// Reject requests that have no declared transition
    pub strict: bool,

    /// Log threshold; `None` disables logging
    pub log_level: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            state_limit: DEFAULT_STATE_LIMIT,
            strict: false,
            log_level: None,
        }
    }
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.state_limit == 0 {
            return Err(BuildError::ZeroStateLimit);
        }
        Ok(())
    }
}
