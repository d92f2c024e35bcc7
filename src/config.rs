//! Deploy-time configuration
//!
//! Everything here is fixed when the contracts are deployed. The token
//! owner in particular is immutable for the lifetime of the runtime.

use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::scheduler::CompletionPolicy;
use crate::{Error, Result};

/// Default upper bound on `token_uri` length, in bytes.
pub const DEFAULT_TOKEN_URI_MAX_LEN: usize = 256;

/// Fungible token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenMetadata {
    /// Display name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Decimal places for display
    pub decimals: u8,
    /// Initial metadata URI (owner may replace it later)
    pub token_uri: String,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "Quantum Token".to_string(),
            symbol: "QNT".to_string(),
            decimals: 6,
            token_uri: String::new(),
        }
    }
}

/// Size limits applied by `schedule-experiment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_field_names)]
pub struct SchedulerLimits {
    /// Maximum title length, in bytes
    pub max_title_len: usize,
    /// Maximum description length, in bytes
    pub max_description_len: usize,
    /// Maximum number of participant locations
    pub max_locations: usize,
}

impl Default for SchedulerLimits {
    fn default() -> Self {
        Self {
            max_title_len: 100,
            max_description_len: 500,
            max_locations: 10,
        }
    }
}

/// Full deployment configuration for both contracts.
///
/// # Example
///
/// ```rust
/// use quantum_collab::config::DeployConfig;
///
/// let config = DeployConfig::from_json(r#"{ "owner": "ST1OWNER" }"#)?;
/// assert_eq!(config.owner.as_str(), "ST1OWNER");
/// assert_eq!(config.token.symbol, "QNT");
/// # Ok::<(), quantum_collab::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Token contract owner
    pub owner: Identity,
    /// Token metadata
    #[serde(default)]
    pub token: TokenMetadata,
    /// Upper bound on `set-token-uri` input
    #[serde(default = "default_token_uri_max_len")]
    pub token_uri_max_len: usize,
    /// Scheduler input limits
    #[serde(default)]
    pub scheduler: SchedulerLimits,
    /// Who may complete an in-progress experiment
    #[serde(default)]
    pub completion_policy: CompletionPolicy,
}

const fn default_token_uri_max_len() -> usize {
    DEFAULT_TOKEN_URI_MAX_LEN
}

impl DeployConfig {
    /// Configuration with defaults for everything but the owner.
    #[must_use]
    pub fn new(owner: impl Into<Identity>) -> Self {
        Self {
            owner: owner.into(),
            token: TokenMetadata::default(),
            token_uri_max_len: DEFAULT_TOKEN_URI_MAX_LEN,
            scheduler: SchedulerLimits::default(),
            completion_policy: CompletionPolicy::default(),
        }
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed JSON and
    /// [`Error::InvalidInput`] if validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty owner, zero limits, or an
    /// initial URI longer than `token_uri_max_len`.
    pub fn validate(&self) -> Result<()> {
        if self.owner.as_str().is_empty() {
            return Err(Error::InvalidInput("owner must not be empty".to_string()));
        }
        if self.scheduler.max_locations == 0 {
            return Err(Error::InvalidInput(
                "max_locations must be at least 1".to_string(),
            ));
        }
        if self.token.token_uri.len() > self.token_uri_max_len {
            return Err(Error::InvalidInput(format!(
                "initial token URI exceeds {} bytes",
                self.token_uri_max_len
            )));
        }
        Ok(())
    }
}
