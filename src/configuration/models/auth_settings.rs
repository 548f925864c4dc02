
use crate::services::issuance::TokenLifetimes;
use crate::services::keys::key_rotation::DEFAULT_ROTATION_INTERVAL;
use anyhow::Context;
use duration_string::DurationString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    /// Directory with one PEM public key per file; the file name is the key id.
    pub public_key_directory: PathBuf,

    #[serde(default = "default_rotation_interval")]
    pub key_rotation_interval: DurationString,

    /// Only services that mint tokens configure a signing key.
    #[serde(default)]
    pub signing_key: Option<SigningKeySettings>,

    #[serde(default)]
    pub admin_groups: Vec<String>,

    #[serde(default)]
    pub token_lifetimes: TokenLifetimeSettings,
}

#[derive(Debug, Deserialize)]
pub struct SigningKeySettings {
    pub key_id: String,
    pub private_key_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct TokenLifetimeSettings {
    pub user_session: DurationString,
    pub service_account: DurationString,
    pub internal_account: DurationString,
    pub integration: DurationString,
}

impl Default for TokenLifetimeSettings {
    fn default() -> Self {
        let defaults = TokenLifetimes::default();
        TokenLifetimeSettings {
            user_session: defaults.user_session.into(),
            service_account: defaults.service_account.into(),
            internal_account: defaults.internal_account.into(),
            integration: defaults.integration.into(),
        }
    }
}

impl From<&TokenLifetimeSettings> for TokenLifetimes {
    fn from(settings: &TokenLifetimeSettings) -> Self {
        TokenLifetimes {
            user_session: settings.user_session.into(),
            service_account: settings.service_account.into(),
            internal_account: settings.internal_account.into(),
            integration: settings.integration.into(),
        }
    }
}

fn default_rotation_interval() -> DurationString {
    DEFAULT_ROTATION_INTERVAL.into()
}

impl AuthSettings {
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        serde_yml::from_str(yaml).context("Failed to parse authentication settings")
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read authentication settings from {}", path.display()))?;
        Self::from_yaml(&yaml)
    }
}
