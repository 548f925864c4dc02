#[cfg(test)]
mod tests;

use crate::configuration::models::auth_settings::{AuthSettings, SigningKeySettings};
use crate::services::audit::AuditService;
use crate::services::audit::log_audit_service::LogAuditService;
use crate::services::issuance::{TokenIssuer, TokenLifetimes};
use crate::services::keys::key_rotation::KeyRotation;
use crate::services::keys::key_store::KeyStore;
use crate::services::signing::TokenSigner;
use crate::services::verification::TokenVerifier;
use anyhow::Context;
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The authentication services of a single process, wired from [`AuthSettings`].
pub struct AuthServices {
    key_store: Arc<KeyStore>,
    verifier: Arc<TokenVerifier>,
    issuer: Option<Arc<TokenIssuer>>,
    rotation: KeyRotation,
}

impl AuthServices {
    pub async fn start(settings: &AuthSettings, cancellation: CancellationToken) -> anyhow::Result<Self> {
        Self::start_with_audit(settings, Arc::new(LogAuditService::new()), cancellation).await
    }

    /// Fails when the signing key or the initial set of public keys cannot be loaded.
    pub async fn start_with_audit(
        settings: &AuthSettings,
        audit: Arc<dyn AuditService>,
        cancellation: CancellationToken,
    ) -> anyhow::Result<Self> {
        let issuer = match &settings.signing_key {
            Some(signing_key) => {
                let signer = Arc::new(load_signer(signing_key).await?);
                let issuer = TokenIssuer::new(signer, settings.admin_groups.iter().cloned())
                    .with_lifetimes(TokenLifetimes::from(&settings.token_lifetimes))
                    .with_audit(audit.clone());
                Some(Arc::new(issuer))
            }
            None => None,
        };

        let key_store = Arc::new(KeyStore::empty());
        let rotation = KeyRotation::start_with_interval(
            key_store.clone(),
            settings.public_key_directory.clone(),
            settings.key_rotation_interval.into(),
            cancellation,
        )
        .await
        .context("Failed to load public keys")?;

        let verifier = Arc::new(TokenVerifier::with_key_store(key_store.clone()).with_audit(audit));

        info!(key_ids:? = key_store.key_ids(), issuing = issuer.is_some(); "Authentication services started");
        Ok(AuthServices {
            key_store,
            verifier,
            issuer,
            rotation,
        })
    }

    pub fn key_store(&self) -> &Arc<KeyStore> {
        &self.key_store
    }

    pub fn verifier(&self) -> &Arc<TokenVerifier> {
        &self.verifier
    }

    /// Present only when a signing key is configured.
    pub fn issuer(&self) -> Option<&Arc<TokenIssuer>> {
        self.issuer.as_ref()
    }

    pub fn rotation(&self) -> &KeyRotation {
        &self.rotation
    }

    /// Stops key rotation and waits for it to finish.
    pub async fn shutdown(self) {
        self.rotation.stop().await;
        info!("Authentication services stopped");
    }
}

async fn load_signer(settings: &SigningKeySettings) -> anyhow::Result<TokenSigner> {
    let pem = tokio::fs::read(&settings.private_key_path)
        .await
        .with_context(|| format!("Failed to read signing key {}", settings.private_key_path.display()))?;
    TokenSigner::new(&settings.key_id, &pem).context("Failed to load signing key")
}
