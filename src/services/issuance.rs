
use crate::contracts::ssd_token::v1::token_type::TokenType;
use crate::contracts::ssd_token::v1::typed_claims::{
    ClaimsShapeError, IntegrationClaims, InternalClaims, ServiceClaims, TypedClaims, UserClaims,
};
use crate::services::audit::AuditService;
use crate::services::audit::events::token_issuance_event::TokenIssuanceEvent;
use crate::services::clock::{Clock, SystemClock};
use crate::services::signing::{SigningError, TokenSigner};
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("claims cannot be issued: {0}")]
    InvalidClaims(#[from] ClaimsShapeError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("token lifetime must be at least one second, got {0:?}")]
    InvalidLifetime(Duration),
}

/// Lifetimes applied when a caller does not ask for a specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub user_session: Duration,
    pub service_account: Duration,
    pub internal_account: Duration,
    pub integration: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        TokenLifetimes {
            user_session: Duration::from_secs(60 * 60),
            service_account: Duration::from_secs(24 * 60 * 60),
            internal_account: Duration::from_secs(10 * 60),
            integration: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl TokenLifetimes {
    pub fn for_type(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::User => self.user_session,
            TokenType::ServiceAccount => self.service_account,
            TokenType::InternalAccount => self.internal_account,
            TokenType::Integration => self.integration,
        }
    }
}

/// Mints typed SSD tokens with the active signing key.
pub struct TokenIssuer {
    signer: Arc<TokenSigner>,
    clock: Arc<dyn Clock>,
    admin_groups: HashSet<String>,
    lifetimes: TokenLifetimes,
    audit: Option<Arc<dyn AuditService>>,
}

impl TokenIssuer {
    pub fn new(signer: Arc<TokenSigner>, admin_groups: impl IntoIterator<Item = String>) -> Self {
        TokenIssuer {
            signer,
            clock: Arc::new(SystemClock),
            admin_groups: admin_groups.into_iter().collect(),
            lifetimes: TokenLifetimes::default(),
            audit: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditService>) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn with_lifetimes(mut self, lifetimes: TokenLifetimes) -> Self {
        self.lifetimes = lifetimes;
        self
    }

    pub fn default_lifetime(&self, token_type: TokenType) -> Duration {
        self.lifetimes.for_type(token_type)
    }

    pub fn signer(&self) -> &Arc<TokenSigner> {
        &self.signer
    }

    /// True when any of the groups is configured as an admin group.
    pub fn is_admin(&self, groups: &[String]) -> bool {
        groups.iter().any(|group| self.admin_groups.contains(group))
    }

    pub fn mint_user_token(
        &self,
        user_id: &str,
        org_id: &str,
        groups: Vec<String>,
        lifetime: Duration,
    ) -> Result<String, IssuanceError> {
        let claims = UserClaims {
            user_id: user_id.to_owned(),
            org_id: org_id.to_owned(),
            is_admin: self.is_admin(&groups),
            groups,
        };
        self.mint(&TypedClaims::User(claims), lifetime)
    }

    /// A user token that lives for the configured session lifetime.
    pub fn mint_session_token(&self, user_id: &str, org_id: &str, groups: Vec<String>) -> Result<String, IssuanceError> {
        self.mint_user_token(user_id, org_id, groups, self.lifetimes.user_session)
    }

    pub fn mint_service_token(
        &self,
        service: &str,
        instance: &str,
        org_id: &str,
        lifetime: Duration,
    ) -> Result<String, IssuanceError> {
        let claims = ServiceClaims {
            service: service.to_owned(),
            instance: instance.to_owned(),
            org_id: org_id.to_owned(),
        };
        self.mint(&TypedClaims::Service(claims), lifetime)
    }

    pub fn mint_internal_token(
        &self,
        service: &str,
        authorizations: Vec<String>,
        lifetime: Duration,
    ) -> Result<String, IssuanceError> {
        let claims = InternalClaims {
            service: service.to_owned(),
            authorizations,
        };
        self.mint(&TypedClaims::Internal(claims), lifetime)
    }

    pub fn mint_integration_token(
        &self,
        team_id: &str,
        org_id: &str,
        lifetime: Duration,
    ) -> Result<String, IssuanceError> {
        let claims = IntegrationClaims {
            team_id: team_id.to_owned(),
            org_id: org_id.to_owned(),
        };
        self.mint(&TypedClaims::Integration(claims), lifetime)
    }

    pub fn mint(&self, claims: &TypedClaims, lifetime: Duration) -> Result<String, IssuanceError> {
        let token_id = Uuid::new_v4().to_string();
        let result = self.sign(claims, lifetime, &token_id);

        let event = match &result {
            Ok(_) => {
                debug!(id = token_id.as_str(), token_type = claims.token_type().as_str(); "Token issued");
                TokenIssuanceEvent::issued(&token_id, claims.token_type(), &self.signer.key_id(), lifetime)
            }
            Err(e) => {
                warn!(token_type = claims.token_type().as_str(); "Token issuance failed: {}", e);
                TokenIssuanceEvent::failed(claims.token_type(), &self.signer.key_id(), lifetime, e.to_string())
            }
        };
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.record_token_issuance(event) {
                warn!("Failed to record token issuance: {}", e);
            }
        }
        result
    }

    fn sign(&self, claims: &TypedClaims, lifetime: Duration, token_id: &str) -> Result<String, IssuanceError> {
        if lifetime.as_secs() == 0 {
            return Err(IssuanceError::InvalidLifetime(lifetime));
        }
        claims.validate()?;

        let now = self.clock.now();
        let expiry = now
            .checked_add(lifetime)
            .ok_or(IssuanceError::InvalidLifetime(lifetime))?;
        let envelope = self
            .signer
            .make_claims_envelope(now, expiry, token_id, claims.to_custom_claims());
        Ok(self.signer.sign_token(&envelope)?)
    }
}
