
use crate::contracts::jwks::JwkSet;
use crate::contracts::ssd_token::v1::claims_envelope::{ClaimsEnvelope, audience};
use crate::contracts::ssd_token::v1::custom_claims::CustomClaims;
use crate::contracts::ssd_token::{SIGNING_ALGORITHM, SIGNING_ALGORITHM_NAME, SSD_TOKEN_AUDIENCE, SSD_TOKEN_ISSUER};
use crate::services::audit::AuditService;
use crate::services::audit::events::token_validation_event::TokenValidationEvent;
use crate::services::clock::{Clock, SystemClock, unix_seconds};
use crate::services::keys::key_error::KeyError;
use crate::services::keys::key_store::KeyStore;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::Validation;
use jsonwebtoken::errors::ErrorKind;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Tolerated clock skew for every time based claim.
pub const LEEWAY: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsValidationKind {
    #[error("unexpected issuer")]
    InvalidIssuer,
    #[error("audience does not include this service")]
    InvalidAudience,
    #[error("required claim {0} is missing")]
    MissingClaim(String),
    #[error("token has expired")]
    Expired,
    #[error("token is issued in the future")]
    IssuedInFuture,
    #[error("token is not valid yet")]
    NotYetValid,
}

/// Every variant is a terminal rejection; none of them is retried within the same call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
    #[error("no `kid` in header")]
    MissingKeyId,
    #[error("cannot convert `kid` to string")]
    InvalidKeyIdType,
    #[error("no such key {0}")]
    UnknownKeyId(String),
    #[error("bad signature: {0}")]
    BadSignature(String),
    #[error("invalid claims: {0}")]
    ClaimsValidation(ClaimsValidationKind),
    #[error("token is missing SSD claims")]
    MissingCustomClaims,
    #[error("invalid SSD claims: {0}")]
    InvalidCustomClaims(String),
}

impl VerificationError {
    /// A stable, detail free label suitable for logs and audit records.
    pub fn reason(&self) -> &'static str {
        match self {
            VerificationError::MalformedToken(_) => "malformed_token",
            VerificationError::MissingKeyId => "missing_key_id",
            VerificationError::InvalidKeyIdType => "invalid_key_id_type",
            VerificationError::UnknownKeyId(_) => "unknown_key_id",
            VerificationError::BadSignature(_) => "bad_signature",
            VerificationError::ClaimsValidation(_) => "claims_validation",
            VerificationError::MissingCustomClaims => "missing_custom_claims",
            VerificationError::InvalidCustomClaims(_) => "invalid_custom_claims",
        }
    }
}

impl From<ClaimsValidationKind> for VerificationError {
    fn from(kind: ClaimsValidationKind) -> Self {
        VerificationError::ClaimsValidation(kind)
    }
}

/// The payload as it arrives, before any of it is trusted.
#[derive(Clone, Deserialize)]
struct UnverifiedClaims {
    iss: Option<String>,
    #[serde(default, deserialize_with = "audience::deserialize_optional")]
    aud: Option<Vec<String>>,
    #[serde(default, deserialize_with = "numeric_date::deserialize")]
    iat: Option<u64>,
    #[serde(default, deserialize_with = "numeric_date::deserialize")]
    nbf: Option<u64>,
    #[serde(default, deserialize_with = "numeric_date::deserialize")]
    exp: Option<u64>,
    jti: Option<String>,
    // Must stay in sync with CUSTOM_CLAIMS_KEY
    #[serde(rename = "ssd.opsmx.io")]
    custom: Option<Value>,
}

/// NumericDate values may carry a fractional part; it is truncated to whole seconds.
mod numeric_date {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        match Option::<f64>::deserialize(deserializer)? {
            None => Ok(None),
            Some(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(Some(seconds.trunc() as u64)),
            Some(seconds) => Err(D::Error::custom(format!("{} is not a valid NumericDate", seconds))),
        }
    }
}

/// Turns bearer token strings into verified claims envelopes.
///
/// Safe to share between request handlers: the only shared state is the key store, which is
/// consulted for a single lookup per call while signature checks run without any lock held.
pub struct TokenVerifier {
    key_store: Arc<KeyStore>,
    clock: Arc<dyn Clock>,
    audit: Option<Arc<dyn AuditService>>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(pem_keys: &HashMap<String, Vec<u8>>) -> Result<Self, KeyError> {
        Ok(Self::with_key_store(Arc::new(KeyStore::new(pem_keys)?)))
    }

    pub fn with_key_store(key_store: Arc<KeyStore>) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_issuer(&[SSD_TOKEN_ISSUER]);
        validation.set_audience(&[SSD_TOKEN_AUDIENCE]);
        // Time based claims are checked against the injected clock instead.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["iss", "aud"]);

        TokenVerifier {
            key_store,
            clock: Arc::new(SystemClock),
            audit: None,
            validation,
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

    pub fn key_store(&self) -> &Arc<KeyStore> {
        &self.key_store
    }

    pub fn set_keys(&self, pem_keys: &HashMap<String, Vec<u8>>) -> Result<(), KeyError> {
        self.key_store.set_keys(pem_keys)
    }

    pub fn jwks(&self) -> JwkSet {
        self.key_store.jwks()
    }

    pub fn verify_token(&self, token: &str) -> Result<ClaimsEnvelope, VerificationError> {
        let result = self.verify(token);

        let event = match &result {
            Ok(envelope) => {
                debug!(token_id = envelope.id.as_str(), token_type = envelope.custom.token_type.as_str(); "Token accepted");
                TokenValidationEvent::accepted(envelope)
            }
            Err(e) => {
                warn!(reason = e.reason(); "Token rejected: {}", e);
                TokenValidationEvent::rejected(e)
            }
        };
        if let Some(audit) = &self.audit {
            if let Err(e) = audit.record_token_validation(event) {
                warn!("Failed to record token validation: {}", e);
            }
        }
        result
    }

    fn verify(&self, token: &str) -> Result<ClaimsEnvelope, VerificationError> {
        let header = parse_header(token)?;
        let key_id = match header.get("kid") {
            None => return Err(VerificationError::MissingKeyId),
            Some(Value::String(key_id)) => key_id,
            Some(_) => return Err(VerificationError::InvalidKeyIdType),
        };

        let key = self
            .key_store
            .get(key_id)
            .ok_or_else(|| VerificationError::UnknownKeyId(key_id.clone()))?;

        match header.get("alg").and_then(Value::as_str) {
            Some(SIGNING_ALGORITHM_NAME) => {}
            other => {
                return Err(VerificationError::BadSignature(format!(
                    "algorithm {:?} is not accepted",
                    other
                )));
            }
        }

        let claims = jsonwebtoken::decode::<UnverifiedClaims>(token, key.decoding_key(), &self.validation)
            .map_err(from_jwt_error)?
            .claims;

        self.check_validity_window(&claims)?;
        into_envelope(claims)
    }

    fn check_validity_window(&self, claims: &UnverifiedClaims) -> Result<(), ClaimsValidationKind> {
        let now = unix_seconds(self.clock.now());
        let leeway = LEEWAY.as_secs();

        let expires_at = claims
            .exp
            .ok_or_else(|| ClaimsValidationKind::MissingClaim("exp".to_string()))?;
        if now > expires_at.saturating_add(leeway) {
            return Err(ClaimsValidationKind::Expired);
        }

        let issued_at = claims
            .iat
            .ok_or_else(|| ClaimsValidationKind::MissingClaim("iat".to_string()))?;
        if issued_at > now.saturating_add(leeway) {
            return Err(ClaimsValidationKind::IssuedInFuture);
        }

        if claims.nbf.is_some_and(|not_before| not_before > now.saturating_add(leeway)) {
            return Err(ClaimsValidationKind::NotYetValid);
        }
        Ok(())
    }
}

/// Checks the compact serialization structure and returns the decoded header.
fn parse_header(token: &str) -> Result<Map<String, Value>, VerificationError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(VerificationError::MalformedToken(
            "expected three dot separated segments".to_string(),
        ));
    };

    let header = decode_segment(header, "header")?;
    decode_segment(payload, "payload")?;
    Ok(header)
}

fn decode_segment(segment: &str, name: &str) -> Result<Map<String, Value>, VerificationError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| VerificationError::MalformedToken(format!("{} is not base64url: {}", name, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| VerificationError::MalformedToken(format!("{} is not a JSON object: {}", name, e)))
}

fn from_jwt_error(error: jsonwebtoken::errors::Error) -> VerificationError {
    match error.kind() {
        ErrorKind::InvalidIssuer => ClaimsValidationKind::InvalidIssuer.into(),
        ErrorKind::InvalidAudience => ClaimsValidationKind::InvalidAudience.into(),
        ErrorKind::MissingRequiredClaim(claim) => ClaimsValidationKind::MissingClaim(claim.clone()).into(),
        ErrorKind::ExpiredSignature => ClaimsValidationKind::Expired.into(),
        ErrorKind::ImmatureSignature => ClaimsValidationKind::NotYetValid.into(),
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
            VerificationError::MalformedToken(error.to_string())
        }
        _ => VerificationError::BadSignature(error.to_string()),
    }
}

fn into_envelope(claims: UnverifiedClaims) -> Result<ClaimsEnvelope, VerificationError> {
    let custom = claims.custom.ok_or(VerificationError::MissingCustomClaims)?;
    let custom: CustomClaims =
        serde_json::from_value(custom).map_err(|e| VerificationError::InvalidCustomClaims(e.to_string()))?;

    Ok(ClaimsEnvelope {
        issuer: claims.iss.unwrap_or_default(),
        audience: claims.aud.unwrap_or_default(),
        issued_at: claims.iat.unwrap_or_default(),
        not_before: claims.nbf,
        expires_at: claims.exp.unwrap_or_default(),
        id: claims.jti.unwrap_or_default(),
        custom,
    })
}
