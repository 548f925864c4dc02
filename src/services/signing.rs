
use crate::contracts::jwks::Jwk;
use crate::contracts::ssd_token::v1::claims_envelope::ClaimsEnvelope;
use crate::contracts::ssd_token::v1::custom_claims::CustomClaims;
use crate::contracts::ssd_token::{SIGNING_ALGORITHM, SSD_TOKEN_AUDIENCE, SSD_TOKEN_ISSUER};
use crate::services::clock::unix_seconds;
use crate::services::keys::key_error::KeyError;
use crate::services::keys::rsa_key::{PrivateKeyMaterial, parse_private_key};
use jsonwebtoken::{EncodingKey, Header};
use log::info;
use parking_lot::Mutex;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("failed to sign token with key {key_id}: {source}")]
    Signature {
        key_id: String,
        source: jsonwebtoken::errors::Error,
    },
}

struct ActiveKey {
    key_id: String,
    encoding_key: EncodingKey,
    public_jwk: Jwk,
}

impl ActiveKey {
    fn parse(key_id: &str, private_key_pem: &[u8]) -> Result<Self, KeyError> {
        let PrivateKeyMaterial {
            encoding_key,
            public_jwk,
        } = parse_private_key(key_id, private_key_pem)?;
        Ok(ActiveKey {
            key_id: key_id.to_owned(),
            encoding_key,
            public_jwk,
        })
    }
}

/// Mints tokens with a single active private key.
///
/// Signing and key replacement take the same lock, so a signature is always produced with a
/// consistent key id / key pair.
pub struct TokenSigner {
    active: Mutex<ActiveKey>,
}

impl TokenSigner {
    pub fn new(key_id: &str, private_key_pem: &[u8]) -> Result<Self, KeyError> {
        Ok(TokenSigner {
            active: Mutex::new(ActiveKey::parse(key_id, private_key_pem)?),
        })
    }

    /// Replaces the active key. The previous key is dropped; on a parse error it stays active.
    pub fn set_signing_key(&self, key_id: &str, private_key_pem: &[u8]) -> Result<(), KeyError> {
        let replacement = ActiveKey::parse(key_id, private_key_pem)?;
        let previous = std::mem::replace(&mut *self.active.lock(), replacement);
        info!(previous_key_id = previous.key_id.as_str(), key_id = key_id; "Signing key replaced");
        Ok(())
    }

    pub fn key_id(&self) -> String {
        self.active.lock().key_id.clone()
    }

    pub fn public_jwk(&self) -> Jwk {
        self.active.lock().public_jwk.clone()
    }

    /// Builds the envelope for a token valid from `now` until `expiry`. No clock is read here.
    pub fn make_claims_envelope(
        &self,
        now: SystemTime,
        expiry: SystemTime,
        token_id: &str,
        custom: CustomClaims,
    ) -> ClaimsEnvelope {
        ClaimsEnvelope {
            issuer: SSD_TOKEN_ISSUER.to_string(),
            audience: vec![SSD_TOKEN_AUDIENCE.to_string()],
            issued_at: unix_seconds(now),
            not_before: Some(unix_seconds(now)),
            expires_at: unix_seconds(expiry),
            id: token_id.to_owned(),
            custom,
        }
    }

    pub fn sign_token(&self, envelope: &ClaimsEnvelope) -> Result<String, SigningError> {
        let mut header = Header::new(SIGNING_ALGORITHM);

        let active = self.active.lock();
        header.kid = Some(active.key_id.clone());
        jsonwebtoken::encode(&header, envelope, &active.encoding_key).map_err(|source| SigningError::Signature {
            key_id: active.key_id.clone(),
            source,
        })
    }
}
