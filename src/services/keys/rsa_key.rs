#[cfg(test)]
mod tests;

use crate::contracts::jwks::Jwk;
use crate::contracts::ssd_token::SIGNING_ALGORITHM_NAME;
use crate::services::keys::key_error::KeyError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

/// A trusted public key, ready for signature checks and for publication.
pub struct VerificationKey {
    decoding_key: DecodingKey,
    jwk: Jwk,
}

impl VerificationKey {
    /// Accepts PKCS#1 (`RSA PUBLIC KEY`) and SPKI (`PUBLIC KEY`) PEM documents.
    pub fn from_pem(key_id: &str, pem: &[u8]) -> Result<Self, KeyError> {
        let pem = pem_text(key_id, pem)?;
        let public_key = RsaPublicKey::from_pkcs1_pem(pem)
            .or_else(|_| RsaPublicKey::from_public_key_pem(pem))
            .map_err(|e| KeyError::parse(key_id, e))?;

        let jwk = to_jwk(key_id, &public_key);
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).map_err(|e| KeyError::parse(key_id, e))?;
        Ok(VerificationKey { decoding_key, jwk })
    }

    pub fn key_id(&self) -> &str {
        &self.jwk.kid
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn jwk(&self) -> &Jwk {
        &self.jwk
    }
}

/// The private half of a signing key together with its exported public half.
pub struct PrivateKeyMaterial {
    pub encoding_key: EncodingKey,
    pub public_jwk: Jwk,
}

/// Accepts PKCS#1 (`RSA PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`) PEM documents.
pub fn parse_private_key(key_id: &str, pem: &[u8]) -> Result<PrivateKeyMaterial, KeyError> {
    let pem = pem_text(key_id, pem)?;
    let private_key = RsaPrivateKey::from_pkcs1_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs8_pem(pem))
        .map_err(|e| KeyError::parse(key_id, e))?;

    let der = private_key.to_pkcs1_der().map_err(|e| KeyError::parse(key_id, e))?;
    Ok(PrivateKeyMaterial {
        encoding_key: EncodingKey::from_rsa_der(der.as_bytes()),
        public_jwk: to_jwk(key_id, &private_key.to_public_key()),
    })
}

pub fn to_jwk(key_id: &str, key: &RsaPublicKey) -> Jwk {
    Jwk {
        kty: "RSA".to_string(),
        alg: SIGNING_ALGORITHM_NAME.to_string(),
        key_use: "sig".to_string(),
        kid: key_id.to_string(),
        e: URL_SAFE_NO_PAD.encode(key.e().to_bytes_be()),
        n: URL_SAFE_NO_PAD.encode(key.n().to_bytes_be()),
    }
}

fn pem_text<'a>(key_id: &str, pem: &'a [u8]) -> Result<&'a str, KeyError> {
    std::str::from_utf8(pem)
        .map(str::trim)
        .map_err(|e| KeyError::parse(key_id, e))
}
