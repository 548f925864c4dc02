use crate::services::issuance::TokenIssuer;
use crate::services::signing::TokenSigner;
use crate::services::verification::TokenVerifier;
use crate::testing::keys::{KEY_A_PRIVATE, KEY_A_PUBLIC, KEY_B_PUBLIC, pem_map};
use std::sync::Arc;

/// A verifier trusting key-a and key-b, on the system clock.
pub fn make_verifier() -> Arc<TokenVerifier> {
    let keys = pem_map(&[("key-a", KEY_A_PUBLIC), ("key-b", KEY_B_PUBLIC)]);
    Arc::new(TokenVerifier::new(&keys).expect("Failed to load test public keys"))
}

/// An issuer signing with key-a, treating the `admin` group as administrators.
pub fn make_issuer() -> TokenIssuer {
    let signer = TokenSigner::new("key-a", KEY_A_PRIVATE.as_bytes()).expect("Failed to load test signing key");
    TokenIssuer::new(Arc::new(signer), vec!["admin".to_string()])
}
