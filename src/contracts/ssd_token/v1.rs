pub mod claims_envelope;
pub mod custom_claims;
pub mod token_type;
pub mod typed_claims;
