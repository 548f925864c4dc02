use crate::contracts::ssd_token::v1::claims_envelope::ClaimsEnvelope;
use crate::services::verification::VerificationError;
use serde::Serialize;

pub struct TokenValidationEvent {
    pub token_id: String,
    pub result: TokenValidationResult,
    pub reason: Option<String>,
    pub token_type: String,
}

impl TokenValidationEvent {
    pub fn accepted(envelope: &ClaimsEnvelope) -> Self {
        Self {
            token_id: envelope.id.clone(),
            result: TokenValidationResult::Allow,
            reason: None,
            token_type: envelope.custom.token_type.to_string(),
        }
    }

    /// Rejected tokens carry no trusted claims, so only the rejection reason is kept.
    pub fn rejected(error: &VerificationError) -> Self {
        Self {
            token_id: String::new(),
            result: TokenValidationResult::Deny,
            reason: Some(error.reason().to_string()),
            token_type: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenValidationResult {
    Allow,
    Deny,
}
