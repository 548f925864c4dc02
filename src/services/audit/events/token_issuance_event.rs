use crate::contracts::ssd_token::v1::token_type::TokenType;
use serde::Serialize;
use std::time::Duration;

pub struct TokenIssuanceEvent {
    pub token_id: String,
    pub token_type: TokenType,
    pub key_id: String,
    pub lifetime: Duration,
    pub result: IssuanceResult,
}

impl TokenIssuanceEvent {
    pub fn issued(token_id: &str, token_type: TokenType, key_id: &str, lifetime: Duration) -> Self {
        Self {
            token_id: token_id.to_owned(),
            token_type,
            key_id: key_id.to_owned(),
            lifetime,
            result: IssuanceResult::Success,
        }
    }

    pub fn failed(token_type: TokenType, key_id: &str, lifetime: Duration, reason: String) -> Self {
        Self {
            token_id: String::new(),
            token_type,
            key_id: key_id.to_owned(),
            lifetime,
            result: IssuanceResult::Failure(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssuanceResult {
    Success,
    Failure(String),
}
