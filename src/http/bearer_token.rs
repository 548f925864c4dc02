
use actix_web::http::header::{AUTHORIZATION, HeaderMap};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Legacy header consulted only when `Authorization` is absent.
pub const FALLBACK_AUTH_HEADER: &str = "X-OpsMx-Auth";

/// The raw token a request was authenticated with, kept for forwarding to downstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        BearerToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value to put in an `Authorization` header of an outgoing request.
    pub fn to_header_value(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.0)
    }
}

/// Reads `Authorization: Bearer <token>`, or the fallback header when `Authorization` is absent.
/// A header without the bearer prefix yields no token.
pub fn token_from_headers(headers: &HeaderMap) -> Option<BearerToken> {
    let value = header_value(headers, AUTHORIZATION.as_str())
        .or_else(|| header_value(headers, FALLBACK_AUTH_HEADER))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
        .map(BearerToken::new)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
