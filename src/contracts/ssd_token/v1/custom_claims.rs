use crate::contracts::ssd_token::v1::token_type::TokenType;
use crate::contracts::ssd_token::v1::typed_claims::{ClaimsShapeError, TypedClaims};
use serde::{Deserialize, Serialize};

/// The generic namespaced payload. Every typed variant uses a subset of these fields and
/// leaves the rest empty; empty fields are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(rename = "type")]
    pub token_type: TokenType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    #[serde(rename = "isAdmin", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_admin: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorizations: Vec<String>,

    #[serde(rename = "orgID", default, skip_serializing_if = "String::is_empty")]
    pub org_id: String,

    #[serde(rename = "userID", default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,

    #[serde(rename = "teamID", default, skip_serializing_if = "String::is_empty")]
    pub team_id: String,
}

impl CustomClaims {
    pub fn new(token_type: TokenType) -> Self {
        CustomClaims {
            token_type,
            groups: Vec::new(),
            is_admin: false,
            authorizations: Vec::new(),
            org_id: String::new(),
            user_id: String::new(),
            service: String::new(),
            instance: String::new(),
            team_id: String::new(),
        }
    }

    /// Materializes the payload as the requested variant, failing when the discriminator
    /// differs or a field the variant requires is empty.
    pub fn to_typed(&self, want: TokenType) -> Result<TypedClaims, ClaimsShapeError> {
        if self.token_type != want {
            return Err(ClaimsShapeError::TypeMismatch {
                expected: want,
                actual: self.token_type,
            });
        }
        TypedClaims::try_from(self)
    }
}
