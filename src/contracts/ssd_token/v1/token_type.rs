
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The discriminator carried in the `type` field of the custom payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    #[serde(rename = "user/v1")]
    User,
    #[serde(rename = "service-account/v1")]
    ServiceAccount,
    #[serde(rename = "internal-account/v1")]
    InternalAccount,
    #[serde(rename = "integration/v1")]
    Integration,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::User => "user/v1",
            TokenType::ServiceAccount => "service-account/v1",
            TokenType::InternalAccount => "internal-account/v1",
            TokenType::Integration => "integration/v1",
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
