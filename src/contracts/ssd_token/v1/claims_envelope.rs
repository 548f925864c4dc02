
use crate::contracts::ssd_token::v1::custom_claims::CustomClaims;
use crate::contracts::ssd_token::v1::typed_claims::{ClaimsShapeError, ClaimsVariant, TypedClaims};
use serde::{Deserialize, Serialize};

/// The signed claims exchanged over the wire: registered claims plus the namespaced payload.
/// Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsEnvelope {
    #[serde(rename = "iss")]
    pub issuer: String,

    #[serde(rename = "aud", with = "audience")]
    pub audience: Vec<String>,

    #[serde(rename = "iat")]
    pub issued_at: u64,

    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<u64>,

    #[serde(rename = "exp")]
    pub expires_at: u64,

    #[serde(rename = "jti", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    // Must stay in sync with CUSTOM_CLAIMS_KEY
    #[serde(rename = "ssd.opsmx.io")]
    pub custom: CustomClaims,
}

impl ClaimsEnvelope {
    pub fn typed_claims(&self) -> Result<TypedClaims, ClaimsShapeError> {
        TypedClaims::try_from(&self.custom)
    }

    pub fn to_variant<T: ClaimsVariant>(&self) -> Result<T, ClaimsShapeError> {
        T::from_custom_claims(&self.custom)
    }
}

/// `aud` may be a single string or an array; it is always written as an array.
pub(crate) mod audience {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    impl From<OneOrMany> for Vec<String> {
        fn from(value: OneOrMany) -> Self {
            match value {
                OneOrMany::One(audience) => vec![audience],
                OneOrMany::Many(audiences) => audiences,
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        OneOrMany::deserialize(deserializer).map(Into::into)
    }

    pub fn deserialize_optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
        Option::<OneOrMany>::deserialize(deserializer).map(|value| value.map(Into::into))
    }
}
