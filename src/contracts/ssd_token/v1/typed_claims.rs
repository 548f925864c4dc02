
use crate::contracts::ssd_token::v1::custom_claims::CustomClaims;
use crate::contracts::ssd_token::v1::token_type::TokenType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsShapeError {
    #[error("cannot parse {expected} claims from type {actual}")]
    TypeMismatch { expected: TokenType, actual: TokenType },

    #[error("required field {0} is not set in claims")]
    MissingRequiredField(&'static str),
}

/// A concrete claim shape that can be read from, and written to, the generic payload.
pub trait ClaimsVariant: Sized {
    const TOKEN_TYPE: TokenType;

    fn from_custom_claims(claims: &CustomClaims) -> Result<Self, ClaimsShapeError>;

    fn to_custom_claims(&self) -> CustomClaims;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserClaims {
    pub user_id: String,
    pub org_id: String,
    pub groups: Vec<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceClaims {
    pub service: String,
    pub instance: String,
    pub org_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalClaims {
    pub service: String,
    pub authorizations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationClaims {
    pub team_id: String,
    pub org_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedClaims {
    User(UserClaims),
    Service(ServiceClaims),
    Internal(InternalClaims),
    Integration(IntegrationClaims),
}

fn check_type(claims: &CustomClaims, expected: TokenType) -> Result<(), ClaimsShapeError> {
    if claims.token_type != expected {
        return Err(ClaimsShapeError::TypeMismatch {
            expected,
            actual: claims.token_type,
        });
    }
    Ok(())
}

fn required(value: &str, name: &'static str) -> Result<String, ClaimsShapeError> {
    if value.is_empty() {
        return Err(ClaimsShapeError::MissingRequiredField(name));
    }
    Ok(value.to_owned())
}

impl ClaimsVariant for UserClaims {
    const TOKEN_TYPE: TokenType = TokenType::User;

    fn from_custom_claims(claims: &CustomClaims) -> Result<Self, ClaimsShapeError> {
        check_type(claims, Self::TOKEN_TYPE)?;
        Ok(UserClaims {
            user_id: required(&claims.user_id, "userID")?,
            org_id: required(&claims.org_id, "orgID")?,
            groups: claims.groups.clone(),
            is_admin: claims.is_admin,
        })
    }

    fn to_custom_claims(&self) -> CustomClaims {
        CustomClaims {
            user_id: self.user_id.clone(),
            org_id: self.org_id.clone(),
            groups: self.groups.clone(),
            is_admin: self.is_admin,
            ..CustomClaims::new(Self::TOKEN_TYPE)
        }
    }
}

impl ClaimsVariant for ServiceClaims {
    const TOKEN_TYPE: TokenType = TokenType::ServiceAccount;

    fn from_custom_claims(claims: &CustomClaims) -> Result<Self, ClaimsShapeError> {
        check_type(claims, Self::TOKEN_TYPE)?;
        Ok(ServiceClaims {
            service: required(&claims.service, "service")?,
            instance: required(&claims.instance, "instance")?,
            org_id: required(&claims.org_id, "orgID")?,
        })
    }

    fn to_custom_claims(&self) -> CustomClaims {
        CustomClaims {
            service: self.service.clone(),
            instance: self.instance.clone(),
            org_id: self.org_id.clone(),
            ..CustomClaims::new(Self::TOKEN_TYPE)
        }
    }
}

impl ClaimsVariant for InternalClaims {
    const TOKEN_TYPE: TokenType = TokenType::InternalAccount;

    fn from_custom_claims(claims: &CustomClaims) -> Result<Self, ClaimsShapeError> {
        check_type(claims, Self::TOKEN_TYPE)?;
        Ok(InternalClaims {
            service: required(&claims.service, "service")?,
            authorizations: claims.authorizations.clone(),
        })
    }

    fn to_custom_claims(&self) -> CustomClaims {
        CustomClaims {
            service: self.service.clone(),
            authorizations: self.authorizations.clone(),
            ..CustomClaims::new(Self::TOKEN_TYPE)
        }
    }
}

impl ClaimsVariant for IntegrationClaims {
    const TOKEN_TYPE: TokenType = TokenType::Integration;

    fn from_custom_claims(claims: &CustomClaims) -> Result<Self, ClaimsShapeError> {
        check_type(claims, Self::TOKEN_TYPE)?;
        Ok(IntegrationClaims {
            team_id: required(&claims.team_id, "teamID")?,
            org_id: required(&claims.org_id, "orgID")?,
        })
    }

    fn to_custom_claims(&self) -> CustomClaims {
        CustomClaims {
            team_id: self.team_id.clone(),
            org_id: self.org_id.clone(),
            ..CustomClaims::new(Self::TOKEN_TYPE)
        }
    }
}

impl TypedClaims {
    pub fn token_type(&self) -> TokenType {
        match self {
            TypedClaims::User(_) => UserClaims::TOKEN_TYPE,
            TypedClaims::Service(_) => ServiceClaims::TOKEN_TYPE,
            TypedClaims::Internal(_) => InternalClaims::TOKEN_TYPE,
            TypedClaims::Integration(_) => IntegrationClaims::TOKEN_TYPE,
        }
    }

    pub fn to_custom_claims(&self) -> CustomClaims {
        match self {
            TypedClaims::User(c) => c.to_custom_claims(),
            TypedClaims::Service(c) => c.to_custom_claims(),
            TypedClaims::Internal(c) => c.to_custom_claims(),
            TypedClaims::Integration(c) => c.to_custom_claims(),
        }
    }

    /// Checks that the claims would survive the trip through the generic payload.
    pub fn validate(&self) -> Result<(), ClaimsShapeError> {
        TypedClaims::try_from(&self.to_custom_claims()).map(|_| ())
    }
}

impl TryFrom<&CustomClaims> for TypedClaims {
    type Error = ClaimsShapeError;

    fn try_from(claims: &CustomClaims) -> Result<Self, Self::Error> {
        match claims.token_type {
            TokenType::User => UserClaims::from_custom_claims(claims).map(TypedClaims::User),
            TokenType::ServiceAccount => ServiceClaims::from_custom_claims(claims).map(TypedClaims::Service),
            TokenType::InternalAccount => InternalClaims::from_custom_claims(claims).map(TypedClaims::Internal),
            TokenType::Integration => IntegrationClaims::from_custom_claims(claims).map(TypedClaims::Integration),
        }
    }
}

impl From<&TypedClaims> for CustomClaims {
    fn from(claims: &TypedClaims) -> Self {
        claims.to_custom_claims()
    }
}
