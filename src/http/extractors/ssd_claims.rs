
use crate::contracts::ssd_token::v1::claims_envelope::ClaimsEnvelope;
use crate::contracts::ssd_token::v1::typed_claims::{
    IntegrationClaims, InternalClaims, ServiceClaims, TypedClaims, UserClaims,
};
use crate::http::bearer_token::BearerToken;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{Ready, ready};

const MISSING_CLAIMS: &str = "Missing claims, probably the authentication middleware is not in place";

fn from_extensions<T: Clone + 'static>(req: &HttpRequest) -> Result<T, actix_web::Error> {
    req.extensions()
        .get::<T>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorUnauthorized(MISSING_CLAIMS))
}

impl FromRequest for ClaimsEnvelope {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(from_extensions(req))
    }
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(from_extensions(req))
    }
}

impl FromRequest for TypedClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = from_extensions::<ClaimsEnvelope>(req)
            .and_then(|envelope| envelope.typed_claims().map_err(Into::into));
        ready(claims)
    }
}

/// A handler taking one of these only runs for tokens of the matching type; other tokens are
/// answered with 403.
macro_rules! typed_claims_extractor {
    ($($variant:ty),+ $(,)?) => {
        $(
            impl FromRequest for $variant {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;
                fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
                    let claims = from_extensions::<ClaimsEnvelope>(req)
                        .and_then(|envelope| envelope.to_variant::<$variant>().map_err(Into::into));
                    ready(claims)
                }
            }
        )+
    };
}

typed_claims_extractor!(UserClaims, ServiceClaims, InternalClaims, IntegrationClaims);
