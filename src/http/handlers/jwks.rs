#[cfg(test)]
mod tests;

use crate::services::verification::TokenVerifier;
use actix_web::web::Data;
use actix_web::{HttpResponse, Responder};

/// Serves the currently trusted public keys as a JWK set.
pub async fn jwks(verifier: Data<TokenVerifier>) -> impl Responder {
    HttpResponse::Ok().json(verifier.jwks())
}
