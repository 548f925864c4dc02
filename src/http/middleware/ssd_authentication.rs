
use crate::http::bearer_token::token_from_headers;
use crate::services::verification::TokenVerifier;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::web::Data;
use actix_web::{Error, HttpMessage, HttpResponse};
use log::{debug, error};

pub const UNAUTHORIZED_BODY: &str = "Unauthorized";

/// Authenticates every request with the [`TokenVerifier`] registered as application data.
///
/// Verified claims and the raw token are stored in the request extensions for the
/// extractors in [`crate::http::extractors`]. Rejected requests get a plain 401 and never reach
/// the wrapped service; the rejection reason is only logged.
pub async fn ssd_authentication(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
    let Some(verifier) = req.app_data::<Data<TokenVerifier>>().cloned() else {
        error!("Token verifier is not registered as application data");
        return Ok(req
            .into_response(HttpResponse::InternalServerError().finish())
            .map_into_right_body());
    };

    let Some(token) = token_from_headers(req.headers()) else {
        debug!(path = req.path(); "Request without bearer token");
        return Ok(unauthorized(req));
    };

    match verifier.verify_token(token.as_str()) {
        Ok(envelope) => {
            req.extensions_mut().insert(envelope);
            req.extensions_mut().insert(token);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(_) => Ok(unauthorized(req)),
    }
}

fn unauthorized<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    req.into_response(HttpResponse::Unauthorized().body(UNAUTHORIZED_BODY))
        .map_into_right_body()
}
