use crate::contracts::ssd_token::v1::typed_claims::ClaimsShapeError;

impl From<ClaimsShapeError> for actix_web::Error {
    // COVERAGE: Disable since the function is trivial
    #[cfg_attr(coverage, coverage(off))]
    fn from(err: ClaimsShapeError) -> Self {
        actix_web::error::ErrorForbidden(err.to_string())
    }
}
