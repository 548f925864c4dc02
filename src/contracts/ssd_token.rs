use jsonwebtoken::Algorithm;

pub mod v1;

/// The claim under which the SSD payload travels inside the token body.
pub const CUSTOM_CLAIMS_KEY: &str = "ssd.opsmx.io";

pub const SSD_TOKEN_ISSUER: &str = "OpsMx";
pub const SSD_TOKEN_AUDIENCE: &str = "ssd.opsmx.io";

/// Every token is signed and verified with this algorithm only. Changing it invalidates
/// all tokens minted with the previous one.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// The `alg` name published alongside exported public keys.
pub const SIGNING_ALGORITHM_NAME: &str = "RS256";
