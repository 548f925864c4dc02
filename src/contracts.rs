pub mod jwks;
pub mod ssd_token;
