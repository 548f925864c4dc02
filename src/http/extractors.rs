pub mod ssd_claims;
