pub mod audit;
pub mod auth_services;
pub mod clock;
pub mod issuance;
pub mod keys;
pub mod signing;
pub mod verification;
