pub mod ssd_authentication;
