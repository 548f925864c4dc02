pub mod key_error;
pub mod key_rotation;
pub mod key_store;
pub mod rsa_key;
