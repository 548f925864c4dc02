pub mod token_issuance_event;
pub mod token_validation_event;
