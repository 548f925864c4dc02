use crate::services::audit::AuditService;
use crate::services::audit::events::token_issuance_event::{IssuanceResult, TokenIssuanceEvent};
use crate::services::audit::events::token_validation_event::TokenValidationEvent;
use anyhow::Result;

/// Writes audit records to the application log.
#[derive(Default)]
pub struct LogAuditService;

impl LogAuditService {
    pub fn new() -> Self {
        Self {}
    }
}

impl AuditService for LogAuditService {
    fn record_token_validation(&self, event: TokenValidationEvent) -> Result<()> {
        log::info!(
            // Indicates the audit events for easier filtering in log aggregation systems
            log_type = "audit",

            // The event decomposition for structured logging
            id = event.token_id.as_str(),
            result:serde = event.result,
            reason:? = event.reason,
            token_type = event.token_type.as_str();

            // The log message
            "SSD token validation: {:?}/{:?}", event.token_type, event.token_id);

        Ok(())
    }

    fn record_token_issuance(&self, event: TokenIssuanceEvent) -> Result<()> {
        if let IssuanceResult::Failure(reason) = &event.result {
            log::info!(
            log_type = "audit",
            token_type = event.token_type.as_str(),
            key_id = event.key_id.as_str(),
            failure = reason.as_str();

            "SSD token issuance failed: {:?}", event.token_type);
        } else {
            log::info!(
            log_type = "audit",
            id = event.token_id.as_str(),
            token_type = event.token_type.as_str(),
            key_id = event.key_id.as_str(),
            lifetime_seconds = event.lifetime.as_secs();

            "SSD token issued: {:?}/{:?}", event.token_type, event.token_id);
        }

        Ok(())
    }
}
