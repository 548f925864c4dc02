pub mod events;
pub mod log_audit_service;

use crate::services::audit::events::token_issuance_event::TokenIssuanceEvent;
use crate::services::audit::events::token_validation_event::TokenValidationEvent;
use anyhow::Result;

/// Receives a record of every token decision. Failing to record never changes the decision.
pub trait AuditService: Send + Sync {
    fn record_token_validation(&self, event: TokenValidationEvent) -> Result<()>;
    fn record_token_issuance(&self, event: TokenIssuanceEvent) -> Result<()>;
}
