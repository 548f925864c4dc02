use crate::services::audit::AuditService;
use crate::services::audit::events::token_issuance_event::{IssuanceResult, TokenIssuanceEvent};
use crate::services::audit::events::token_validation_event::{TokenValidationEvent, TokenValidationResult};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts audit records by outcome.
#[derive(Default)]
pub struct MockAuditService {
    accepted: AtomicUsize,
    rejected: AtomicUsize,
    issued: AtomicUsize,
    issuance_failed: AtomicUsize,
}

impl MockAuditService {
    pub fn count_accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn count_rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }

    pub fn count_issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn count_issuance_failed(&self) -> usize {
        self.issuance_failed.load(Ordering::SeqCst)
    }
}

impl AuditService for MockAuditService {
    fn record_token_validation(&self, event: TokenValidationEvent) -> Result<()> {
        match event.result {
            TokenValidationResult::Allow => self.accepted.fetch_add(1, Ordering::SeqCst),
            TokenValidationResult::Deny => self.rejected.fetch_add(1, Ordering::SeqCst),
        };
        Ok(())
    }

    fn record_token_issuance(&self, event: TokenIssuanceEvent) -> Result<()> {
        match event.result {
            IssuanceResult::Success => self.issued.fetch_add(1, Ordering::SeqCst),
            IssuanceResult::Failure(_) => self.issuance_failed.fetch_add(1, Ordering::SeqCst),
        };
        Ok(())
    }
}
