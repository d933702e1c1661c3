//! Tenant identity verification, current-period fee status, and payment
//! history retrieval.

use std::path::PathBuf;

use shared::{HistoryRequest, IdentityRecord, MatchResult, MismatchField, PaymentRecord};
use tracing::info;

use crate::db::{Store, StoreError};
use crate::domain::{dates, text};

/// Service answering occupancy and fee-status queries. Holds only the
/// snapshot path; a fresh read-only store view is opened per call and
/// released before the result is returned.
#[derive(Clone)]
pub struct VerificationService {
    db_path: PathBuf,
}

impl VerificationService {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Verify a validated identity record and, on a full match, check the
    /// fee status for the injected current `(year, month)` pair.
    ///
    /// Exactly one [`MatchResult`] variant comes back per query; absence and
    /// field mismatches are data, not errors.
    pub async fn verify(
        &self,
        record: &IdentityRecord,
        current_period: (i32, u32),
    ) -> Result<MatchResult, StoreError> {
        info!(
            "verifying tenant for unit {} (period {}/{})",
            record.unit_number, current_period.1, current_period.0
        );
        let store = Store::open(&self.db_path).await?;
        let outcome = Self::verify_with_store(&store, record, current_period).await;
        store.close().await;
        outcome
    }

    /// Matching core, factored out so it runs against an already-open store.
    async fn verify_with_store(
        store: &Store,
        record: &IdentityRecord,
        (year, month): (i32, u32),
    ) -> Result<MatchResult, StoreError> {
        let tenant = match store
            .find_tenant(&record.national_id, &record.unit_number)
            .await?
        {
            Some(tenant) => tenant,
            None => return Ok(MatchResult::NotFound),
        };

        // Free-text fields compare diacritic- and case-insensitively; the
        // birth date compares as the exact canonical string. A blank stored
        // birth date therefore never matches (no null-as-wildcard).
        // Mismatches are reported in a fixed order.
        let mut fields = Vec::new();
        if !text::equivalent(&tenant.first_name, &record.first_name) {
            fields.push(MismatchField::FirstName);
        }
        if !text::equivalent(&tenant.last_name, &record.last_name) {
            fields.push(MismatchField::LastName);
        }
        if tenant.birth_date.trim() != record.birth_date.as_str() {
            fields.push(MismatchField::BirthDate);
        }
        if !fields.is_empty() {
            return Ok(MatchResult::Mismatch { fields });
        }

        let current_period_paid = store
            .payment_exists(&tenant.unit_number, year, month)
            .await?;
        Ok(MatchResult::Matched {
            tenant,
            current_period_paid,
        })
    }

    /// Whether the fee for the exact (unit, year, month) triple is paid.
    pub async fn is_period_paid(
        &self,
        unit_number: &str,
        year: i32,
        month: u32,
    ) -> Result<bool, StoreError> {
        let store = Store::open(&self.db_path).await?;
        let paid = store.payment_exists(unit_number, year, month).await;
        store.close().await;
        paid
    }

    /// Payment history for a unit, newest first, capped at the store's row
    /// limit. Window bounds are normalized before filtering; a bound that
    /// fails to normalize is treated as absent, mirroring an empty field.
    pub async fn history(&self, request: &HistoryRequest) -> Result<Vec<PaymentRecord>, StoreError> {
        info!("loading payment history for unit {}", request.unit_number);
        let from = request.from.as_deref().and_then(dates::to_canonical);
        let to = request.to.as_deref().and_then(dates::to_canonical);

        let store = Store::open(&self.db_path).await?;
        let payments = store
            .payment_history(&request.unit_number, from.as_ref(), to.as_ref())
            .await;
        store.close().await;
        payments
    }
}
