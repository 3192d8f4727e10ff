//! Storage abstractions for records and the profit goal

use crate::core::error::{EngineError, non_negative};
use crate::core::model::{CreditCard, Loan, Transaction};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_cards(&self) -> Result<Vec<CreditCard>>;
    async fn fetch_loans(&self) -> Result<Vec<Loan>>;
    /// Newest first.
    async fn fetch_transactions(&self) -> Result<Vec<Transaction>>;

    async fn get_loan(&self, id: Uuid) -> Result<Option<Loan>>;
    async fn insert_loan(&self, loan: Loan) -> Result<Loan>;
    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction>;
    async fn insert_or_update_card(&self, card: CreditCard) -> Result<CreditCard>;

    /// Fails when no loan has this id, or when `new_balance` falls outside
    /// `0..=principal_amount`.
    async fn update_loan_balance(&self, id: Uuid, new_balance: f64) -> Result<Loan>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn get_goal(&self) -> Result<Option<f64>>;
    async fn set_goal(&self, amount: f64) -> Result<()>;
}

/// Both stores behind one handle.
pub trait Store: RecordStore + GoalStore {}

impl<T: RecordStore + GoalStore> Store for T {}

pub(crate) fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
}

/// Checks a new balance against the loan it is written to.
pub(crate) fn checked_balance(loan: &Loan, new_balance: f64) -> Result<f64> {
    let balance = non_negative("current_balance", new_balance)?;
    if balance > loan.principal_amount {
        return Err(EngineError::invalid(
            "current_balance",
            format!("{balance} exceeds the principal of {}", loan.principal_amount),
        )
        .into());
    }
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::LoanInput;

    #[test]
    fn test_checked_balance_bounds() {
        let loan = LoanInput {
            name: "Seeder".to_string(),
            principal_amount: 1000.0,
            monthly_quota: 200.0,
            current_balance: None,
        }
        .into_loan()
        .unwrap();

        assert_eq!(checked_balance(&loan, 0.0).unwrap(), 0.0);
        assert_eq!(checked_balance(&loan, 1000.0).unwrap(), 1000.0);
        assert!(checked_balance(&loan, -1.0).is_err());
        assert!(checked_balance(&loan, 1000.01).is_err());
        assert!(checked_balance(&loan, f64::NAN).is_err());
    }
}
