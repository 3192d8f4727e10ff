//! Core business logic: records, the metrics engine and storage abstractions

pub mod amortization;
pub mod billing;
pub mod config;
pub mod error;
pub mod goal;
pub mod ledger;
pub mod log;
pub mod model;
pub mod overview;
pub mod store;

// Re-export main types for cleaner imports
pub use error::EngineError;
pub use model::{
    CashFlow, CreditCard, CreditCardInput, Loan, LoanInput, Transaction, TransactionInput,
    TransactionKind,
};
pub use store::{GoalStore, RecordStore, Store};
