//! Headline figures for the dashboard.

use crate::core::ledger::LedgerSummary;
use crate::core::model::{CreditCard, Loan};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overview {
    pub total_credit_limit: f64,
    pub outstanding_debt: f64,
    pub business_margin: f64,
    /// Margin minus the weighted outstanding debt. An estimate for display,
    /// not an accounting figure.
    pub net_position: f64,
}

pub fn overview(
    cards: &[CreditCard],
    loans: &[Loan],
    ledger: &LedgerSummary,
    debt_weight: f64,
) -> Overview {
    let total_credit_limit = cards.iter().map(|c| c.credit_limit).sum();
    let outstanding_debt: f64 = loans.iter().map(|l| l.current_balance).sum();

    Overview {
        total_credit_limit,
        outstanding_debt,
        business_margin: ledger.margin,
        net_position: ledger.margin - outstanding_debt * debt_weight,
    }
}
