//! Flat loan amortization: every payment takes one quota off the balance.
//! There is no interest component.

use crate::core::model::Loan;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Applied { loan: Loan, amount_paid: f64 },
    /// The loan was already at zero; nothing changed.
    AlreadySettled(Loan),
}

impl PaymentOutcome {
    pub fn loan(&self) -> &Loan {
        match self {
            PaymentOutcome::Applied { loan, .. } => loan,
            PaymentOutcome::AlreadySettled(loan) => loan,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, PaymentOutcome::AlreadySettled(_))
    }
}

/// Applies one monthly quota. The balance never drops below zero, so the
/// last payment may be smaller than the quota.
pub fn apply_payment(loan: &Loan) -> PaymentOutcome {
    if loan.is_settled() {
        debug!(loan = %loan.name, "Loan already settled, ignoring payment");
        return PaymentOutcome::AlreadySettled(loan.clone());
    }

    let new_balance = (loan.current_balance - loan.monthly_quota).max(0.0);
    let amount_paid = loan.current_balance - new_balance;
    debug!(
        loan = %loan.name,
        old_balance = loan.current_balance,
        new_balance,
        "Applied loan payment"
    );

    PaymentOutcome::Applied {
        loan: Loan {
            current_balance: new_balance,
            ..loan.clone()
        },
        amount_paid,
    }
}

impl Loan {
    pub fn is_settled(&self) -> bool {
        self.current_balance <= 0.0
    }

    /// Share of the principal already paid back, between 0 and 100.
    pub fn percent_paid(&self) -> f64 {
        let paid = (self.principal_amount - self.current_balance) / self.principal_amount * 100.0;
        paid.clamp(0.0, 100.0)
    }

    /// Quotas still needed to reach a zero balance.
    pub fn remaining_payments(&self) -> u32 {
        if self.is_settled() {
            return 0;
        }
        (self.current_balance / self.monthly_quota).ceil() as u32
    }
}
