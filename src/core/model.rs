//! Records tracked by the application and the inputs they are built from.
//!
//! Inputs carry raw user values. They are validated exactly once, when they
//! are turned into records, so the metrics code can trust every record it
//! receives.

use crate::core::error::{EngineError, Result, non_empty, non_negative, positive};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: Uuid,
    pub bank: String,
    pub tier: String,
    pub credit_limit: f64,
    /// Day of month the statement closes.
    pub cutoff_day: u32,
    pub payment_day: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CreditCardInput {
    /// Set to update an existing card instead of creating a new one.
    pub id: Option<Uuid>,
    pub bank: String,
    pub tier: String,
    pub credit_limit: f64,
    pub cutoff_day: u32,
    pub payment_day: u32,
}

impl CreditCardInput {
    pub fn into_card(self) -> Result<CreditCard> {
        Ok(CreditCard {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            bank: non_empty("bank", &self.bank)?,
            tier: self.tier.trim().to_string(),
            credit_limit: non_negative("credit_limit", self.credit_limit)?,
            cutoff_day: day_of_month("cutoff_day", self.cutoff_day)?,
            payment_day: day_of_month("payment_day", self.payment_day)?,
        })
    }
}

fn day_of_month(field: &'static str, day: u32) -> Result<u32> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(EngineError::invalid(field, format!("{day} is not a day of the month (1-31)")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Uuid,
    pub name: String,
    pub principal_amount: f64,
    pub monthly_quota: f64,
    pub current_balance: f64,
}

#[derive(Debug, Clone, Default)]
pub struct LoanInput {
    pub name: String,
    pub principal_amount: f64,
    pub monthly_quota: f64,
    /// Opening balance for a loan that is already partially paid. Defaults
    /// to the principal.
    pub current_balance: Option<f64>,
}

impl LoanInput {
    pub fn into_loan(self) -> Result<Loan> {
        let name = non_empty("name", &self.name)?;
        let principal_amount = positive("principal_amount", self.principal_amount)?;
        let monthly_quota = positive("monthly_quota", self.monthly_quota)?;
        let current_balance = match self.current_balance {
            Some(balance) => non_negative("current_balance", balance)?,
            None => principal_amount,
        };
        if current_balance > principal_amount {
            return Err(EngineError::invalid(
                "current_balance",
                format!("{current_balance} exceeds the principal of {principal_amount}"),
            ));
        }

        Ok(Loan {
            id: Uuid::new_v4(),
            name,
            principal_amount,
            monthly_quota,
            current_balance,
        })
    }
}

/// Direction of money relative to the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CashFlow {
    Inflow,
    Outflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Sale,
    Expense,
}

impl TransactionKind {
    pub fn direction(&self) -> CashFlow {
        match self {
            TransactionKind::Sale => CashFlow::Inflow,
            TransactionKind::Purchase | TransactionKind::Expense => CashFlow::Outflow,
        }
    }

    /// Whether quantity and unit price apply to this kind of transaction.
    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionKind::Purchase | TransactionKind::Sale)
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionKind::Purchase => "purchase",
                TransactionKind::Sale => "sale",
                TransactionKind::Expense => "expense",
            }
        )
    }
}

impl FromStr for TransactionKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "purchase" | "compra" => Ok(TransactionKind::Purchase),
            "sale" | "venta" => Ok(TransactionKind::Sale),
            "expense" | "gasto" => Ok(TransactionKind::Expense),
            other => Err(EngineError::invalid(
                "type",
                format!("'{other}' is not one of purchase, sale, expense"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Quintals traded.
    pub quantity: Option<f64>,
    pub price_per_unit: Option<f64>,
    pub fuel_cost: f64,
    pub freight_cost: f64,
    pub total_amount: f64,
    pub location: String,
    pub transaction_date: DateTime<Utc>,
}

impl Transaction {
    pub fn direction(&self) -> CashFlow {
        self.kind.direction()
    }
}

#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub kind: TransactionKind,
    pub quantity: Option<f64>,
    pub price_per_unit: Option<f64>,
    pub total_amount: Option<f64>,
    pub fuel_cost: f64,
    pub freight_cost: f64,
    pub location: String,
    /// Defaults to the recording time.
    pub transaction_date: Option<DateTime<Utc>>,
}

impl TransactionInput {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            quantity: None,
            price_per_unit: None,
            total_amount: None,
            fuel_cost: 0.0,
            freight_cost: 0.0,
            location: String::new(),
            transaction_date: None,
        }
    }

    /// Validates the input and settles `total_amount`.
    ///
    /// Purchases and sales carrying both a quantity and a unit price get
    /// `quantity * price_per_unit`, overriding any literal total. Every other
    /// case takes the literal total, which is then required. Expenses never
    /// carry a quantity or unit price.
    pub fn into_transaction(self, now: DateTime<Utc>) -> Result<Transaction> {
        let optional_positive = |field, value: Option<f64>| value.map(|v| positive(field, v)).transpose();

        let (quantity, price_per_unit) = if self.kind.is_trade() {
            (
                optional_positive("quantity", self.quantity)?,
                optional_positive("price_per_unit", self.price_per_unit)?,
            )
        } else {
            if self.quantity.is_some() || self.price_per_unit.is_some() {
                debug!("Ignoring quantity and unit price on an expense");
            }
            (None, None)
        };

        let total_amount = match (quantity, price_per_unit) {
            (Some(qty), Some(price)) => {
                if let Some(literal) = self.total_amount {
                    debug!("Overriding literal total {literal} with {qty} x {price}");
                }
                non_negative("total_amount", qty * price)?
            }
            _ => {
                let literal = self.total_amount.ok_or_else(|| {
                    EngineError::invalid(
                        "total_amount",
                        format!("required for a {} without quantity and unit price", self.kind),
                    )
                })?;
                non_negative("total_amount", literal)?
            }
        };

        Ok(Transaction {
            id: Uuid::new_v4(),
            kind: self.kind,
            quantity,
            price_per_unit,
            fuel_cost: non_negative("fuel_cost", self.fuel_cost)?,
            freight_cost: non_negative("freight_cost", self.freight_cost)?,
            total_amount,
            location: self.location.trim().to_string(),
            transaction_date: self.transaction_date.unwrap_or(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_card_input_validation() {
        let input = CreditCardInput {
            bank: " Davivienda ".to_string(),
            tier: "Gold".to_string(),
            credit_limit: 5000.0,
            cutoff_day: 15,
            payment_day: 5,
            ..Default::default()
        };
        let card = input.clone().into_card().unwrap();
        assert_eq!(card.bank, "Davivienda");

        let empty_bank = CreditCardInput {
            bank: "".to_string(),
            ..input.clone()
        };
        assert!(matches!(
            empty_bank.into_card(),
            Err(EngineError::InvalidInput { field: "bank", .. })
        ));

        let bad_day = CreditCardInput {
            cutoff_day: 32,
            ..input.clone()
        };
        assert!(bad_day.into_card().is_err());

        let kept_id = Uuid::new_v4();
        let update = CreditCardInput {
            id: Some(kept_id),
            ..input
        };
        assert_eq!(update.into_card().unwrap().id, kept_id);
    }

    #[test]
    fn test_loan_input_defaults_balance_to_principal() {
        let loan = LoanInput {
            name: "Personal Loan 1".to_string(),
            principal_amount: 1000.0,
            monthly_quota: 200.0,
            current_balance: None,
        }
        .into_loan()
        .unwrap();
        assert_eq!(loan.current_balance, 1000.0);
    }

    #[test]
    fn test_loan_input_rejects_out_of_domain_values() {
        let base = LoanInput {
            name: "Truck".to_string(),
            principal_amount: 1000.0,
            monthly_quota: 200.0,
            current_balance: None,
        };

        let zero_principal = LoanInput {
            principal_amount: 0.0,
            ..base.clone()
        };
        assert!(matches!(
            zero_principal.into_loan(),
            Err(EngineError::InvalidInput { field: "principal_amount", .. })
        ));

        let zero_quota = LoanInput {
            monthly_quota: 0.0,
            ..base.clone()
        };
        assert!(zero_quota.into_loan().is_err());

        let over_balance = LoanInput {
            current_balance: Some(1200.0),
            ..base.clone()
        };
        assert!(over_balance.into_loan().is_err());

        let no_name = LoanInput {
            name: " ".to_string(),
            ..base
        };
        assert!(no_name.into_loan().is_err());
    }

    #[test]
    fn test_direction_by_kind() {
        assert_eq!(TransactionKind::Sale.direction(), CashFlow::Inflow);
        assert_eq!(TransactionKind::Purchase.direction(), CashFlow::Outflow);
        assert_eq!(TransactionKind::Expense.direction(), CashFlow::Outflow);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Sale".parse::<TransactionKind>(), Ok(TransactionKind::Sale));
        assert_eq!("compra".parse::<TransactionKind>(), Ok(TransactionKind::Purchase));
        assert!("refund".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_trade_total_derived_from_quantity_and_price() {
        let input = TransactionInput {
            quantity: Some(12.0),
            price_per_unit: Some(25.0),
            total_amount: Some(1.0),
            ..TransactionInput::new(TransactionKind::Purchase)
        };
        let tx = input.into_transaction(now()).unwrap();
        assert_eq!(tx.total_amount, 300.0);
        assert_eq!(tx.transaction_date, now());
    }

    #[test]
    fn test_trade_without_price_takes_literal_total() {
        let input = TransactionInput {
            quantity: Some(12.0),
            total_amount: Some(280.0),
            ..TransactionInput::new(TransactionKind::Sale)
        };
        let tx = input.into_transaction(now()).unwrap();
        assert_eq!(tx.total_amount, 280.0);
        assert_eq!(tx.quantity, Some(12.0));
    }

    #[test]
    fn test_expense_always_takes_literal_total() {
        let input = TransactionInput {
            quantity: Some(3.0),
            price_per_unit: Some(10.0),
            total_amount: Some(50.0),
            ..TransactionInput::new(TransactionKind::Expense)
        };
        let tx = input.into_transaction(now()).unwrap();
        assert_eq!(tx.total_amount, 50.0);
        assert!(tx.quantity.is_none());
        assert!(tx.price_per_unit.is_none());
    }

    #[test]
    fn test_missing_total_is_rejected() {
        let input = TransactionInput::new(TransactionKind::Expense);
        assert!(matches!(
            input.into_transaction(now()),
            Err(EngineError::InvalidInput { field: "total_amount", .. })
        ));
    }

    #[test]
    fn test_overflowing_trade_total_is_rejected() {
        for kind in [TransactionKind::Sale, TransactionKind::Purchase] {
            let input = TransactionInput {
                quantity: Some(1e200),
                price_per_unit: Some(1e200),
                ..TransactionInput::new(kind)
            };
            assert!(matches!(
                input.into_transaction(now()),
                Err(EngineError::InvalidInput { field: "total_amount", .. })
            ));
        }
    }

    #[test]
    fn test_negative_costs_are_rejected() {
        let input = TransactionInput {
            total_amount: Some(10.0),
            fuel_cost: -1.0,
            ..TransactionInput::new(TransactionKind::Expense)
        };
        assert!(input.into_transaction(now()).is_err());
    }

    #[test]
    fn test_transaction_serializes_kind_as_type() {
        let tx = TransactionInput {
            total_amount: Some(10.0),
            ..TransactionInput::new(TransactionKind::Expense)
        }
        .into_transaction(now())
        .unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "expense");
    }
}
