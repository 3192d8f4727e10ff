//! Aggregates grain-trading transactions into cash flow figures.
use crate::core::model::{CashFlow, Transaction, TransactionKind};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::debug;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// UTC calendar month of the transaction date. Dates given by hand are
    /// stored at midnight UTC and always land in their own month; records
    /// stamped with the current time follow the UTC clock, so an entry made
    /// late on the last evening of a month west of UTC counts in the next one.
    pub fn of(tx: &Transaction) -> Self {
        let date = tx.transaction_date.date_naive();
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Short label such as `Jan 2024`.
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowTotals {
    pub income: f64,
    pub expense: f64,
}

impl FlowTotals {
    fn add(&mut self, tx: &Transaction) {
        match tx.direction() {
            CashFlow::Inflow => self.income += tx.total_amount,
            CashFlow::Outflow => self.expense += tx.total_amount,
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotals {
    pub period: Period,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerSummary {
    /// Per-month totals in calendar order.
    pub periods: Vec<PeriodTotals>,
    pub revenue: f64,
    pub expenses: f64,
    pub margin: f64,
    /// Fuel and freight paid on top of the recorded totals. Informational
    /// only, not part of `expenses`.
    pub logistics_costs: f64,
    pub quintals_bought: f64,
    pub quintals_sold: f64,
}

/// Sums transactions by direction, overall and per month.
///
/// Sales are income; purchases and expenses are both outflows. An empty
/// ledger yields an all-zero summary.
pub fn aggregate(transactions: &[Transaction]) -> LedgerSummary {
    let mut by_period: BTreeMap<Period, FlowTotals> = BTreeMap::new();
    let mut overall = FlowTotals::default();
    let mut summary = LedgerSummary::default();

    for tx in transactions {
        by_period.entry(Period::of(tx)).or_default().add(tx);
        overall.add(tx);

        summary.logistics_costs += tx.fuel_cost + tx.freight_cost;
        if let Some(quantity) = tx.quantity {
            match tx.kind {
                TransactionKind::Purchase => summary.quintals_bought += quantity,
                TransactionKind::Sale => summary.quintals_sold += quantity,
                TransactionKind::Expense => {}
            }
        }
    }

    summary.periods = by_period
        .into_iter()
        .map(|(period, totals)| PeriodTotals {
            period,
            income: totals.income,
            expense: totals.expense,
        })
        .collect();
    summary.revenue = overall.income;
    summary.expenses = overall.expense;
    summary.margin = overall.net();

    debug!(
        transactions = transactions.len(),
        periods = summary.periods.len(),
        margin = summary.margin,
        "Aggregated ledger"
    );
    summary
}

/// The `n` most recent transactions, newest first.
pub fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    sorted.truncate(n);
    sorted
}
