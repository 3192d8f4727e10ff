use super::ui;
use crate::core::ledger::{self, LedgerSummary};
use crate::core::model::{Transaction, TransactionInput};
use crate::core::store::Store;
use anyhow::Result;
use chrono::Utc;
use comfy_table::Cell;
use tracing::info;

pub enum BusinessCommand {
    List,
    Add(TransactionInput),
}

pub async fn run(command: BusinessCommand, store: &dyn Store, currency: &str) -> Result<()> {
    match command {
        BusinessCommand::List => {
            let transactions = store.fetch_transactions().await?;
            if transactions.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }
            let summary = ledger::aggregate(&transactions);
            println!("{}", display_totals(&summary, currency));
            println!("{}", display_transactions(&transactions));
        }
        BusinessCommand::Add(input) => {
            let tx = store
                .insert_transaction(input.into_transaction(Utc::now())?)
                .await?;
            info!(kind = %tx.kind, total = tx.total_amount, "Recorded transaction");
            println!(
                "Recorded {} of {} on {}",
                tx.kind,
                ui::money(tx.total_amount, currency),
                tx.transaction_date.date_naive()
            );
        }
    }
    Ok(())
}

pub fn display_totals(summary: &LedgerSummary, currency: &str) -> String {
    let margin_style = if summary.margin >= 0.0 {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };
    format!(
        "Sales: {}   Expenses: {}   {}: {}\nBought: {:.2} qq   Sold: {:.2} qq   Fuel & freight: {}",
        ui::money(summary.revenue, currency),
        ui::money(summary.expenses, currency),
        ui::style_text("Net margin", ui::StyleType::TotalLabel),
        ui::style_text(&ui::money(summary.margin, currency), margin_style),
        summary.quintals_bought,
        summary.quintals_sold,
        ui::money(summary.logistics_costs, currency),
    )
}

/// Table of transactions in the order given.
pub fn display_transactions(transactions: &[Transaction]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Type"),
        ui::header_cell("Quantity (qq)"),
        ui::header_cell("Price/qq"),
        ui::header_cell("Amount"),
        ui::header_cell("Fuel"),
        ui::header_cell("Freight"),
        ui::header_cell("Location"),
    ]);

    for tx in transactions {
        table.add_row(vec![
            Cell::new(tx.transaction_date.date_naive().to_string()),
            Cell::new(tx.kind.to_string()),
            ui::format_optional_cell(tx.quantity, |q| format!("{q:.2}")),
            ui::format_optional_cell(tx.price_per_unit, |p| format!("{p:.2}")),
            ui::flow_cell(tx.total_amount, tx.direction()),
            ui::amount_cell(tx.fuel_cost),
            ui::amount_cell(tx.freight_cost),
            Cell::new(&tx.location),
        ]);
    }
    table.to_string()
}
