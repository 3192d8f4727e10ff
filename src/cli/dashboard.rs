use super::ui;
use crate::core::config::DashboardConfig;
use crate::core::model::Transaction;
use crate::core::overview::{self, Overview};
use crate::core::store::Store;
use crate::core::{billing, ledger};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::debug;

pub async fn run(
    store: &dyn Store,
    settings: &DashboardConfig,
    today: NaiveDate,
    currency: &str,
) -> Result<()> {
    let (cards, loans, transactions) = futures::try_join!(
        store.fetch_cards(),
        store.fetch_loans(),
        store.fetch_transactions()
    )?;
    debug!(
        cards = cards.len(),
        loans = loans.len(),
        transactions = transactions.len(),
        "Fetched dashboard data"
    );

    let summary = ledger::aggregate(&transactions);
    let figures = overview::overview(&cards, &loans, &summary, settings.debt_weight);

    println!(
        "{}\n",
        ui::style_text("Financial overview", ui::StyleType::Title)
    );
    println!("{}", display_overview(&figures, currency));

    if let Some(best) = billing::recommend(&cards, today) {
        println!(
            "\nUse {} {} today: statement closes in {} days.",
            ui::style_text(&best.card.bank, ui::StyleType::TotalValue),
            best.card.tier,
            best.days_until_cutoff
        );
    }

    ui::print_separator();
    println!(
        "{}\n",
        ui::style_text("Recent activity", ui::StyleType::Title)
    );
    let recent = ledger::recent(&transactions, settings.recent_transactions);
    if recent.is_empty() {
        println!("No recent activity.");
    } else {
        println!("{}", display_recent(&recent));
    }
    Ok(())
}

pub fn display_overview(figures: &Overview, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Total credit limit"),
        ui::header_cell("Outstanding debt"),
        ui::header_cell("Business margin"),
        ui::header_cell("Net position"),
    ]);
    table.add_row(vec![
        Cell::new(ui::money(figures.total_credit_limit, currency)),
        Cell::new(ui::money(figures.outstanding_debt, currency)),
        ui::net_cell(figures.business_margin),
        ui::net_cell(figures.net_position),
    ]);
    table.to_string()
}

pub fn display_recent(transactions: &[Transaction]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Activity"),
        ui::header_cell("Amount"),
    ]);
    for tx in transactions {
        let place = if tx.location.is_empty() {
            "Grain"
        } else {
            tx.location.as_str()
        };
        table.add_row(vec![
            Cell::new(tx.transaction_date.date_naive().to_string()),
            Cell::new(format!("{} ({place})", tx.kind)),
            ui::flow_cell(tx.total_amount, tx.direction()),
        ]);
    }
    table.to_string()
}
