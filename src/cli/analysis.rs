use super::{goal as goal_view, ui};
use crate::core::goal;
use crate::core::ledger::{self, LedgerSummary};
use crate::core::store::Store;
use anyhow::Result;
use comfy_table::{Attribute, Cell};

pub async fn run(store: &dyn Store, currency: &str) -> Result<()> {
    let transactions = store.fetch_transactions().await?;
    let summary = ledger::aggregate(&transactions);

    println!(
        "{}\n",
        ui::style_text("Monthly cash flow", ui::StyleType::Title)
    );
    if summary.periods.is_empty() {
        println!("No transactions found.");
    } else {
        println!("{}", display_cash_flow(&summary, currency));
    }

    ui::print_separator();
    match store.get_goal().await? {
        Some(target) => {
            let progress = goal::progress(summary.margin, target)?;
            println!(
                "{}",
                goal_view::display_progress(&progress, summary.margin, target, currency)
            );
        }
        None => println!("No profit goal set."),
    }
    Ok(())
}

pub fn display_cash_flow(summary: &LedgerSummary, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Month"),
        ui::header_cell(&format!("Income ({currency})")),
        ui::header_cell(&format!("Expenses ({currency})")),
        ui::header_cell(&format!("Net ({currency})")),
    ]);

    for period in &summary.periods {
        table.add_row(vec![
            Cell::new(period.period.label()),
            ui::amount_cell(period.income),
            ui::amount_cell(period.expense),
            ui::net_cell(period.income - period.expense),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        ui::amount_cell(summary.revenue).add_attribute(Attribute::Bold),
        ui::amount_cell(summary.expenses).add_attribute(Attribute::Bold),
        ui::net_cell(summary.margin).add_attribute(Attribute::Bold),
    ]);
    table.to_string()
}
