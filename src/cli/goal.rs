use super::ui;
use crate::core::error::positive;
use crate::core::goal::{self, GoalProgress};
use crate::core::ledger;
use crate::core::store::Store;
use anyhow::Result;
use tracing::info;

pub enum GoalCommand {
    Show,
    Set(f64),
}

pub async fn run(command: GoalCommand, store: &dyn Store, currency: &str) -> Result<()> {
    match command {
        GoalCommand::Set(amount) => {
            let amount = positive("goal", amount)?;
            store.set_goal(amount).await?;
            info!(goal = amount, "Saved profit goal");
            println!("Profit goal set to {}", ui::money(amount, currency));
        }
        GoalCommand::Show => {
            let Some(target) = store.get_goal().await? else {
                println!("No profit goal set. Use `goal set <amount>`.");
                return Ok(());
            };
            let transactions = store.fetch_transactions().await?;
            let profit = ledger::aggregate(&transactions).margin;
            let progress = goal::progress(profit, target)?;
            println!("{}", display_progress(&progress, profit, target, currency));
        }
    }
    Ok(())
}

pub fn display_progress(progress: &GoalProgress, profit: f64, target: f64, currency: &str) -> String {
    let status = if progress.achieved {
        ui::style_text("achieved", ui::StyleType::TotalValue)
    } else {
        format!("{} to go", ui::money(progress.remaining, currency))
    };
    format!(
        "{}: {}\nCurrent net profit: {}\n{} {:.1}% ({})",
        ui::style_text("Goal", ui::StyleType::TotalLabel),
        ui::money(target, currency),
        ui::money(profit, currency),
        ui::progress_bar(progress.percent, 30),
        progress.percent,
        status
    )
}
