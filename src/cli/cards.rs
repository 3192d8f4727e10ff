use super::ui;
use crate::core::billing::{self, CardRecommendation};
use crate::core::model::CreditCardInput;
use crate::core::store::Store;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, Color};
use tracing::info;

pub enum CardsCommand {
    List,
    Add(CreditCardInput),
    /// Recommend a card for the given date.
    Recommend(NaiveDate),
}

pub async fn run(
    command: CardsCommand,
    store: &dyn Store,
    today: NaiveDate,
    currency: &str,
) -> Result<()> {
    match command {
        CardsCommand::List => {
            let cards = store.fetch_cards().await?;
            if cards.is_empty() {
                println!("No cards registered.");
                return Ok(());
            }
            let scores = billing::score_cards(&cards, today);
            let best = billing::recommend(&cards, today);
            println!("{}", display_cards(&scores, best.as_ref(), currency));
        }
        CardsCommand::Add(input) => {
            let card = input.into_card()?;
            let saved = store.insert_or_update_card(card).await?;
            info!(bank = %saved.bank, id = %saved.id, "Saved card");
            println!("Saved card {} {} ({})", saved.bank, saved.tier, saved.id);
        }
        CardsCommand::Recommend(date) => {
            let cards = store.fetch_cards().await?;
            match billing::recommend(&cards, date) {
                Some(best) => println!("{}", display_recommendation(&best, date, today)),
                None => println!("No cards registered."),
            }
        }
    }
    Ok(())
}

/// Recommendation widget for a purchase made on `date`.
pub fn display_recommendation(
    best: &CardRecommendation,
    date: NaiveDate,
    today: NaiveDate,
) -> String {
    let title = if date == today {
        "Recommended card for today".to_string()
    } else {
        format!("Recommended card for {date}")
    };
    format!(
        "{}\n{} {}\nStatement closes {} (in {} days), payment due {} ({} interest-free days)",
        ui::style_text(&title, ui::StyleType::Title),
        ui::style_text(&best.card.bank, ui::StyleType::TotalValue),
        best.card.tier,
        best.next_cutoff,
        best.days_until_cutoff,
        best.payment_due,
        best.interest_free_days,
    )
}

pub fn display_cards(
    scores: &[CardRecommendation],
    best: Option<&CardRecommendation>,
    currency: &str,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Bank"),
        ui::header_cell("Tier"),
        ui::header_cell(&format!("Limit ({currency})")),
        ui::header_cell("Cutoff"),
        ui::header_cell("Payment"),
        ui::header_cell("Next cutoff"),
        ui::header_cell("Days left"),
        ui::header_cell("Interest-free days"),
    ]);

    let best_id = best.map(|b| b.card.id);
    let mut total_limit = 0.0;
    for scored in scores {
        let card = &scored.card;
        total_limit += card.credit_limit;

        let mut bank = Cell::new(&card.bank);
        if Some(card.id) == best_id {
            bank = Cell::new(format!("{} *", card.bank))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            bank,
            Cell::new(&card.tier),
            ui::amount_cell(card.credit_limit),
            Cell::new(format!("Day {}", card.cutoff_day)),
            Cell::new(format!("Day {}", card.payment_day)),
            Cell::new(scored.next_cutoff.to_string()),
            Cell::new(scored.days_until_cutoff),
            Cell::new(scored.interest_free_days),
        ]);
    }

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\n{}: {}",
        ui::style_text("Total credit limit", ui::StyleType::TotalLabel),
        ui::style_text(&ui::money(total_limit, currency), ui::StyleType::TotalValue)
    ));
    if best.is_some() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text("* recommended for today", ui::StyleType::Subtle)
        ));
    }
    output
}
