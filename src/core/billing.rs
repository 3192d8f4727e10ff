//! Billing cycle optimizer.
//!
//! Purchases made right after a statement closes are billed a full cycle
//! later, so the best card to use on a given day is the one whose next
//! cutoff is furthest away.
//!
//! Cutoff and payment days beyond the length of a month are clamped to the
//! month's last day: a card closing on the 31st closes on April 30 and on
//! February 28 (29 in leap years), never on the first days of the next month.

use crate::core::model::CreditCard;
use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::debug;

/// A card scored against a reference date.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecommendation {
    pub card: CreditCard,
    /// Whole days until the statement closes; 0 when it closes today.
    pub days_until_cutoff: i64,
    pub next_cutoff: NaiveDate,
    /// First payment date after `next_cutoff`.
    pub payment_due: NaiveDate,
    /// Days between the reference date and `payment_due`.
    pub interest_free_days: i64,
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn days_in_month(month_start: NaiveDate) -> u32 {
    (month_start + Months::new(1))
        .signed_duration_since(month_start)
        .num_days() as u32
}

/// Day `day` of the month starting at `month_start`, clamped to the last
/// day of that month.
pub fn clamped_day(month_start: NaiveDate, day: u32) -> NaiveDate {
    let last = days_in_month(month_start);
    month_start + Days::new(u64::from(day.clamp(1, last) - 1))
}

/// Next occurrence of `cutoff_day` on or after `today`.
pub fn next_cutoff(today: NaiveDate, cutoff_day: u32) -> NaiveDate {
    let this_month = month_start(today);
    let candidate = clamped_day(this_month, cutoff_day);
    if today > candidate {
        clamped_day(this_month + Months::new(1), cutoff_day)
    } else {
        candidate
    }
}

/// First occurrence of `payment_day` strictly after the statement `cutoff`.
pub fn payment_due(cutoff: NaiveDate, payment_day: u32) -> NaiveDate {
    let cutoff_month = month_start(cutoff);
    let candidate = clamped_day(cutoff_month, payment_day);
    if candidate > cutoff {
        candidate
    } else {
        clamped_day(cutoff_month + Months::new(1), payment_day)
    }
}

pub fn score_card(card: &CreditCard, today: NaiveDate) -> CardRecommendation {
    let next_cutoff = next_cutoff(today, card.cutoff_day);
    let payment_due = payment_due(next_cutoff, card.payment_day);
    CardRecommendation {
        card: card.clone(),
        days_until_cutoff: (next_cutoff - today).num_days(),
        next_cutoff,
        payment_due,
        interest_free_days: (payment_due - today).num_days(),
    }
}

/// Scores every card, in input order.
pub fn score_cards(cards: &[CreditCard], today: NaiveDate) -> Vec<CardRecommendation> {
    cards.iter().map(|card| score_card(card, today)).collect()
}

/// Picks the card with the most days left before its statement closes.
/// Ties keep the card that comes first; no cards gives `None`.
pub fn recommend(cards: &[CreditCard], today: NaiveDate) -> Option<CardRecommendation> {
    let mut best: Option<CardRecommendation> = None;
    for scored in cards.iter().map(|card| score_card(card, today)) {
        debug!(
            bank = %scored.card.bank,
            days = scored.days_until_cutoff,
            "Scored card"
        );
        match &best {
            Some(current) if current.days_until_cutoff >= scored.days_until_cutoff => {}
            _ => best = Some(scored),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card(bank: &str, cutoff_day: u32, payment_day: u32) -> CreditCard {
        CreditCard {
            id: Uuid::new_v4(),
            bank: bank.to_string(),
            tier: "Platinum".to_string(),
            credit_limit: 1000.0,
            cutoff_day,
            payment_day,
        }
    }

    #[test]
    fn test_recommends_card_with_furthest_cutoff() {
        let today = date(2024, 3, 20);
        let cards = vec![card("A", 15, 5), card("B", 25, 10)];

        let best = recommend(&cards, today).unwrap();
        assert_eq!(best.card.bank, "A");
        assert_eq!(best.next_cutoff, date(2024, 4, 15));
        assert_eq!(best.days_until_cutoff, 26);

        let scores = score_cards(&cards, today);
        assert_eq!(scores[1].next_cutoff, date(2024, 3, 25));
        assert_eq!(scores[1].days_until_cutoff, 5);
    }

    #[test]
    fn test_empty_cards_give_none() {
        assert!(recommend(&[], date(2024, 3, 20)).is_none());
    }

    #[test]
    fn test_ties_keep_first_card() {
        let cards = vec![card("First", 10, 1), card("Second", 10, 1)];
        let best = recommend(&cards, date(2024, 3, 1)).unwrap();
        assert_eq!(best.card.bank, "First");
    }

    #[test]
    fn test_cutoff_today_is_zero_days() {
        assert_eq!(next_cutoff(date(2024, 3, 20), 20), date(2024, 3, 20));
        let scored = score_card(&card("A", 20, 5), date(2024, 3, 20));
        assert_eq!(scored.days_until_cutoff, 0);
    }

    #[test]
    fn test_cutoff_rolls_over_year_end() {
        assert_eq!(next_cutoff(date(2024, 12, 20), 5), date(2025, 1, 5));
    }

    #[test]
    fn test_day_31_clamps_in_thirty_day_month() {
        assert_eq!(next_cutoff(date(2024, 4, 10), 31), date(2024, 4, 30));
        assert_eq!(next_cutoff(date(2024, 4, 30), 31), date(2024, 4, 30));
        assert_eq!(next_cutoff(date(2024, 3, 31), 31), date(2024, 3, 31));
        assert_eq!(next_cutoff(date(2024, 3, 31), 30), date(2024, 4, 30));
    }

    #[test]
    fn test_february_clamps() {
        assert_eq!(next_cutoff(date(2023, 2, 10), 29), date(2023, 2, 28));
        assert_eq!(next_cutoff(date(2024, 2, 10), 29), date(2024, 2, 29));
        assert_eq!(next_cutoff(date(2024, 2, 10), 30), date(2024, 2, 29));
        assert_eq!(next_cutoff(date(2023, 1, 31), 29), date(2023, 2, 28));
        assert_eq!(next_cutoff(date(2024, 1, 31), 30), date(2024, 2, 29));
    }

    #[test]
    fn test_payment_due_follows_cutoff() {
        let scored = score_card(&card("A", 15, 5), date(2024, 3, 20));
        assert_eq!(scored.payment_due, date(2024, 5, 5));
        assert_eq!(scored.interest_free_days, 46);

        let same_month = score_card(&card("A", 15, 25), date(2024, 3, 20));
        assert_eq!(same_month.payment_due, date(2024, 4, 25));
        assert_eq!(same_month.interest_free_days, 36);

        // Paying on the cutoff day itself belongs to the next month.
        assert_eq!(payment_due(date(2024, 1, 31), 31), date(2024, 2, 29));
    }

    #[test]
    fn test_recommendation_is_maximal_and_deterministic() {
        let cards: Vec<CreditCard> = (1..=31).map(|d| card(&format!("Bank {d}"), d, d)).collect();
        let mut today = date(2023, 12, 25);
        let end = date(2024, 3, 10);

        while today <= end {
            let best = recommend(&cards, today).unwrap();
            for scored in score_cards(&cards, today) {
                assert!(best.days_until_cutoff >= scored.days_until_cutoff);
                assert!(scored.days_until_cutoff >= 0);
            }
            assert_eq!(recommend(&cards, today), Some(best));
            today = today.succ_opt().unwrap();
        }
    }
}
