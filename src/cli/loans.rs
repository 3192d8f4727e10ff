use super::ui;
use crate::core::amortization::{self, PaymentOutcome};
use crate::core::model::{Loan, LoanInput};
use crate::core::store::Store;
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use tracing::{debug, info};

pub enum LoansCommand {
    List,
    Add(LoanInput),
    /// Register one monthly payment. Takes a loan id or a unique prefix of it.
    Pay(String),
}

pub async fn run(command: LoansCommand, store: &dyn Store, currency: &str) -> Result<()> {
    match command {
        LoansCommand::List => {
            let loans = store.fetch_loans().await?;
            if loans.is_empty() {
                println!("No loans registered.");
            } else {
                println!("{}", display_loans(&loans, currency));
            }
        }
        LoansCommand::Add(input) => {
            let loan = store.insert_loan(input.into_loan()?).await?;
            info!(loan = %loan.name, id = %loan.id, "Registered loan");
            println!("Registered loan {} ({})", loan.name, loan.id);
        }
        LoansCommand::Pay(id) => {
            let loans = store.fetch_loans().await?;
            let loan = resolve_loan(&loans, &id)?;
            match amortization::apply_payment(loan) {
                PaymentOutcome::AlreadySettled(loan) => {
                    println!(
                        "{}",
                        ui::style_text(
                            &format!("Loan {} is already paid off, payment ignored", loan.name),
                            ui::StyleType::Error
                        )
                    );
                }
                PaymentOutcome::Applied { loan, amount_paid } => {
                    let saved = store
                        .update_loan_balance(loan.id, loan.current_balance)
                        .await?;
                    info!(loan = %saved.name, balance = saved.current_balance, "Registered payment");
                    println!(
                        "Paid {} on {}, remaining balance {} ({:.1}% paid)",
                        ui::money(amount_paid, currency),
                        saved.name,
                        ui::money(saved.current_balance, currency),
                        saved.percent_paid()
                    );
                }
            }
        }
    }
    Ok(())
}

/// Finds the loan whose id starts with `prefix`.
pub fn resolve_loan<'a>(loans: &'a [Loan], prefix: &str) -> Result<&'a Loan> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        bail!("Loan id must not be empty");
    }
    let mut matches = loans
        .iter()
        .filter(|l| l.id.to_string().starts_with(&prefix));
    let found = matches
        .next()
        .ok_or_else(|| anyhow!("No loan matches id {prefix}"))?;
    if matches.next().is_some() {
        bail!("Loan id {prefix} is ambiguous, use more characters");
    }
    debug!("Resolved {prefix} to loan {}", found.id);
    Ok(found)
}

pub fn display_loans(loans: &[Loan], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Loan"),
        ui::header_cell("ID"),
        ui::header_cell(&format!("Principal ({currency})")),
        ui::header_cell(&format!("Balance ({currency})")),
        ui::header_cell(&format!("Quota ({currency})")),
        ui::header_cell("Paid"),
        ui::header_cell("Progress"),
        ui::header_cell("Payments left"),
    ]);

    let mut total_balance = 0.0;
    for loan in loans {
        total_balance += loan.current_balance;
        let id = loan.id.to_string();
        table.add_row(vec![
            Cell::new(&loan.name),
            Cell::new(&id[..8]),
            ui::amount_cell(loan.principal_amount),
            ui::amount_cell(loan.current_balance),
            ui::amount_cell(loan.monthly_quota),
            ui::format_percentage_cell(loan.percent_paid()),
            Cell::new(ui::progress_bar(loan.percent_paid(), 20)),
            Cell::new(loan.remaining_payments()),
        ]);
    }

    format!(
        "{}\n\n{}: {}",
        table,
        ui::style_text("Outstanding debt", ui::StyleType::TotalLabel),
        ui::style_text(&ui::money(total_balance, currency), ui::StyleType::Error)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::RecordStore;
    use crate::store::memory::MemoryStore;

    fn input() -> LoanInput {
        LoanInput {
            name: "Personal Loan 1".to_string(),
            principal_amount: 1000.0,
            monthly_quota: 200.0,
            current_balance: None,
        }
    }

    #[tokio::test]
    async fn test_pay_until_settled_then_noop() {
        let store = MemoryStore::new();
        run(LoansCommand::Add(input()), &store, "USD").await.unwrap();
        let id = store.fetch_loans().await.unwrap()[0].id.to_string();

        run(LoansCommand::Pay(id.clone()), &store, "USD").await.unwrap();
        assert_eq!(store.fetch_loans().await.unwrap()[0].current_balance, 800.0);

        for _ in 0..4 {
            run(LoansCommand::Pay(id[..8].to_string()), &store, "USD")
                .await
                .unwrap();
        }
        assert_eq!(store.fetch_loans().await.unwrap()[0].current_balance, 0.0);

        // A sixth payment is ignored rather than pushing the balance negative.
        run(LoansCommand::Pay(id), &store, "USD").await.unwrap();
        assert_eq!(store.fetch_loans().await.unwrap()[0].current_balance, 0.0);
    }

    #[tokio::test]
    async fn test_pay_unknown_loan_fails() {
        let store = MemoryStore::new();
        let result = run(LoansCommand::Pay("deadbeef".to_string()), &store, "USD").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_add_rejects_zero_principal() {
        let store = MemoryStore::new();
        let zero = LoanInput {
            principal_amount: 0.0,
            ..input()
        };
        assert!(run(LoansCommand::Add(zero), &store, "USD").await.is_err());
        assert!(store.fetch_loans().await.unwrap().is_empty());
    }

    #[test]
    fn test_resolve_loan_rejects_empty_prefix() {
        let loans = vec![input().into_loan().unwrap()];
        assert!(resolve_loan(&loans, "").is_err());
        let full = loans[0].id.to_string();
        assert_eq!(resolve_loan(&loans, &full.to_uppercase()).unwrap().id, loans[0].id);
    }

    #[test]
    fn test_display_loans() {
        let loan = input().into_loan().unwrap();
        let paid = amortization::apply_payment(&loan).loan().clone();
        let output = display_loans(&[paid], "USD");
        assert!(output.contains("Personal Loan 1"));
        assert!(output.contains("20.0%"));
        assert!(output.contains("800.00 USD"));
    }
}
