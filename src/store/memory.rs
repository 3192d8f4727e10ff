use crate::core::model::{CreditCard, Loan, Transaction};
use crate::core::store::{GoalStore, RecordStore, checked_balance, sort_newest_first};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// In-memory store. Collections keep insertion order.
#[derive(Default)]
pub struct MemoryStore {
    cards: Mutex<Vec<CreditCard>>,
    loans: Mutex<Vec<Loan>>,
    transactions: Mutex<Vec<Transaction>>,
    goal: Mutex<Option<f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_cards(&self) -> Result<Vec<CreditCard>> {
        Ok(self.cards.lock().await.clone())
    }

    async fn fetch_loans(&self) -> Result<Vec<Loan>> {
        Ok(self.loans.lock().await.clone())
    }

    async fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions = self.transactions.lock().await.clone();
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    async fn get_loan(&self, id: Uuid) -> Result<Option<Loan>> {
        let loans = self.loans.lock().await;
        Ok(loans.iter().find(|l| l.id == id).cloned())
    }

    async fn insert_loan(&self, loan: Loan) -> Result<Loan> {
        let mut loans = self.loans.lock().await;
        if loans.iter().any(|l| l.id == loan.id) {
            return Err(anyhow!("Loan {} already exists", loan.id));
        }
        debug!("Memory PUT loan {}", loan.id);
        loans.push(loan.clone());
        Ok(loan)
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction> {
        let mut transactions = self.transactions.lock().await;
        if transactions.iter().any(|t| t.id == tx.id) {
            return Err(anyhow!("Transaction {} already exists", tx.id));
        }
        debug!("Memory PUT transaction {}", tx.id);
        transactions.push(tx.clone());
        Ok(tx)
    }

    async fn insert_or_update_card(&self, card: CreditCard) -> Result<CreditCard> {
        let mut cards = self.cards.lock().await;
        match cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => {
                debug!("Memory UPDATE card {}", card.id);
                *existing = card.clone();
            }
            None => {
                debug!("Memory PUT card {}", card.id);
                cards.push(card.clone());
            }
        }
        Ok(card)
    }

    async fn update_loan_balance(&self, id: Uuid, new_balance: f64) -> Result<Loan> {
        let mut loans = self.loans.lock().await;
        let loan = loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| anyhow!("Loan {id} not found"))?;
        loan.current_balance = checked_balance(loan, new_balance)?;
        debug!("Memory UPDATE loan {id} balance to {new_balance}");
        Ok(loan.clone())
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn get_goal(&self) -> Result<Option<f64>> {
        Ok(*self.goal.lock().await)
    }

    async fn set_goal(&self, amount: f64) -> Result<()> {
        *self.goal.lock().await = Some(amount);
        Ok(())
    }
}
