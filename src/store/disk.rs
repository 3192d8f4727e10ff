use super::Keyed;
use crate::core::model::{CreditCard, Loan, Transaction};
use crate::core::store::{GoalStore, RecordStore, checked_balance, sort_newest_first};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode, UserKey};
use serde::{Serialize, de::DeserializeOwned};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

const GOAL_KEY: &str = "goal";

/// A partition of JSON records keyed by an increasing sequence number, so
/// iteration returns records in insertion order.
struct Collection {
    name: &'static str,
    partition: PartitionHandle,
}

impl Collection {
    fn open(keyspace: &Keyspace, name: &'static str) -> Result<Self> {
        let partition = keyspace
            .open_partition(name, PartitionCreateOptions::default())
            .with_context(|| format!("Failed to open partition: {name}"))?;
        Ok(Self { name, partition })
    }

    fn all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        Ok(self.entries()?.into_iter().map(|(_, v)| v).collect())
    }

    fn entries<T: DeserializeOwned>(&self) -> Result<Vec<(UserKey, T)>> {
        self.partition
            .iter()
            .map(|kv| -> Result<(UserKey, T)> {
                let (key, value) = kv?;
                let record = serde_json::from_slice(&value)
                    .with_context(|| format!("Corrupt record in {}", self.name))?;
                Ok((key, record))
            })
            .collect()
    }

    fn find<T: DeserializeOwned + Keyed>(&self, id: Uuid) -> Result<Option<(UserKey, T)>> {
        Ok(self
            .entries::<T>()?
            .into_iter()
            .find(|(_, record)| record.id() == id))
    }

    fn next_key(&self) -> Result<[u8; 8]> {
        let next = match self.partition.last_key_value()? {
            Some((key, _)) => {
                let bytes: [u8; 8] = key[..]
                    .try_into()
                    .map_err(|_| anyhow!("Unexpected key length in {}", self.name))?;
                u64::from_be_bytes(bytes) + 1
            }
            None => 0,
        };
        Ok(next.to_be_bytes())
    }

    fn put<T: Serialize>(&self, key: &[u8], record: &T) -> Result<()> {
        self.partition.insert(key, serde_json::to_vec(record)?)?;
        Ok(())
    }
}

/// Store persisted in a fjall keyspace.
pub struct DiskStore {
    keyspace: Keyspace,
    cards: Collection,
    loans: Collection,
    transactions: Collection,
    settings: PartitionHandle,
    // Serializes read-modify-write sequences.
    write_lock: Mutex<()>,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = fjall::Config::new(path.join("fjall_db"))
            .open()
            .with_context(|| format!("Failed to open data store at {}", path.display()))?;
        debug!("Opened data store at {}", path.display());

        Ok(Self {
            cards: Collection::open(&keyspace, "cards")?,
            loans: Collection::open(&keyspace, "loans")?,
            transactions: Collection::open(&keyspace, "transactions")?,
            settings: keyspace.open_partition("settings", PartitionCreateOptions::default())?,
            keyspace,
            write_lock: Mutex::new(()),
        })
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist data store")
    }

    async fn append<T>(&self, collection: &Collection, record: &T) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Keyed,
    {
        let _guard = self.write_lock.lock().await;
        if collection.find::<T>(record.id())?.is_some() {
            return Err(anyhow!("Record {} already exists in {}", record.id(), collection.name));
        }
        let key = collection.next_key()?;
        collection.put(&key, record)?;
        debug!("Disk PUT {} {}", collection.name, record.id());
        self.persist()
    }
}

#[async_trait]
impl RecordStore for DiskStore {
    async fn fetch_cards(&self) -> Result<Vec<CreditCard>> {
        self.cards.all()
    }

    async fn fetch_loans(&self) -> Result<Vec<Loan>> {
        self.loans.all()
    }

    async fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self.transactions.all()?;
        sort_newest_first(&mut transactions);
        Ok(transactions)
    }

    async fn get_loan(&self, id: Uuid) -> Result<Option<Loan>> {
        Ok(self.loans.find::<Loan>(id)?.map(|(_, loan)| loan))
    }

    async fn insert_loan(&self, loan: Loan) -> Result<Loan> {
        self.append(&self.loans, &loan).await?;
        Ok(loan)
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction> {
        self.append(&self.transactions, &tx).await?;
        Ok(tx)
    }

    async fn insert_or_update_card(&self, card: CreditCard) -> Result<CreditCard> {
        let _guard = self.write_lock.lock().await;
        let key = match self.cards.find::<CreditCard>(card.id)? {
            Some((key, _)) => {
                debug!("Disk UPDATE card {}", card.id);
                key.to_vec()
            }
            None => {
                debug!("Disk PUT card {}", card.id);
                self.cards.next_key()?.to_vec()
            }
        };
        self.cards.put(&key, &card)?;
        self.persist()?;
        Ok(card)
    }

    async fn update_loan_balance(&self, id: Uuid, new_balance: f64) -> Result<Loan> {
        let _guard = self.write_lock.lock().await;
        let (key, loan) = self
            .loans
            .find::<Loan>(id)?
            .ok_or_else(|| anyhow!("Loan {id} not found"))?;
        let updated = Loan {
            current_balance: checked_balance(&loan, new_balance)?,
            ..loan
        };
        self.loans.put(&key, &updated)?;
        debug!("Disk UPDATE loan {id} balance to {new_balance}");
        self.persist()?;
        Ok(updated)
    }
}

#[async_trait]
impl GoalStore for DiskStore {
    async fn get_goal(&self) -> Result<Option<f64>> {
        match self.settings.get(GOAL_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    async fn set_goal(&self, amount: f64) -> Result<()> {
        self.settings
            .insert(GOAL_KEY, serde_json::to_vec(&amount)?)?;
        debug!("Disk PUT goal {amount}");
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CreditCardInput, LoanInput, TransactionInput, TransactionKind};
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn card(bank: &str, cutoff_day: u32) -> CreditCard {
        CreditCardInput {
            bank: bank.to_string(),
            tier: "Gold".to_string(),
            credit_limit: 2500.0,
            cutoff_day,
            payment_day: 5,
            ..Default::default()
        }
        .into_card()
        .unwrap()
    }

    #[tokio::test]
    async fn test_disk_cards_insert_and_update() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        assert!(store.fetch_cards().await.unwrap().is_empty());

        let first = store.insert_or_update_card(card("Atlántida", 12)).await.unwrap();
        store.insert_or_update_card(card("Promerica", 20)).await.unwrap();
        store
            .insert_or_update_card(CreditCard {
                tier: "Black".to_string(),
                ..first
            })
            .await
            .unwrap();

        let cards = store.fetch_cards().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].bank, "Atlántida");
        assert_eq!(cards[0].tier, "Black");
        assert_eq!(cards[1].bank, "Promerica");
    }

    #[tokio::test]
    async fn test_disk_loans() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();
        let loan = LoanInput {
            name: "Personal Loan 1".to_string(),
            principal_amount: 1000.0,
            monthly_quota: 200.0,
            current_balance: None,
        }
        .into_loan()
        .unwrap();

        store.insert_loan(loan.clone()).await.unwrap();
        assert!(store.insert_loan(loan.clone()).await.is_err());

        let updated = store.update_loan_balance(loan.id, 600.0).await.unwrap();
        assert_eq!(updated.current_balance, 600.0);
        assert_eq!(updated.principal_amount, 1000.0);

        let loans = store.fetch_loans().await.unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].current_balance, 600.0);
        assert!(store.get_loan(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.update_loan_balance(Uuid::new_v4(), 0.0).await.is_err());

        assert!(store.update_loan_balance(loan.id, -1.0).await.is_err());
        assert!(store.update_loan_balance(loan.id, 1200.0).await.is_err());
        assert_eq!(store.fetch_loans().await.unwrap()[0].current_balance, 600.0);
    }

    #[tokio::test]
    async fn test_disk_transactions_newest_first() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();
        let now = Utc::now();

        for days_ago in [5, 1, 3] {
            let tx = TransactionInput {
                total_amount: Some(days_ago as f64),
                transaction_date: Some(now - Duration::days(days_ago)),
                ..TransactionInput::new(TransactionKind::Sale)
            }
            .into_transaction(now)
            .unwrap();
            store.insert_transaction(tx).await.unwrap();
        }

        let txs = store.fetch_transactions().await.unwrap();
        let amounts: Vec<f64> = txs.iter().map(|t| t.total_amount).collect();
        assert_eq!(amounts, vec![1.0, 3.0, 5.0]);
        assert_eq!(txs[0].kind, TransactionKind::Sale);
    }

    #[tokio::test]
    async fn test_disk_goal() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        assert_eq!(store.get_goal().await.unwrap(), None);
        store.set_goal(300.0).await.unwrap();
        store.set_goal(20000.0).await.unwrap();
        assert_eq!(store.get_goal().await.unwrap(), Some(20000.0));
    }
}
