use std::{collections::BTreeMap, sync::Arc};

use parking_lot::{Mutex, MutexGuard, RwLock};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountId, AccountKind, AccountStatus, Owner},
    config::LedgerConfig,
    identifier::{IbanGenerator, IdentifierError, IdentifierGenerator},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Failed to generate account identifier: {0}")]
    IdentifierGeneration(#[from] IdentifierError),
    #[error("Account `{id}` does not exist")]
    UnknownAccount { id: AccountId },
    #[error("There is no {kind} account")]
    MissingSpecialAccount { kind: AccountKind },
    #[error("A {kind} account cannot start with negative balance {balance}")]
    NegativeBalance { kind: AccountKind, balance: Decimal },
}

/// Registry slot of one account. `id` and `kind` never change, so they are
/// readable without taking the account lock.
#[derive(Debug)]
pub(crate) struct LedgerEntry {
    id: AccountId,
    kind: AccountKind,
    seq: usize,
    account: Mutex<Account>,
}

impl LedgerEntry {
    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn kind(&self) -> AccountKind {
        self.kind
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Account> {
        self.account.lock()
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    // creation order
    entries: Vec<Arc<LedgerEntry>>,
    by_id: BTreeMap<AccountId, Arc<LedgerEntry>>,
}

/// Owns every account of the ledger.
///
/// Lock order: the registry lock is never requested while an account lock
/// is held, and several account locks are always taken in identifier order.
pub struct AccountRegistry {
    config: LedgerConfig,
    generator: Box<dyn IdentifierGenerator>,
    inner: RwLock<RegistryInner>,
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new(LedgerConfig::default(), IbanGenerator)
    }
}

impl AccountRegistry {
    pub fn new(config: LedgerConfig, generator: impl IdentifierGenerator + 'static) -> Self {
        Self {
            config,
            generator: Box::new(generator),
            inner: RwLock::default(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn create(
        &self,
        owner: Owner,
        initial_balance: Decimal,
        currency: &str,
        kind: AccountKind,
        status: AccountStatus,
    ) -> Result<Account, RegistryError> {
        // only emission accounts may go below zero
        if kind != AccountKind::Emission && initial_balance < Decimal::ZERO {
            return Err(RegistryError::NegativeBalance {
                kind,
                balance: initial_balance,
            });
        }

        // generated under the write lock, so the uniqueness check and the insert can't race
        let mut inner = self.inner.write();
        let id = self.unique_identifier(&inner)?;
        let account = Account::new(id.clone(), owner, initial_balance, currency, kind, status);
        let entry = Arc::new(LedgerEntry {
            id: id.clone(),
            kind,
            seq: inner.entries.len(),
            account: Mutex::new(account.clone()),
        });
        inner.entries.push(Arc::clone(&entry));
        inner.by_id.insert(id, entry);
        drop(inner);

        tracing::debug!(id = account.id(), %kind, balance = %initial_balance, "account created");
        Ok(account)
    }

    /// Opens an active individual account in the configured currency.
    pub fn open_individual(
        &self,
        owner: Owner,
        initial_balance: Decimal,
    ) -> Result<Account, RegistryError> {
        let currency = self.config.currency.clone();
        self.create(
            owner,
            initial_balance,
            &currency,
            AccountKind::Individual,
            AccountStatus::Active,
        )
    }

    fn unique_identifier(&self, inner: &RegistryInner) -> Result<AccountId, RegistryError> {
        let attempts = self.config.max_identifier_attempts;
        for _ in 0..attempts {
            let id = self.generator.generate(&self.config.country_code)?;
            if !inner.by_id.contains_key(&id) {
                return Ok(id);
            }
            tracing::debug!(id = %id, "generated identifier already taken");
        }
        Err(IdentifierError::Exhausted { attempts }.into())
    }

    pub fn find_by_identifier(&self, id: &str) -> Option<Account> {
        self.entry(id).map(|entry| entry.lock().clone())
    }

    /// First account of `kind` in creation order. Later accounts of the same
    /// kind are shadowed.
    pub fn find_first_by_kind(&self, kind: AccountKind) -> Option<Account> {
        let entry = self
            .inner
            .read()
            .entries
            .iter()
            .find(|entry| entry.kind() == kind)
            .cloned();
        entry.map(|entry| entry.lock().clone())
    }

    pub fn emission_account(&self) -> Result<Account, RegistryError> {
        self.special_account(AccountKind::Emission)
    }

    pub fn destruction_account(&self) -> Result<Account, RegistryError> {
        self.special_account(AccountKind::Destruction)
    }

    fn special_account(&self, kind: AccountKind) -> Result<Account, RegistryError> {
        self.find_first_by_kind(kind)
            .ok_or(RegistryError::MissingSpecialAccount { kind })
    }

    pub fn set_status(&self, id: &str, status: AccountStatus) -> Result<(), RegistryError> {
        let entry = self.entry(id).ok_or_else(|| RegistryError::UnknownAccount {
            id: id.to_string(),
        })?;
        entry.lock().set_status(status);
        tracing::debug!(id, %status, "account status changed");
        Ok(())
    }

    /// Consistent snapshot of every account, in creation order.
    pub fn accounts(&self) -> Vec<Account> {
        let inner = self.inner.read();
        // BTreeMap iteration gives identifier order, same as the transfer engine
        let mut locked: Vec<_> = inner
            .by_id
            .values()
            .map(|entry| (entry.seq, entry.lock()))
            .collect();
        locked.sort_by_key(|(seq, _)| *seq);
        locked.iter().map(|(_, account)| (**account).clone()).collect()
    }

    pub fn total_balance(&self) -> Decimal {
        self.accounts().iter().map(Account::balance).sum()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handle to an account, the registry lock is released on return.
    pub(crate) fn entry(&self, id: &str) -> Option<Arc<LedgerEntry>> {
        self.inner.read().by_id.get(id).cloned()
    }
}
