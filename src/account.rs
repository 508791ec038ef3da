use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type AccountId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Emission,
    Destruction,
    Individual,
    LegalEntity,
}

impl AccountKind {
    /// Stable label, used for display and serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Emission => "emission",
            AccountKind::Destruction => "destruction",
            AccountKind::Individual => "individual",
            AccountKind::LegalEntity => "legal_entity",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub first_name: String,
    pub last_name: String,
}

impl Owner {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Credited,
    Debited,
}

#[derive(Debug)]
pub struct AccountEvent {
    amount: Decimal,
    kind: AccountEventKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account `{id}` is blocked, no funds can be moved through it")]
    AccountBlocked { id: AccountId },
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Balance of account `{id}` would overflow")]
    BalanceOverflow { id: AccountId },
}

/// A single ledger entry.
///
/// Only `balance` and `status` change after creation, and only through the
/// registry and the transfer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    balance: Decimal,
    currency: String,
    status: AccountStatus,
    kind: AccountKind,
    owner: Owner,
}

impl Account {
    pub fn new(
        id: AccountId,
        owner: Owner,
        balance: Decimal,
        currency: impl Into<String>,
        kind: AccountKind,
        status: AccountStatus,
    ) -> Self {
        Self {
            id,
            balance,
            currency: currency.into(),
            status,
            kind,
            owner,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub(crate) fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Credited => {
                self.balance += event.amount;
            }
            AccountEventKind::Debited => {
                self.balance -= event.amount;
            }
        }
    }

    pub fn handle_debit(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        self.ensure_active()?;
        if self.balance >= amount {
            Ok(AccountEvent {
                amount,
                kind: AccountEventKind::Debited,
            })
        } else {
            Err(AccountError::InsufficientFunds)
        }
    }

    /// Credits are only capped by what a [`Decimal`] can hold, emission
    /// accounts rely on that.
    pub fn handle_credit(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        self.ensure_active()?;
        if self.balance.checked_add(amount).is_none() {
            return Err(AccountError::BalanceOverflow {
                id: self.id.clone(),
            });
        }
        Ok(AccountEvent {
            amount,
            kind: AccountEventKind::Credited,
        })
    }

    fn ensure_active(&self) -> Result<(), AccountError> {
        match self.status {
            AccountStatus::Active => Ok(()),
            AccountStatus::Blocked => Err(AccountError::AccountBlocked {
                id: self.id.clone(),
            }),
        }
    }
}
