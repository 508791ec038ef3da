use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, Zero},
};
use serde::{Deserialize, Deserializer, de::Error as _};
use thiserror::Error;

use crate::account::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferAction {
    /// Between any two accounts.
    Transfer,
    /// Pure credit to an emission account.
    Emission,
    /// Transfer whose destination must be a destruction account.
    Destruction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    pub action: TransferAction,
    /// `None` for emission, money comes from outside the ledger.
    pub source: Option<AccountId>,
    pub destination: AccountId,
    pub amount: Decimal,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Amount must be positive for {action:?}, got {amount}")]
    InvalidAmount {
        action: TransferAction,
        amount: Decimal,
    },
    #[error("Malformed transfer request: {0}")]
    MalformedRequest(#[from] serde_json::Error),
}

impl TransferCommand {
    pub fn transfer(
        source: impl Into<AccountId>,
        destination: impl Into<AccountId>,
        amount: Decimal,
    ) -> Result<Self, CommandError> {
        Self::parse(
            TransferAction::Transfer,
            Some(source.into()),
            destination.into(),
            amount,
        )
    }

    pub fn emission(
        emission_account: impl Into<AccountId>,
        amount: Decimal,
    ) -> Result<Self, CommandError> {
        Self::parse(
            TransferAction::Emission,
            None,
            emission_account.into(),
            amount,
        )
    }

    pub fn destruction(
        source: impl Into<AccountId>,
        destruction_account: impl Into<AccountId>,
        amount: Decimal,
    ) -> Result<Self, CommandError> {
        Self::parse(
            TransferAction::Destruction,
            Some(source.into()),
            destruction_account.into(),
            amount,
        )
    }

    fn parse(
        action: TransferAction,
        source: Option<AccountId>,
        destination: AccountId,
        amount: Decimal,
    ) -> Result<Self, CommandError> {
        if amount > Decimal::zero() {
            Ok(Self {
                action,
                source,
                destination,
                amount,
            })
        } else {
            Err(CommandError::InvalidAmount { action, amount })
        }
    }
}

/// Serialized transfer request, e.g.
/// `{"ibanFrom": "BY...", "ibanTo": "BY...", "amount": 15.0}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub iban_from: AccountId,
    pub iban_to: AccountId,
    #[serde(deserialize_with = "json_number")]
    pub amount: Decimal,
}

/// Accepts JSON numbers only, `"15"` is not an amount.
fn json_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Decimal::from_f64(value)
        .ok_or_else(|| D::Error::custom(format!("amount {value} is out of range")))
}

impl TransferRequest {
    pub fn decode(bytes: &[u8]) -> Result<Self, CommandError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl TryFrom<TransferRequest> for TransferCommand {
    type Error = CommandError;

    fn try_from(request: TransferRequest) -> Result<Self, Self::Error> {
        Self::transfer(request.iban_from, request.iban_to, request.amount)
    }
}
