use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{AccountError, AccountId},
    command::{CommandError, TransferCommand, TransferRequest},
};

pub mod locking_engine;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Unknown source account `{id}`")]
    UnknownSourceAccount { id: AccountId },
    #[error("Unknown destination account `{id}`")]
    UnknownDestinationAccount { id: AccountId },
    #[error("Unknown emission account `{id}`")]
    UnknownEmissionAccount { id: AccountId },
    #[error("Unknown destruction account `{id}`")]
    UnknownDestructionAccount { id: AccountId },
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

/// Money movement between ledger accounts.
///
/// A failed operation never leaves a partial balance change behind.
pub trait TransferEngine {
    fn execute(&self, command: TransferCommand) -> Result<(), TransferError>;

    fn transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        self.execute(TransferCommand::transfer(source, destination, amount)?)
    }

    /// Issues new money: credits `amount` to the emission account without a
    /// matching debit.
    fn transfer_to_emission(
        &self,
        emission_account: &str,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        self.execute(TransferCommand::emission(emission_account, amount)?)
    }

    /// Retires money by moving it into the destruction account. The funds
    /// stay in the ledger's total.
    fn transfer_to_destruction(
        &self,
        source: &str,
        destruction_account: &str,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        self.execute(TransferCommand::destruction(
            source,
            destruction_account,
            amount,
        )?)
    }

    /// Decodes a JSON [`TransferRequest`] and applies it as a generic
    /// transfer. Decoding fails before any account is looked up.
    fn transfer_request(&self, request: &[u8]) -> Result<(), TransferError> {
        let request = TransferRequest::decode(request)?;
        self.execute(TransferCommand::try_from(request)?)
    }
}
