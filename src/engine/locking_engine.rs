use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    account::AccountKind,
    command::{TransferAction, TransferCommand},
    registry::{AccountRegistry, LedgerEntry},
};

use super::{TransferEngine, TransferError};

/// Transfers guarded by per-account locks.
///
/// Both endpoints are locked in identifier order for the whole
/// check-debit-credit sequence, so transfers touching different accounts
/// run in parallel and no pair of transfers can deadlock.
#[derive(Clone, Copy)]
pub struct LockingTransferEngine<'r> {
    registry: &'r AccountRegistry,
}

impl<'r> LockingTransferEngine<'r> {
    pub fn new(registry: &'r AccountRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r AccountRegistry {
        self.registry
    }

    fn resolve_destination(
        &self,
        action: TransferAction,
        id: &str,
    ) -> Result<Arc<LedgerEntry>, TransferError> {
        let required_kind = match action {
            TransferAction::Transfer => None,
            TransferAction::Emission => Some(AccountKind::Emission),
            TransferAction::Destruction => Some(AccountKind::Destruction),
        };
        self.registry
            .entry(id)
            .filter(|entry| required_kind.is_none_or(|kind| entry.kind() == kind))
            .ok_or_else(|| {
                let id = id.to_string();
                match action {
                    TransferAction::Transfer => TransferError::UnknownDestinationAccount { id },
                    TransferAction::Emission => TransferError::UnknownEmissionAccount { id },
                    TransferAction::Destruction => TransferError::UnknownDestructionAccount { id },
                }
            })
    }

    fn credit(destination: &LedgerEntry, amount: Decimal) -> Result<(), TransferError> {
        let mut account = destination.lock();
        let evt = account.handle_credit(amount)?;
        account.apply(&evt);
        Ok(())
    }

    fn move_funds(
        source: &LedgerEntry,
        destination: &LedgerEntry,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        if source.id() == destination.id() {
            // same lock twice would deadlock, validate and leave the balance as is
            let account = source.lock();
            account.handle_debit(amount)?;
            account.handle_credit(amount)?;
            return Ok(());
        }

        let source_first = source.id() < destination.id();
        let (first, second) = if source_first {
            (source, destination)
        } else {
            (destination, source)
        };
        let mut first = first.lock();
        let mut second = second.lock();
        let (from, to) = if source_first {
            (&mut *first, &mut *second)
        } else {
            (&mut *second, &mut *first)
        };

        // both events are validated before either is applied
        let debit = from.handle_debit(amount)?;
        let credit = to.handle_credit(amount)?;
        from.apply(&debit);
        to.apply(&credit);
        Ok(())
    }
}

impl TransferEngine for LockingTransferEngine<'_> {
    fn execute(&self, command: TransferCommand) -> Result<(), TransferError> {
        let TransferCommand {
            action,
            source,
            destination,
            amount,
        } = command;

        let result = match &source {
            Some(source_id) => self
                .registry
                .entry(source_id)
                .ok_or_else(|| TransferError::UnknownSourceAccount {
                    id: source_id.clone(),
                })
                .and_then(|source| {
                    let destination = self.resolve_destination(action, &destination)?;
                    Self::move_funds(&source, &destination, amount)
                }),
            None => self
                .resolve_destination(action, &destination)
                .and_then(|destination| Self::credit(&destination, amount)),
        };

        match &result {
            Ok(()) => {
                tracing::debug!(?action, ?source, destination = %destination, %amount, "transfer applied")
            }
            Err(err) => {
                tracing::warn!(?action, ?source, destination = %destination, %amount, %err, "transfer rejected")
            }
        }
        result
    }
}
