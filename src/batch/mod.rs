//! Bootstraps the ledger core for batch use: requests come in as JSON lines,
//! the account list goes out as CSV.

use std::io::{Read, Write};

use crate::{
    engine::{TransferEngine, TransferError},
    registry::AccountRegistry,
};
use anyhow::{Context, Result};
use report::print_accounts;
use request_reader::RequestReader;

pub mod report;
pub mod request_reader;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub error_printer: Box<dyn FnMut(u64, TransferError)>,
}

/// Counts of applied and rejected requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub applied: usize,
    pub rejected: usize,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(
        mut self,
        registry: &AccountRegistry,
        engine: &impl TransferEngine,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for row in RequestReader::new(self.input) {
            let (line, request) = row.context("Failed to read transfer request")?;
            match engine.transfer_request(request.as_bytes()) {
                Ok(()) => summary.applied += 1,
                Err(err) => {
                    summary.rejected += 1;
                    (self.error_printer)(line, err);
                }
            }
        }

        print_accounts(self.output, registry.accounts().iter())?;
        Ok(summary)
    }
}
