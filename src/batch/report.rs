use std::io::Write;

use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::{Account, AccountKind, AccountStatus};

/// Flat view of an account, owner fields inlined for CSV.
#[derive(Debug, Serialize)]
pub struct AccountRecord<'a> {
    pub id: &'a str,
    pub balance: Decimal,
    pub currency: &'a str,
    pub status: AccountStatus,
    pub kind: AccountKind,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

impl<'a> From<&'a Account> for AccountRecord<'a> {
    fn from(acc: &'a Account) -> Self {
        Self {
            id: acc.id(),
            balance: acc.balance(),
            currency: acc.currency(),
            status: acc.status(),
            kind: acc.kind(),
            first_name: &acc.owner().first_name,
            last_name: &acc.owner().last_name,
        }
    }
}

pub fn print_accounts<'a, W>(
    output: &mut W,
    accounts: impl Iterator<Item = &'a Account>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        if let Err(err) = writer.serialize(AccountRecord::from(acc)) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
