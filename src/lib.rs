/// Account state and the checks guarding every balance change.
/// Balances are modified using events, which are created by handling debits and credits
pub mod account;

/// Identifier generation contract, plus an IBAN based implementation.
pub mod identifier;

/// Registry defaults: country code for identifiers, currency, retry limits.
pub mod config;

/// Authoritative collection of accounts, owns every [`account::Account`].
pub mod registry;

/// Validated transfer commands that later are executed by [`engine`],
/// and decoding of serialized transfer requests.
pub mod command;

/// Transfer engine interface, plus the locking implementation on top of [`registry`].
///
/// NOTE: the trait exists mostly so the batch adapter and tests don't depend
/// on a specific locking strategy.
pub mod engine;

/// Thin adapter that applies a stream of JSON transfer requests and prints
/// the resulting accounts. Used by integration tests as well.
pub mod batch;
