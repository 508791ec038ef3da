/// Registry defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Country passed to the identifier generator.
    pub country_code: String,
    /// Currency of accounts opened through [`crate::registry::AccountRegistry::open_individual`].
    pub currency: String,
    /// How many times a colliding identifier is re-drawn before giving up.
    pub max_identifier_attempts: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            country_code: "BY".to_string(),
            currency: "BYN".to_string(),
            max_identifier_attempts: 8,
        }
    }
}
