use rand::Rng;
use thiserror::Error;

use crate::account::AccountId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifiers cannot be generated for country `{country_code}`")]
    UnsupportedCountry { country_code: String },
    #[error("No unique identifier found after {attempts} attempts")]
    Exhausted { attempts: usize },
}

/// Produces account identifiers for a country code.
///
/// Implementations don't need to guarantee uniqueness, the registry rejects
/// duplicates and asks again.
pub trait IdentifierGenerator: Send + Sync {
    fn generate(&self, country_code: &str) -> Result<AccountId, IdentifierError>;
}

#[derive(Debug, Clone, Copy)]
enum CharClass {
    Digit,
    Letter,
    Alphanumeric,
}

/// BBAN layouts from the IBAN registry, as (class, length) runs.
const BBAN_FORMATS: &[(&str, &[(CharClass, usize)])] = &[
    (
        "BY",
        &[
            (CharClass::Alphanumeric, 4),
            (CharClass::Digit, 4),
            (CharClass::Alphanumeric, 16),
        ],
    ),
    ("DE", &[(CharClass::Digit, 8), (CharClass::Digit, 10)]),
    (
        "GB",
        &[
            (CharClass::Letter, 4),
            (CharClass::Digit, 6),
            (CharClass::Digit, 8),
        ],
    ),
    (
        "FR",
        &[
            (CharClass::Digit, 5),
            (CharClass::Digit, 5),
            (CharClass::Alphanumeric, 11),
            (CharClass::Digit, 2),
        ],
    ),
    ("PL", &[(CharClass::Digit, 8), (CharClass::Digit, 16)]),
];

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn bban_format(country_code: &str) -> Option<&'static [(CharClass, usize)]> {
    BBAN_FORMATS
        .iter()
        .find(|(code, _)| *code == country_code)
        .map(|(_, format)| *format)
}

/// Random IBANs with valid ISO 7064 mod-97 check digits.
#[derive(Debug, Default, Clone, Copy)]
pub struct IbanGenerator;

impl IdentifierGenerator for IbanGenerator {
    fn generate(&self, country_code: &str) -> Result<AccountId, IdentifierError> {
        let format = bban_format(country_code).ok_or_else(|| IdentifierError::UnsupportedCountry {
            country_code: country_code.to_string(),
        })?;

        let mut rng = rand::thread_rng();
        let mut bban = String::new();
        for (class, len) in format {
            let alphabet = match class {
                CharClass::Digit => DIGITS,
                CharClass::Letter => LETTERS,
                CharClass::Alphanumeric => ALPHANUMERIC,
            };
            for _ in 0..*len {
                bban.push(alphabet[rng.gen_range(0..alphabet.len())] as char);
            }
        }

        let remainder = mod97(bban.chars().chain(country_code.chars()).chain("00".chars()));
        Ok(format!("{country_code}{:02}{bban}", 98 - remainder))
    }
}

/// Checks country format length and the mod-97 checksum.
pub fn is_valid_iban(iban: &str) -> bool {
    if iban.len() < 4 || !iban.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return false;
    }
    let (head, bban) = iban.split_at(4);
    let Some(format) = bban_format(&head[..2]) else {
        return false;
    };
    if bban.len() != format.iter().map(|(_, len)| len).sum::<usize>() {
        return false;
    }
    mod97(bban.chars().chain(head.chars())) == 1
}

fn mod97(chars: impl Iterator<Item = char>) -> u32 {
    chars.fold(0, |rem, c| match c.to_digit(36) {
        Some(d) if d < 10 => (rem * 10 + d) % 97,
        Some(d) => (rem * 100 + d) % 97,
        None => rem,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_valid_ibans() {
        let generator = IbanGenerator;
        for (country, _) in BBAN_FORMATS {
            for _ in 0..20 {
                let iban = generator.generate(country).unwrap();
                assert!(iban.starts_with(country));
                assert!(is_valid_iban(&iban), "{iban} should be valid");
            }
        }
        assert_eq!(generator.generate("BY").unwrap().len(), 28);
        assert_eq!(generator.generate("DE").unwrap().len(), 22);
    }

    #[test]
    fn unsupported_country() {
        let err = IbanGenerator.generate("XX").unwrap_err();
        assert_eq!(
            err,
            IdentifierError::UnsupportedCountry {
                country_code: "XX".to_string()
            }
        );
    }

    #[test]
    fn validates_known_ibans() {
        // published examples
        assert!(is_valid_iban("GB82WEST12345698765432"));
        assert!(is_valid_iban("DE89370400440532013000"));
        assert!(is_valid_iban("BY13NBRB3600900000002Z00AB00"));

        assert!(!is_valid_iban("GB82WEST12345698765431"));
        assert!(!is_valid_iban("DE8937040044053201300"));
        assert!(!is_valid_iban("gb82west12345698765432"));
        assert!(!is_valid_iban("XX"));
    }
}
