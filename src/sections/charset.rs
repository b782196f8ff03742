//! Charset section - detects which character classes a password draws from.

use secrecy::{ExposeSecret, SecretString};

pub const LOWERCASE_SIZE: u32 = 26;
pub const UPPERCASE_SIZE: u32 = 26;
pub const DIGIT_SIZE: u32 = 10;
/// Nominal symbol alphabet, independent of how many symbols are present.
pub const SYMBOL_SIZE: u32 = 32;

/// Character classes present in a password, plus its length in chars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharsetProfile {
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub length: usize,
}

impl CharsetProfile {
    /// Sum of the sizes of the classes present; 0 for an empty password.
    pub fn size(&self) -> u32 {
        [
            (self.lowercase, LOWERCASE_SIZE),
            (self.uppercase, UPPERCASE_SIZE),
            (self.digits, DIGIT_SIZE),
            (self.symbols, SYMBOL_SIZE),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, size)| size)
        .sum()
    }
}

/// Scans the password once and records the classes it uses.
///
/// Anything that is not an ASCII letter or digit counts as a symbol.
pub fn detect_charset(password: &SecretString) -> CharsetProfile {
    let mut profile = CharsetProfile::default();
    for c in password.expose_secret().chars() {
        profile.length += 1;
        if c.is_ascii_lowercase() {
            profile.lowercase = true;
        } else if c.is_ascii_uppercase() {
            profile.uppercase = true;
        } else if c.is_ascii_digit() {
            profile.digits = true;
        } else {
            profile.symbols = true;
        }
    }
    profile
}
