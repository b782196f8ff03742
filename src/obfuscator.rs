//! Keyword obfuscation.
//!
//! Turns a memorable keyword into a harder-to-guess candidate by swapping
//! letters for look-alike characters and appending random padding. The
//! output is randomized and not reversible.

use rand::seq::SliceRandom;
use rand::Rng;

const PADDING_SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '&', '*', '?'];

/// Look-alike substitutions, most recognizable first.
fn substitutions(c: char) -> &'static [&'static str] {
    match c {
        'a' => &["4", "@", "A"],
        'b' => &["8", "B"],
        'c' => &["(", "<", "C"],
        'd' => &["D"],
        'e' => &["3", "E"],
        'g' => &["9", "6", "G"],
        'h' => &["#", "H"],
        'i' => &["1", "!", "I"],
        'l' => &["1", "|", "L"],
        'o' => &["0", "O"],
        's' => &["5", "$", "S"],
        't' => &["7", "+", "T"],
        'x' => &["%", "X"],
        'z' => &["2", "Z"],
        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObfuscationRequest {
    pub keyword: String,
    pub allow_digits: bool,
    pub allow_symbols: bool,
    pub allow_uppercase: bool,
}

impl ObfuscationRequest {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            allow_digits: true,
            allow_symbols: true,
            allow_uppercase: true,
        }
    }

    fn permits(&self, candidate: &str) -> bool {
        candidate.chars().all(|c| {
            if c.is_ascii_digit() {
                self.allow_digits
            } else if !c.is_alphanumeric() {
                self.allow_symbols
            } else if c.is_uppercase() {
                self.allow_uppercase
            } else {
                true
            }
        })
    }
}

/// Obfuscates `request.keyword` using the supplied random source.
///
/// Disallowed classes never appear in the output, even when the keyword
/// itself contains them: such characters are dropped.
pub fn obfuscate<R: Rng + ?Sized>(request: &ObfuscationRequest, rng: &mut R) -> String {
    if request.keyword.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(request.keyword.len() + 8);

    for c in request.keyword.chars().flat_map(char::to_lowercase) {
        let candidates: Vec<&str> = substitutions(c)
            .iter()
            .copied()
            .filter(|candidate| request.permits(candidate))
            .collect();

        match candidates.choose(rng) {
            Some(pick) => out.push_str(pick),
            None => {
                let mut buf = [0u8; 4];
                let original = c.encode_utf8(&mut buf);
                if request.permits(original) {
                    out.push(c);
                }
            }
        }
    }

    let padding = rng.gen_range(1..=4);
    for _ in 0..padding {
        if request.allow_digits {
            out.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        if request.allow_symbols && rng.gen_bool(0.5) {
            if let Some(symbol) = PADDING_SYMBOLS.choose(rng) {
                out.push(*symbol);
            }
        }
    }

    out
}

/// Convenience wrapper over [`obfuscate`] using the thread-local RNG.
pub fn obfuscate_keyword(
    keyword: &str,
    allow_digits: bool,
    allow_symbols: bool,
    allow_uppercase: bool,
) -> String {
    let request = ObfuscationRequest {
        keyword: keyword.to_string(),
        allow_digits,
        allow_symbols,
        allow_uppercase,
    };
    obfuscate(&request, &mut rand::thread_rng())
}
