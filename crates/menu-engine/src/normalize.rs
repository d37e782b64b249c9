//! Canonical form of user input.

/// Combining mark that turns a digit into a keycap emoji (`1️⃣`).
const KEYCAP: char = '\u{20E3}';

/// Variation selector that usually sits between the digit and the keycap.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Spelled-out numbers accepted as a menu choice (Portuguese and English).
const SPELLED_NUMBERS: &[(&str, u32)] = &[
    ("zero", 0),
    ("um", 1),
    ("dois", 2),
    ("tres", 3),
    ("três", 3),
    ("quatro", 4),
    ("cinco", 5),
    ("seis", 6),
    ("sete", 7),
    ("oito", 8),
    ("nove", 9),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
];

/// User text prepared for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedInput {
    /// Trimmed, lowercased text.
    pub text: String,
    /// Digit choice encoded by the text, if any.
    pub number: Option<u32>,
}

impl NormalizedInput {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Normalize raw user text.
///
/// The number is taken from, in order: the first keycap emoji, a whole-text
/// spelled number, or a leading run of ASCII digits.
pub fn normalize(raw: &str) -> NormalizedInput {
    let text = raw.trim().to_lowercase();
    let number = keycap_digit(&text)
        .or_else(|| spelled_number(&text))
        .or_else(|| leading_digits(&text));

    NormalizedInput { text, number }
}

fn keycap_digit(text: &str) -> Option<u32> {
    let chars: Vec<char> = text.chars().collect();
    chars.iter().enumerate().find_map(|(i, c)| {
        let digit = c.to_digit(10)?;
        match (chars.get(i + 1), chars.get(i + 2)) {
            (Some(&KEYCAP), _) => Some(digit),
            (Some(&VARIATION_SELECTOR), Some(&KEYCAP)) => Some(digit),
            _ => None,
        }
    })
}

fn spelled_number(text: &str) -> Option<u32> {
    SPELLED_NUMBERS
        .iter()
        .find(|(word, _)| *word == text)
        .map(|(_, n)| *n)
}

fn leading_digits(text: &str) -> Option<u32> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
