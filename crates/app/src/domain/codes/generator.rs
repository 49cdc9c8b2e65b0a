//! Random code drawing.
//!
//! Pure string work only; uniqueness is the storage constraint's job. The
//! alphabetic and alphanumeric sets drop the visually ambiguous `0`, `O`,
//! `1`, `I` and `L`.

use rand::{Rng, seq::SliceRandom};

use crate::domain::campaigns::data::codes::{CodeFormat, CodeSettings};

const NUMERIC_CHARS: &str = "0123456789";
const ALPHABETIC_CHARS: &str = "ABCDEFGHJKMNPQRSTUVWXYZ";
const ALPHANUMERIC_CHARS: &str = "ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// The character set codes are drawn from, or `None` when a custom format
/// carries no usable alphabet.
pub(crate) fn alphabet_for(settings: &CodeSettings) -> Option<&str> {
    match settings.format {
        CodeFormat::Numeric => Some(NUMERIC_CHARS),
        CodeFormat::Alphabetic => Some(ALPHABETIC_CHARS),
        CodeFormat::Alphanumeric => Some(ALPHANUMERIC_CHARS),
        CodeFormat::Custom => settings
            .custom_alphabet
            .as_deref()
            .filter(|alphabet| !alphabet.is_empty()),
    }
}

/// Draws one code: random body at `settings.length`, prefix and suffix
/// applied, uppercased.
pub(crate) fn draw_code(settings: &CodeSettings, alphabet: &str) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    let mut rng = rand::thread_rng();

    assemble(settings, &chars, &mut rng)
}

/// Draws `count` codes in one go so the RNG never lives across an await.
pub(crate) fn draw_codes(settings: &CodeSettings, alphabet: &str, count: u64) -> Vec<String> {
    let chars: Vec<char> = alphabet.chars().collect();
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|_| assemble(settings, &chars, &mut rng))
        .collect()
}

/// Canonical form for caller-supplied and entered codes.
pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn assemble<R: Rng>(settings: &CodeSettings, chars: &[char], rng: &mut R) -> String {
    let body: String = (0..settings.length)
        .filter_map(|_| chars.choose(rng))
        .collect();

    let mut code = String::new();

    if let Some(prefix) = &settings.prefix {
        code.push_str(prefix);
    }

    code.push_str(&body);

    if let Some(suffix) = &settings.suffix {
        code.push_str(suffix);
    }

    code.to_uppercase()
}
