//! Campaign Code Settings

/// Character set family used when generating codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "code_format", rename_all = "snake_case")]
pub enum CodeFormat {
    /// Digits `0-9`.
    Numeric,
    /// Uppercase letters, minus the ambiguous `O`, `I` and `L`.
    Alphabetic,
    /// Letters and digits, minus the ambiguous `0`, `O`, `1`, `I` and `L`.
    Alphanumeric,
    /// A campaign-supplied alphabet.
    Custom,
}

/// Shape of the codes minted for a campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSettings {
    /// Alphabet family for the random portion.
    pub format: CodeFormat,

    /// Alphabet for [`CodeFormat::Custom`]; ignored otherwise.
    pub custom_alphabet: Option<String>,

    /// Fixed text prepended to every code.
    pub prefix: Option<String>,

    /// Fixed text appended to every code.
    pub suffix: Option<String>,

    /// Length of the random portion, excluding prefix and suffix.
    pub length: u8,
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            format: CodeFormat::Alphanumeric,
            custom_alphabet: None,
            prefix: None,
            suffix: None,
            length: 8,
        }
    }
}
