//! Campaign Code Settings Bodies

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use tessera_app::domain::campaigns::data::codes::{CodeFormat, CodeSettings};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CodeFormatBody {
    Numeric,
    Alphabetic,
    #[default]
    Alphanumeric,
    Custom,
}

impl From<CodeFormatBody> for CodeFormat {
    fn from(body: CodeFormatBody) -> Self {
        match body {
            CodeFormatBody::Numeric => CodeFormat::Numeric,
            CodeFormatBody::Alphabetic => CodeFormat::Alphabetic,
            CodeFormatBody::Alphanumeric => CodeFormat::Alphanumeric,
            CodeFormatBody::Custom => CodeFormat::Custom,
        }
    }
}

impl From<CodeFormat> for CodeFormatBody {
    fn from(format: CodeFormat) -> Self {
        match format {
            CodeFormat::Numeric => CodeFormatBody::Numeric,
            CodeFormat::Alphabetic => CodeFormatBody::Alphabetic,
            CodeFormat::Alphanumeric => CodeFormatBody::Alphanumeric,
            CodeFormat::Custom => CodeFormatBody::Custom,
        }
    }
}

/// Shape of the codes minted for a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct CodeSettingsBody {
    #[serde(default)]
    pub format: CodeFormatBody,

    /// Alphabet for the `custom` format; ignored otherwise.
    pub custom_alphabet: Option<String>,

    pub prefix: Option<String>,

    pub suffix: Option<String>,

    /// Length of the random portion, excluding prefix and suffix.
    #[serde(default = "default_code_length")]
    pub length: u8,
}

fn default_code_length() -> u8 {
    8
}

impl Default for CodeSettingsBody {
    fn default() -> Self {
        Self {
            format: CodeFormatBody::default(),
            custom_alphabet: None,
            prefix: None,
            suffix: None,
            length: default_code_length(),
        }
    }
}

impl From<CodeSettingsBody> for CodeSettings {
    fn from(body: CodeSettingsBody) -> Self {
        CodeSettings {
            format: body.format.into(),
            custom_alphabet: body.custom_alphabet,
            prefix: body.prefix,
            suffix: body.suffix,
            length: body.length,
        }
    }
}

impl From<CodeSettings> for CodeSettingsBody {
    fn from(settings: CodeSettings) -> Self {
        CodeSettingsBody {
            format: settings.format.into(),
            custom_alphabet: settings.custom_alphabet,
            prefix: settings.prefix,
            suffix: settings.suffix,
            length: settings.length,
        }
    }
}
