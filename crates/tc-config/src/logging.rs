use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Supported diagnostic output formats.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable single line output.
    #[default]
    Compact,
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
