use serde::Deserialize;
use snafu::Snafu;

/// External markup validator interface.
///
/// Returns every message the validator produced; filtering to errors is the
/// check's business.
pub trait MarkupValidator {
    async fn validate(&self, html: &str) -> Result<Vec<MarkupMessage>, MarkupError>;
}

/// One validator finding, in the Nu Html Checker message shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkupMessage {
    /// Message class: `error`, `info`, `non-document-error`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "lastLine", default)]
    pub last_line: u64,
    pub message: String,
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MarkupError {
    #[snafu(display("Failed to spawn the markup validator '{command}'"))]
    SpawnError {
        command: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed talking to the markup validator"))]
    IoError { source: std::io::Error },
    #[snafu(display("Failed to wait for the markup validator"))]
    WaitError { source: std::io::Error },
    #[snafu(display("Markup validator produced unparsable output"))]
    ParseError { source: serde_json::Error },
}
