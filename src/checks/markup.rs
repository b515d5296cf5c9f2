use crate::drivers::{MarkupError, MarkupValidator};
use crate::report::CheckError;

/// Validates the page markup against the external standard.
///
/// Only messages of type `error` become results; infos and warnings are the
/// reporting layer's business, not grading material.
pub async fn check_markup<M: MarkupValidator>(
    validator: &M,
    html: &str,
) -> Result<Vec<CheckError>, MarkupError> {
    let messages = validator.validate(html).await?;
    Ok(messages
        .into_iter()
        .filter(|message| message.kind == "error")
        .map(|message| CheckError::Markup {
            line: message.last_line,
            message: message.message,
        })
        .collect())
}
