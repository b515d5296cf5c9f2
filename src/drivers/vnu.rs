use std::process::Stdio;

use compio::io::compat::AsyncStream;
use futures::{AsyncReadExt, AsyncWriteExt};
use serde::Deserialize;
use snafu::ResultExt;
use tracing::debug;

use crate::drivers::markup::{
    IoSnafu, MarkupError, MarkupMessage, MarkupValidator, ParseSnafu, SpawnSnafu, WaitSnafu,
};
use crate::drivers::shell_command;

/// Markup validator driving the Nu Html Checker CLI.
///
/// The document is piped to stdin; messages come back as one JSON object.
/// The checker reports on stderr, so both streams are captured and whichever
/// carries the report is parsed.
pub struct VnuValidator {
    command: String,
}

impl VnuValidator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for VnuValidator {
    fn default() -> Self {
        Self::new("vnu")
    }
}

#[derive(Debug, Deserialize)]
struct VnuReport {
    #[serde(default)]
    messages: Vec<MarkupMessage>,
}

impl MarkupValidator for VnuValidator {
    async fn validate(&self, html: &str) -> Result<Vec<MarkupMessage>, MarkupError> {
        let command_line = format!("{} --format json --exit-zero-always -", self.command);
        debug!("Running markup validator: {}", command_line);

        let mut cmd = shell_command(&command_line);
        let _ = cmd.stdin(Stdio::piped());
        let mut handle = cmd.spawn().context(SpawnSnafu {
            command: self.command.clone(),
        })?;

        if let Some(stdin) = handle.stdin.take() {
            let mut stream = AsyncStream::new(stdin);
            stream.write_all(html.as_bytes()).await.context(IoSnafu)?;
            stream.close().await.context(IoSnafu)?;
        }

        let mut stdout_text = String::new();
        let mut stderr_text = String::new();
        let stdout = handle.stdout.take();
        let stderr = handle.stderr.take();
        let stdout_read = async {
            match stdout {
                Some(stdout) => AsyncStream::new(stdout)
                    .read_to_string(&mut stdout_text)
                    .await
                    .map(|_| ()),
                None => Ok(()),
            }
        };
        let stderr_read = async {
            match stderr {
                Some(stderr) => AsyncStream::new(stderr)
                    .read_to_string(&mut stderr_text)
                    .await
                    .map(|_| ()),
                None => Ok(()),
            }
        };
        let (stdout_res, stderr_res) = futures::join!(stdout_read, stderr_read);
        stdout_res.context(IoSnafu)?;
        stderr_res.context(IoSnafu)?;

        handle.wait().await.context(WaitSnafu)?;

        let report = if stderr_text.trim_start().starts_with('{') {
            &stderr_text
        } else {
            &stdout_text
        };
        let report: VnuReport = serde_json::from_str(report).context(ParseSnafu)?;
        debug!("Markup validator produced {} messages", report.messages.len());
        Ok(report.messages)
    }
}
