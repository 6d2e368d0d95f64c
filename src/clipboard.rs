//! System clipboard writes.
//!
//! macOS goes through `pbcopy`; everywhere else (and as the macOS fallback)
//! the text is sent to the terminal as an OSC 52 sequence, which also works
//! over SSH.

use std::io::{Write, stdout};

use base64::Engine;

/// How a prompt is placed on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyMode {
    /// JSON string escaping, quotes stripped.
    JsonSafe,
    /// The raw prompt text.
    Formatted,
}

impl CopyMode {
    /// Clipboard payload for `text` in this mode.
    pub fn payload(self, text: &str) -> String {
        match self {
            Self::JsonSafe => crate::export::json_safe(text),
            Self::Formatted => text.to_string(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::JsonSafe => "Copy JSON",
            Self::Formatted => "Copy Formatted",
        }
    }
}

/// Place `text` on the system clipboard.
///
/// # Errors
///
/// Returns an error if neither `pbcopy` nor the terminal accepted the text.
pub fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence_encodes_text() {
        let seq = osc52_sequence("hi");
        assert_eq!(seq, "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_json_safe_payload_escapes_newlines() {
        assert_eq!(CopyMode::JsonSafe.payload("a\nb"), "a\\nb");
    }

    #[test]
    fn test_formatted_payload_is_raw() {
        assert_eq!(CopyMode::Formatted.payload("a\nb"), "a\nb");
    }
}
