//! macOS user notifications via osascript.
//!
//! Fire-and-forget: a notification that fails to display is a warning,
//! never an error for the caller.

use std::process::Command;

/// Show a notification with the given title and message.
pub fn notify(title: &str, message: &str) {
    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        escape(message),
        escape(title)
    );

    match Command::new("osascript").arg("-e").arg(&script).status() {
        Ok(status) if !status.success() => {
            log::warn!("osascript exited with {} for notification", status);
        }
        Ok(_) => {}
        Err(e) => log::warn!("Failed to run osascript: {}", e),
    }
}

/// Escape a string for embedding in an AppleScript string literal.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quotes_and_backslashes() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape("back\\slash"), "back\\\\slash");
    }
}
