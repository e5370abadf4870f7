//! Append-only pass trace.
//!
//! Every decision pass writes a timestamped header and one line per gate
//! to a human-readable log file next to the config. Writes are
//! best-effort: a failing trace must never abort a pass, so IO errors
//! are downgraded to warnings.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Handle to the trace file. The file is opened in append mode per write;
/// nothing is held open across the (short) process lifetime.
pub struct PassLog {
    path: PathBuf,
}

impl PassLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one line. Failures are logged and swallowed.
    pub fn append(&self, message: &str) {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{}", message));

        if let Err(e) = result {
            log::warn!("Failed to append to trace log {:?}: {}", self.path, e);
        }
    }

    /// Write the header that separates one pass from the next.
    pub fn begin_pass(&self) {
        let now = chrono::Local::now();
        self.append(&format!(
            "------------- {} -------------",
            now.format("%m-%d %H:%M:%S")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_accumulates_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = PassLog::new(dir.path().join("trace.log"));

        log.append("first");
        log.append("second");

        let contents = std::fs::read_to_string(dir.path().join("trace.log")).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_begin_pass_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = PassLog::new(dir.path().join("trace.log"));

        log.begin_pass();

        let contents = std::fs::read_to_string(dir.path().join("trace.log")).unwrap();
        assert!(contents.starts_with("------------- "));
        assert!(contents.trim_end().ends_with(" -------------"));
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let log = PassLog::new(PathBuf::from("/no/such/dir/trace.log"));
        log.append("dropped");
    }
}
