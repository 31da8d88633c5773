//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and calls into the
//! stepwise-core domain logic. Commands return `Result<(), String>`; the
//! binary prints the error and exits non-zero.

pub mod assess;
pub mod gate;
pub mod workflow;

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

/// Output rendering for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON envelope on stdout
    Json,
}

/// Wrap a command result in the JSON envelope used for `--format json`.
pub fn json_envelope<T: Serialize>(command: &str, result: &T) -> String {
    let value = serde_json::json!({
        "generatedAt": Utc::now(),
        "command": command,
        "result": result,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

/// Resolve `file` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/workflows");
        assert_eq!(resolve_path(base, "greenfield.yaml"), PathBuf::from("/workflows/greenfield.yaml"));
        assert_eq!(resolve_path(base, "/tmp/wf.yaml"), PathBuf::from("/tmp/wf.yaml"));
    }

    #[test]
    fn test_json_envelope_shape() {
        let out = json_envelope("assess", &serde_json::json!({ "total": 8 }));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["command"], "assess");
        assert_eq!(value["result"]["total"], 8);
        assert!(value["generatedAt"].is_string());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("analyst", 16), "analyst");
        assert_eq!(truncate("create-next-story-draft", 10), "create-ne…");
    }
}
