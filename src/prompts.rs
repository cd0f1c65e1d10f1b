//! Instruction-prompt resolution.
//!
//! The prompt sent as the system message comes from exactly one of three
//! places, probed in order:
//!
//! 1. an explicit prompt file passed by the caller (read errors are fatal —
//!    the user named the file, so a missing file is a mistake worth
//!    surfacing);
//! 2. `prompt.txt` in the current working directory;
//! 3. the empty string.
//!
//! The fall-through from 2 to 3 is silent on purpose: running without a
//! prompt file is a supported mode, not a misconfiguration.

use crate::error::AnalyzeError;
use std::io::ErrorKind;
use std::path::Path;

/// File probed in the working directory when no explicit prompt is given.
pub const DEFAULT_PROMPT_FILE: &str = "prompt.txt";

/// Resolve the instruction prompt text.
///
/// See the module docs for the resolution order.
pub fn load_prompt(explicit: Option<&Path>) -> Result<String, AnalyzeError> {
    load_prompt_from(explicit, Path::new(DEFAULT_PROMPT_FILE))
}

fn load_prompt_from(explicit: Option<&Path>, default: &Path) -> Result<String, AnalyzeError> {
    match explicit {
        Some(path) => std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AnalyzeError::FileNotFound {
                path: path.to_path_buf(),
            },
            ErrorKind::PermissionDenied => AnalyzeError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => AnalyzeError::Internal(format!("failed to read prompt file: {e}")),
        }),
        None => Ok(std::fs::read_to_string(default).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_prompt_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-prompt.txt");
        std::fs::write(&path, "You are a forensic reviewer.\n").unwrap();

        let prompt = load_prompt(Some(&path)).unwrap();
        assert_eq!(prompt, "You are a forensic reviewer.\n");
    }

    #[test]
    fn explicit_prompt_missing_is_fatal() {
        let err = load_prompt(Some(&PathBuf::from("/no/such/prompt.txt"))).unwrap_err();
        assert!(matches!(err, AnalyzeError::FileNotFound { .. }));
    }

    #[test]
    fn default_prompt_is_probed() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("prompt.txt");
        std::fs::write(&default, "default instructions").unwrap();

        let prompt = load_prompt_from(None, &default).unwrap();
        assert_eq!(prompt, "default instructions");
    }

    #[test]
    fn missing_default_prompt_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("prompt.txt");

        let prompt = load_prompt_from(None, &default).unwrap();
        assert_eq!(prompt, "");
    }
}
