//! Remote command lines issued against the waiter file.
//!
//! The configured path is always single-quoted so that spaces, `;`, `$(...)`
//! and similar never reach the remote shell unescaped.

/// Quote a string for a POSIX shell.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Quote a remote path, keeping a leading `~/` meaningful.
///
/// A quoted `~` is not expanded by the shell, so it is rewritten to `"$HOME"`
/// and only the remainder is quoted.
pub fn quote_remote_path(path: &str) -> String {
    if path == "~" {
        return "\"$HOME\"".to_string();
    }
    match path.strip_prefix("~/") {
        Some(rest) => format!("\"$HOME\"/{}", shell_quote(rest)),
        None => shell_quote(path),
    }
}

/// The two command lines used against one waiter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCommands {
    pub check: String,
    pub remove: String,
}

impl MarkerCommands {
    pub fn for_path(path: &str) -> Self {
        let quoted = quote_remote_path(path);
        Self {
            check: format!("test -e {}", quoted),
            remove: format!("rm -- {}", quoted),
        }
    }
}
