use std::path::Path;

use crate::types::Transaction;

/// `path` relative to `base`, with `/` separators, or `None` when `path`
/// does not live under `base`.
pub fn strip_base_path(base: impl AsRef<Path>, path: impl AsRef<Path>) -> Option<String> {
    let relative = path.as_ref().strip_prefix(base.as_ref()).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

impl Transaction {
    /// Makes `file` relative to `base`, so ids derived from it do not depend
    /// on where the statements directory is mounted. A `file` outside `base`
    /// is left as is.
    pub fn strip_base_path(mut self, base: impl AsRef<Path>) -> Self {
        if let Some(stripped) = self.file.as_deref().and_then(|file| strip_base_path(&base, file)) {
            self.file = Some(stripped);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/path/to/", "/path/to/nested/my-file.csv", Some("nested/my-file.csv"))]
    #[case("/path/to", "/path/to/my-file.csv", Some("my-file.csv"))]
    #[case("statements", "statements/2024/chase.csv", Some("2024/chase.csv"))]
    #[case("/path/to/", "/elsewhere/my-file.csv", None)]
    #[case("/path/to/", "/path/tomato/my-file.csv", None)]
    fn test_strip_base_path(#[case] base: &str, #[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(strip_base_path(base, path).as_deref(), expected);
    }

    #[test]
    fn test_transaction_strip_base_path() {
        let txn = Transaction {
            file: Some("/path/to/nested/my-file.csv".to_string()),
            ..Transaction::new("", 1, -1)
        };
        let expected = Transaction {
            file: Some("nested/my-file.csv".to_string()),
            ..Transaction::new("", 1, -1)
        };
        assert_eq!(txn.strip_base_path("/path/to/"), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("/elsewhere/my-file.csv"))]
    fn test_transaction_strip_base_path_keeps_file(#[case] file: Option<&str>) {
        let txn = Transaction {
            file: file.map(str::to_string),
            ..Transaction::new("mercury", 1, -1)
        };
        assert_eq!(txn.clone().strip_base_path("/path/to"), txn);
    }
}
