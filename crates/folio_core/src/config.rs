//! Store configuration.

use std::path::{Path, PathBuf};

/// Extension of the data file inside the root directory.
const DATA_FILE_EXTENSION: &str = "txt";

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database name. The data file is `<root>/<name>.txt`.
    pub name: String,

    /// Root directory for the data file. `None` keeps the store in memory
    /// only, and `load`/`persist` fail with a configuration error.
    pub root: Option<PathBuf>,

    /// Whether corrupted lines and unserializable documents are errors
    /// instead of being skipped.
    pub strict: bool,

    /// Whether every successful insert, update or delete persists the table.
    pub autopersist: bool,

    /// Whether `load` creates the data file when it does not exist.
    pub create_if_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "folio".to_string(),
            root: None,
            strict: false,
            autopersist: false,
            create_if_missing: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the root directory, making the store file-backed.
    #[must_use]
    pub fn root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Sets strict mode.
    #[must_use]
    pub const fn strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    /// Sets whether mutations persist automatically.
    #[must_use]
    pub const fn autopersist(mut self, value: bool) -> Self {
        self.autopersist = value;
        self
    }

    /// Sets whether a missing data file is created on load.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Returns the path of the data file, if the store is file-backed.
    #[must_use]
    pub fn data_path(&self) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(format!("{}.{DATA_FILE_EXTENSION}", self.name)))
    }

    /// Checks that the name can be used as a file name.
    pub(crate) fn name_is_valid(&self) -> bool {
        !self.name.is_empty()
            && !self.name.contains(['/', '\\'])
            && self.name != "."
            && self.name != ".."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.name, "folio");
        assert!(config.root.is_none());
        assert!(!config.strict);
        assert!(!config.autopersist);
        assert!(config.create_if_missing);
        assert!(config.data_path().is_none());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .name("users")
            .root("/var/lib/folio")
            .strict(true)
            .autopersist(true);

        assert!(config.strict);
        assert!(config.autopersist);
        assert_eq!(
            config.data_path(),
            Some(PathBuf::from("/var/lib/folio/users.txt"))
        );
    }

    #[test]
    fn name_validation() {
        assert!(Config::new().name("items").name_is_valid());
        assert!(!Config::new().name("").name_is_valid());
        assert!(!Config::new().name("a/b").name_is_valid());
        assert!(!Config::new().name("..").name_is_valid());
    }
}
