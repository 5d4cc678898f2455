//! Configuration for archive operations.

/// Default deflate/gzip compression level.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Configuration for archiving a directory.
///
/// Values are built fresh for every call and never mutated by the archiver.
///
/// # Examples
///
/// ```
/// use dirpack_core::ArchiveConfig;
///
/// // Archive everything with balanced compression
/// let config = ArchiveConfig::default();
///
/// // Skip VCS metadata and compress harder
/// let custom = ArchiveConfig::default()
///     .with_exclude_dirs(vec![".git".to_string(), ".svn".to_string()])
///     .with_compression_level(9);
/// assert_eq!(custom.compression_level, Some(9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Compression level (0-9).
    ///
    /// `Some(0)` stores zip members uncompressed. `None` uses the default
    /// level.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Directory names pruned from the traversal.
    ///
    /// A directory whose name matches is neither descended into nor stored.
    ///
    /// Default: empty.
    pub exclude_dirs: Vec<String>,

    /// Include entries whose name starts with '.'.
    ///
    /// Default: `true`.
    pub include_hidden: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            compression_level: Some(DEFAULT_COMPRESSION_LEVEL),
            exclude_dirs: Vec::new(),
            include_hidden: true,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level, clamped to 9.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level.min(9));
        self
    }

    /// Sets the directory names pruned from the traversal.
    #[must_use]
    pub fn with_exclude_dirs(mut self, names: Vec<String>) -> Self {
        self.exclude_dirs = names;
        self
    }

    /// Sets whether hidden entries are archived.
    #[must_use]
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Returns the effective compression level.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ArchiveConfig::default();
        assert_eq!(config.compression_level, Some(6));
        assert!(config.exclude_dirs.is_empty());
        assert!(config.include_hidden);
        assert_eq!(config, ArchiveConfig::new());
    }

    #[test]
    fn test_builder_methods() {
        let config = ArchiveConfig::new()
            .with_compression_level(0)
            .with_exclude_dirs(vec!["target".to_string()])
            .with_include_hidden(false);

        assert_eq!(config.level(), 0);
        assert_eq!(config.exclude_dirs, vec!["target".to_string()]);
        assert!(!config.include_hidden);
    }

    #[test]
    fn test_compression_level_clamped() {
        let config = ArchiveConfig::new().with_compression_level(42);
        assert_eq!(config.compression_level, Some(9));
    }

    #[test]
    fn test_level_falls_back_to_default() {
        let config = ArchiveConfig {
            compression_level: None,
            ..ArchiveConfig::default()
        };
        assert_eq!(config.level(), DEFAULT_COMPRESSION_LEVEL);
    }
}
