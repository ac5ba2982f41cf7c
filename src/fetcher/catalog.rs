//! Year to source location mapping

use crate::config::SourceConfig;
use crate::ConfigError;
use std::collections::BTreeMap;
use url::Url;

/// The set of known bulletins and where each one lives
#[derive(Debug, Clone)]
pub struct DocumentCatalog {
    base_url: Url,
    files: BTreeMap<u16, String>,
}

impl DocumentCatalog {
    /// Creates a catalog from a base location and `(year, filename)` pairs
    ///
    /// A missing trailing slash on the base is added so filenames are appended
    /// to the base path instead of replacing its last segment.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Location every filename is joined onto
    /// * `files` - Filename for each supported year
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentCatalog)` - The base URL parsed
    /// * `Err(ConfigError::InvalidUrl)` - The base URL could not be parsed
    pub fn new(
        base_url: &str,
        files: impl IntoIterator<Item = (u16, String)>,
    ) -> Result<Self, ConfigError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        let base_url = Url::parse(&base)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base, e)))?;

        Ok(Self {
            base_url,
            files: files.into_iter().collect(),
        })
    }

    /// Builds the catalog described by the source configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.base_url,
            config
                .documents
                .iter()
                .map(|entry| (entry.year, entry.file.clone())),
        )
    }

    /// Resolves a year to its bulletin URL
    ///
    /// # Returns
    ///
    /// * `Some(Url)` - The year is known
    /// * `None` - No bulletin is configured for the year
    pub fn resolve(&self, year: u16) -> Option<Url> {
        let file = self.files.get(&year)?;
        self.base_url.join(file).ok()
    }

    /// Whether a bulletin is configured for `year`
    pub fn supports(&self, year: u16) -> bool {
        self.files.contains_key(&year)
    }

    /// All supported years in ascending order
    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.files.keys().copied()
    }

    /// The base location filenames are joined onto
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
