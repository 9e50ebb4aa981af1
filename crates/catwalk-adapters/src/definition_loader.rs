//! Filesystem-based tastic definition loader.
//!
//! Discovers and parses `tastic.json` files from a directory tree,
//! converting them into domain [`TasticDefinition`] objects.
//!
//! # Directory layout expected
//!
//! ```text
//! tastics/
//! ├── product-slider/
//! │   └── tastic.json
//! └── content/
//!     └── hero/
//!         └── tastic.json
//! ```
//!
//! # `tastic.json` format
//!
//! ```json
//! {
//!   "tasticType": "product-slider",
//!   "name": "Product Slider",
//!   "schema": [
//!     {
//!       "name": "Stream",
//!       "fields": [
//!         { "field": "stream", "type": "stream", "streamType": "product-list" },
//!         { "field": "productCount", "type": "integer", "default": 6 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! A nested `"configurationSchema": { "schema": [...] }` object is accepted
//! in place of the top-level `schema` list.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use catwalk_core::{
    application::{ApplicationError, ports::TasticDefinitionStore},
    domain::{ConfigurationSchema, SchemaGroup, TasticDefinition},
    error::CatwalkResult,
};

/// File name of a tastic manifest.
pub const MANIFEST_FILE: &str = "tastic.json";

/// Deserialised representation of a `tastic.json` file.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TasticManifest {
    pub tastic_type: String,
    pub name: Option<String>,
    pub schema: Option<Vec<SchemaGroup>>,
    pub configuration_schema: Option<ConfigurationSchema>,
}

impl TasticManifest {
    fn into_definition(self) -> TasticDefinition {
        let schema = match (self.configuration_schema, self.schema) {
            (Some(configuration_schema), _) => configuration_schema,
            (None, Some(groups)) => ConfigurationSchema::new(groups),
            (None, None) => ConfigurationSchema::default(),
        };

        let mut definition = TasticDefinition::new(self.tastic_type, schema);
        if let Some(name) = self.name {
            definition.name = name;
        }
        definition
    }
}

/// Loads [`TasticDefinition`]s from a directory tree of `tastic.json` files.
///
/// Manifests that cannot be read or parsed emit a `WARN` log and are
/// skipped; they do not prevent other definitions from loading.
pub struct TasticDefinitionLoader {
    tastics_dir: PathBuf,
}

impl TasticDefinitionLoader {
    /// Create a loader pointed at `tastics_dir`.
    pub fn new(tastics_dir: impl Into<PathBuf>) -> Self {
        Self {
            tastics_dir: tastics_dir.into(),
        }
    }

    pub fn tastics_dir(&self) -> &Path {
        &self.tastics_dir
    }

    /// Load every valid definition found under the tastics directory, sorted
    /// by path.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::DefinitionLoad`] if the directory does not
    /// exist or cannot be walked.
    #[instrument(skip(self), fields(dir = %self.tastics_dir.display()))]
    pub fn load_all(&self) -> CatwalkResult<Vec<TasticDefinition>> {
        if !self.tastics_dir.is_dir() {
            return Err(self.load_error(&self.tastics_dir, "tastics directory not found"));
        }

        let mut definitions = Vec::new();

        for entry in WalkDir::new(&self.tastics_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                self.load_error(&self.tastics_dir, format!("directory walk error: {e}"))
            })?;

            if !entry.file_type().is_file() || entry.file_name() != MANIFEST_FILE {
                continue;
            }

            match self.load_manifest(entry.path()) {
                Ok(definition) => {
                    debug!(tastic_type = %definition.tastic_type, "loaded tastic definition");
                    definitions.push(definition);
                }
                Err(e) => {
                    // One bad manifest must not block all others.
                    warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "skipping tastic manifest due to load error"
                    );
                }
            }
        }

        debug!(count = definitions.len(), "finished loading tastic definitions");
        Ok(definitions)
    }

    /// Load all definitions into `store`, returning how many were stored.
    ///
    /// Definitions rejected by the store's validation are skipped.
    pub fn load_into(&self, store: &dyn TasticDefinitionStore) -> CatwalkResult<usize> {
        let mut stored = 0;
        for definition in self.load_all()? {
            let tastic_type = definition.tastic_type.clone();
            match store.insert(definition) {
                Ok(()) => stored += 1,
                Err(e) => warn!(%tastic_type, error = %e, "skipping invalid tastic definition"),
            }
        }
        Ok(stored)
    }

    /// Load a single `tastic.json`.
    pub fn load_manifest(&self, path: &Path) -> CatwalkResult<TasticDefinition> {
        let raw = fs::read_to_string(path)
            .map_err(|e| self.load_error(path, format!("failed to read: {e}")))?;

        let manifest: TasticManifest = serde_json::from_str(&raw)
            .map_err(|e| self.load_error(path, format!("failed to parse: {e}")))?;

        Ok(manifest.into_definition())
    }

    fn load_error(&self, path: &Path, reason: impl Into<String>) -> catwalk_core::error::CatwalkError {
        ApplicationError::DefinitionLoad {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
        .into()
    }
}
