use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use mindscan_core::models::answer::ResponseSet;
use mindscan_core::models::result::ClassificationResult;

use crate::classify::classify;
use crate::error::InstrumentError;
use crate::instruments::BuiltinInstrument;
use crate::scoring::InstrumentDefinition;

/// Instrument definitions keyed by id and alias, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct InstrumentRegistry {
    definitions: Vec<InstrumentDefinition>,
    /// Lowercased id/alias → index into `definitions`.
    index: HashMap<String, usize>,
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

impl InstrumentRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the five built-in instruments.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for builtin in BuiltinInstrument::ALL {
            registry.insert(builtin.definition().clone());
        }
        registry
    }

    /// Validate and add a definition. Ids and aliases must be unique across
    /// the registry.
    pub fn register(&mut self, definition: InstrumentDefinition) -> Result<(), InstrumentError> {
        definition.validate()?;
        for key in definition.keys().map(normalize_key) {
            if self.index.contains_key(&key) {
                return Err(InstrumentError::DuplicateKey { key });
            }
        }
        self.insert(definition);
        Ok(())
    }

    pub fn with_definition(mut self, definition: InstrumentDefinition) -> Result<Self, InstrumentError> {
        self.register(definition)?;
        Ok(self)
    }

    /// Register every `*.json` file in `dir` (one definition per file), in
    /// file-name order.
    pub fn load_dir(mut self, dir: &Path) -> Result<Self, InstrumentError> {
        let entries = std::fs::read_dir(dir).map_err(|source| InstrumentError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| InstrumentError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let definition = load_file(&path)?;
            info!(instrument_id = %definition.id, path = %path.display(), "loaded instrument definition");
            self.register(definition)?;
        }
        Ok(self)
    }

    /// Look up by id or alias, ignoring case and surrounding whitespace.
    pub fn resolve(&self, key: &str) -> Result<&InstrumentDefinition, InstrumentError> {
        self.index
            .get(&normalize_key(key))
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| InstrumentError::NotFound(key.to_string()))
    }

    /// Resolve and score in one call. Unknown instruments are the only failure.
    pub fn classify(&self, key: &str, responses: &ResponseSet) -> Result<ClassificationResult, InstrumentError> {
        Ok(classify(self.resolve(key)?, responses))
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> &[InstrumentDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn insert(&mut self, definition: InstrumentDefinition) {
        let position = self.definitions.len();
        for key in definition.keys() {
            self.index.insert(normalize_key(key), position);
        }
        self.definitions.push(definition);
    }
}

/// Parse one JSON definition file. Validation happens on registration.
pub fn load_file(path: &Path) -> Result<InstrumentDefinition, InstrumentError> {
    let bytes = std::fs::read(path).map_err(|source| InstrumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}
