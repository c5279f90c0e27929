use crate::catalog::{BlockSpec, default_catalog};
use crate::error::RegistryError;
use ahash::{AHashMap, AHashSet};
use serde_json::Value;
use tracing::debug;

/// The set of block types that are placeable in the host editor.
///
/// Type names are unique; a registration batch that would break this is
/// rejected as a whole.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    specs: AHashMap<String, BlockSpec>,
    order: Vec<String>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in catalog.
    pub fn with_default_catalog() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(default_catalog())?;
        Ok(registry)
    }

    /// Registers a batch of specs. Nothing is registered if any spec is invalid.
    pub fn register<I>(&mut self, specs: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = BlockSpec>,
    {
        let specs: Vec<BlockSpec> = specs.into_iter().collect();

        let mut batch_names = AHashSet::new();
        for spec in &specs {
            spec.validate()?;
            if self.specs.contains_key(&spec.type_name) || !batch_names.insert(&spec.type_name) {
                return Err(RegistryError::DuplicateBlockType(spec.type_name.clone()));
            }
        }

        for spec in specs {
            debug!(block_type = %spec.type_name, "registered block type");
            self.order.push(spec.type_name.clone());
            self.specs.insert(spec.type_name.clone(), spec);
        }
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Option<&BlockSpec> {
        self.specs.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.specs.contains_key(type_name)
    }

    /// Type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Exports all specs as the JSON array the host editor's bulk block definition call takes.
    pub fn to_host_json(&self) -> Value {
        Value::Array(
            self.order
                .iter()
                .filter_map(|name| self.specs.get(name))
                .map(BlockSpec::to_host_json)
                .collect(),
        )
    }
}
