use ahash::AHashMap;
use std::fmt;

/// The canonical block graph a generation pass walks.
/// This is the target structure for any host editor format conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceDefinition {
    /// Top-level blocks in authored order.
    pub blocks: Vec<BlockInstance>,
}

/// A literal value stored in a block field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

/// A placed occurrence of a block type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInstance {
    pub id: String,
    pub block_type: String,
    pub enabled: bool,
    pub fields: AHashMap<String, FieldValue>,
    /// Connected children keyed by input name. For statement inputs this is
    /// the first block of the body chain.
    pub inputs: AHashMap<String, BlockInstance>,
    pub next: Option<Box<BlockInstance>>,
}

impl BlockInstance {
    pub fn new(id: &str, block_type: &str) -> Self {
        Self {
            id: id.to_string(),
            block_type: block_type.to_string(),
            enabled: true,
            fields: AHashMap::new(),
            inputs: AHashMap::new(),
            next: None,
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_input(mut self, name: &str, block: BlockInstance) -> Self {
        self.inputs.insert(name.to_string(), block);
        self
    }

    pub fn with_next(mut self, block: BlockInstance) -> Self {
        self.next = Some(Box::new(block));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn input(&self, name: &str) -> Option<&BlockInstance> {
        self.inputs.get(name)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}
