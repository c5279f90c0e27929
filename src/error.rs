use thiserror::Error;

/// Errors raised while registering block specs or building a generator.
///
/// These are configuration errors: a catalog that produces one of them must
/// not be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Block type '{0}' is registered more than once")]
    DuplicateBlockType(String),

    #[error(
        "Block type '{type_name}' declares {placeholders} placeholders in its message but {slots} slots"
    )]
    PlaceholderMismatch {
        type_name: String,
        placeholders: usize,
        slots: usize,
    },

    #[error("Block type '{type_name}' declares slot '{slot}' more than once")]
    DuplicateSlot { type_name: String, slot: String },

    #[error("Dropdown '{slot}' on block type '{type_name}' has no options")]
    EmptyDropdown { type_name: String, slot: String },

    #[error("Number field '{slot}' on block type '{type_name}' has min greater than max")]
    InvalidBounds { type_name: String, slot: String },

    #[error("Block type '{0}' has a spec but no emitter")]
    MissingEmitter(String),

    #[error("Emitter for block type '{0}' has no matching spec")]
    MissingSpec(String),
}

/// Errors that can occur during a generation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Block '{block_id}' has an unregistered block type: '{type_name}'")]
    UnknownBlockType { block_id: String, type_name: String },

    #[error("Block '{block_id}' ({type_name}) is a statement block and cannot be used as a value")]
    NotAValueBlock { block_id: String, type_name: String },

    #[error("Block '{block_id}' ({type_name}) is a value block and cannot be used as a statement")]
    NotAStatementBlock { block_id: String, type_name: String },

    #[error(
        "Block '{block_id}' ({type_name}) has no previous connection and cannot be placed inside a statement chain"
    )]
    NoPreviousConnection { block_id: String, type_name: String },

    #[error(
        "Input '{slot}' on block '{block_id}' does not accept output '{found}' (accepts: {accepted})"
    )]
    IncompatibleConnection {
        block_id: String,
        slot: String,
        found: String,
        accepted: String,
    },

    #[error("Block '{block_id}' ({type_name}) has no slot named '{slot}'")]
    UnknownSlot {
        block_id: String,
        type_name: String,
        slot: String,
    },

    #[error("Field '{slot}' on block '{block_id}' has an invalid value: {message}")]
    InvalidFieldValue {
        block_id: String,
        slot: String,
        message: String,
    },
}

/// Errors that can occur when converting a host editor format into a `WorkspaceDefinition`.
#[derive(Error, Debug, Clone)]
pub enum WorkspaceConversionError {
    #[error("Failed to parse workspace JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid workspace data: {0}")]
    ValidationError(String),
}
