//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the modbus-blocks
//! crate. Import this module to get access to the core functionality without having to
//! import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use modbus_blocks::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let workspace_json = std::fs::read_to_string("path/to/workspace.json")?;
//! let workspace = HostWorkspace::from_json(&workspace_json)?.into_workspace()?;
//!
//! let generator = Generator::new()?;
//! let script = generator.generate(&workspace)?;
//! std::fs::write("task.py", script)?;
//! # Ok(())
//! # }
//! ```

// Catalog and registration
pub use crate::catalog::{BlockSpec, OutputCheck, Slot, SlotKind, default_catalog};
pub use crate::registry::BlockRegistry;

// Code generation
pub use crate::codegen::alarm::AlarmLevel;
pub use crate::codegen::{
    BlockEmitter, CodeFragment, GenerationContext, Generator, GeneratorBuilder, Order,
};

// Workspace model
pub use crate::workspace::{
    BlockInstance, FieldValue, HostWorkspace, IntoWorkspace, WorkspaceDefinition,
};

// Error types
pub use crate::error::{GenerateError, RegistryError, WorkspaceConversionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
