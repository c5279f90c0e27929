//! # modbus-blocks - Block Catalog and Python Generator for Modbus Polling
//!
//! **modbus-blocks** owns the block shapes of a visual Modbus programming front end
//! and turns a user's block graph into a runnable Python script: connection configs,
//! async polling tasks, field extraction, alarm evaluation and logging.
//!
//! ## Core Workflow
//!
//! The generator is editor-agnostic. It operates on a canonical internal model of a
//! "workspace definition." The primary workflow is:
//!
//! 1.  **Register blocks**: The built-in catalog is validated when a `Generator` is built.
//!     Export it with `BlockRegistry::to_host_json` so the host editor can place the blocks.
//! 2.  **Load the graph**: Parse the host's saved workspace (`HostWorkspace::from_json`) or
//!     implement `IntoWorkspace` for your own format.
//! 3.  **Generate**: `Generator::generate` walks the graph and returns the Python file.
//!
//! ## Quick Start
//!
//! ```rust
//! use modbus_blocks::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = BlockInstance::new("cfg", "RTU_config")
//!         .with_field("FUNCTION_CODE", "4")
//!         .with_input("PORT", BlockInstance::new("port", "text").with_field("TEXT", "COM4"));
//!
//!     let log = BlockInstance::new("log", "modbus_log").with_input(
//!         "MSG",
//!         BlockInstance::new("pull", "modbus_pull_data").with_input("CONFIG", config),
//!     );
//!
//!     let task = BlockInstance::new("task", "modbus_task_definition")
//!         .with_field("TASK_ID", "01")
//!         .with_field("INTERVAL", 5.0)
//!         .with_input("DO", log);
//!
//!     let generator = Generator::new()?;
//!     let script = generator.generate(&WorkspaceDefinition { blocks: vec![task] })?;
//!
//!     assert!(script.contains("async def task_01_loop():"));
//!     assert!(script.contains("await asyncio.gather(task_01_loop())"));
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod codegen;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod workspace;
