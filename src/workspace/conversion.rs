use super::definition::WorkspaceDefinition;
use crate::error::WorkspaceConversionError;

/// A trait for host editor graph formats that can be converted into a `WorkspaceDefinition`.
///
/// The generator never reads a host format directly. Implementing this trait on
/// the host's serialized structs is the translation layer that lets any editor
/// feed the generator.
///
/// # Example
///
/// ```rust
/// use modbus_blocks::error::WorkspaceConversionError;
/// use modbus_blocks::workspace::{BlockInstance, IntoWorkspace, WorkspaceDefinition};
///
/// struct MyTask { id: String }
/// struct MyDiagram { tasks: Vec<MyTask> }
///
/// impl IntoWorkspace for MyDiagram {
///     fn into_workspace(self) -> Result<WorkspaceDefinition, WorkspaceConversionError> {
///         let blocks = self
///             .tasks
///             .into_iter()
///             .enumerate()
///             .map(|(i, t)| {
///                 BlockInstance::new(&format!("task-{}", i), "modbus_task_definition")
///                     .with_field("TASK_ID", t.id.as_str())
///             })
///             .collect();
///         Ok(WorkspaceDefinition { blocks })
///     }
/// }
/// ```
pub trait IntoWorkspace {
    /// Consumes the object and converts it into a block graph.
    fn into_workspace(self) -> Result<WorkspaceDefinition, WorkspaceConversionError>;
}
