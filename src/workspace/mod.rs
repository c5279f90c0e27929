pub mod conversion;
pub mod definition;
pub mod host;

pub use conversion::*;
pub use definition::*;
pub use host::*;
