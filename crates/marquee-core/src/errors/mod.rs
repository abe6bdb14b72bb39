mod context;
mod model;

pub use context::{ErrorContext, ResultExt};
pub use model::{ExitCode, MachineError};
