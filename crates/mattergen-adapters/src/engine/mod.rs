//! Engine loaders.
//!
//! Both transports hand the host an `EngineHandle` carrying the same
//! adjacently tagged messages; they differ only in where the engine runs.

mod in_process;
mod process;

pub use in_process::{EngineProgram, InProcessEngineLoader};
pub use process::ProcessEngineLoader;

use tokio::task::JoinHandle;

/// Aborts the wrapped task when dropped.
struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
