// Application Layer - Use Cases and Business Logic

pub mod engine;
pub mod scheduler;
pub mod shutdown;

// Re-exports
pub use engine::{ReconcileEngine, Trigger};
pub use scheduler::SweepScheduler;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
