pub mod launcher;
pub mod mode;

pub use launcher::{LaunchHandle, Launcher};
pub use mode::EngineMode;
