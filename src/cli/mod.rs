//! CLI command handling

pub mod bootstrap;
pub mod config;
pub mod hook;
pub mod output;
pub mod run;
pub mod send;

pub use bootstrap::*;
pub use config::*;
pub use hook::*;
pub use output::*;
pub use run::*;
pub use send::*;
