#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;

#[cfg(feature = "cli")]
pub use cli::{CliCommand, CliConfig};
pub use lambda::LambdaConfig;
