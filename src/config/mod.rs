pub mod session;
pub mod toml_config;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod prompt;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, OutputFormat};
pub use session::{Session, SessionInputs};
pub use toml_config::TomlConfig;
