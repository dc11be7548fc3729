//! Configuration management infrastructure
//!
//! Two separate inputs:
//! - the build configuration file (`build_file`), expanded and parsed as YAML
//! - tool settings (`settings`), merged with figment from defaults, YAML
//!   files and environment variables

pub mod build_file;
pub mod settings;

pub use build_file::{expand_env, load_build_file, parse_build_text};
pub use settings::{ServiceSettings, Settings, SettingsError, SettingsLoader};
