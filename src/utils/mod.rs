pub mod framework_config;
pub mod toml_config;

pub use framework_config::FrameworkConfig;
pub use toml_config::{AppConfig, ConfigError, ReportColumn};
