pub mod env_config;
pub mod logging;
pub mod macros;
pub mod pagination;
