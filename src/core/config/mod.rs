pub mod data;
pub mod io;
#[cfg(test)]
mod tests;

pub use data::{path_display, Config};
pub use io::{default_config_path, ConfigError};
