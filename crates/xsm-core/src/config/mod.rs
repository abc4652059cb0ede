mod errors;
mod loading;
mod types;

pub use errors::ConfigError;
pub use loading::{base_dir, config_path, load_config, load_config_from};
pub use types::{FiltersConfig, PathsConfig, RestoreConfig, XsmConfig};
