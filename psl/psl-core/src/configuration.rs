mod configuration_struct;
mod datasource;
mod env_vars;
mod generator;

pub use configuration_struct::Configuration;
pub use datasource::Datasource;
pub use env_vars::StringFromEnvVar;
pub use generator::{Generator, GeneratorConfigValue};
