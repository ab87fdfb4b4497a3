pub(crate) mod datasource_loader;
pub(crate) mod generator_loader;

mod validation_pipeline;

pub(crate) use validation_pipeline::validate;
pub use validation_pipeline::{NativeTypeBindings, ValidateOutput, is_leftwise_included_it};
