#![deny(rust_2018_idioms, unsafe_code)]

//! Errors, warnings and source spans shared by every schema crate.

mod collection;
mod error;
mod native_type_error_factory;
mod pretty_print;
mod span;
mod warning;

pub use collection::{Diagnostic, Diagnostics};
pub use error::DatamodelError;
pub use native_type_error_factory::NativeTypeErrorFactory;
pub use span::{FileId, Span};
pub use warning::DatamodelWarning;
