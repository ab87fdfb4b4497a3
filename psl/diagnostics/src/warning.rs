use crate::{
    Span,
    pretty_print::{DatamodelWarningColorer, pretty_print},
};
use std::borrow::Cow;

/// A non-fatal warning emitted by the schema validator.
/// For fancy printing, please use the `pretty_print` method.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DatamodelWarning {
    message: Cow<'static, str>,
    span: Span,
}

impl DatamodelWarning {
    /// You should avoid using this constructor directly when possible, and define warnings as public
    /// methods of this class. The constructor is only left public for supporting connector-specific
    /// warnings (which should not live in the core).
    pub fn new(message: impl Into<Cow<'static, str>>, span: Span) -> DatamodelWarning {
        DatamodelWarning {
            message: message.into(),
            span,
        }
    }

    pub fn new_feature_deprecated(feature: &str, span: Span) -> DatamodelWarning {
        let message = format!(
            "Preview feature \"{feature}\" is deprecated. The functionality can be used without specifying it as a preview feature."
        );
        Self::new(message, span)
    }

    pub fn new_preview_feature_deprecated(feature: &str, span: Span) -> DatamodelWarning {
        let message =
            format!("Preview feature \"{feature}\" is deprecated and will be removed in a future release.");
        Self::new(message, span)
    }

    pub fn new_preview_feature_renamed(
        deprecated_feature: &str,
        renamed_feature: impl std::fmt::Display,
        prisly_link_endpoint: &str,
        span: Span,
    ) -> DatamodelWarning {
        let message = format!(
            "Preview feature \"{deprecated_feature}\" has been renamed to \"{renamed_feature}\". Learn more at https://pris.ly/d/{prisly_link_endpoint}."
        );
        Self::new(message, span)
    }

    pub fn new_referential_integrity_attr_deprecation_warning(span: Span) -> DatamodelWarning {
        let message = "The `referentialIntegrity` attribute is deprecated. Please use `relationMode` instead. Learn more at https://pris.ly/d/relation-mode";
        Self::new(message, span)
    }

    pub fn new_missing_index_on_emulated_relation(span: Span) -> DatamodelWarning {
        let message = "With `relationMode = \"prisma\"`, no foreign keys are used, so relation fields will not benefit from the index usually created by the relational database under the hood. This can lead to poor performance when querying these fields. We recommend adding an index manually. Learn more at https://pris.ly/d/relation-mode-prisma-indexes";
        Self::new(message, span)
    }

    pub fn new_field_validation(message: &str, model: &str, field: &str, span: Span) -> DatamodelWarning {
        Self::new(
            format!("Warning validating field `{field}` in model `{model}`: {message}"),
            span,
        )
    }

    /// The user-facing warning message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The source span the warning applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn pretty_print(&self, f: &mut dyn std::io::Write, file_name: &str, text: &str) -> std::io::Result<()> {
        pretty_print(f, file_name, text, self.span, self.message.as_ref(), &DatamodelWarningColorer)
    }
}
