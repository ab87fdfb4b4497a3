use crate::{
    Datasource, PreviewFeature, datamodel_connector::ConnectorCapability, diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};

pub(super) fn schemas_property_without_preview_feature(datasource: &Datasource, ctx: &mut Context<'_>) {
    if ctx.has_preview_feature(PreviewFeature::MultiSchema) {
        return;
    }

    if let Some(span) = datasource.schemas_span {
        ctx.push_error(DatamodelError::new_static(
            "The `schemas` property is only available with the `multiSchema` preview feature.",
            span,
        ))
    }
}

pub(super) fn schemas_property_with_no_connector_support(datasource: &Datasource, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::MultiSchema) {
        return;
    }

    if ctx.has_capability(ConnectorCapability::MultiSchema) {
        return;
    }

    if let Some(span) = datasource.schemas_span {
        ctx.push_error(DatamodelError::new_static(
            "The `schemas` property is not supported on the current connector.",
            span,
        ))
    }
}

pub(super) fn connector_specific(datasource: &Datasource, ctx: &mut Context<'_>) {
    ctx.connector
        .validate_datasource(ctx.preview_features, datasource, ctx.diagnostics)
}
