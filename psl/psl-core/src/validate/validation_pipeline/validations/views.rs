use crate::{
    PreviewFeature,
    datamodel_connector::ConnectorCapability,
    diagnostics::DatamodelError,
    validate::validation_pipeline::context::Context,
};
use schema_graph::walkers::{IndexWalker, ModelWalker, PrimaryKeyWalker};

pub(super) fn view_definition_without_preview_flag(view: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_preview_feature(PreviewFeature::Views) {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        "View definitions are only available with the `views` preview feature.",
        view.span(),
    ));
}

pub(super) fn views_supported_in_connector(view: ModelWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_preview_feature(PreviewFeature::Views) || ctx.has_capability(ConnectorCapability::Views) {
        return;
    }

    ctx.push_error(DatamodelError::new_validation_error(
        "View definitions are not supported with the current connector.",
        view.span(),
    ));
}

pub(super) fn primary_key(pk: PrimaryKeyWalker<'_>, ctx: &mut Context<'_>) {
    ctx.push_error(DatamodelError::new_validation_error(
        "Views cannot have primary keys.",
        pk.span(),
    ));
}

pub(super) fn index(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    if !index.is_unique() {
        ctx.push_error(DatamodelError::new_validation_error(
            "Views cannot have indexes.",
            index.span(),
        ));

        return;
    }

    if index.mapped_name().is_some() {
        ctx.push_error(DatamodelError::new_validation_error(
            "@@unique annotations on views are not backed by unique indexes in the database and cannot specify a mapped database name.",
            index.span(),
        ));
    }

    if index.clustered().is_some() {
        ctx.push_error(DatamodelError::new_validation_error(
            "@@unique annotations on views are not backed by unique indexes in the database and cannot be clustered.",
            index.span(),
        ));
    }
}

pub(super) fn index_field_attributes(index: IndexWalker<'_>, ctx: &mut Context<'_>) {
    let has_arguments = index
        .scalar_field_attributes()
        .any(|attr| attr.length().is_some() || attr.sort_order().is_some());

    if has_arguments {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "Scalar fields in @@unique attributes in views cannot have arguments.",
            index.attribute_name(),
            index.span(),
        ));
    }
}

pub(super) fn connector_specific(view: ModelWalker<'_>, ctx: &mut Context<'_>) {
    ctx.connector.validate_view(view, ctx.diagnostics)
}
