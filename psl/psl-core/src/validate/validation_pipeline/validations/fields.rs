use super::{
    constraint_namespace::ConstraintName,
    database_name::validate_db_name,
    default_value,
    names::{NameTaken, Names},
};
use crate::{
    datamodel_connector::{ConnectorCapability, walker_ext_traits::*},
    diagnostics::{DatamodelError, Diagnostics, Span},
    validate::validation_pipeline::context::Context,
};
use once_cell::sync::Lazy;
use regex::Regex;
use schema_graph::{
    RawNativeType, ScalarFieldType, ScalarType,
    walkers::{ModelWalker, PrimaryKeyWalker, ScalarFieldAttributeWalker, ScalarFieldWalker},
};

/// A field name must not be used as the client name of an index, a unique
/// or the primary key of the same model.
pub(super) fn validate_client_name(model: ModelWalker<'_>, field_name: &str, names: &Names<'_>, ctx: &mut Context<'_>) {
    for taken in names.name_taken(model.id, field_name) {
        let attribute = match taken {
            NameTaken::Index => "@@index",
            NameTaken::Unique => "@@unique",
            NameTaken::PrimaryKey => "@@id",
        };

        let message = format!(
            "The custom name `{field_name}` specified for the `{attribute}` attribute is already used as a name for a field. Please choose a different name."
        );

        ctx.push_error(DatamodelError::new_model_validation_error(
            &message,
            model.block_type(),
            model.name(),
            model.span(),
        ));
    }
}

/// Some databases use constraints for default values, with a name that can be unique in a certain
/// namespace. Validates the field default constraint against name clashes.
pub(super) fn has_a_unique_default_constraint_name(
    field: ScalarFieldWalker<'_>,
    names: &Names<'_>,
    ctx: &mut Context<'_>,
) {
    let Some(default_value) = field.default_value() else { return };
    let Some(name) = default_value.constraint_name(ctx.connector) else {
        return;
    };

    let model = field.model();

    for violation in names.constraint_namespace.constraint_name_scope_violations(
        model.id,
        ConstraintName::Default(name.as_ref()),
        ctx.connector,
    ) {
        let message = format!(
            "The given constraint name `{}` has to be unique in the following namespace: {}. Please provide a different name using the `map` argument.",
            name,
            violation.description(model.name()),
        );

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            &message,
            "@default",
            default_value.span(),
        ));
    }
}

/// The length prefix can be used with strings and byte columns.
pub(super) fn validate_length_used_with_correct_types(
    attr: ScalarFieldAttributeWalker<'_>,
    attribute: (&str, Span),
    ctx: &mut Context<'_>,
) {
    if !ctx.has_capability(ConnectorCapability::IndexColumnLengthPrefixing) {
        return;
    }

    if attr.length().is_none() {
        return;
    }

    let field_type = attr.as_index_field().scalar_field_type();

    if field_type.is_unsupported() || field_type.is_string() || field_type.is_bytes() {
        return;
    }

    let message = "The length argument is only allowed with field types `String` or `Bytes`.";

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        message,
        attribute.0,
        attribute.1,
    ));
}

/// Parse a `@db.*` annotation against the connector's catalog, and check
/// that it fits the field type and its arguments are in range.
pub(super) fn validate_native_type_arguments(
    scalar_type: Option<ScalarType>,
    raw: Option<&RawNativeType>,
    ctx: &mut Context<'_>,
) {
    let Some(raw) = raw else { return };

    // Validate that the attribute is scoped with the right datasource name.
    if let Some(datasource) = ctx.datasource {
        if datasource.name != raw.scope {
            let suggestion = [datasource.name.as_str(), raw.name.as_str()].join(".");

            ctx.push_error(DatamodelError::new_invalid_prefix_for_native_types(
                &raw.scope,
                &datasource.name,
                &suggestion,
                raw.span,
            ));

            return;
        }
    }

    let Some(native_type) = ctx
        .connector
        .parse_native_type(&raw.name, &raw.args, raw.span, ctx.diagnostics)
    else {
        return;
    };

    let Some(scalar_type) = scalar_type else { return };

    let allowed = native_type.allowed_scalar_types();

    if !allowed.contains(&scalar_type) {
        let expected_types = allowed.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" or ");

        ctx.push_error(DatamodelError::new_incompatible_native_type(
            &raw.name,
            scalar_type.as_str(),
            &expected_types,
            raw.span,
        ));

        return;
    }

    ctx.connector
        .validate_native_type_arguments(&native_type, scalar_type, raw.span, ctx.diagnostics);
}

/// Validates the @default attribute of a model scalar field
pub(super) fn validate_default_value(field: ScalarFieldWalker<'_>, ctx: &mut Context<'_>) {
    let Some(default_value) = field.default_value() else {
        return;
    };

    let model = field.model();
    let mapped_name = default_value.mapped_name();

    // Named defaults.
    if mapped_name.is_some() && !ctx.has_capability(ConnectorCapability::NamedDefaultValues) {
        let message = "You defined a database name for the default value of a field on the model. This is not supported by the provider.";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            "@default",
            default_value.span(),
        ));
    } else if mapped_name.is_some() {
        validate_db_name(model.name(), ("@default", default_value.span()), mapped_name, ctx, false);
    }

    if let Some(r#enum) = field.field_type_as_enum() {
        default_value::validate_enum_default_value(default_value.value(), r#enum, ctx);
    }

    if field.is_unsupported() && !default_value.is_dbgenerated() {
        let message = "Only @default(dbgenerated(\"...\")) can be used for Unsupported types.";

        ctx.push_error(DatamodelError::new_attribute_validation_error(
            message,
            "@default",
            default_value.span(),
        ));
    }

    default_value::validate_default_value(Some(default_value.value()), field.scalar_type(), ctx);
    default_value::validate_auto_param(Some(default_value.value()), ctx);
}

/// The field type must be available on the connector.
pub(super) fn validate_scalar_field_connector_specific(field: ScalarFieldWalker<'_>, ctx: &mut Context<'_>) {
    let model = field.model();
    let container = model.block_type();

    let unsupported_type = |type_name: &str, feature: &str| {
        DatamodelError::new_field_validation_error(
            &format!(
                "Field `{}` in {container} `{}` can't be of type {type_name}. The current connector does not support the {feature} type.",
                field.name(),
                model.name(),
            ),
            container,
            model.name(),
            field.name(),
            field.span(),
        )
    };

    match field.scalar_field_type() {
        ScalarFieldType::BuiltInScalar(ScalarType::Json) => {
            if !ctx.has_capability(ConnectorCapability::Json) {
                ctx.push_error(unsupported_type("Json", "Json"));
            }

            if field.is_list() && !ctx.has_capability(ConnectorCapability::JsonLists) {
                ctx.push_error(unsupported_type("Json[]", "Json List"));
            }
        }
        ScalarFieldType::BuiltInScalar(ScalarType::Decimal) => {
            if !ctx.has_capability(ConnectorCapability::DecimalType) {
                ctx.push_error(unsupported_type("Decimal", "Decimal"));
            }
        }
        ScalarFieldType::Enum(_) => {
            if !ctx.has_capability(ConnectorCapability::Enums) {
                let message = format!("You defined the enum field `{}`. Enums are not supported by the current connector.", field.name());

                ctx.push_error(DatamodelError::new_field_validation_error(
                    &message,
                    container,
                    model.name(),
                    field.name(),
                    field.span(),
                ));
            }
        }
        ScalarFieldType::CompositeType(_) => {
            if !ctx.has_capability(ConnectorCapability::CompositeTypes) {
                let message = format!(
                    "Field `{}` in {container} `{}` uses a composite type. Composite types are not supported by the current connector.",
                    field.name(),
                    model.name(),
                );

                ctx.push_error(DatamodelError::new_field_validation_error(
                    &message,
                    container,
                    model.name(),
                    field.name(),
                    field.span(),
                ));
            }
        }
        _ => (),
    }

    if field.is_list() && !ctx.has_capability(ConnectorCapability::ScalarLists) {
        ctx.push_error(DatamodelError::new_scalar_list_fields_are_not_supported(
            container,
            model.name(),
            field.name(),
            field.span(),
        ));
    }
}

static TYPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
    ^                           # beginning of the string
    (?P<prefix>[^(]+)           # a required prefix that is any character until the first opening brace
    (?:\((?P<params>.*?)\))?    # (optional) an opening parenthesis, a closing parenthesis and captured params in-between
    (?P<suffix>.+)?             # (optional) captured suffix after the params until the end of the string
    $                           # end of the string
    "#,
    )
    .unwrap()
});

/// An `Unsupported("...")` type the connector knows as a native type should
/// use the native type notation instead.
pub(super) fn validate_unsupported_field_type(field: ScalarFieldWalker<'_>, ctx: &mut Context<'_>) {
    let Some(source) = ctx.datasource else { return };
    let Some(unsupported_lit) = field.unsupported_type_name() else {
        return;
    };

    let Some(captures) = TYPE_REGEX.captures(unsupported_lit) else {
        return;
    };

    let Some(prefix) = captures.name("prefix").map(|m| m.as_str().trim()) else {
        return;
    };

    let args: Vec<String> = match captures.name("params") {
        None => Vec::new(),
        Some(params) => params.as_str().split(',').map(|s| s.trim().to_owned()).collect(),
    };

    let connector = ctx.connector;
    // The field is not annotated, parse errors are irrelevant here.
    let mut ignored = Diagnostics::new();

    let Some(native_type) = connector.parse_native_type(prefix, &args, field.span(), &mut ignored) else {
        return;
    };

    let Some(scalar_type) = connector.scalar_type_for_native_type(&native_type) else {
        return;
    };

    let message = format!(
        "The type `Unsupported(\"{}\")` you specified in the type definition for the field `{}` is supported as a native type. Please use the native type notation `{} @{}.{}` for full support.",
        unsupported_lit,
        field.name(),
        scalar_type.as_str(),
        source.name,
        connector.native_type_to_string(&native_type),
    );

    ctx.push_error(DatamodelError::new_validation_error(&message, field.span()));
}

pub(super) fn id_supports_clustering_setting(pk: PrimaryKeyWalker<'_>, ctx: &mut Context<'_>) {
    if ctx.has_capability(ConnectorCapability::ClusteringSetting) {
        return;
    }

    if pk.clustered().is_none() {
        return;
    }

    ctx.push_error(DatamodelError::new_attribute_validation_error(
        "Defining clustering is not supported in the current connector.",
        pk.attribute_name(),
        pk.span(),
    ));
}

/// Only one index or key can be clustered per table.
///
/// Here we check the primary key. Another check in index validations.
pub(super) fn clustering_can_be_defined_only_once(pk: PrimaryKeyWalker<'_>, ctx: &mut Context<'_>) {
    if !ctx.has_capability(ConnectorCapability::ClusteringSetting) {
        return;
    }

    if pk.clustered() == Some(false) {
        return;
    }

    if pk.model().indexes().any(|index| index.clustered() == Some(true)) {
        ctx.push_error(DatamodelError::new_attribute_validation_error(
            "A model can only hold one clustered index or id.",
            pk.attribute_name(),
            pk.span(),
        ));
    }
}
