use super::MySqlType;
use crate::datamodel_connector::{Connector, NativeTypeInstance, walker_ext_traits::ScalarFieldWalkerExt};
use diagnostics::{DatamodelWarning, Diagnostics};
use indoc::formatdoc;
use schema_graph::{
    ReferentialAction,
    walkers::{IndexWalker, PrimaryKeyWalker, RelationFieldWalker, ScalarFieldAttributeWalker},
};

const LENGTH_GUIDE: &str = " Please use the `length` argument to the field in the index definition to allow this.";

/// The first field that is a text or blob column without a length prefix.
fn first_field_without_length_prefix<'db>(
    connector: &dyn Connector,
    mut fields: impl Iterator<Item = ScalarFieldAttributeWalker<'db>>,
) -> Option<NativeTypeInstance> {
    fields.find_map(|field| {
        let native_type = field.as_index_field().native_type_instance(connector)?;

        let needs_prefix = match native_type {
            NativeTypeInstance::Mysql(ref nt) => MySqlType::needs_length_prefix_in_keys(nt),
            #[allow(unreachable_patterns)]
            _ => false,
        };

        (needs_prefix && field.length().is_none()).then_some(native_type)
    })
}

pub(crate) fn field_types_can_be_used_in_an_index(
    connector: &dyn Connector,
    index: IndexWalker<'_>,
    errors: &mut Diagnostics,
) {
    // Fulltext indexes take the whole column.
    if index.is_fulltext() {
        return;
    }

    let Some(native_type) = first_field_without_length_prefix(connector, index.scalar_field_attributes()) else {
        return;
    };

    let error = if index.is_unique() {
        connector
            .native_instance_error(&native_type)
            .new_incompatible_native_type_with_unique(LENGTH_GUIDE, index.span())
    } else {
        connector
            .native_instance_error(&native_type)
            .new_incompatible_native_type_with_index(LENGTH_GUIDE, index.span())
    };

    errors.push_error(error);
}

pub(crate) fn field_types_can_be_used_in_a_primary_key(
    connector: &dyn Connector,
    primary_key: PrimaryKeyWalker<'_>,
    errors: &mut Diagnostics,
) {
    if let Some(native_type) = first_field_without_length_prefix(connector, primary_key.scalar_field_attributes()) {
        let error = connector
            .native_instance_error(&native_type)
            .new_incompatible_native_type_with_id(LENGTH_GUIDE, primary_key.span());

        errors.push_error(error);
    }
}

pub(crate) fn uses_native_referential_action_set_default(
    connector: &dyn Connector,
    field: RelationFieldWalker<'_>,
    diagnostics: &mut Diagnostics,
) {
    let warning_msg = || {
        formatdoc!(
            r#"
            {connector_name} does not actually support the `{set_default}` referential action, so using it may result in unexpected errors.
            Read more at https://pris.ly/d/mysql-set-default"#,
            connector_name = connector.name(),
            set_default = ReferentialAction::SetDefault.as_str(),
        )
        .replace('\n', " ")
    };

    if let Some(ReferentialAction::SetDefault) = field.explicit_on_delete() {
        let span = field.explicit_on_delete_span().unwrap_or_else(|| field.span());
        diagnostics.push_warning(DatamodelWarning::new(warning_msg(), span));
    }

    if let Some(ReferentialAction::SetDefault) = field.explicit_on_update() {
        let span = field.explicit_on_update_span().unwrap_or_else(|| field.span());
        diagnostics.push_warning(DatamodelWarning::new(warning_msg(), span));
    }
}
