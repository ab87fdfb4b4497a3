use super::MsSqlType;
use crate::datamodel_connector::{Connector, NativeTypeInstance, walker_ext_traits::ScalarFieldWalkerExt};
use diagnostics::Diagnostics;
use schema_graph::walkers::{IndexFieldWalker, IndexWalker, PrimaryKeyWalker};

fn first_heap_allocated_field<'db>(
    connector: &dyn Connector,
    mut fields: impl Iterator<Item = IndexFieldWalker<'db>>,
) -> Option<NativeTypeInstance> {
    fields.find_map(|field| {
        let native_type = field.native_type_instance(connector)?;

        let heap_allocated = match native_type {
            NativeTypeInstance::MsSql(ref nt) => MsSqlType::is_heap_allocated(nt),
            #[allow(unreachable_patterns)]
            _ => false,
        };

        heap_allocated.then_some(native_type)
    })
}

/// Heap allocated types cannot be indexed, except with a fulltext index.
pub(super) fn index_uses_correct_field_types(
    connector: &dyn Connector,
    index: IndexWalker<'_>,
    errors: &mut Diagnostics,
) {
    if index.is_fulltext() {
        return;
    }

    let Some(native_type) = first_heap_allocated_field(connector, index.fields()) else {
        return;
    };

    let error = connector.native_instance_error(&native_type);

    if index.is_unique() {
        errors.push_error(error.new_incompatible_native_type_with_unique("", index.span()))
    } else {
        errors.push_error(error.new_incompatible_native_type_with_index("", index.span()))
    }
}

pub(super) fn primary_key_uses_correct_field_types(
    connector: &dyn Connector,
    pk: PrimaryKeyWalker<'_>,
    errors: &mut Diagnostics,
) {
    if let Some(native_type) = first_heap_allocated_field(connector, pk.fields()) {
        let error = connector.native_instance_error(&native_type);
        errors.push_error(error.new_incompatible_native_type_with_id("", pk.span()));
    }
}
