use super::PostgresType;
use crate::datamodel_connector::{Connector, NativeTypeInstance, walker_ext_traits::ScalarFieldWalkerExt};
use diagnostics::{DatamodelError, Diagnostics};
use schema_graph::{
    IndexAlgorithm, ScalarFieldType, ScalarType,
    walkers::{IndexFieldWalker, IndexWalker},
};

fn postgres_type(native_type: &NativeTypeInstance) -> Option<PostgresType> {
    match native_type {
        NativeTypeInstance::Postgres(nt) => Some(*nt),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Xml columns have no equality operator, and cannot be indexed.
pub(super) fn compatible_native_types(index: IndexWalker<'_>, connector: &dyn Connector, errors: &mut Diagnostics) {
    for field in index.fields() {
        let Some(native_type) = field.native_type_instance(connector) else {
            continue;
        };

        if postgres_type(&native_type) != Some(PostgresType::Xml) {
            continue;
        }

        let error = connector.native_instance_error(&native_type);
        let span = field.span();

        if index.is_unique() {
            errors.push_error(error.new_incompatible_native_type_with_unique("", span))
        } else {
            errors.push_error(error.new_incompatible_native_type_with_index("", span))
        };

        break;
    }
}

/// Cannot have more than one column in SP-GiST indices.
pub(super) fn spgist_indexed_column_count(index: IndexWalker<'_>, errors: &mut Diagnostics) {
    if !matches!(index.algorithm(), Some(IndexAlgorithm::SpGist)) {
        return;
    }

    if index.fields().len() == 1 {
        return;
    }

    errors.push_error(DatamodelError::new_attribute_validation_error(
        "SpGist does not support multi-column indices.",
        index.attribute_name(),
        index.span(),
    ));
}

/// The GiST, GIN, SP-GiST and BRIN index types need a default operator
/// class for the column type.
pub(super) fn generalized_index_validations(
    index: IndexWalker<'_>,
    connector: &dyn Connector,
    errors: &mut Diagnostics,
) {
    let algo = index.algorithm().unwrap_or(IndexAlgorithm::BTree);

    if matches!(algo, IndexAlgorithm::BTree | IndexAlgorithm::Hash) {
        return;
    }

    for field in index.fields() {
        let native_type_instance = field.native_type_instance(connector);
        let native_type = native_type_instance.as_ref().and_then(postgres_type);

        let supported = match native_type {
            Some(native_type) => has_default_operator_class(algo, native_type, field),
            None => supports_field_type(algo, field),
        };

        if supported {
            continue;
        }

        let msg = match native_type_instance {
            Some(nt) => format!(
                "The {algo} index field type `{}` has no default operator class.",
                connector.native_type_to_parts(&nt).0
            ),
            None => format!(
                "The {algo} index type does not support the type of the field `{}`.",
                field.name()
            ),
        };

        errors.push_error(DatamodelError::new_attribute_validation_error(
            &msg,
            index.attribute_name(),
            index.span(),
        ));
    }
}

fn has_default_operator_class(algo: IndexAlgorithm, native_type: PostgresType, field: IndexFieldWalker<'_>) -> bool {
    use PostgresType::*;

    match algo {
        IndexAlgorithm::Gist => matches!(native_type, Inet),
        IndexAlgorithm::Gin => field.is_list() || matches!(native_type, JsonB),
        IndexAlgorithm::SpGist => matches!(native_type, Inet | Text | VarChar(_) | Char(_)),
        IndexAlgorithm::Brin => matches!(
            native_type,
            Bit(_)
                | VarBit(_)
                | Char(_)
                | Date
                | Real
                | DoublePrecision
                | Inet
                | SmallInt
                | Integer
                | BigInt
                | Decimal(_)
                | Oid
                | ByteA
                | Text
                | VarChar(_)
                | Time(_)
                | Timetz(_)
                | Timestamp(_)
                | Timestamptz(_)
                | Uuid
        ),
        IndexAlgorithm::BTree | IndexAlgorithm::Hash => true,
    }
}

fn supports_field_type(algo: IndexAlgorithm, field: IndexFieldWalker<'_>) -> bool {
    let scalar_type = match field.scalar_field_type() {
        ScalarFieldType::BuiltInScalar(scalar_type) => scalar_type,
        _ => return false,
    };

    match algo {
        IndexAlgorithm::Gist => false,
        IndexAlgorithm::Gin => field.is_list() || scalar_type.is_json(),
        IndexAlgorithm::SpGist => scalar_type.is_string(),
        IndexAlgorithm::Brin => !matches!(scalar_type, ScalarType::Json | ScalarType::Boolean) && !field.is_list(),
        IndexAlgorithm::BTree | IndexAlgorithm::Hash => true,
    }
}
