use diagnostics::{DatamodelError, DatamodelWarning, Diagnostics};
use schema_graph::walkers::{IndexWalker, ModelWalker, PrimaryKeyWalker, RelationFieldWalker, ScalarFieldWalker};

/// If `@default(auto())`, then also `@db.ObjectId`
pub(super) fn objectid_type_required_with_auto_attribute(field: ScalarFieldWalker<'_>, errors: &mut Diagnostics) {
    if !field.default_value().map(|val| val.is_auto()).unwrap_or(false) {
        return;
    }

    if matches!(field.raw_native_type().map(|t| t.name.as_str()), Some("ObjectId")) {
        return;
    }

    errors.push_error(DatamodelError::new_field_validation_error(
        "MongoDB `@default(auto())` fields must have `ObjectId` native type.",
        field.model().block_type(),
        field.model().name(),
        field.name(),
        field.span(),
    ));
}

/// If `@default(auto())`, then also `@id`.
pub(super) fn auto_attribute_must_be_an_id(field: ScalarFieldWalker<'_>, errors: &mut Diagnostics) {
    if field.is_single_pk() || field.is_part_of_a_compound_pk() {
        return;
    }

    if !field.default_value().map(|val| val.is_auto()).unwrap_or(false) {
        return;
    }

    errors.push_error(DatamodelError::new_field_validation_error(
        "MongoDB `@default(auto())` fields must have the `@id` attribute.",
        field.model().block_type(),
        field.model().name(),
        field.name(),
        field.span(),
    ));
}

/// `@default(dbgenerated())` is only for SQL connectors.
pub(super) fn dbgenerated_attribute_is_not_allowed(field: ScalarFieldWalker<'_>, errors: &mut Diagnostics) {
    if !field.default_value().map(|val| val.is_dbgenerated()).unwrap_or(false) {
        return;
    }

    errors.push_error(DatamodelError::new_field_validation_error(
        "The `dbgenerated()` function is not allowed with MongoDB. Please use `auto()` instead.",
        field.model().block_type(),
        field.model().name(),
        field.name(),
        field.span(),
    ));
}

/// The primary key of a collection is always stored in `_id`.
pub(super) fn id_field_must_have_a_correct_mapped_name(pk: PrimaryKeyWalker<'_>, errors: &mut Diagnostics) {
    if pk.fields().len() > 1 {
        errors.push_error(DatamodelError::new_invalid_model_error(
            "MongoDB models require exactly one identity field annotated with @id",
            pk.span(),
        ));
        return;
    }

    let Some(field) = pk.fields().next().and_then(|f| f.as_scalar_field()) else {
        return;
    };

    if field.name() == "_id" || field.mapped_name() == Some("_id") {
        return;
    }

    let msg = match field.mapped_name() {
        Some(name) => format!("MongoDB model IDs must have a @map(\"_id\") annotation, found @map(\"{name}\")."),
        None => "MongoDB model IDs must have a @map(\"_id\") annotations.".to_owned(),
    };

    errors.push_error(DatamodelError::new_field_validation_error(
        &msg,
        field.model().block_type(),
        field.model().name(),
        field.name(),
        field.span(),
    ));
}

/// Must define one field as an `@id`.
pub(super) fn id_must_be_defined(model: ModelWalker<'_>, errors: &mut Diagnostics) {
    if model.primary_key().is_some() {
        return;
    }

    errors.push_error(DatamodelError::new_invalid_model_error(
        "MongoDB models require exactly one identity field annotated with @id",
        model.span(),
    ));
}

/// We can define only one index with the same parameters.
pub(super) fn index_is_not_defined_multiple_times_to_same_fields(index: IndexWalker<'_>, errors: &mut Diagnostics) {
    let hits = index
        .model()
        .indexes()
        .filter(|i| i.id() != index.id())
        .filter(|i| i.contains_exactly_the_fields(index.scalar_field_attributes()))
        .count();

    if hits == 0 {
        return;
    }

    errors.push_error(DatamodelError::new_attribute_validation_error(
        "Index already exists in the model.",
        index.attribute_name(),
        index.span(),
    ))
}

/// A field cannot have `@id` and `@unique` attributes at the same time.
pub(super) fn unique_cannot_be_defined_to_id_field(index: IndexWalker<'_>, errors: &mut Diagnostics) {
    if !index.is_unique() || index.fields().len() != 1 {
        return;
    }

    if !index.fields().any(|field| field.is_single_pk()) {
        return;
    }

    errors.push_error(DatamodelError::new_attribute_validation_error(
        "The same field cannot be an id and unique on MongoDB.",
        index.attribute_name(),
        index.span(),
    ));
}

/// A field name cannot contain the `.` character and it cannot start with `$`.
pub(super) fn field_name_uses_valid_characters(field: ScalarFieldWalker<'_>, errors: &mut Diagnostics) {
    let Some(name) = field.mapped_name() else {
        return;
    };

    if name.starts_with('$') {
        errors.push_error(DatamodelError::new_attribute_validation_error(
            "The field name cannot start with a `$` character",
            "@map",
            field.span(),
        ));
    }

    if name.contains('.') {
        errors.push_error(DatamodelError::new_attribute_validation_error(
            "The field name cannot contain a `.` character",
            "@map",
            field.span(),
        ));
    }
}

/// Joins compare the stored BSON values, so both sides of a relation need
/// the same native type.
pub(super) fn relation_same_native_type(field: RelationFieldWalker<'_>, errors: &mut Diagnostics) {
    let (Some(fields), Some(references)) = (field.referencing_fields(), field.referenced_fields()) else {
        return;
    };

    for (a_field, b_ref) in fields.zip(references) {
        let field_nt = a_field.raw_native_type().map(|nt| (nt.scope.as_str(), nt.name.as_str()));
        let ref_nt = b_ref.raw_native_type().map(|nt| (nt.scope.as_str(), nt.name.as_str()));

        let a_model_name = a_field.model().name();
        let a_field_name = a_field.name();
        let b_model_name = b_ref.model().name();
        let b_field_name = b_ref.name();

        let msg = match (field_nt, ref_nt) {
            (Some(a), Some(b)) if a.1 != b.1 => format!(
                "Field {a_model_name}.{a_field_name} and {b_model_name}.{b_field_name} must have the same native type for MongoDB to join those collections correctly. Consider updating those fields to either use '@{}.{}' or '@{}.{}'.",
                a.0, a.1, b.0, b.1
            ),
            (None, Some(b)) => format!(
                "Field {a_model_name}.{a_field_name} and {b_model_name}.{b_field_name} must have the same native type for MongoDB to join those collections correctly. Consider either removing {b_model_name}.{b_field_name}'s native type attribute or adding '@{}.{}' to {a_model_name}.{a_field_name}.",
                b.0, b.1
            ),
            (Some(a), None) => format!(
                "Field {a_model_name}.{a_field_name} and {b_model_name}.{b_field_name} must have the same native type for MongoDB to join those collections correctly. Consider either removing {a_model_name}.{a_field_name}'s native type attribute or adding '@{}.{}' to {b_model_name}.{b_field_name}.",
                a.0, a.1
            ),
            _ => continue,
        };

        let msg = format!("{msg} Beware that this will become an error in the future.");

        errors.push_warning(DatamodelWarning::new_field_validation(
            &msg,
            field.model().name(),
            field.name(),
            a_field.span(),
        ));
    }
}
