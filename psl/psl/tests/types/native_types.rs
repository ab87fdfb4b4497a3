use crate::common::*;

#[test]
fn sqlite_does_not_support_native_types() {
    let mut schema = with_datasource(Provider::Sqlite);
    let model = schema.model("User");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("name", ScalarType::String).native_type("db", "VarChar", &["10"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Native types are not supported with sqlite connector",
            ]
        "#]],
    );
}

#[test]
fn postgres_native_types_matching_the_field_type_are_valid() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Blog");
    model.scalar("id", ScalarType::Int).id().native_type("db", "Integer", &[]);
    model.scalar("title", ScalarType::String).native_type("db", "VarChar", &["255"]);
    model.scalar("body", ScalarType::String).native_type("db", "Text", &[]);
    model.scalar("published", ScalarType::Boolean).native_type("db", "Boolean", &[]);

    assert_valid(schema);
}

#[test]
fn unknown_native_types_name_the_connector() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Blog");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("title", ScalarType::String).native_type("db", "Varchar2", &["10"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Native type Varchar2 is not supported for Postgres connector.",
            ]
        "#]],
    );
}

#[test]
fn native_types_must_be_compatible_with_the_field_type() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Blog");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("views", ScalarType::Int).native_type("db", "VarChar", &["10"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Native type VarChar is not compatible with declared field type Int, expected field type String.",
            ]
        "#]],
    );
}

#[test]
fn native_types_must_use_the_datasource_name_as_prefix() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Blog");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("title", ScalarType::String).native_type("pg", "Text", &[]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "The prefix pg is invalid. It must be equal to the name of an existing datasource e.g. db. Did you mean to use db.Text?",
            ]
        "#]],
    );
}

#[test]
fn decimal_scale_must_not_exceed_precision() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Invoice");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("amount", ScalarType::Decimal).native_type("db", "Decimal", &["4", "6"]);

    let errors = error_messages(schema);

    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(
        errors[0].starts_with("The scale must not be larger than the precision for the Decimal"),
        "{errors:?}"
    );
}

#[test]
fn native_type_argument_counts_are_checked() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Blog");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("body", ScalarType::String).native_type("db", "Text", &["10"]);

    let errors = error_messages(schema);

    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].starts_with("Native type Text takes 0"), "{errors:?}");
}
