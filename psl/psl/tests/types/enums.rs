use crate::common::*;

#[test]
fn enums_are_valid_on_postgres() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.enumeration("Role").value("ADMIN").mapped_value("USER", "user");

    let model = schema.model("User");
    model.scalar("id", ScalarType::Int).id();
    model.field("role", "Role").default_value(Expression::constant("USER"));

    assert_valid(schema);
}

#[test]
fn sqlite_does_not_support_enums() {
    let mut schema = with_datasource(Provider::Sqlite);
    schema.enumeration("Role").value("ADMIN");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: You defined the enum `Role`. But the current connector does not support enums.",
            ]
        "#]],
    );
}

#[test]
fn enum_values_must_be_unique() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.enumeration("Color").value("Red").value("Green").value("Red");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating enum `Color`: Value `Red` is already defined on enum `Color`.",
            ]
        "#]],
    );
}

#[test]
fn enums_need_a_value() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.enumeration("Nothing");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating enum `Nothing`: An enum must have at least one value.",
            ]
        "#]],
    );
}

#[test]
fn enum_schemas_need_the_preview_feature() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.enumeration("Role").value("ADMIN").schema("auth");

    expect_errors(
        schema,
        expect![[r#"
            [
                "@@schema is only available with the `multiSchema` preview feature.",
            ]
        "#]],
    );
}

#[test]
fn enum_schemas_must_be_declared_on_the_datasource() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgresql")
        .string("url", "postgresql://localhost:5432/test")
        .array("schemas", &["public"]);
    schema
        .generator("client")
        .string("provider", "prisma-client-js")
        .array("previewFeatures", &["multiSchema"]);

    schema.enumeration("Role").value("ADMIN").schema("auth");
    schema.enumeration("Status").value("ACTIVE");

    expect_errors(
        schema,
        expect![[r#"
            [
                "This schema is not defined in the datasource. Read more on `@@schema` at https://pris.ly/d/multi-schema",
                "This enum is missing an `@@schema` attribute.",
            ]
        "#]],
    );
}
