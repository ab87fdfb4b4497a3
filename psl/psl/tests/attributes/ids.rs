use crate::common::*;

#[test]
fn models_need_a_strict_unique_criteria() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.model("Log").scalar("message", ScalarType::String);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating model \"Log\": Each model must have at least one unique criteria that has only required fields. Either mark a single field with `@id`, `@unique` or add a multi field criterion with `@@id([])` or `@@unique([])` to the model.",
            ]
        "#]],
    );
}

#[test]
fn optional_unique_fields_are_listed_as_loose_criterias() {
    let mut schema = with_datasource(Provider::Postgres);
    schema
        .model("User")
        .scalar("email", ScalarType::String)
        .optional()
        .unique();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating model \"User\": Each model must have at least one unique criteria that has only required fields. Either mark a single field with `@id`, `@unique` or add a multi field criterion with `@@id([])` or `@@unique([])` to the model. The following unique criterias were not considered as they contain fields that are not required:\n- email",
            ]
        "#]],
    );
}

#[test]
fn compound_ids_are_valid_on_postgres() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Membership");
    model.scalar("userId", ScalarType::Int);
    model.scalar("groupId", ScalarType::Int);
    model.id(["userId", "groupId"]).map("membership_pk");

    assert_valid(schema);
}

#[test]
fn mapped_primary_keys_need_connector_support() {
    let mut schema = with_datasource(Provider::Mysql);
    let model = schema.model("Membership");
    model.scalar("userId", ScalarType::Int);
    model.scalar("groupId", ScalarType::Int);
    model.id(["userId", "groupId"]).map("membership_pk");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating model \"Membership\": You defined a database name for the primary key on the model. This is not supported by the provider.",
            ]
        "#]],
    );
}

#[test]
fn mysql_autoincrement_is_limited_to_one_indexed_field() {
    let mut schema = with_datasource(Provider::Mysql);
    let model = schema.model("Counter");
    model.scalar("id", ScalarType::Int).id().default_fn("autoincrement");
    model.scalar("value", ScalarType::Int).default_fn("autoincrement");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@default\": The `autoincrement()` default value is used multiple times on this model even though the underlying datasource only supports one instance per table.",
                "Error parsing attribute \"@default\": The `autoincrement()` default value is used on a non-indexed field even though the datasource does not support this.",
            ]
        "#]],
    );
}
