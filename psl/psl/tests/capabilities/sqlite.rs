use crate::common::*;

#[test]
fn scalar_lists_are_not_supported() {
    let mut schema = with_datasource(Provider::Sqlite);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("tags", ScalarType::String).list();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Field \"tags\" in model \"Post\" can't be a list. The current connector does not support lists of primitive types.",
            ]
        "#]],
    );
}

#[test]
fn enum_fields_are_not_supported() {
    let mut schema = with_datasource(Provider::Sqlite);
    schema.enumeration("Role").value("ADMIN");

    let model = schema.model("User");
    model.scalar("id", ScalarType::Int).id();
    model.field("role", "Role");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating field `role` in model `User`: You defined the enum field `role`. Enums are not supported by the current connector.",
                "Error validating: You defined the enum `Role`. But the current connector does not support enums.",
            ]
        "#]],
    );
}

#[test]
fn autoincrement_is_only_allowed_on_the_id() {
    let mut schema = with_datasource(Provider::Sqlite);
    let model = schema.model("Counter");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("value", ScalarType::Int).default_fn("autoincrement");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@default\": The `autoincrement()` default value is used on a non-id field even though the datasource does not support this.",
                "Error parsing attribute \"@default\": The `autoincrement()` default value is used on a non-indexed field even though the datasource does not support this.",
            ]
        "#]],
    );
}

#[test]
fn json_and_decimal_fields_are_valid() {
    let mut schema = with_datasource(Provider::Sqlite);
    let model = schema.model("Invoice");
    model.scalar("id", ScalarType::Int).id().default_fn("autoincrement");
    model.scalar("amount", ScalarType::Decimal);
    model.scalar("metadata", ScalarType::Json).optional();

    assert_valid(schema);
}

#[test]
fn named_foreign_keys_are_not_supported() {
    let mut schema = with_datasource(Provider::Sqlite);

    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("posts", "Post").list();

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int);
    post.relation("author", "User")
        .fields(["authorId"])
        .references(["id"])
        .map("post_author_fkey");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": Your provider does not support named foreign keys.",
            ]
        "#]],
    );
}
