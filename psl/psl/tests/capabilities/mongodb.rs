use crate::common::*;

#[test]
fn ids_must_be_mapped_to_underscore_id() {
    let mut schema = with_datasource(Provider::Mongo);
    schema.model("User").scalar("uid", ScalarType::String).id();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating field `uid` in model `User`: MongoDB model IDs must have a @map(\"_id\") annotations.",
            ]
        "#]],
    );
}

#[test]
fn ids_mapped_to_another_name_are_reported_with_the_name() {
    let mut schema = with_datasource(Provider::Mongo);
    schema.model("User").scalar("uid", ScalarType::String).id().map("user_id");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating field `uid` in model `User`: MongoDB model IDs must have a @map(\"_id\") annotation, found @map(\"user_id\").",
            ]
        "#]],
    );
}

#[test]
fn object_id_primary_keys_are_valid() {
    let mut schema = with_datasource(Provider::Mongo);
    let model = schema.model("User");
    model
        .scalar("id", ScalarType::String)
        .id()
        .map("_id")
        .default_fn("auto")
        .native_type("db", "ObjectId", &[]);
    model.scalar("tags", ScalarType::String).list();

    assert_valid(schema);
}

#[test]
fn implicit_many_to_many_relations_are_not_supported() {
    let mut schema = with_datasource(Provider::Mongo);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::String).id().map("_id");
    post.relation("tags", "Tag").list();

    let tag = schema.model("Tag");
    tag.scalar("id", ScalarType::String).id().map("_id");
    tag.relation("posts", "Post").list();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: Implicit many-to-many relations are not supported on MongoDB. Please use the syntax defined in https://pris.ly/d/document-database-many-to-many",
                "Error validating: Implicit many-to-many relations are not supported on MongoDB. Please use the syntax defined in https://pris.ly/d/document-database-many-to-many",
            ]
        "#]],
    );
}

#[test]
fn two_way_embedded_many_to_many_relations_are_valid() {
    let mut schema = with_datasource(Provider::Mongo);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::String).id().map("_id");
    post.scalar("tagIds", ScalarType::String).list();
    post.relation("tags", "Tag").list().fields(["tagIds"]).references(["id"]);

    let tag = schema.model("Tag");
    tag.scalar("id", ScalarType::String).id().map("_id");
    tag.scalar("postIds", ScalarType::String).list();
    tag.relation("posts", "Post").list().fields(["postIds"]).references(["id"]);

    assert_valid(schema);
}

#[test]
fn autoincrement_is_not_supported() {
    let mut schema = with_datasource(Provider::Mongo);
    schema
        .model("User")
        .scalar("id", ScalarType::Int)
        .id()
        .map("_id")
        .default_fn("autoincrement");

    let errors = error_messages(schema);

    assert!(
        errors.contains(
            &"Error parsing attribute \"@default\": The `autoincrement()` default value is used with a datasource that does not support it."
                .to_owned()
        ),
        "{errors:?}"
    );
}

#[test]
fn foreign_keys_relation_mode_is_rejected() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "mongodb")
        .string("url", "mongodb://localhost:27017/test")
        .string("relationMode", "foreignKeys");

    let errors = error_messages(schema);

    assert_eq!(
        errors,
        ["Error validating datasource `relationMode`: Invalid relation mode setting: \"foreignKeys\". Supported values: \"prisma\""]
    );
}
