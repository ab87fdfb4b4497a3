use crate::common::*;

#[test]
fn implicit_many_to_many_relations_are_valid_on_sql_databases() {
    let mut schema = with_datasource(Provider::Postgres);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.relation("tags", "Tag").list();

    let tag = schema.model("Tag");
    tag.scalar("id", ScalarType::Int).id();
    tag.relation("posts", "Post").list();

    assert_valid(schema);
}

#[test]
fn implicit_many_to_many_relations_cannot_have_referential_actions() {
    let mut schema = with_datasource(Provider::Postgres);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.relation("tags", "Tag")
        .list()
        .on_delete(ReferentialAction::Cascade);

    let tag = schema.model("Tag");
    tag.scalar("id", ScalarType::Int).id();
    tag.relation("posts", "Post").list();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: Referential actions on implicit many-to-many relations are not supported",
            ]
        "#]],
    );
}

#[test]
fn both_models_need_a_single_field_id() {
    let mut schema = with_datasource(Provider::Postgres);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.relation("tags", "Tag").list();

    let tag = schema.model("Tag");
    tag.scalar("name", ScalarType::String).unique();
    tag.relation("posts", "Post").list();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating field `tags` in model `Post`: The relation field `tags` on model `Post` references `Tag` which does not have an `@id` field. Models without `@id` cannot be part of a many to many relation. Use an explicit intermediate Model to represent this relationship.",
            ]
        "#]],
    );
}

#[test]
fn implicit_many_to_many_relations_cannot_define_references() {
    let mut schema = with_datasource(Provider::Postgres);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.relation("tags", "Tag").list().references(["id"]);

    let tag = schema.model("Tag");
    tag.scalar("id", ScalarType::Int).id();
    tag.relation("posts", "Post").list();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": Implicit many-to-many relation should not have references argument defined. Either remove it, or change the relation to one-to-many.",
            ]
        "#]],
    );
}
