use crate::common::*;

fn user_with_posts(schema: &mut SchemaBuilder) {
    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.scalar("email", ScalarType::String);
    user.relation("posts", "Post").list();
}

#[test]
fn a_one_to_many_relation_is_valid() {
    let mut schema = with_datasource(Provider::Postgres);
    user_with_posts(&mut schema);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int);
    post.relation("author", "User").fields(["authorId"]).references(["id"]);

    let validated = assert_valid(schema);

    assert_eq!(validated.graph.walk_relations().count(), 1);
}

#[test]
fn the_forward_side_must_specify_fields_and_references() {
    let mut schema = with_datasource(Provider::Postgres);
    user_with_posts(&mut schema);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int);
    post.relation("author", "User");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The relation field `author` on Model `Post` must specify the `fields` argument in the @relation attribute. You can run `prisma format` to fix this automatically.",
                "Error parsing attribute \"@relation\": The relation field `author` on Model `Post` must specify the `references` argument in the @relation attribute. You can run `prisma format` to fix this automatically.",
            ]
        "#]],
    );
}

#[test]
fn the_opposite_relation_field_is_required() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.model("User").scalar("id", ScalarType::Int).id();

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int);
    post.relation("author", "User").fields(["authorId"]).references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating field `author` in model `Post`: The relation field `author` on model `Post` is missing an opposite relation field on the model `User`. Either run `prisma format` or add it manually.",
            ]
        "#]],
    );
}

#[test]
fn fields_and_references_must_have_the_same_length() {
    let mut schema = with_datasource(Provider::Postgres);
    user_with_posts(&mut schema);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int);
    post.relation("author", "User")
        .fields(["authorId"])
        .references(["id", "email"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: You must specify the same number of fields in `fields` and `references`.",
            ]
        "#]],
    );
}

#[test]
fn referencing_and_referenced_types_must_match() {
    let mut schema = with_datasource(Provider::Postgres);
    user_with_posts(&mut schema);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::String);
    post.relation("author", "User").fields(["authorId"]).references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The type of the field `authorId` in the model `Post` is not matching the type of the referenced field `id` in model `User`.",
            ]
        "#]],
    );
}

#[test]
fn references_must_point_to_a_unique_criteria() {
    let mut schema = with_datasource(Provider::Postgres);
    user_with_posts(&mut schema);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorEmail", ScalarType::String);
    post.relation("author", "User")
        .fields(["authorEmail"])
        .references(["email"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: The argument `references` must refer to a unique criteria in the related model `User`. But it is referencing the following fields that are not a unique criteria: email",
            ]
        "#]],
    );
}

#[test]
fn a_required_relation_cannot_use_optional_fields() {
    let mut schema = with_datasource(Provider::Postgres);
    user_with_posts(&mut schema);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int).optional();
    post.relation("author", "User").fields(["authorId"]).references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: The relation field `author` uses the scalar fields authorId. At least one of those fields is optional. Hence the relation field must be optional as well.",
            ]
        "#]],
    );
}

#[test]
fn the_list_side_cannot_define_referential_actions() {
    let mut schema = with_datasource(Provider::Postgres);

    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("posts", "Post")
        .list()
        .on_delete(ReferentialAction::Cascade);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int);
    post.relation("author", "User").fields(["authorId"]).references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The relation field `posts` on Model `User` must not specify the `onDelete` or `onUpdate` argument in the @relation attribute. You must only specify it on the opposite field `author` on model `Post`, or in case of a many to many relation, in an explicit join table.",
            ]
        "#]],
    );
}
