use crate::common::*;
use psl::schema_graph::IndexField;

#[test]
fn spgist_indexes_cover_a_single_column() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Address");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("street", ScalarType::String);
    model.scalar("city", ScalarType::String);
    model.index(["street", "city"]).algorithm(IndexAlgorithm::SpGist);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@index\": SpGist does not support multi-column indices.",
            ]
        "#]],
    );
}

#[test]
fn single_column_spgist_indexes_are_valid() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Address");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("street", ScalarType::String);
    model.index(["street"]).algorithm(IndexAlgorithm::SpGist);

    assert_valid(schema);
}

#[test]
fn index_types_need_connector_support() {
    let mut schema = with_datasource(Provider::Sqlite);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("title", ScalarType::String);
    model.index(["title"]).algorithm(IndexAlgorithm::Hash);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@index\": The given type argument is not supported with the current connector",
            ]
        "#]],
    );
}

#[test]
fn hash_indexes_cannot_be_sorted() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("title", ScalarType::String);
    model
        .index([IndexField::new("title").desc()])
        .algorithm(IndexAlgorithm::Hash);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@index\": Hash type does not support sort option.",
            ]
        "#]],
    );
}

#[test]
fn length_prefixes_need_connector_support() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("title", ScalarType::String);
    model.index([IndexField::new("title").length(10)]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@index\": The length argument is not supported in an index definition with the current connector",
            ]
        "#]],
    );
}

#[test]
fn fulltext_indexes_need_connector_support() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("title", ScalarType::String);
    model.fulltext(["title"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@fulltext\": Defining fulltext indexes is not supported with the current connector.",
            ]
        "#]],
    );
}

#[test]
fn fulltext_indexes_are_valid_on_mysql() {
    let mut schema = with_datasource(Provider::Mysql);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("title", ScalarType::String);
    model.scalar("body", ScalarType::String);
    model.fulltext(["title", "body"]);

    assert_valid(schema);
}

#[test]
fn clustering_needs_connector_support() {
    let mut schema = with_datasource(Provider::Mysql);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.scalar("slug", ScalarType::Int);
    model.index(["slug"]).clustered(true);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@index\": Defining clustering is not supported in the current connector.",
            ]
        "#]],
    );
}

#[test]
fn indexes_need_fields() {
    let mut schema = with_datasource(Provider::Postgres);
    let model = schema.model("Post");
    model.scalar("id", ScalarType::Int).id();
    model.index(Vec::<&str>::new());

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@index\": The list of fields in an index cannot be empty. Please specify at least one field.",
            ]
        "#]],
    );
}

#[test]
fn foreign_key_names_are_global_on_mysql() {
    let mut schema = with_datasource(Provider::Mysql);

    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("posts", "Post").list();
    user.relation("comments", "Comment").list();

    for name in ["Post", "Comment"] {
        let model = schema.model(name);
        model.scalar("id", ScalarType::Int).id();
        model.scalar("authorId", ScalarType::Int);
        model
            .relation("author", "User")
            .fields(["authorId"])
            .references(["id"])
            .map("author_fk");
    }

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The given constraint name `author_fk` has to be unique in the following namespace: global for foreign keys. Please provide a different name using the `map` argument.",
                "Error parsing attribute \"@relation\": The given constraint name `author_fk` has to be unique in the following namespace: global for foreign keys. Please provide a different name using the `map` argument.",
            ]
        "#]],
    );
}

#[test]
fn default_constraint_names_are_global_on_sql_server() {
    let mut schema = with_datasource(Provider::SqlServer);

    for name in ["Post", "Comment"] {
        let model = schema.model(name);
        model.scalar("id", ScalarType::Int).id();
        model
            .scalar("likes", ScalarType::Int)
            .named_default(Expression::numeric(0), "likes_df");
    }

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@default\": The given constraint name `likes_df` has to be unique in the following namespace: global for primary keys, foreign keys and default constraints. Please provide a different name using the `map` argument.",
                "Error parsing attribute \"@default\": The given constraint name `likes_df` has to be unique in the following namespace: global for primary keys, foreign keys and default constraints. Please provide a different name using the `map` argument.",
            ]
        "#]],
    );
}

#[test]
fn generated_default_constraint_names_do_not_collide() {
    let mut schema = with_datasource(Provider::SqlServer);

    for name in ["Post", "Comment"] {
        let model = schema.model(name);
        model.scalar("id", ScalarType::Int).id();
        model.scalar("likes", ScalarType::Int).default_value(Expression::numeric(0));
    }

    assert_valid(schema);
}

#[test]
fn index_names_are_scoped_to_the_model_on_mongodb() {
    let mut schema = with_datasource(Provider::Mongo);

    let post = schema.model("Post");
    post.scalar("id", ScalarType::String).id().map("_id");
    post.scalar("title", ScalarType::String);
    post.scalar("body", ScalarType::String);
    post.index(["title"]).map("by_text");
    post.index(["body"]).map("by_text");

    let comment = schema.model("Comment");
    comment.scalar("id", ScalarType::String).id().map("_id");
    comment.scalar("body", ScalarType::String);
    comment.index(["body"]).map("by_text");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@@index\": The given constraint name `by_text` has to be unique in the following namespace: on model `Post` for indexes and unique constraints. Please provide a different name using the `map` argument.",
                "Error parsing attribute \"@@index\": The given constraint name `by_text` has to be unique in the following namespace: on model `Post` for indexes and unique constraints. Please provide a different name using the `map` argument.",
            ]
        "#]],
    );
}
