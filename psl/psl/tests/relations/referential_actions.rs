use crate::common::*;
use psl::schema_graph::ModelBuilder;

fn with_relation_mode(provider: Provider, relation_mode: &str) -> SchemaBuilder {
    init_logging();

    let mut schema = SchemaBuilder::new();
    let (provider, url) = provider.provider_and_url();

    schema
        .datasource("db")
        .string("provider", provider)
        .string("url", url)
        .string("relationMode", relation_mode);

    schema
}

/// Returns the `Post` model holding the foreign key.
fn user_and_post(schema: &mut SchemaBuilder, on_delete: Option<ReferentialAction>) -> &mut ModelBuilder {
    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("posts", "Post").list();

    let post = schema.model("Post");
    post.scalar("id", ScalarType::Int).id();
    post.scalar("authorId", ScalarType::Int);

    let author = post.relation("author", "User").fields(["authorId"]).references(["id"]);

    if let Some(action) = on_delete {
        author.on_delete(action);
    }

    post
}

#[test]
fn set_default_on_mysql_is_a_warning() {
    let mut schema = with_datasource(Provider::Mysql);
    user_and_post(&mut schema, Some(ReferentialAction::SetDefault));

    let validated = validate(schema);
    let errors: Vec<_> = validated.diagnostics.errors().map(|e| e.message()).collect();
    let warnings: Vec<_> = validated.diagnostics.warnings().map(|w| w.message().to_owned()).collect();

    assert!(errors.is_empty(), "{errors:?}");

    expect![[r#"
        [
            "MySQL does not actually support the `SetDefault` referential action, so using it may result in unexpected errors. Read more at https://pris.ly/d/mysql-set-default",
        ]
    "#]]
    .assert_debug_eq(&warnings);
}

#[test]
fn set_default_is_not_emulated() {
    let mut schema = with_relation_mode(Provider::Sqlite, "prisma");
    user_and_post(&mut schema, Some(ReferentialAction::SetDefault));

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": Invalid referential action: `SetDefault`. Allowed values: (`Cascade`, `Restrict`, `SetNull`)",
            ]
        "#]],
    );
}

#[test]
fn set_null_on_required_fields_is_an_error_on_sqlite() {
    let mut schema = with_datasource(Provider::Sqlite);
    user_and_post(&mut schema, Some(ReferentialAction::SetNull));

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The `onDelete` referential action of a relation must not be set to `SetNull` when a referenced field is required. Either choose another referential action, or make the referenced fields optional.",
            ]
        "#]],
    );
}

#[test]
fn set_null_on_required_fields_is_a_warning_on_postgres() {
    let mut schema = with_datasource(Provider::Postgres);
    user_and_post(&mut schema, Some(ReferentialAction::SetNull));

    let validated = assert_valid(schema);
    let warnings: Vec<_> = validated.diagnostics.warnings().map(|w| w.message().to_owned()).collect();

    expect![[r#"
        [
            "Warning validating field `author` in model `Post`: The `onDelete` referential action of a relation must not be set to `SetNull` when a referenced field is required. Either choose another referential action, or make the referenced fields optional.",
        ]
    "#]]
    .assert_debug_eq(&warnings);
}

#[test]
fn emulated_relations_suggest_an_index() {
    let mut schema = with_relation_mode(Provider::Postgres, "prisma");
    user_and_post(&mut schema, None);

    expect![[r#"
        [
            "With `relationMode = \"prisma\"`, no foreign keys are used, so relation fields will not benefit from the index usually created by the relational database under the hood. This can lead to poor performance when querying these fields. We recommend adding an index manually. Learn more at https://pris.ly/d/relation-mode-prisma-indexes",
        ]
    "#]]
    .assert_debug_eq(&warning_messages(schema));
}

#[test]
fn an_index_on_the_referencing_fields_silences_the_suggestion() {
    let mut schema = with_relation_mode(Provider::Postgres, "prisma");
    user_and_post(&mut schema, None).index(["authorId"]);

    assert!(warning_messages(schema).is_empty());
}

#[test]
fn foreign_keys_do_not_need_an_index_suggestion() {
    let mut schema = with_datasource(Provider::Postgres);
    user_and_post(&mut schema, None);

    assert!(warning_messages(schema).is_empty());
}

#[test]
fn cascading_self_relations_are_cycles_on_sql_server() {
    let mut schema = with_datasource(Provider::SqlServer);

    let employee = schema.model("Employee");
    employee.scalar("id", ScalarType::Int).id();
    employee.scalar("managerId", ScalarType::Int).optional();
    employee
        .relation("manager", "Employee")
        .optional()
        .name("Management")
        .fields(["managerId"])
        .references(["id"]);
    employee.relation("reports", "Employee").list().name("Management");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: A self-relation must have `onDelete` and `onUpdate` referential actions set to `NoAction` in one of the @relation attributes. (Implicit default `onDelete`: `SetNull`, and `onUpdate`: `Cascade`) Read more at https://pris.ly/d/cyclic-referential-actions",
            ]
        "#]],
    );
}

#[test]
fn no_action_breaks_self_relation_cycles() {
    let mut schema = with_datasource(Provider::SqlServer);

    let employee = schema.model("Employee");
    employee.scalar("id", ScalarType::Int).id();
    employee.scalar("managerId", ScalarType::Int).optional();
    employee
        .relation("manager", "Employee")
        .optional()
        .name("Management")
        .fields(["managerId"])
        .references(["id"])
        .on_delete(ReferentialAction::NoAction)
        .on_update(ReferentialAction::NoAction);
    employee.relation("reports", "Employee").list().name("Management");

    assert_valid(schema);
}

/// A model with an optional foreign key to each of `targets` and a list
/// back relation from each of `referrers`.
fn linked_model<'a>(schema: &'a mut SchemaBuilder, name: &str, targets: &[&str], referrers: &[&str]) -> &'a mut ModelBuilder {
    let model = schema.model(name);
    model.scalar("id", ScalarType::Int).id();

    for target in targets {
        let field = target.to_lowercase();
        let fk = format!("{field}Id");

        model.scalar(&fk, ScalarType::Int).optional();
        model.relation(&field, target).optional().fields([fk.as_str()]).references(["id"]);
    }

    for referrer in referrers {
        model.relation(&format!("{}s", referrer.to_lowercase()), referrer).list();
    }

    model
}

#[test]
fn cycles_across_several_models_are_errors_on_sql_server() {
    let mut schema = with_datasource(Provider::SqlServer);

    linked_model(&mut schema, "A", &["B"], &["C"]);
    linked_model(&mut schema, "B", &["C"], &["A"]);
    linked_model(&mut schema, "C", &["A"], &["B"]);

    let mut errors = error_messages(schema);
    errors.sort();

    expect![[r#"
        [
            "Error validating: Reference causes a cycle. One of the @relation attributes in this cycle must have `onDelete` and `onUpdate` referential actions set to `NoAction`. Cycle path: A.b → B.c → C.a. (Implicit default `onDelete`: `SetNull`, and `onUpdate`: `Cascade`) Read more at https://pris.ly/d/cyclic-referential-actions",
            "Error validating: Reference causes a cycle. One of the @relation attributes in this cycle must have `onDelete` and `onUpdate` referential actions set to `NoAction`. Cycle path: B.c → C.a → A.b. (Implicit default `onDelete`: `SetNull`, and `onUpdate`: `Cascade`) Read more at https://pris.ly/d/cyclic-referential-actions",
            "Error validating: Reference causes a cycle. One of the @relation attributes in this cycle must have `onDelete` and `onUpdate` referential actions set to `NoAction`. Cycle path: C.a → A.b → B.c. (Implicit default `onDelete`: `SetNull`, and `onUpdate`: `Cascade`) Read more at https://pris.ly/d/cyclic-referential-actions",
        ]
    "#]]
    .assert_debug_eq(&errors);
}

#[test]
fn no_action_on_one_relation_breaks_a_longer_cycle() {
    let mut schema = with_datasource(Provider::SqlServer);

    linked_model(&mut schema, "A", &["B"], &["C"]);
    linked_model(&mut schema, "B", &["C"], &["A"]);

    let c = linked_model(&mut schema, "C", &[], &["B"]);
    c.scalar("aId", ScalarType::Int).optional();
    c.relation("a", "A")
        .optional()
        .fields(["aId"])
        .references(["id"])
        .on_delete(ReferentialAction::NoAction)
        .on_update(ReferentialAction::NoAction);

    assert_valid(schema);
}

#[test]
fn multiple_cascading_paths_are_errors_on_sql_server() {
    let mut schema = with_datasource(Provider::SqlServer);

    linked_model(&mut schema, "A", &[], &["B", "C"]);
    linked_model(&mut schema, "B", &["A"], &["D"]);
    linked_model(&mut schema, "C", &["A"], &["D"]);
    linked_model(&mut schema, "D", &["B", "C"], &[]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: When any of the records in model `A` is updated or deleted, the referential actions on the relations cascade to model `D` through multiple paths. Please break one of these paths by setting the `onUpdate` and `onDelete` to `NoAction`. (Implicit default `onDelete`: `SetNull`, and `onUpdate`: `Cascade`) Read more at https://pris.ly/d/cyclic-referential-actions",
                "Error validating: When any of the records in model `A` is updated or deleted, the referential actions on the relations cascade to model `D` through multiple paths. Please break one of these paths by setting the `onUpdate` and `onDelete` to `NoAction`. (Implicit default `onDelete`: `SetNull`, and `onUpdate`: `Cascade`) Read more at https://pris.ly/d/cyclic-referential-actions",
            ]
        "#]],
    );
}

#[test]
fn cascading_paths_are_not_checked_with_emulated_relations() {
    let mut schema = with_relation_mode(Provider::SqlServer, "prisma");

    linked_model(&mut schema, "A", &[], &["B", "C"]);
    linked_model(&mut schema, "B", &["A"], &["D"]);
    linked_model(&mut schema, "C", &["A"], &["D"]);
    linked_model(&mut schema, "D", &["B", "C"], &[]);

    assert!(error_messages(schema).is_empty());
}
