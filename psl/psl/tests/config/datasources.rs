use crate::common::*;
use psl::datamodel_connector::RelationMode;
use pretty_assertions::assert_eq;

fn config_errors(schema: SchemaBuilder) -> Vec<String> {
    let graph = schema.finish().unwrap();

    match psl::parse_configuration(&graph) {
        Ok(_) => Vec::new(),
        Err(diagnostics) => diagnostics.errors().map(|err| err.message()).collect(),
    }
}

#[test]
fn postgres_is_an_alias_of_postgresql() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgres")
        .string("url", "postgresql://localhost:5432/test")
        .documentation("The main database.");

    let graph = schema.finish().unwrap();
    let config = psl::parse_configuration(&graph).unwrap();
    let datasource = config.first_datasource().unwrap();

    assert_eq!(datasource.name, "db");
    assert_eq!(datasource.provider, "postgres");
    assert_eq!(datasource.active_provider, "postgresql");
    assert_eq!(datasource.documentation.as_deref(), Some("The main database."));
    assert_eq!(datasource.relation_mode(), RelationMode::ForeignKeys);
}

#[test]
fn unknown_providers_are_rejected() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "oracle")
        .string("url", "oracle://localhost");

    assert_eq!(config_errors(schema), ["Datasource provider not known: \"oracle\"."]);
}

#[test]
fn unknown_providers_do_not_hide_schema_errors() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "oracle")
        .string("url", "oracle://localhost");

    schema.model("B").scalar("id", ScalarType::Int).id();

    let a = schema.model("A");
    a.scalar("id", ScalarType::Int).id();
    a.scalar("bId", ScalarType::Int);
    a.relation("b", "B").fields(["bId"]).references(["id"]);

    let validated = validate(schema);

    assert_eq!(validated.connector.name(), "empty");

    expect![[r#"
        [
            "Datasource provider not known: \"oracle\".",
            "Error validating field `b` in model `A`: The relation field `b` on model `A` is missing an opposite relation field on the model `B`. Either run `prisma format` or add it manually.",
        ]
    "#]]
    .assert_debug_eq(&validated.diagnostics.errors().map(|err| err.message()).collect::<Vec<_>>());
}

#[test]
fn only_one_datasource_is_allowed() {
    let mut schema = with_datasource(Provider::Postgres);
    schema
        .datasource("replica")
        .string("provider", "postgresql")
        .string("url", "postgresql://replica:5432/test");

    expect![[r#"
        [
            "Error validating datasource `db`: You defined more than one datasource. This is not allowed yet because support for multiple databases has not been implemented yet.",
            "Error validating datasource `replica`: You defined more than one datasource. This is not allowed yet because support for multiple databases has not been implemented yet.",
        ]
    "#]]
    .assert_debug_eq(&config_errors(schema));
}

#[test]
fn the_url_is_required() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema.datasource("db").string("provider", "sqlite");

    assert_eq!(
        config_errors(schema),
        ["Argument \"url\" is missing in data source block \"db\"."]
    );
}

#[test]
fn the_provider_is_required() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema.datasource("db").string("url", "file:dev.db");

    assert_eq!(
        config_errors(schema),
        ["Argument \"provider\" is missing in data source block \"db\"."]
    );
}

#[test]
fn unknown_properties_are_rejected() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "sqlite")
        .string("url", "file:dev.db")
        .string("timeout", "10");

    assert_eq!(config_errors(schema), ["Property not known: \"timeout\"."]);
}

#[test]
fn relation_mode_is_read_from_the_datasource() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "mysql")
        .string("url", "mysql://localhost:3306/test")
        .string("relationMode", "prisma");

    let graph = schema.finish().unwrap();
    let config = psl::parse_configuration(&graph).unwrap();

    assert_eq!(config.relation_mode(), Some(RelationMode::Prisma));
}

#[test]
fn unknown_relation_modes_are_rejected() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgresql")
        .string("url", "postgresql://localhost:5432/test")
        .string("relationMode", "magic");

    assert_eq!(
        config_errors(schema),
        ["Error validating datasource `relationMode`: Invalid relation mode setting: \"magic\". Supported values: \"prisma\", \"foreignKeys\""]
    );
}

#[test]
fn referential_integrity_is_deprecated_but_honored() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgresql")
        .string("url", "postgresql://localhost:5432/test")
        .string("referentialIntegrity", "prisma");

    let graph = schema.finish().unwrap();
    let (config, diagnostics) = psl::error_tolerant_parse_configuration(&graph);

    assert!(!diagnostics.has_errors());
    assert_eq!(config.relation_mode(), Some(RelationMode::Prisma));
    assert_eq!(
        config.warnings.iter().map(|w| w.message()).collect::<Vec<_>>(),
        ["The `referentialIntegrity` attribute is deprecated. Please use `relationMode` instead. Learn more at https://pris.ly/d/relation-mode"]
    );
}

#[test]
fn relation_mode_and_referential_integrity_cannot_be_combined() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgresql")
        .string("url", "postgresql://localhost:5432/test")
        .string("relationMode", "prisma")
        .string("referentialIntegrity", "prisma");

    assert_eq!(
        config_errors(schema),
        ["The `referentialIntegrity` and `relationMode` attributes cannot be used together. Please use only `relationMode` instead."]
    );
}

#[test]
fn urls_from_env_vars_are_resolved_on_load() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgresql")
        .env("url", "DATABASE_URL");

    let graph = schema.finish().unwrap();
    let config = psl::parse_configuration(&graph).unwrap();
    let datasource = config.first_datasource().unwrap();

    assert_eq!(datasource.url.as_env_var(), Some("DATABASE_URL"));

    let url = datasource
        .load_url(|var| (var == "DATABASE_URL").then(|| "postgresql://localhost:5432/test".to_owned()))
        .unwrap();

    assert_eq!(url, "postgresql://localhost:5432/test");

    let err = datasource.load_url(|_| None).unwrap_err();
    let messages: Vec<String> = err.errors().map(|err| err.message()).collect();

    assert_eq!(messages, ["Environment variable not found: DATABASE_URL."]);
}

#[test]
fn the_schemas_array_cannot_be_empty() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgresql")
        .string("url", "postgresql://localhost:5432/test")
        .array("schemas", &[]);

    assert_eq!(config_errors(schema), ["If provided, the schemas array can not be empty."]);
}

#[test]
fn schemas_need_the_multi_schema_preview_feature() {
    init_logging();

    let mut schema = SchemaBuilder::new();
    schema
        .datasource("db")
        .string("provider", "postgresql")
        .string("url", "postgresql://localhost:5432/test")
        .array("schemas", &["public", "auth"]);

    let errors = error_messages(schema);

    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].contains("multiSchema"), "{errors:?}");
}
