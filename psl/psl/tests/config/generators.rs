use crate::common::*;
use indoc::indoc;
use psl::{GeneratorConfigValue, PreviewFeature};

fn parse_generators(schema: SchemaBuilder) -> (psl::Configuration, Vec<String>, Vec<String>) {
    let graph = schema.finish().unwrap();
    let (config, diagnostics) = psl::error_tolerant_parse_configuration(&graph);
    let errors = diagnostics.errors().map(|err| err.message()).collect();
    let warnings = diagnostics.warnings().map(|w| w.message().to_owned()).collect();

    (config, errors, warnings)
}

#[test]
fn generator_properties_are_loaded() {
    let mut schema = with_datasource(Provider::Postgres);
    schema
        .generator("client")
        .string("provider", "prisma-client-js")
        .string("output", "../generated/client")
        .array("binaryTargets", &["native", "debian-openssl-3.0.x"])
        .array("previewFeatures", &["views"])
        .string("engineType", "library")
        .documentation(indoc! {"
            The client.
            Generated on every migration."});

    let (config, errors, warnings) = parse_generators(schema);

    assert!(errors.is_empty(), "{errors:?}");
    assert!(warnings.is_empty(), "{warnings:?}");

    let generator = &config.generators[0];

    assert_eq!(generator.name, "client");
    assert_eq!(generator.provider.as_literal(), Some("prisma-client-js"));
    assert_eq!(
        generator.output.as_ref().and_then(|o| o.as_literal()),
        Some("../generated/client")
    );
    assert_eq!(
        generator
            .binary_targets
            .iter()
            .filter_map(|t| t.as_literal())
            .collect::<Vec<_>>(),
        ["native", "debian-openssl-3.0.x"]
    );
    assert_eq!(
        generator.config.get("engineType"),
        Some(&GeneratorConfigValue::String("library".to_owned()))
    );
    assert_eq!(generator.documentation.as_deref(), Some("The client.\nGenerated on every migration."));
    assert!(config.preview_features().contains(PreviewFeature::Views));
}

#[test]
fn the_provider_is_required() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.generator("client").string("output", "./client");

    let (config, errors, _) = parse_generators(schema);

    assert!(config.generators.is_empty());
    assert_eq!(errors, ["Argument \"provider\" is missing in generator block \"client\"."]);
}

#[test]
fn unknown_preview_features_are_rejected() {
    let schema = with_preview_features(Provider::Postgres, &["teleportation"]);

    let (config, errors, _) = parse_generators(schema);

    assert!(config.preview_features().is_empty());
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(
        errors[0].starts_with("The preview feature \"teleportation\" is not known. Expected one of: "),
        "{errors:?}"
    );
}

#[test]
fn renamed_preview_features_depend_on_the_provider() {
    let schema = with_preview_features(Provider::Postgres, &["fullTextSearch"]);
    let (config, errors, warnings) = parse_generators(schema);

    assert!(errors.is_empty(), "{errors:?}");
    assert!(config.preview_features().contains(PreviewFeature::FullTextSearchPostgres));
    assert_eq!(
        warnings,
        ["Preview feature \"fullTextSearch\" has been renamed to \"fullTextSearchPostgres\". Learn more at https://pris.ly/d/fts-postgres."]
    );

    let schema = with_preview_features(Provider::Mysql, &["fullTextSearch"]);
    let (config, errors, warnings) = parse_generators(schema);

    assert!(errors.is_empty(), "{errors:?}");
    assert!(config.preview_features().contains(PreviewFeature::FullTextSearch));
    assert_eq!(
        warnings,
        ["Preview feature \"fullTextSearch\" is deprecated. The functionality can be used without specifying it as a preview feature."]
    );
}

#[test]
fn preview_features_are_merged_across_generators() {
    let mut schema = with_preview_features(Provider::Postgres, &["views"]);
    schema
        .generator("other")
        .string("provider", "prisma-client-go")
        .array("previewFeatures", &["multiSchema"]);

    let (config, errors, _) = parse_generators(schema);

    assert!(errors.is_empty(), "{errors:?}");
    assert!(config.preview_features().contains(PreviewFeature::Views));
    assert!(config.preview_features().contains(PreviewFeature::MultiSchema));
}

#[test]
fn views_need_the_preview_feature() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.view("ActiveUser").scalar("id", ScalarType::Int).unique();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: View definitions are only available with the `views` preview feature.",
            ]
        "#]],
    );
}

#[test]
fn views_are_valid_with_the_preview_feature() {
    let mut schema = with_preview_features(Provider::Postgres, &["views"]);
    let view = schema.view("ActiveUser");
    view.scalar("id", ScalarType::Int).unique();
    view.scalar("name", ScalarType::String);

    assert_valid(schema);
}

#[test]
fn views_cannot_have_primary_keys() {
    let mut schema = with_preview_features(Provider::Postgres, &["views"]);
    schema.view("ActiveUser").scalar("id", ScalarType::Int).id();

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: Views cannot have primary keys.",
            ]
        "#]],
    );
}
