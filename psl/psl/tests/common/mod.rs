#![allow(dead_code)]

pub(crate) use expect_test::expect;
pub(crate) use psl::schema_graph::{Expression, IndexAlgorithm, ReferentialAction, ScalarType, SchemaBuilder};

use std::sync::Once;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Provider {
    Postgres,
    Mysql,
    Sqlite,
    SqlServer,
    Mongo,
    Cockroach,
}

impl Provider {
    pub(crate) fn provider_and_url(self) -> (&'static str, &'static str) {
        match self {
            Provider::Postgres => ("postgresql", "postgresql://localhost:5432/test"),
            Provider::Mysql => ("mysql", "mysql://localhost:3306/test"),
            Provider::Sqlite => ("sqlite", "file:dev.db"),
            Provider::SqlServer => ("sqlserver", "sqlserver://localhost:1433"),
            Provider::Mongo => ("mongodb", "mongodb://localhost:27017/test"),
            Provider::Cockroach => ("cockroachdb", "postgresql://localhost:26257/test"),
        }
    }
}

/// A schema with a `db` datasource for the provider.
pub(crate) fn with_datasource(provider: Provider) -> SchemaBuilder {
    init_logging();

    let (provider, url) = provider.provider_and_url();
    let mut schema = SchemaBuilder::new();
    schema.datasource("db").string("provider", provider).string("url", url);
    schema
}

/// A schema with a `db` datasource and a generator enabling the preview features.
pub(crate) fn with_preview_features(provider: Provider, preview_features: &[&str]) -> SchemaBuilder {
    let mut schema = with_datasource(provider);

    schema
        .generator("client")
        .string("provider", "prisma-client-js")
        .array("previewFeatures", preview_features);

    schema
}

#[track_caller]
pub(crate) fn validate(schema: SchemaBuilder) -> psl::ValidatedSchema {
    let graph = schema.finish().unwrap();
    psl::validate(graph)
}

#[track_caller]
pub(crate) fn error_messages(schema: SchemaBuilder) -> Vec<String> {
    validate(schema).diagnostics.errors().map(|err| err.message()).collect()
}

#[track_caller]
pub(crate) fn warning_messages(schema: SchemaBuilder) -> Vec<String> {
    validate(schema)
        .diagnostics
        .warnings()
        .map(|warning| warning.message().to_owned())
        .collect()
}

#[track_caller]
pub(crate) fn expect_errors(schema: SchemaBuilder, expectation: expect_test::Expect) {
    expectation.assert_debug_eq(&error_messages(schema));
}

#[track_caller]
pub(crate) fn assert_valid(schema: SchemaBuilder) -> psl::ValidatedSchema {
    match psl::parse_schema(schema.finish().unwrap()) {
        Ok(schema) => schema,
        Err(diagnostics) => {
            let messages: Vec<String> = diagnostics.errors().map(|err| err.message()).collect();
            panic!("Expected the schema to be valid, got:\n{}", messages.join("\n"))
        }
    }
}

/// Logs go to the test writer. Filter them with `RUST_LOG`.
pub(crate) fn init_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, FmtSubscriber};

        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .map_err(|err| eprintln!("Error initializing the test logger: {err}"))
            .ok();
    });
}
