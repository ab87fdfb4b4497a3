//! The connectors shipped with the crate, one per supported database.
//! Each one is compiled in only when its Cargo feature is enabled.

mod capabilities_support;
mod native_type_definition;

#[cfg(feature = "cockroachdb")]
mod cockroach_datamodel_connector;
#[cfg(feature = "mongodb")]
mod mongodb;
#[cfg(feature = "mssql")]
mod mssql_datamodel_connector;
#[cfg(feature = "mysql")]
mod mysql_datamodel_connector;
#[cfg(feature = "postgresql")]
mod postgres_datamodel_connector;
#[cfg(feature = "sqlite")]
mod sqlite_datamodel_connector;

pub use capabilities_support::can_have_capability;

#[cfg(feature = "cockroachdb")]
pub use cockroach_datamodel_connector::CockroachType;
#[cfg(feature = "mongodb")]
pub use mongodb::MongoDbType;
#[cfg(feature = "mssql")]
pub use mssql_datamodel_connector::{MsSqlType, MsSqlTypeParameter};
#[cfg(feature = "mysql")]
pub use mysql_datamodel_connector::MySqlType;
#[cfg(feature = "postgresql")]
pub use postgres_datamodel_connector::PostgresType;

use crate::{ConnectorRegistry, datamodel_connector::Connector};

#[cfg(feature = "postgresql")]
pub const POSTGRES: &'static dyn Connector = &postgres_datamodel_connector::PostgresDatamodelConnector;
#[cfg(feature = "cockroachdb")]
pub const COCKROACH: &'static dyn Connector = &cockroach_datamodel_connector::CockroachDatamodelConnector;
#[cfg(feature = "mysql")]
pub const MYSQL: &'static dyn Connector = &mysql_datamodel_connector::MySqlDatamodelConnector;
#[cfg(feature = "sqlite")]
pub const SQLITE: &'static dyn Connector = &sqlite_datamodel_connector::SqliteDatamodelConnector;
#[cfg(feature = "mssql")]
pub const MSSQL: &'static dyn Connector = &mssql_datamodel_connector::MsSqlDatamodelConnector;
#[cfg(feature = "mongodb")]
pub const MONGODB: &'static dyn Connector = &mongodb::MongoDbDatamodelConnector;

/// Every connector compiled into this build, in provider lookup order.
pub static BUILTIN_CONNECTORS: ConnectorRegistry<'static> = &[
    #[cfg(feature = "postgresql")]
    POSTGRES,
    #[cfg(feature = "mysql")]
    MYSQL,
    #[cfg(feature = "sqlite")]
    SQLITE,
    #[cfg(feature = "mssql")]
    MSSQL,
    #[cfg(feature = "cockroachdb")]
    COCKROACH,
    #[cfg(feature = "mongodb")]
    MONGODB,
];

/// Find the connector for a datasource `provider` value.
pub fn resolve<'a>(connectors: ConnectorRegistry<'a>, provider: &str) -> Option<&'static dyn Connector> {
    connectors.iter().copied().find(|connector| connector.is_provider(provider))
}

#[cfg(all(test, feature = "all"))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_provider_resolves_to_its_connector() {
        let resolved: Vec<(&str, &str)> = ["postgresql", "postgres", "cockroachdb", "mysql", "sqlserver", "sqlite", "mongodb"]
            .into_iter()
            .map(|provider| (provider, resolve(BUILTIN_CONNECTORS, provider).map(|c| c.name()).unwrap_or("none")))
            .collect();

        assert_eq!(
            resolved,
            vec![
                ("postgresql", "Postgres"),
                ("postgres", "Postgres"),
                ("cockroachdb", "CockroachDB"),
                ("mysql", "MySQL"),
                ("sqlserver", "SQL Server"),
                ("sqlite", "sqlite"),
                ("mongodb", "MongoDB"),
            ]
        );
    }

    #[test]
    fn native_types_survive_a_render_and_parse_round_trip() {
        use diagnostics::{Diagnostics, Span};

        for connector in BUILTIN_CONNECTORS {
            for constructor in connector.available_native_type_constructors() {
                let required = vec!["2".to_owned(); constructor.number_of_args];
                let optional = vec!["2".to_owned(); constructor.number_of_args + constructor.number_of_optional_args];

                for args in [required, optional] {
                    let mut diagnostics = Diagnostics::new();

                    let first = connector
                        .parse_native_type(constructor.name, &args, Span::empty(), &mut diagnostics)
                        .unwrap();

                    let rendered = connector.native_type_to_string(&first);
                    let (name, args) = crate::datamodel_connector::split_native_type_string(&rendered);

                    let second = connector
                        .parse_native_type(name, &args, Span::empty(), &mut diagnostics)
                        .unwrap();

                    assert_eq!(first, second, "{} on {}", rendered, connector.name());
                    assert!(!diagnostics.has_errors(), "{rendered} on {}", connector.name());
                }
            }
        }
    }

    #[test]
    fn time_types_without_arguments_get_the_connector_precision() {
        use diagnostics::{Diagnostics, Span};

        let cases: [(&dyn Connector, &str, &str); 5] = [
            (POSTGRES, "Timestamp", "3"),
            (COCKROACH, "Timetz", "3"),
            (MSSQL, "DateTime2", "7"),
            (MSSQL, "Time", "7"),
            (MYSQL, "DateTime", "0"),
        ];

        for (connector, name, precision) in cases {
            let mut diagnostics = Diagnostics::new();
            let parsed = connector
                .parse_native_type(name, &[], Span::empty(), &mut diagnostics)
                .unwrap();

            assert_eq!(connector.native_type_to_parts(&parsed), (name, vec![precision.to_owned()]));
            assert!(diagnostics.is_empty());
        }
    }

    #[test]
    fn unknown_providers_do_not_resolve() {
        assert!(resolve(BUILTIN_CONNECTORS, "oracle").is_none());
        assert!(resolve(BUILTIN_CONNECTORS, "").is_none());
    }
}
