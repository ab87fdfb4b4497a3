use crate::datamodel_connector::{ConnectorCapabilities, ConnectorCapability};
use cfg_if::cfg_if;

cfg_if! {
    // if built only for mysql
    if #[cfg(all(feature = "mysql", not(any(feature = "postgresql", feature = "sqlite", feature = "cockroachdb", feature = "mssql", feature = "mongodb"))))] {
        #[inline(always)]
        const fn can_have_capability_impl(capability: ConnectorCapability) -> bool {
            check_comptime_capability(super::mysql_datamodel_connector::CAPABILITIES, capability)
        }
    // if built only for sqlite
    } else if #[cfg(all(feature = "sqlite", not(any(feature = "postgresql", feature = "mysql", feature = "cockroachdb", feature = "mssql", feature = "mongodb"))))] {
        #[inline(always)]
        const fn can_have_capability_impl(capability: ConnectorCapability) -> bool {
            check_comptime_capability(super::sqlite_datamodel_connector::CAPABILITIES, capability)
        }
    // if built only for postgresql
    } else if #[cfg(all(feature = "postgresql", not(any(feature = "sqlite", feature = "mysql", feature = "cockroachdb", feature = "mssql", feature = "mongodb"))))] {
        #[inline(always)]
        const fn can_have_capability_impl(capability: ConnectorCapability) -> bool {
            check_comptime_capability(super::postgres_datamodel_connector::CAPABILITIES, capability)
        }
    // if built only for sql server
    } else if #[cfg(all(feature = "mssql", not(any(feature = "sqlite", feature = "mysql", feature = "cockroachdb", feature = "postgresql", feature = "mongodb"))))] {
        #[inline(always)]
        const fn can_have_capability_impl(capability: ConnectorCapability) -> bool {
            check_comptime_capability(super::mssql_datamodel_connector::CAPABILITIES, capability)
        }
    // if built only for mongodb
    } else if #[cfg(all(feature = "mongodb", not(any(feature = "sqlite", feature = "mysql", feature = "cockroachdb", feature = "postgresql", feature = "mssql"))))] {
        #[inline(always)]
        const fn can_have_capability_impl(capability: ConnectorCapability) -> bool {
            check_comptime_capability(super::mongodb::CAPABILITIES, capability)
        }
    // any other build configuration
    } else {
        #[inline(always)]
        const fn can_have_capability_impl(_: ConnectorCapability) -> bool {
            true
        }
    }
}

/// Whether any connector compiled into this build has the capability.
/// Always true on multi-connector builds. Validations that only concern
/// connectors with a given capability check this first, so single-connector
/// builds can drop them.
///
/// ```ignore
/// if can_have_capability(ConnectorCapability::TwoWayEmbeddedManyToManyRelation) {
///     validate_embedded_many_to_many(relation, ctx);
/// }
/// ```
#[inline(always)]
pub const fn can_have_capability(cap: ConnectorCapability) -> bool {
    can_have_capability_impl(cap)
}

#[inline(always)]
#[allow(dead_code)] // not used if more than one connector is built
const fn check_comptime_capability(capabilities: ConnectorCapabilities, cap: ConnectorCapability) -> bool {
    (capabilities.bits_c() & (cap as u64)) > 0
}
