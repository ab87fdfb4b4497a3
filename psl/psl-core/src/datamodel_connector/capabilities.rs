use enumflags2::BitFlags;
use std::fmt;

macro_rules! capabilities {
    ($( $(#[$docs:meta])* $variant:ident ),* $(,)?) => {
        #[enumflags2::bitflags]
        #[repr(u64)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ConnectorCapability {
            $( $(#[$docs])* $variant ),*
        }

        impl ConnectorCapability {
            /// Look up a capability by its name, as displayed.
            pub fn parse_opt(name: &str) -> Option<Self> {
                match name {
                    $( stringify!($variant) => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }

        impl fmt::Display for ConnectorCapability {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $( Self::$variant => stringify!($variant), )*
                };

                f.write_str(name)
            }
        }
    };
}

// Capabilities describe what functionality connectors are able to provide.
// Some are used only by the validator, some only by consumers of the
// validated schema.
capabilities!(
    /// Any scalar type can be used as an id.
    AnyId,
    AutoIncrement,
    AutoIncrementAllowedOnNonId,
    AutoIncrementMultipleAllowed,
    AutoIncrementNonIndexedAllowed,
    CompoundIds,
    /// Embedded `type` blocks.
    CompositeTypes,
    /// The `clustered` argument on ids and indexes.
    ClusteringSetting,
    DecimalType,
    /// `@default(auto())`
    DefaultValueAuto,
    Enums,
    FullTextIndex,
    ImplicitManyToManyRelation,
    /// The `length` argument on index fields.
    IndexColumnLengthPrefixing,
    Json,
    JsonLists,
    MultiSchema,
    MultipleFullTextAttributesPerModel,
    /// The `map` argument on `@default`.
    NamedDefaultValues,
    NamedForeignKeys,
    NamedPrimaryKeys,
    PrimaryKeySortOrderDefinition,
    /// Cascading referential actions must not form cycles or reach a model
    /// through more than one path.
    ReferenceCycleDetection,
    RelationFieldsInArbitraryOrder,
    ScalarLists,
    SortOrderInFullTextIndex,
    TwoWayEmbeddedManyToManyRelation,
    UsingHashIndex,
    Views,
);

/// A set of capabilities, as a bitset.
pub type ConnectorCapabilities = BitFlags<ConnectorCapability>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_names_parse_back() {
        for capability in ConnectorCapabilities::all() {
            assert_eq!(ConnectorCapability::parse_opt(&capability.to_string()), Some(capability));
        }

        assert_eq!(ConnectorCapability::parse_opt("Teleportation"), None);
    }
}
