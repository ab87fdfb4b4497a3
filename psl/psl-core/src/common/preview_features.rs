use enumflags2::BitFlags;
use std::fmt;

/// A set of preview features.
pub type PreviewFeatures = enumflags2::BitFlags<PreviewFeature>;

macro_rules! features {
    ($( $variant:ident $(,)? ),*) => {
        #[enumflags2::bitflags]
        #[repr(u64)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub enum PreviewFeature {
            $( $variant,)*
        }

        impl PreviewFeature {
            pub fn parse_opt(s: &str) -> Option<Self> {
                $(
                    if s.eq_ignore_ascii_case(stringify!($variant)) { return Some(Self::$variant) }
                )*

                None
            }
        }

        impl fmt::Display for PreviewFeature {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let variant = match self { $( Self::$variant => stringify!($variant),)* };
                let mut chars = variant.chars();

                if let Some(first_char) = chars.next() {
                    write!(f, "{}{}", first_char.to_ascii_lowercase(), chars.as_str())?;
                }

                Ok(())
            }
        }
    };
}

// (Usually) Append-only list of features.
features!(
    Cockroachdb,
    ExtendedIndexes,
    FilterJson,
    FullTextIndex,
    FullTextSearch,
    FullTextSearchPostgres,
    InteractiveTransactions,
    Metrics,
    MicrosoftSqlServer,
    MongoDb,
    MultiSchema,
    NamedConstraints,
    NativeDistinct,
    NativeTypes,
    OrderByNulls,
    ReactNative,
    ReferentialActions,
    ReferentialIntegrity,
    RelationJoins,
    RelationMode,
    StrictUndefinedChecks,
    Views,
);

/// The replacement of a renamed feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RenamedFeature {
    /// The new name.
    pub to: PreviewFeature,

    /// The `https://pris.ly/d/{endpoint}` page explaining the rename.
    pub prisly_link_endpoint: &'static str,
}

/// Where a rename applies: everywhere, or only with one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenamedFeatureKey {
    from: PreviewFeature,
    provider: Option<&'static str>,
}

const RENAMED_FEATURES: &[(RenamedFeatureKey, RenamedFeature)] = &[
    (
        RenamedFeatureKey {
            from: PreviewFeature::ReferentialIntegrity,
            provider: None,
        },
        RenamedFeature {
            to: PreviewFeature::RelationMode,
            prisly_link_endpoint: "relation-mode",
        },
    ),
    (
        RenamedFeatureKey {
            from: PreviewFeature::FullTextSearch,
            provider: Some("postgresql"),
        },
        RenamedFeature {
            to: PreviewFeature::FullTextSearchPostgres,
            prisly_link_endpoint: "fts-postgres",
        },
    ),
];

/// Generator preview features, before any provider specific adjustment.
pub const ALL_PREVIEW_FEATURES: FeatureMap = FeatureMap {
    active: enumflags2::make_bitflags!(PreviewFeature::{
        FullTextSearch
        | FullTextSearchPostgres
        | Metrics
        | MultiSchema
        | NativeDistinct
        | RelationJoins
        | StrictUndefinedChecks
        | Views
    }),
    stabilized: enumflags2::make_bitflags!(PreviewFeature::{
        Cockroachdb
        | ExtendedIndexes
        | FilterJson
        | FullTextIndex
        | InteractiveTransactions
        | MicrosoftSqlServer
        | MongoDb
        | NamedConstraints
        | NativeTypes
        | OrderByNulls
        | ReferentialActions
        | RelationMode
    }),
    deprecated: enumflags2::make_bitflags!(PreviewFeature::{ Metrics }),
    hidden: enumflags2::make_bitflags!(PreviewFeature::{ ReactNative }),
};

/// The lifecycle stage of every preview feature.
#[derive(Debug, Clone, Copy)]
pub struct FeatureMap {
    /// Valid, visible features.
    active: PreviewFeatures,

    /// Features that became generally available. Requesting them warns,
    /// and they stay on.
    stabilized: PreviewFeatures,

    /// Features on their way out. Requesting them warns, and they stay on
    /// until removed.
    deprecated: PreviewFeatures,

    /// Hidden preview features are valid features, but are not propagated into the tooling
    /// (as autocomplete or similar) or into error messages (eg. showing a list of valid features).
    hidden: PreviewFeatures,
}

impl FeatureMap {
    pub const fn active_features(&self) -> PreviewFeatures {
        self.active
    }

    pub const fn hidden_features(&self) -> PreviewFeatures {
        self.hidden
    }

    pub(crate) fn is_valid(&self, flag: PreviewFeature) -> bool {
        (self.active | self.hidden).contains(flag)
    }

    pub(crate) fn is_stabilized(&self, flag: PreviewFeature) -> bool {
        self.stabilized.contains(flag)
    }

    pub(crate) fn is_deprecated(&self, flag: PreviewFeature) -> bool {
        self.deprecated.contains(flag)
    }
}

/// The feature map as seen with the provider of the datasource. Some
/// features are renamed or stabilized for one provider only.
#[derive(Debug, Clone, Copy)]
pub struct FeatureMapWithProvider<'a> {
    provider: Option<&'a str>,
    feature_map: FeatureMap,
}

impl<'a> FeatureMapWithProvider<'a> {
    pub fn new(provider: Option<&'a str>) -> FeatureMapWithProvider<'a> {
        let mut feature_map = ALL_PREVIEW_FEATURES;

        match provider {
            // Full text search went GA on MySQL first.
            Some("mysql") => {
                feature_map.active.remove(PreviewFeature::FullTextSearch | PreviewFeature::FullTextSearchPostgres);
                feature_map.stabilized.insert(PreviewFeature::FullTextSearch);
            }
            Some("postgresql") => (),
            // The Postgres specific replacement means nothing elsewhere.
            _ => feature_map.active.remove(PreviewFeature::FullTextSearchPostgres),
        }

        FeatureMapWithProvider { provider, feature_map }
    }

    pub fn active_features(&self) -> PreviewFeatures {
        self.feature_map.active_features()
    }

    pub fn hidden_features(&self) -> PreviewFeatures {
        self.feature_map.hidden_features()
    }

    pub(crate) fn is_valid(&self, flag: PreviewFeature) -> bool {
        self.feature_map.is_valid(flag)
    }

    pub(crate) fn is_stabilized(&self, flag: PreviewFeature) -> bool {
        self.feature_map.is_stabilized(flag)
    }

    pub(crate) fn is_deprecated(&self, flag: PreviewFeature) -> bool {
        self.feature_map.is_deprecated(flag)
    }

    /// The replacement of the feature, if it was renamed globally or for
    /// the current provider.
    pub(crate) fn is_renamed(&self, flag: PreviewFeature) -> Option<RenamedFeature> {
        RENAMED_FEATURES
            .iter()
            .filter(|(key, _)| key.from == flag)
            .find(|(key, _)| key.provider.is_none() || key.provider == self.provider)
            .map(|(_, renamed)| *renamed)
    }
}

impl Default for FeatureMapWithProvider<'_> {
    fn default() -> Self {
        FeatureMapWithProvider {
            provider: None,
            feature_map: ALL_PREVIEW_FEATURES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_are_displayed_in_camel_case() {
        assert_eq!(PreviewFeature::MultiSchema.to_string(), "multiSchema");
        assert_eq!(PreviewFeature::FullTextSearchPostgres.to_string(), "fullTextSearchPostgres");
        assert_eq!(PreviewFeature::parse_opt("MULTISCHEMA"), Some(PreviewFeature::MultiSchema));
        assert_eq!(PreviewFeature::parse_opt("multiSchemas"), None);
    }

    #[test]
    fn full_text_search_depends_on_the_provider() {
        let mysql = FeatureMapWithProvider::new(Some("mysql"));
        let postgres = FeatureMapWithProvider::new(Some("postgresql"));
        let sqlite = FeatureMapWithProvider::new(Some("sqlite"));

        assert!(mysql.is_stabilized(PreviewFeature::FullTextSearch));
        assert!(!mysql.is_valid(PreviewFeature::FullTextSearchPostgres));

        assert_eq!(
            postgres.is_renamed(PreviewFeature::FullTextSearch).map(|r| r.to),
            Some(PreviewFeature::FullTextSearchPostgres)
        );
        assert_eq!(sqlite.is_renamed(PreviewFeature::FullTextSearch), None);
        assert!(sqlite.is_valid(PreviewFeature::FullTextSearch));
    }

    #[test]
    fn global_renames_apply_to_every_provider() {
        for provider in [None, Some("mysql"), Some("mongodb")] {
            let map = FeatureMapWithProvider::new(provider);

            assert_eq!(
                map.is_renamed(PreviewFeature::ReferentialIntegrity).map(|r| r.to),
                Some(PreviewFeature::RelationMode)
            );
        }
    }

    #[test]
    fn hidden_features_are_valid_but_not_listed() {
        let map = FeatureMapWithProvider::default();

        assert!(map.is_valid(PreviewFeature::ReactNative));
        assert!(!map.active_features().contains(PreviewFeature::ReactNative));
    }
}
