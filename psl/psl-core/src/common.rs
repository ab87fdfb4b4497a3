//! This module contains shared constants and logic that can be used by engines.

mod preview_features;

pub(crate) use self::preview_features::RenamedFeature;
pub use self::preview_features::{ALL_PREVIEW_FEATURES, FeatureMap, FeatureMapWithProvider, PreviewFeature, PreviewFeatures};
