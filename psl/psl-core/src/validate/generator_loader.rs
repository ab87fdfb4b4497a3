use super::datasource_loader::Properties;
use crate::{
    FeatureMapWithProvider, PreviewFeature, PreviewFeatures, coerce,
    configuration::{Generator, GeneratorConfigValue, StringFromEnvVar},
    diagnostics::{DatamodelError, DatamodelWarning, Diagnostics, Span},
};
use itertools::Itertools;
use schema_graph::{ConfigBlock, Expression};
use std::collections::HashMap;

const PROVIDER_KEY: &str = "provider";
const OUTPUT_KEY: &str = "output";
const BINARY_TARGETS_KEY: &str = "binaryTargets";
const PREVIEW_FEATURES_KEY: &str = "previewFeatures";

/// Load and validate Generators defined in the schema graph.
pub(crate) fn load_generators_from_graph(
    blocks: &[ConfigBlock],
    diagnostics: &mut Diagnostics,
    feature_map: &FeatureMapWithProvider<'_>,
) -> Vec<Generator> {
    let mut generators: Vec<Generator> = Vec::with_capacity(blocks.len());

    for generator in blocks {
        tracing::trace!(generator = %generator.name, "loading generator");

        if let Some(generator) = lift_generator(generator, diagnostics, feature_map) {
            generators.push(generator)
        }
    }

    generators
}

fn lift_generator(
    block: &ConfigBlock,
    diagnostics: &mut Diagnostics,
    feature_map: &FeatureMapWithProvider<'_>,
) -> Option<Generator> {
    let mut args = Properties::new(block);

    let provider = match args.remove(PROVIDER_KEY) {
        Some((_, expr)) => StringFromEnvVar::coerce(expr, diagnostics)?,
        None => {
            diagnostics.push_error(DatamodelError::new_generator_argument_not_found_error(
                PROVIDER_KEY,
                &block.name,
                block.span,
            ));

            return None;
        }
    };

    let output = args
        .remove(OUTPUT_KEY)
        .and_then(|(_, expr)| StringFromEnvVar::coerce(expr, diagnostics));

    let binary_targets = args
        .remove(BINARY_TARGETS_KEY)
        .and_then(|(_, expr)| coerce::array(expr, StringFromEnvVar::coerce, diagnostics))
        .unwrap_or_default();

    let preview_features = args
        .remove(PREVIEW_FEATURES_KEY)
        .and_then(|(_, expr)| {
            coerce::array(expr, coerce::string, diagnostics).map(|features| (features, expr.span()))
        })
        .map(|(features, span)| parse_and_validate_preview_features(&features, feature_map, span, diagnostics));

    let config: HashMap<String, GeneratorConfigValue> = args
        .into_remaining()
        .map(|(name, (_, value))| (name.to_owned(), GeneratorConfigValue::from(value)))
        .collect();

    Some(Generator {
        name: block.name.clone(),
        provider,
        output,
        binary_targets,
        preview_features,
        config,
        documentation: block.documentation.clone(),
        span: block.span,
    })
}

/// Validate the requested preview features against the feature map of the
/// active provider. Renamed features activate their replacement.
pub(crate) fn parse_and_validate_preview_features(
    preview_features: &[&str],
    feature_map: &FeatureMapWithProvider<'_>,
    span: Span,
    diagnostics: &mut Diagnostics,
) -> PreviewFeatures {
    let mut features = PreviewFeatures::empty();

    for feature_str in preview_features {
        let feature_opt = PreviewFeature::parse_opt(feature_str);

        if let Some(renamed) = feature_opt.and_then(|feature| feature_map.is_renamed(feature)) {
            features |= renamed.to;

            diagnostics.push_warning(DatamodelWarning::new_preview_feature_renamed(
                feature_str,
                renamed.to,
                renamed.prisly_link_endpoint,
                span,
            ));

            continue;
        }

        match feature_opt {
            Some(feature) if feature_map.is_stabilized(feature) => {
                features |= feature;
                diagnostics.push_warning(DatamodelWarning::new_feature_deprecated(feature_str, span));
            }

            Some(feature) if feature_map.is_deprecated(feature) => {
                features |= feature;
                diagnostics.push_warning(DatamodelWarning::new_preview_feature_deprecated(feature_str, span));
            }

            Some(feature) if feature_map.is_valid(feature) => features |= feature,

            _ => diagnostics.push_error(DatamodelError::new_preview_feature_not_known_error(
                feature_str,
                feature_map.active_features().iter().map(|f| f.to_string()).join(", "),
                span,
            )),
        }
    }

    features
}
