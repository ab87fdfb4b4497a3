use crate::{
    ConnectorRegistry, Datasource, coerce,
    configuration::StringFromEnvVar,
    datamodel_connector::{Connector, RelationMode},
    diagnostics::{DatamodelError, DatamodelWarning, Diagnostics, Span},
};
use schema_graph::{ConfigBlock, Expression};
use std::borrow::Cow;

const DIRECT_URL_KEY: &str = "directUrl";
const PREVIEW_FEATURES_KEY: &str = "previewFeatures";
const PROVIDER_KEY: &str = "provider";
const REFERENTIAL_INTEGRITY_KEY: &str = "referentialIntegrity";
const RELATION_MODE_KEY: &str = "relationMode";
const SCHEMAS_KEY: &str = "schemas";
const SHADOW_DATABASE_URL_KEY: &str = "shadowDatabaseUrl";
const URL_KEY: &str = "url";

/// The properties of a block not consumed yet, in declaration order.
pub(super) struct Properties<'a>(Vec<(&'a str, (Span, &'a Expression))>);

impl<'a> Properties<'a> {
    pub(super) fn new(block: &'a ConfigBlock) -> Self {
        Properties(
            block
                .properties
                .iter()
                .map(|prop| (prop.name.as_str(), (prop.span, &prop.value)))
                .collect(),
        )
    }

    /// Take the first property with the given name out.
    pub(super) fn remove(&mut self, name: &str) -> Option<(Span, &'a Expression)> {
        let position = self.0.iter().position(|(key, _)| *key == name)?;
        Some(self.0.remove(position).1)
    }

    pub(super) fn into_remaining(self) -> impl Iterator<Item = (&'a str, (Span, &'a Expression))> {
        self.0.into_iter()
    }
}

/// Loads all datasources from the schema graph.
pub(crate) fn load_datasources_from_graph(
    blocks: &[ConfigBlock],
    diagnostics: &mut Diagnostics,
    connectors: ConnectorRegistry<'_>,
) -> Vec<Datasource> {
    let mut sources = Vec::new();

    for src in blocks {
        tracing::trace!(datasource = %src.name, "loading datasource");

        if let Some(source) = lift_datasource(src, diagnostics, connectors) {
            sources.push(source)
        }
    }

    if sources.len() > 1 {
        for src in blocks {
            diagnostics.push_error(DatamodelError::new_source_validation_error(
                "You defined more than one datasource. This is not allowed yet because support for multiple databases has not been implemented yet.",
                &src.name,
                src.span,
            ));
        }
    }

    sources
}

fn lift_datasource(
    block: &ConfigBlock,
    diagnostics: &mut Diagnostics,
    connectors: ConnectorRegistry<'_>,
) -> Option<Datasource> {
    let source_name = &block.name;
    let mut args = Properties::new(block);

    let (_, provider_arg) = match args.remove(PROVIDER_KEY) {
        Some(provider) => provider,
        None => {
            diagnostics.push_error(DatamodelError::new_source_argument_not_found_error(
                PROVIDER_KEY,
                source_name,
                block.span,
            ));
            return None;
        }
    };

    if provider_arg.is_env_expression() {
        let msg = Cow::Borrowed("A datasource must not use the env() function in the provider argument.");
        diagnostics.push_error(DatamodelError::new_functional_evaluation_error(msg, block.span));
        return None;
    }

    let provider = match provider_arg.as_string_value() {
        Some(("", _)) => {
            diagnostics.push_error(DatamodelError::new_source_validation_error(
                "The provider argument in a datasource must not be empty",
                source_name,
                provider_arg.span(),
            ));
            return None;
        }
        None => {
            diagnostics.push_error(DatamodelError::new_source_validation_error(
                "The provider argument in a datasource must be a string literal",
                source_name,
                provider_arg.span(),
            ));
            return None;
        }
        Some((provider, _)) => provider,
    };

    let (_, url_arg) = match args.remove(URL_KEY) {
        Some(url_arg) => url_arg,
        None => {
            diagnostics.push_error(DatamodelError::new_source_argument_not_found_error(
                URL_KEY,
                source_name,
                block.span,
            ));
            return None;
        }
    };

    let url = StringFromEnvVar::coerce(url_arg, diagnostics)?;

    let shadow_database_url = args.remove(SHADOW_DATABASE_URL_KEY).and_then(|(_, arg)| {
        StringFromEnvVar::coerce(arg, diagnostics)
            .filter(|s| !s.as_literal().is_some_and(|lit| lit.is_empty()))
            .map(|url| (url, arg.span()))
    });

    let (direct_url, direct_url_span) = match args.remove(DIRECT_URL_KEY) {
        Some((_, arg)) => (StringFromEnvVar::coerce(arg, diagnostics), Some(arg.span())),
        None => (None, None),
    };

    preview_features_guardrail(&mut args, diagnostics);

    let active_connector: &'static dyn Connector = match connectors.iter().find(|c| c.is_provider(provider)) {
        Some(c) => *c,
        None => {
            tracing::warn!(provider, "no connector for the datasource provider");

            diagnostics.push_error(DatamodelError::new_datasource_provider_not_known_error(
                provider,
                provider_arg.span(),
            ));

            return None;
        }
    };

    let relation_mode = get_relation_mode(&mut args, block, diagnostics, active_connector);

    let (schemas, schemas_span) = args
        .remove(SCHEMAS_KEY)
        .and_then(|(_, expr)| {
            coerce::array(expr, coerce::string_with_span, diagnostics).map(|schemas| (schemas, expr.span()))
        })
        .map(|(mut schemas, span)| {
            if schemas.is_empty() {
                diagnostics.push_error(DatamodelError::new_schemas_array_empty_error(span));
            }

            schemas.sort_by(|(a, _), (b, _)| a.cmp(b));

            for pair in schemas.windows(2) {
                if pair[0].0 == pair[1].0 {
                    diagnostics.push_error(DatamodelError::new_static(
                        "Duplicated schema names are not allowed",
                        pair[0].1,
                    ))
                }
            }

            schemas.dedup_by(|(a, _), (b, _)| a == b);

            (schemas, Some(span))
        })
        .unwrap_or_default();

    for (name, (span, _)) in args.into_remaining() {
        diagnostics.push_error(DatamodelError::new_property_not_known_error(name, span));
    }

    Some(Datasource {
        schemas: schemas.into_iter().map(|(s, span)| (s.to_owned(), span)).collect(),
        schemas_span,
        name: source_name.to_string(),
        provider: provider.to_owned(),
        active_provider: active_connector.provider_name(),
        url,
        url_span: url_arg.span(),
        documentation: block.documentation.clone(),
        active_connector,
        shadow_database_url,
        direct_url,
        direct_url_span,
        relation_mode,
    })
}

fn get_relation_mode(
    args: &mut Properties<'_>,
    block: &ConfigBlock,
    diagnostics: &mut Diagnostics,
    connector: &'static dyn Connector,
) -> Option<RelationMode> {
    match (args.remove(RELATION_MODE_KEY), args.remove(REFERENTIAL_INTEGRITY_KEY)) {
        (None, None) => None,
        (Some(_), Some((span, _))) => {
            diagnostics.push_error(DatamodelError::new_referential_integrity_and_relation_mode_cooccur_error(span));
            None
        }
        (Some((_, rm)), None) => parse_relation_mode(rm, block, diagnostics, connector),
        (None, Some((span, rm))) => {
            diagnostics.push_warning(DatamodelWarning::new_referential_integrity_attr_deprecation_warning(span));
            parse_relation_mode(rm, block, diagnostics, connector)
        }
    }
}

fn parse_relation_mode(
    rm: &Expression,
    block: &ConfigBlock,
    diagnostics: &mut Diagnostics,
    connector: &'static dyn Connector,
) -> Option<RelationMode> {
    let relation_mode = match coerce::string(rm, diagnostics)? {
        "prisma" => RelationMode::Prisma,
        "foreignKeys" => RelationMode::ForeignKeys,
        other => {
            let message = format!(
                "Invalid relation mode setting: \"{other}\". Supported values: \"prisma\", \"foreignKeys\"",
            );
            let error = DatamodelError::new_source_validation_error(&message, RELATION_MODE_KEY, block.span);
            diagnostics.push_error(error);
            return None;
        }
    };

    if !connector.allowed_relation_mode_settings().contains(relation_mode) {
        let supported_values = connector
            .allowed_relation_mode_settings()
            .iter()
            .map(|v| format!(r#""{v}""#))
            .collect::<Vec<_>>()
            .join(", ");

        let message =
            format!("Invalid relation mode setting: \"{relation_mode}\". Supported values: {supported_values}",);
        let error = DatamodelError::new_source_validation_error(&message, RELATION_MODE_KEY, rm.span());
        diagnostics.push_error(error);
    }

    Some(relation_mode)
}

fn preview_features_guardrail(args: &mut Properties<'_>, diagnostics: &mut Diagnostics) {
    if let Some((span, _)) = args.remove(PREVIEW_FEATURES_KEY) {
        let msg = "Preview features are only supported in the generator block. Please move this field to the generator block.";
        diagnostics.push_error(DatamodelError::new_static(msg, span));
    }
}
