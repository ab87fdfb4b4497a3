use super::{Datasource, Generator};
use crate::{
    PreviewFeatures,
    datamodel_connector::RelationMode,
    diagnostics::{DatamodelError, DatamodelWarning, Diagnostics, FileId, Span},
};

/// The loaded `datasource` and `generator` blocks.
#[derive(Debug, Default)]
pub struct Configuration {
    pub generators: Vec<Generator>,
    pub datasources: Vec<Datasource>,
    pub warnings: Vec<DatamodelWarning>,
}

impl Configuration {
    pub fn new(generators: Vec<Generator>, datasources: Vec<Datasource>, warnings: Vec<DatamodelWarning>) -> Self {
        Self {
            generators,
            datasources,
            warnings,
        }
    }

    pub fn extend(&mut self, other: Configuration) {
        self.generators.extend(other.generators);
        self.datasources.extend(other.datasources);
        self.warnings.extend(other.warnings);
    }

    pub fn validate_that_one_datasource_is_provided(&self) -> Result<(), Diagnostics> {
        if self.datasources.is_empty() {
            Err(DatamodelError::new_validation_error(
                "You defined no datasource. You must define exactly one datasource.",
                Span::new(0, 0, FileId::ZERO),
            )
            .into())
        } else {
            Ok(())
        }
    }

    pub fn relation_mode(&self) -> Option<RelationMode> {
        self.datasources.first().map(|source| source.relation_mode())
    }

    pub fn max_identifier_length(&self) -> usize {
        self.datasources
            .first()
            .map(|source| source.active_connector.max_identifier_length())
            .unwrap_or(usize::MAX)
    }

    /// The union of the preview features of every generator.
    pub fn preview_features(&self) -> PreviewFeatures {
        self.generators.iter().fold(PreviewFeatures::empty(), |acc, generator| {
            acc | generator.preview_features.unwrap_or_default()
        })
    }

    /// The datasource of the schema. Validation reports a missing one; the
    /// callers not going through validation get `None`.
    pub fn first_datasource(&self) -> Option<&Datasource> {
        self.datasources.first()
    }

    /// Resolve the URLs of every datasource through `env`, for consumers
    /// that connect. The direct URL is only resolved when set.
    pub fn resolve_datasource_urls<F>(&mut self, env: F) -> Result<(), Diagnostics>
    where
        F: Fn(&str) -> Option<String> + Copy,
    {
        for datasource in &mut self.datasources {
            if datasource.url.from_env_var.is_some() && datasource.url.value.is_none() {
                datasource.url.value = Some(datasource.load_url(env)?);
            }

            if let Some(direct_url) = datasource.load_direct_url(env)? {
                let from_env_var = datasource.direct_url.as_ref().and_then(|u| u.from_env_var.clone());

                datasource.direct_url = Some(crate::StringFromEnvVar {
                    from_env_var,
                    value: Some(direct_url),
                });
            }
        }

        Ok(())
    }
}
