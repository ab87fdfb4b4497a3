use crate::{
    configuration::{StringFromEnvVar, env_vars::UrlValidationError},
    datamodel_connector::{Connector, ConnectorCapabilities, RelationMode},
    diagnostics::{DatamodelError, Diagnostics, Span},
};
use std::borrow::Cow;

/// A `datasource` from the schema.
#[derive(Clone)]
pub struct Datasource {
    pub name: String,
    /// The provider string
    pub provider: String,
    /// The provider that was selected as active from all specified providers
    pub active_provider: &'static str,
    pub url: StringFromEnvVar,
    pub url_span: Span,
    pub documentation: Option<String>,
    /// the connector of the active provider
    pub active_connector: &'static dyn Connector,
    /// An optional user-defined shadow database URL.
    pub shadow_database_url: Option<(StringFromEnvVar, Span)>,
    /// An optional URL to connect to the database without a pooler.
    pub direct_url: Option<StringFromEnvVar>,
    pub direct_url_span: Option<Span>,
    /// In which layer referential actions are handled. Also set by the
    /// deprecated `referentialIntegrity` property.
    pub relation_mode: Option<RelationMode>,
    /// _Sorted_ vec of schemas defined in the schemas property.
    pub schemas: Vec<(String, Span)>,
    pub(crate) schemas_span: Option<Span>,
}

impl std::fmt::Debug for Datasource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datasource")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("active_provider", &self.active_provider)
            .field("url", &"<url>")
            .field("documentation", &self.documentation)
            .field("active_connector", &&"...")
            .field("shadow_database_url", &"<shadow_database_url>")
            .field("direct_url", &"<direct_url>")
            .field("relation_mode", &self.relation_mode)
            .field("schemas", &self.schemas)
            .finish()
    }
}

impl Datasource {
    /// Is the schema listed in the `schemas` property?
    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.binary_search_by_key(&name, |(s, _)| s).is_ok()
    }

    /// The span of the `schemas` property, if set.
    pub fn schemas_span(&self) -> Option<Span> {
        self.schemas_span
    }

    pub fn capabilities(&self) -> ConnectorCapabilities {
        self.active_connector.capabilities()
    }

    /// The applicable relation mode for this datasource.
    pub fn relation_mode(&self) -> RelationMode {
        self.relation_mode
            .unwrap_or_else(|| self.active_connector.default_relation_mode())
    }

    /// Load the database URL, validating it and resolving env vars in the
    /// process.
    pub fn load_url<F>(&self, env: F) -> Result<String, Diagnostics>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = self.url.resolve(env, self.url_span).map_err(|err| match err {
            UrlValidationError::EmptyUrlValue | UrlValidationError::NoUrlOrEnv => {
                let msg = "You must provide a nonempty URL";
                DatamodelError::new_source_validation_error(msg, &self.name, self.url_span)
            }
            UrlValidationError::EmptyEnvValue(env_var) => DatamodelError::new_source_validation_error(
                &format!("You must provide a nonempty URL. The environment variable `{env_var}` resolved to an empty string."),
                &self.name,
                self.url_span,
            ),
            UrlValidationError::NoEnvValue(env_var, span) => {
                DatamodelError::new_environment_functional_evaluation_error(env_var, span)
            }
        })?;

        self.active_connector.validate_url(&url).map_err(|err_str| {
            let err_str = if url.starts_with("prisma://") {
                let s = indoc::formatdoc! {"
                    {err_str}

                    To use a URL with protocol `prisma://`, you need to either enable Accelerate or the Data Proxy.
                "};

                Cow::from(s)
            } else {
                Cow::from(err_str.to_string())
            };

            DatamodelError::new_source_validation_error(&format!("the URL {}", &err_str), &self.name, self.url_span)
        })?;

        Ok(url)
    }

    /// Load the shadow database URL, validating it and resolving env vars in
    /// the process. Empty and missing env vars count as no shadow database,
    /// since the same schema is used in development and in deployment.
    pub fn load_shadow_database_url<F>(&self, env: F) -> Result<Option<String>, Diagnostics>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some((url, span)) = &self.shadow_database_url else {
            return Ok(None);
        };

        let url = match url.resolve(env, *span) {
            Ok(url) => url,
            Err(_) => return Ok(None),
        };

        self.active_connector.validate_url(&url).map_err(|err_str| {
            DatamodelError::new_source_validation_error(
                &format!("the shadow database URL {err_str}"),
                &self.name,
                *span,
            )
        })?;

        Ok(Some(url))
    }

    /// Load the direct URL. Unlike the shadow database URL, a direct URL
    /// that cannot be resolved is an error.
    pub fn load_direct_url<F>(&self, env: F) -> Result<Option<String>, Diagnostics>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (Some(url), Some(span)) = (&self.direct_url, self.direct_url_span) else {
            return Ok(None);
        };

        let url = url.resolve(env, span).map_err(|err| match err {
            UrlValidationError::EmptyUrlValue | UrlValidationError::NoUrlOrEnv => {
                DatamodelError::new_source_validation_error("You must provide a nonempty direct URL", &self.name, span)
            }
            UrlValidationError::EmptyEnvValue(env_var) => DatamodelError::new_source_validation_error(
                &format!(
                    "You must provide a nonempty direct URL. The environment variable `{env_var}` resolved to an empty string."
                ),
                &self.name,
                span,
            ),
            UrlValidationError::NoEnvValue(env_var, span) => {
                DatamodelError::new_environment_functional_evaluation_error(env_var, span)
            }
        })?;

        self.active_connector.validate_url(&url).map_err(|err_str| {
            DatamodelError::new_source_validation_error(&format!("the direct URL {err_str}"), &self.name, span)
        })?;

        Ok(Some(url))
    }
}
