use crate::coerce;
use diagnostics::{DatamodelError, Diagnostics, Span};
use schema_graph::Expression;

/// Either an env var or a string literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringFromEnvVar {
    /// Contains the name of env var if the value was read from one.
    pub from_env_var: Option<String>,
    /// Contains the string literal, when it was directly in the schema.
    pub value: Option<String>,
}

impl StringFromEnvVar {
    pub(crate) fn coerce(expr: &Expression, diagnostics: &mut Diagnostics) -> Option<Self> {
        match expr {
            Expression::Function(name, _, _) if name == "env" => {
                let env_function = EnvFunction::from_expression(expr, diagnostics)?;
                Some(StringFromEnvVar::new_from_env_var(env_function.var_name))
            }
            Expression::StringValue(value, _) => Some(StringFromEnvVar::new_literal(value.clone())),
            _ => {
                diagnostics.push_error(DatamodelError::new_type_mismatch_error(
                    "String",
                    expr.describe_value_type(),
                    &expr.to_string(),
                    expr.span(),
                ));
                None
            }
        }
    }

    pub fn new_from_env_var(env_var_name: String) -> StringFromEnvVar {
        StringFromEnvVar {
            from_env_var: Some(env_var_name),
            value: None,
        }
    }

    pub fn new_literal(value: String) -> StringFromEnvVar {
        StringFromEnvVar {
            from_env_var: None,
            value: Some(value),
        }
    }

    /// Returns the name of the env var, if env var.
    pub fn as_env_var(&self) -> Option<&str> {
        self.from_env_var.as_deref()
    }

    /// Returns the contents of the string literal, if applicable.
    pub fn as_literal(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Resolve the value: the literal, or the variable through `env`.
    pub(crate) fn resolve<F>(&self, env: F, span: Span) -> Result<String, UrlValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match (&self.value, &self.from_env_var) {
            (Some(lit), _) if lit.trim().is_empty() => Err(UrlValidationError::EmptyUrlValue),
            (Some(lit), _) => Ok(lit.clone()),
            (None, Some(env_var)) => match env(env_var) {
                Some(var) if var.trim().is_empty() => Err(UrlValidationError::EmptyEnvValue(env_var.clone())),
                Some(var) => Ok(var),
                None => Err(UrlValidationError::NoEnvValue(env_var.clone(), span)),
            },
            (None, None) => Err(UrlValidationError::NoUrlOrEnv),
        }
    }
}

/// Why a URL could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UrlValidationError {
    EmptyUrlValue,
    EmptyEnvValue(String),
    NoEnvValue(String, Span),
    NoUrlOrEnv,
}

struct EnvFunction {
    var_name: String,
}

impl EnvFunction {
    fn from_expression(expr: &Expression, diagnostics: &mut Diagnostics) -> Option<EnvFunction> {
        let args = match expr {
            Expression::Function(name, args, _) if name == "env" => args,
            Expression::Function(..) => {
                diagnostics.push_error(DatamodelError::new_functional_evaluation_error(
                    "Expected this to be an env function.",
                    expr.span(),
                ));
                return None;
            }
            _ => {
                diagnostics.push_error(DatamodelError::new_functional_evaluation_error(
                    "This is not a function expression but expected it to be one.",
                    expr.span(),
                ));
                return None;
            }
        };

        let [var_name] = args.as_slice() else {
            diagnostics.push_error(DatamodelError::new_functional_evaluation_error(
                "Exactly one string parameter must be passed to the env function.",
                expr.span(),
            ));
            return None;
        };

        let var_name = coerce::string(var_name, diagnostics)?.to_owned();

        Some(Self { var_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_calls_take_exactly_one_string() {
        let mut diagnostics = Diagnostics::new();

        let url = StringFromEnvVar::coerce(&Expression::env("DATABASE_URL"), &mut diagnostics);
        assert_eq!(url.as_ref().and_then(|u| u.as_env_var()), Some("DATABASE_URL"));

        let two_args = Expression::function("env", vec![Expression::string("A"), Expression::string("B")]);
        assert_eq!(StringFromEnvVar::coerce(&two_args, &mut diagnostics), None);

        let not_a_string = Expression::function("env", vec![Expression::numeric(1)]);
        assert_eq!(StringFromEnvVar::coerce(&not_a_string, &mut diagnostics), None);

        let messages: Vec<String> = diagnostics.errors().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            [
                "Exactly one string parameter must be passed to the env function.",
                "Expected a String value, but received numeric value `1`.",
            ]
        );
    }

    #[test]
    fn literals_resolve_without_the_environment() {
        let literal = StringFromEnvVar::new_literal("file:dev.db".to_owned());
        assert_eq!(literal.resolve(|_| None, Span::empty()), Ok("file:dev.db".to_owned()));

        let from_env = StringFromEnvVar::new_from_env_var("URL".to_owned());
        assert_eq!(
            from_env.resolve(|_| Some("  ".to_owned()), Span::empty()),
            Err(UrlValidationError::EmptyEnvValue("URL".to_owned()))
        );
        assert_eq!(
            from_env.resolve(|_| None, Span::empty()),
            Err(UrlValidationError::NoEnvValue("URL".to_owned(), Span::empty()))
        );
    }
}
