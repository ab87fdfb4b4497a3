//! Convention for generating constraint names when the schema does not
//! map them.

use crate::datamodel_connector::Connector;
use diagnostics::{DatamodelError, Span};

/// Generated names for primary keys, indexes, foreign keys and default
/// constraints.
pub struct ConstraintNames;

impl ConstraintNames {
    /// Aligned with PG, to maximize the amount of times the name is a match
    /// on introspection.
    pub fn primary_key_name(table_name: &str, connector: &dyn Connector) -> String {
        Self::with_suffix(table_name.to_owned(), "_pkey", connector)
    }

    pub fn unique_index_name(table_name: &str, column_names: &[&str], connector: &dyn Connector) -> String {
        Self::index_name_impl(table_name, column_names, "_key", connector)
    }

    pub fn non_unique_index_name(table_name: &str, column_names: &[&str], connector: &dyn Connector) -> String {
        Self::index_name_impl(table_name, column_names, "_idx", connector)
    }

    fn index_name_impl(table_name: &str, column_names: &[&str], suffix: &str, connector: &dyn Connector) -> String {
        let mut out = String::with_capacity(table_name.len() + column_names.len() * 8 + suffix.len());

        out.push_str(table_name);
        out.push('_');
        out.push_str(&column_names.join("_"));

        Self::with_suffix(out, suffix, connector)
    }

    /// The name of the default constraint of a column. Only used on SQL
    /// Server.
    pub fn default_name(table_name: &str, column_name: &str, connector: &dyn Connector) -> String {
        Self::with_suffix(format!("{table_name}_{column_name}"), "_df", connector)
    }

    pub fn foreign_key_constraint_name(table_name: &str, column_names: &[&str], connector: &dyn Connector) -> String {
        let mut out = String::with_capacity(table_name.len() + column_names.len() * 8 + 5);

        out.push_str(table_name);
        out.push('_');
        out.push_str(&column_names.join("_"));

        Self::with_suffix(out, "_fkey", connector)
    }

    /// Checks an explicit `map` argument against the identifier length limit
    /// of the connector.
    pub fn is_db_name_too_long(
        span: Span,
        object_name: &str,
        name: Option<&str>,
        attribute: &str,
        connector: &dyn Connector,
        double_at: bool,
    ) -> Option<DatamodelError> {
        let name = name?;

        if name.len() <= connector.max_identifier_length() {
            return None;
        }

        let ats = if double_at { "@@" } else { "@" };

        Some(DatamodelError::new_model_validation_error(
            &format!(
                "The constraint name '{name}' specified in the `map` argument for the `{ats}{attribute}` constraint is too long for your chosen provider. The maximum allowed length is {} bytes.",
                connector.max_identifier_length()
            ),
            "model",
            object_name,
            span,
        ))
    }

    fn with_suffix(mut name: String, suffix: &str, connector: &dyn Connector) -> String {
        let limit = connector.max_identifier_length().saturating_sub(suffix.len());

        if name.len() > limit {
            let mut boundary = limit;

            while !name.is_char_boundary(boundary) {
                boundary -= 1;
            }

            name.truncate(boundary);
        }

        name.push_str(suffix);
        name
    }
}

#[cfg(all(test, feature = "postgresql"))]
mod tests {
    use super::*;
    use crate::builtin_connectors::POSTGRES;

    #[test]
    fn generated_names_follow_the_table_and_column_convention() {
        assert_eq!(ConstraintNames::primary_key_name("User", POSTGRES), "User_pkey");
        assert_eq!(
            ConstraintNames::unique_index_name("User", &["email", "tenant"], POSTGRES),
            "User_email_tenant_key"
        );
        assert_eq!(
            ConstraintNames::foreign_key_constraint_name("Post", &["authorId"], POSTGRES),
            "Post_authorId_fkey"
        );
    }

    #[test]
    fn generated_names_are_truncated_to_the_identifier_limit() {
        let table = "a".repeat(80);
        let name = ConstraintNames::non_unique_index_name(&table, &["b"], POSTGRES);

        assert_eq!(name.len(), 63);
        assert!(name.ends_with("_idx"));
    }
}
