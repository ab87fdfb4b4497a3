use crate::{datamodel_connector::constraint_names::ConstraintNames, validate::validation_pipeline::context::Context};
use diagnostics::Span;

/// An explicit `map` argument on a constraint must fit the identifier
/// length limit of the database.
pub(super) fn validate_db_name(
    model_name: &str,
    attribute: (&str, Span),
    mapped_name: Option<&str>,
    ctx: &mut Context<'_>,
    double_at: bool,
) {
    let (attribute_name, span) = attribute;
    let attribute_name = attribute_name.trim_start_matches('@');

    if let Some(err) =
        ConstraintNames::is_db_name_too_long(span, model_name, mapped_name, attribute_name, ctx.connector, double_at)
    {
        ctx.push_error(err);
    }
}
