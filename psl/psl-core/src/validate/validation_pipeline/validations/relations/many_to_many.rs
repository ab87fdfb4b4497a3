pub(crate) mod embedded;
pub(crate) mod implicit;

use schema_graph::walkers::{ModelWalker, ScalarFieldWalker};

/// The single scalar field making up the primary key of the model.
fn single_id_field(model: ModelWalker<'_>) -> Option<ScalarFieldWalker<'_>> {
    let pk = model.primary_key()?;
    let mut fields = pk.fields();

    if fields.len() != 1 {
        return None;
    }

    fields.next().and_then(|field| field.as_scalar_field())
}
