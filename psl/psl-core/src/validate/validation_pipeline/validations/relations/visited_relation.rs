use super::CompleteInlineRelation;
use schema_graph::walkers::ModelWalker;
use std::{fmt, rc::Rc};

/// A linked list of relations followed from a starting model, sharing the
/// common prefix between the branches of the search.
pub(super) struct VisitedRelation<'db> {
    previous: Option<Rc<VisitedRelation<'db>>>,
    relation: CompleteInlineRelation<'db>,
}

impl<'db> VisitedRelation<'db> {
    /// Create a new root node, starting a new list.
    pub(super) fn root(relation: CompleteInlineRelation<'db>) -> Self {
        Self {
            previous: None,
            relation,
        }
    }

    /// Link a relation to the end of the list.
    pub(super) fn link_next(self: &Rc<Self>, relation: CompleteInlineRelation<'db>) -> Self {
        Self {
            previous: Some(self.clone()),
            relation,
        }
    }

    /// The relations from the root to this node.
    pub(super) fn relations(&self) -> Vec<CompleteInlineRelation<'db>> {
        let mut relations = Vec::new();
        let mut node = Some(self);

        while let Some(visited) = node {
            relations.push(visited.relation);
            node = visited.previous.as_deref();
        }

        relations.reverse();
        relations
    }

    /// Is the model the origin of one of the relations on the path.
    pub(super) fn passes_through(&self, model: ModelWalker<'db>) -> bool {
        self.relations().iter().any(|relation| relation.referencing_model() == model)
    }
}

impl fmt::Display for VisitedRelation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relations = self.relations();

        for (i, relation) in relations.iter().enumerate() {
            if i > 0 {
                f.write_str(" → ")?;
            }

            let field = relation.referencing_field();
            write!(f, "{}.{}", field.model().name(), field.name())?;
        }

        Ok(())
    }
}
