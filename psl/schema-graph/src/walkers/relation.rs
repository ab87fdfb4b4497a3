use crate::{
    RelationId,
    nodes::Relation,
    walkers::{ModelWalker, RelationFieldWalker, RelationName, Walker},
};

/// A relation that has the minimal amount of information for us to create one. Useful for
/// validation purposes. Holds all possible relation types.
pub type RelationWalker<'db> = Walker<'db, RelationId>;

impl<'db> RelationWalker<'db> {
    fn get(self) -> &'db Relation {
        self.db.relation(self.id)
    }

    /// The models at each end of the relation. `[A, A]` for self-relations.
    pub fn models(self) -> [ModelWalker<'db>; 2] {
        let relation = self.get();
        [self.walk(relation.model_a), self.walk(relation.model_b)]
    }

    /// The relation fields that define the relation. The second one is missing
    /// when the relation is only defined from one side.
    pub fn fields(self) -> (RelationFieldWalker<'db>, Option<RelationFieldWalker<'db>>) {
        let relation = self.get();
        (self.walk(relation.field_a), relation.field_b.map(|id| self.walk(id)))
    }

    /// All the relation fields of the relation, one or two.
    pub fn relation_fields(self) -> impl Iterator<Item = RelationFieldWalker<'db>> + 'db {
        let db = self.db;
        self.get().fields().map(move |id| db.walk(id))
    }

    /// Is the relation defined by both sides?
    pub fn is_complete(self) -> bool {
        self.get().field_b.is_some()
    }

    /// Is this a relation where both ends are the same model?
    pub fn is_self_relation(self) -> bool {
        let r = self.get();
        r.model_a == r.model_b
    }

    /// The relation name, explicit or generated from the model names.
    pub fn relation_name(self) -> RelationName<'db> {
        match self.get().relation_name.as_deref() {
            Some(name) => RelationName::Explicit(name),
            None => {
                let [a, b] = self.models();
                RelationName::Generated(a.name(), b.name())
            }
        }
    }

    /// Is any of the fields `@ignore`d, or any of the models `@@ignore`d?
    pub fn is_ignored(self) -> bool {
        self.relation_fields().any(|f| f.is_ignored()) || self.models().iter().any(|m| m.is_ignored())
    }
}
