use crate::{
    RelationFieldId, RelationId, SchemaGraph,
    nodes::{Relation, RelationField},
};

/// Pair up the relation fields of the graph into relations.
///
/// A field is paired with the first field of the referenced model that points
/// back to its own model under the same relation name and is not paired yet.
/// Fields without a counterpart form a relation on their own. Ambiguous
/// definitions are paired in declaration order; telling the user about them
/// is a job for validation.
pub(crate) fn infer_relations(graph: &mut SchemaGraph) {
    let field_count = graph.relation_fields.len();
    let mut assigned: Vec<Option<RelationId>> = vec![None; field_count];

    for idx in 0..field_count {
        if assigned[idx].is_some() {
            continue;
        }

        let field_a = RelationFieldId::from_idx(idx);
        let field = &graph.relation_fields[idx];

        let field_b = graph.models[field.referenced_model.idx()]
            .relation_fields
            .iter()
            .copied()
            .find(|candidate| {
                *candidate != field_a
                    && assigned[candidate.idx()].is_none()
                    && is_back_reference(field, &graph.relation_fields[candidate.idx()])
            });

        let relation_id = RelationId::from_idx(graph.relations.len());
        assigned[idx] = Some(relation_id);

        if let Some(field_b) = field_b {
            assigned[field_b.idx()] = Some(relation_id);
        }

        graph.relations.push(Relation {
            relation_name: field.relation_name.clone(),
            model_a: field.model_id,
            model_b: field.referenced_model,
            field_a,
            field_b,
        });
    }

    graph.field_relations = assigned.into_iter().flatten().collect();
}

fn is_back_reference(field: &RelationField, candidate: &RelationField) -> bool {
    candidate.referenced_model == field.model_id
        && candidate.model_id == field.referenced_model
        && candidate.relation_name == field.relation_name
}

#[cfg(test)]
mod tests {
    use crate::{ScalarType, SchemaBuilder};

    #[test]
    fn fields_are_paired_by_relation_name() {
        let mut schema = SchemaBuilder::new();

        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();
        user.relation("written", "Post").list().name("author");
        user.relation("edited", "Post").list().name("editor");

        let post = schema.model("Post");
        post.scalar("id", ScalarType::Int).id();
        post.scalar("authorId", ScalarType::Int);
        post.scalar("editorId", ScalarType::Int);
        post.relation("editor", "User")
            .name("editor")
            .fields(["editorId"])
            .references(["id"]);
        post.relation("author", "User")
            .name("author")
            .fields(["authorId"])
            .references(["id"]);

        let graph = schema.finish().unwrap();
        let pairs: Vec<(String, Option<String>)> = graph
            .walk_relations()
            .map(|r| {
                let (a, b) = r.fields();
                (a.name().to_owned(), b.map(|b| b.name().to_owned()))
            })
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("written".to_owned(), Some("author".to_owned())),
                ("edited".to_owned(), Some("editor".to_owned())),
            ]
        );
    }

    #[test]
    fn self_relations_pair_two_distinct_fields() {
        let mut schema = SchemaBuilder::new();

        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();
        user.scalar("mentorId", ScalarType::Int).optional();
        user.relation("mentor", "User")
            .optional()
            .fields(["mentorId"])
            .references(["id"]);
        user.relation("mentees", "User").list();

        let graph = schema.finish().unwrap();
        let relation = graph.walk_relations().next().unwrap();
        let (a, b) = relation.fields();

        assert_eq!(graph.walk_relations().count(), 1);
        assert_eq!(a.name(), "mentor");
        assert_eq!(b.map(|b| b.name()), Some("mentees"));
        assert!(relation.is_self_relation());
    }

    #[test]
    fn unmatched_fields_form_their_own_relation() {
        let mut schema = SchemaBuilder::new();

        let user = schema.model("User");
        user.scalar("id", ScalarType::Int).id();
        user.relation("posts", "Post").list();

        let post = schema.model("Post");
        post.scalar("id", ScalarType::Int).id();

        let graph = schema.finish().unwrap();
        let relation = graph.walk_relations().next().unwrap();

        assert!(relation.fields().1.is_none());
    }
}
