use crate::common::*;

#[test]
fn a_cycle_between_two_types_is_reported_once() {
    let mut schema = with_datasource(Provider::Mongo);
    schema.composite_type("A").field("b", "B");
    schema.composite_type("B").field("a", "A");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating field `a` in composite type `B`: The types cause an endless cycle in the path `A` → `B` → `A`. Please change one of the fields to be either optional or a list to break the cycle.",
            ]
        "#]],
    );
}

#[test]
fn a_type_referring_to_itself_is_a_cycle() {
    let mut schema = with_datasource(Provider::Mongo);
    schema.composite_type("Node").field("parent", "Node");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating field `parent` in composite type `Node`: The type is the same as the parent and causes an endless cycle. Please change the field to be either optional or a list.",
            ]
        "#]],
    );
}

#[test]
fn optional_and_list_fields_break_cycles() {
    let mut schema = with_datasource(Provider::Mongo);
    schema.composite_type("A").field("b", "B").optional();
    schema.composite_type("B").field("a", "A");
    schema.composite_type("Tree").field("children", "Tree").list();

    assert_valid(schema);
}

#[test]
fn composite_types_need_connector_support() {
    let mut schema = with_datasource(Provider::Postgres);
    schema.composite_type("Address").scalar("street", ScalarType::String);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: Composite types are not supported on Postgres.",
            ]
        "#]],
    );
}

#[test]
fn composite_types_need_at_least_one_field() {
    let mut schema = with_datasource(Provider::Mongo);
    schema.composite_type("Empty");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error validating: A type must have at least one field defined.",
            ]
        "#]],
    );
}

#[test]
fn composite_type_defaults_cannot_be_named() {
    let mut schema = with_datasource(Provider::Mongo);
    schema
        .composite_type("Address")
        .scalar("country", ScalarType::String)
        .named_default(Expression::string("NL"), "country_default");

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@default\": A `map` argument for the default value of a field on a composite type is not allowed. Consider removing it.",
            ]
        "#]],
    );
}
