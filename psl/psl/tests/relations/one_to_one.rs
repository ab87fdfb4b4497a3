use crate::common::*;

#[test]
fn a_one_to_one_relation_with_unique_fields_is_valid() {
    let mut schema = with_datasource(Provider::Postgres);

    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("profile", "Profile").optional();

    let profile = schema.model("Profile");
    profile.scalar("id", ScalarType::Int).id();
    profile.scalar("userId", ScalarType::Int).unique();
    profile.relation("user", "User").fields(["userId"]).references(["id"]);

    assert_valid(schema);
}

#[test]
fn references_on_both_sides_are_reported_on_each_field() {
    let mut schema = with_datasource(Provider::Postgres);

    let alice = schema.model("Alice");
    alice.scalar("id", ScalarType::Int).id();
    alice.scalar("bobId", ScalarType::Int).optional().unique();
    alice
        .relation("bob", "Bob")
        .optional()
        .fields(["bobId"])
        .references(["id"]);

    let bob = schema.model("Bob");
    bob.scalar("id", ScalarType::Int).id();
    bob.relation("alice", "Alice").optional().references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The relation fields `bob` on Model `Alice` and `alice` on Model `Bob` both provide the `references` argument in the @relation attribute. You have to provide it only on one of the two fields.",
                "Error parsing attribute \"@relation\": The relation fields `bob` on Model `Alice` and `alice` on Model `Bob` both provide the `references` argument in the @relation attribute. You have to provide it only on one of the two fields.",
            ]
        "#]],
    );
}

#[test]
fn one_side_must_provide_fields_and_references() {
    let mut schema = with_datasource(Provider::Postgres);

    let alice = schema.model("Alice");
    alice.scalar("id", ScalarType::Int).id();
    alice.relation("bob", "Bob").optional();

    let bob = schema.model("Bob");
    bob.scalar("id", ScalarType::Int).id();
    bob.relation("alice", "Alice").optional();

    let mut errors = error_messages(schema);
    errors.sort();

    expect![[r#"
        [
            "Error parsing attribute \"@relation\": The relation fields `alice` on Model `Bob` and `bob` on Model `Alice` do not provide the `fields` argument in the @relation attribute. You have to provide it on one of the two fields.",
            "Error parsing attribute \"@relation\": The relation fields `alice` on Model `Bob` and `bob` on Model `Alice` do not provide the `references` argument in the @relation attribute. You have to provide it on one of the two fields.",
            "Error parsing attribute \"@relation\": The relation fields `bob` on Model `Alice` and `alice` on Model `Bob` do not provide the `fields` argument in the @relation attribute. You have to provide it on one of the two fields.",
            "Error parsing attribute \"@relation\": The relation fields `bob` on Model `Alice` and `alice` on Model `Bob` do not provide the `references` argument in the @relation attribute. You have to provide it on one of the two fields.",
        ]
    "#]]
    .assert_debug_eq(&errors);
}

#[test]
fn the_referencing_fields_must_be_unique() {
    let mut schema = with_datasource(Provider::Postgres);

    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("profile", "Profile").optional();

    let profile = schema.model("Profile");
    profile.scalar("id", ScalarType::Int).id();
    profile.scalar("userId", ScalarType::Int);
    profile.relation("user", "User").fields(["userId"]).references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": A one-to-one relation must use unique fields on the defining side. Either add an `@unique` attribute to the field `userId`, or change the relation to one-to-many.",
            ]
        "#]],
    );
}

#[test]
fn compound_referencing_fields_must_be_unique_together() {
    let mut schema = with_datasource(Provider::Postgres);

    let user = schema.model("User");
    user.scalar("firstName", ScalarType::String);
    user.scalar("lastName", ScalarType::String);
    user.id(["firstName", "lastName"]);
    user.relation("profile", "Profile").optional();

    let profile = schema.model("Profile");
    profile.scalar("id", ScalarType::Int).id();
    profile.scalar("firstName", ScalarType::String);
    profile.scalar("lastName", ScalarType::String);
    profile
        .relation("user", "User")
        .fields(["firstName", "lastName"])
        .references(["firstName", "lastName"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": A one-to-one relation must use unique fields on the defining side. Either add an `@@unique([firstName, lastName])` attribute to the model, or change the relation to one-to-many.",
            ]
        "#]],
    );
}

#[test]
fn the_back_relation_cannot_be_required() {
    let mut schema = with_datasource(Provider::Postgres);

    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("profile", "Profile");

    let profile = schema.model("Profile");
    profile.scalar("id", ScalarType::Int).id();
    profile.scalar("userId", ScalarType::Int).unique();
    profile.relation("user", "User").fields(["userId"]).references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The relation field `profile` on Model `User` is required. This is not valid because it's not possible to enforce this constraint on the database level. Please change the field type from `Profile` to `Profile?` to fix this.",
            ]
        "#]],
    );
}

#[test]
fn fields_belong_on_the_required_side() {
    let mut schema = with_datasource(Provider::Postgres);

    let user = schema.model("User");
    user.scalar("id", ScalarType::Int).id();
    user.relation("profile", "Profile");

    let profile = schema.model("Profile");
    profile.scalar("id", ScalarType::Int).id();
    profile.scalar("userId", ScalarType::Int).optional().unique();
    profile
        .relation("user", "User")
        .optional()
        .fields(["userId"])
        .references(["id"]);

    expect_errors(
        schema,
        expect![[r#"
            [
                "Error parsing attribute \"@relation\": The relation field `Profile.user` defines the `fields` and/or `references` argument. You must set them on the required side of the relation (`User.profile`) in order for the constraints to be enforced. Alternatively, you can change this field to be required and the opposite optional, or make both sides of the relation optional.",
            ]
        "#]],
    );
}
