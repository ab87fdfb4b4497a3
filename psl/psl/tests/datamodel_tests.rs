#![allow(clippy::module_inception)]

mod common;

mod attributes {
    mod ids;
    mod indexes;
}

mod capabilities {
    mod mongodb;
    mod sqlite;
}

mod config {
    mod datasources;
    mod generators;
}

mod relations {
    mod many_to_many;
    mod one_to_many;
    mod one_to_one;
    mod referential_actions;
}

mod types {
    mod composite_types;
    mod enums;
    mod native_types;
}
