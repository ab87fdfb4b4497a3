use crate::datamodel_connector::{
    Connector, ConnectorCapability, NativeTypeInstance, constraint_names::ConstraintNames,
};
use diagnostics::Diagnostics;
use schema_graph::{RawNativeType, walkers::*};
use std::borrow::Cow;

fn parse_raw_native_type(raw: &RawNativeType, connector: &dyn Connector) -> Option<NativeTypeInstance> {
    // Errors were reported by the validation pipeline already.
    let mut diagnostics = Diagnostics::new();
    connector.parse_native_type(&raw.name, &raw.args, raw.span, &mut diagnostics)
}

pub trait IndexWalkerExt<'db> {
    /// The constraint name in the database: the `map` argument, or the
    /// generated default.
    fn constraint_name(self, connector: &dyn Connector) -> Cow<'db, str>;
}

impl<'db> IndexWalkerExt<'db> for IndexWalker<'db> {
    fn constraint_name(self, connector: &dyn Connector) -> Cow<'db, str> {
        if let Some(name) = self.mapped_name() {
            return Cow::Borrowed(name);
        }

        let model_db_name = self.model().database_name();
        let field_db_names: Vec<&str> = self.fields().map(|f| f.database_name()).collect();

        if self.is_unique() {
            ConstraintNames::unique_index_name(model_db_name, &field_db_names, connector).into()
        } else {
            ConstraintNames::non_unique_index_name(model_db_name, &field_db_names, connector).into()
        }
    }
}

pub trait PrimaryKeyWalkerExt<'db> {
    /// The name of the primary key constraint. `None` on document stores.
    fn constraint_name(self, connector: &dyn Connector) -> Option<Cow<'db, str>>;
}

impl<'db> PrimaryKeyWalkerExt<'db> for PrimaryKeyWalker<'db> {
    fn constraint_name(self, connector: &dyn Connector) -> Option<Cow<'db, str>> {
        if connector.is_mongo() {
            return None;
        }

        Some(
            self.mapped_name()
                .map(Cow::Borrowed)
                .unwrap_or_else(|| ConstraintNames::primary_key_name(self.model().database_name(), connector).into()),
        )
    }
}

pub trait RelationFieldWalkerExt<'db> {
    /// The name of the foreign key constraint, for the side of the relation
    /// defining `fields`.
    fn constraint_name(self, connector: &dyn Connector) -> Option<Cow<'db, str>>;
}

impl<'db> RelationFieldWalkerExt<'db> for RelationFieldWalker<'db> {
    fn constraint_name(self, connector: &dyn Connector) -> Option<Cow<'db, str>> {
        let fields = self.referencing_fields()?;

        if let Some(name) = self.mapped_name() {
            return Some(Cow::Borrowed(name));
        }

        let field_db_names: Vec<&str> = fields.map(|f| f.database_name()).collect();
        let table = self.model().database_name();

        Some(ConstraintNames::foreign_key_constraint_name(table, &field_db_names, connector).into())
    }
}

pub trait DefaultValueExt<'db> {
    /// The name of the default constraint, on connectors with named
    /// default values.
    fn constraint_name(self, connector: &dyn Connector) -> Option<Cow<'db, str>>;
}

impl<'db> DefaultValueExt<'db> for DefaultValueWalker<'db> {
    fn constraint_name(self, connector: &dyn Connector) -> Option<Cow<'db, str>> {
        if !connector.has_capability(ConnectorCapability::NamedDefaultValues) {
            return None;
        }

        let name = self.mapped_name().map(Cow::Borrowed).unwrap_or_else(|| {
            let field = self.field();
            ConstraintNames::default_name(field.model().database_name(), field.database_name(), connector).into()
        });

        Some(name)
    }
}

pub trait ScalarFieldWalkerExt {
    /// The parsed native type of the field, if it has one.
    fn native_type_instance(self, connector: &dyn Connector) -> Option<NativeTypeInstance>;
}

impl ScalarFieldWalkerExt for ScalarFieldWalker<'_> {
    fn native_type_instance(self, connector: &dyn Connector) -> Option<NativeTypeInstance> {
        self.raw_native_type().and_then(|raw| parse_raw_native_type(raw, connector))
    }
}

impl ScalarFieldWalkerExt for CompositeTypeFieldWalker<'_> {
    fn native_type_instance(self, connector: &dyn Connector) -> Option<NativeTypeInstance> {
        self.raw_native_type().and_then(|raw| parse_raw_native_type(raw, connector))
    }
}

impl ScalarFieldWalkerExt for IndexFieldWalker<'_> {
    fn native_type_instance(self, connector: &dyn Connector) -> Option<NativeTypeInstance> {
        self.raw_native_type().and_then(|raw| parse_raw_native_type(raw, connector))
    }
}
