use crate::{
    EnumId, EnumValueId,
    nodes::{Enum, EnumValue},
    walkers::Walker,
};
use diagnostics::Span;

/// An `enum` declaration in the schema.
pub type EnumWalker<'db> = Walker<'db, EnumId>;

/// One value in an `enum` declaration in the schema.
pub type EnumValueWalker<'db> = Walker<'db, EnumValueId>;

impl<'db> EnumWalker<'db> {
    fn node(self) -> &'db Enum {
        self.db.enum_node(self.id)
    }

    /// The name of the enum.
    pub fn name(self) -> &'db str {
        &self.node().name
    }

    /// The span of the enum name.
    pub fn span(self) -> Span {
        self.node().span
    }

    /// The `@@map` argument.
    pub fn mapped_name(self) -> Option<&'db str> {
        self.node().mapped_name.as_deref()
    }

    /// The name of the enum in the database.
    pub fn database_name(self) -> &'db str {
        self.mapped_name().unwrap_or_else(|| self.name())
    }

    /// The `@@schema` argument and its span, if any.
    pub fn schema(self) -> Option<(&'db str, Span)> {
        self.node().schema.as_ref().map(|(name, span)| (name.as_str(), *span))
    }

    /// The `///` comment on the enum.
    pub fn documentation(self) -> Option<&'db str> {
        self.node().documentation.as_deref()
    }

    /// The values of the enum.
    pub fn values(self) -> impl ExactSizeIterator<Item = EnumValueWalker<'db>> + 'db {
        (0..self.node().values.len()).map(move |idx| self.walk((self.id, idx)))
    }
}

impl<'db> EnumValueWalker<'db> {
    fn node(self) -> &'db EnumValue {
        &self.db.enum_node(self.id.0).values[self.id.1]
    }

    /// The enum the value belongs to.
    pub fn r#enum(self) -> EnumWalker<'db> {
        self.walk(self.id.0)
    }

    /// The name of the value.
    pub fn name(self) -> &'db str {
        &self.node().name
    }

    /// The span of the value.
    pub fn span(self) -> Span {
        self.node().span
    }

    /// The name of the value in the database.
    pub fn database_name(self) -> &'db str {
        self.node().mapped_name.as_deref().unwrap_or_else(|| self.name())
    }
}
