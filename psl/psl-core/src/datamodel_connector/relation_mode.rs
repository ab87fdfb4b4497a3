use enumflags2::{BitFlags, bitflags};
use schema_graph::ReferentialAction;
use std::fmt;

/// Defines the part of the stack where referential actions are handled.
#[bitflags]
#[repr(u8)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum RelationMode {
    /// Enforced in the database. Needs support from the underlying database
    /// server.
    #[default]
    ForeignKeys,
    /// Enforced by the client. Slower, but for databases that do not support
    /// foreign keys.
    Prisma,
}

impl RelationMode {
    /// The actions the client can emulate when foreign keys are off.
    pub fn allowed_emulated_referential_actions_default() -> BitFlags<ReferentialAction> {
        use ReferentialAction::*;

        Restrict | SetNull | NoAction | Cascade
    }

    /// Parse the value of the `relationMode` datasource property.
    pub fn parse_opt(s: &str) -> Option<Self> {
        match s {
            "foreignKeys" => Some(RelationMode::ForeignKeys),
            "prisma" => Some(RelationMode::Prisma),
            _ => None,
        }
    }

    pub fn is_prisma(&self) -> bool {
        matches!(self, Self::Prisma)
    }

    /// True, if integrity is in database foreign keys
    pub fn uses_foreign_keys(&self) -> bool {
        matches!(self, Self::ForeignKeys)
    }
}

impl fmt::Display for RelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationMode::ForeignKeys => write!(f, "foreignKeys"),
            RelationMode::Prisma => write!(f, "prisma"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_modes_display_as_in_the_datasource() {
        for mode in BitFlags::<RelationMode>::all() {
            assert_eq!(RelationMode::parse_opt(&mode.to_string()), Some(mode));
        }

        assert_eq!(RelationMode::parse_opt("ForeignKeys"), None);
        assert!(RelationMode::default().uses_foreign_keys());
    }
}
