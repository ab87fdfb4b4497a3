macro_rules! id_type {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub(crate) fn idx(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_idx(idx: usize) -> Self {
                $name(idx as u32)
            }
        }
    };
}

id_type!(
    /// A model or a view.
    ModelId
);
id_type!(
    /// A scalar field of a model, enum and composite-typed fields included.
    ScalarFieldId
);
id_type!(
    /// A field pointing to another model.
    RelationFieldId
);
id_type!(EnumId);
id_type!(CompositeTypeId);
id_type!(
    /// A relation between two models, defined by one or two relation fields.
    RelationId
);

/// A field in a composite type: the type and the position of the field.
pub type CompositeTypeFieldId = (CompositeTypeId, usize);

/// An index or unique attribute: the model and its position in the model.
pub type IndexId = (ModelId, usize);

/// A value in an enum: the enum and the position of the value.
pub type EnumValueId = (EnumId, usize);
