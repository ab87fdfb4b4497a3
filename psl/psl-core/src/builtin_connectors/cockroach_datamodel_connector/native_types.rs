crate::native_type_definition! {
    /// The CockroachDB native type enum.
    CockroachType;
    Bit(Option<u32>) -> String,
    Bool -> Boolean,
    Bytes -> Bytes,
    Char(Option<u32>) -> String,
    CatalogSingleChar -> String,
    Date -> DateTime,
    Decimal(Option<(u32, u32)>) -> Decimal,
    Float4 -> Float,
    Float8 -> Float,
    Inet -> String,
    Int2 -> Int,
    Int4 -> Int,
    Int8 -> BigInt,
    JsonB -> Json,
    Oid -> Int,
    String(Option<u32>) -> String,
    Time(Option<u32>) -> DateTime,
    Timestamp(Option<u32>) -> DateTime,
    Timestamptz(Option<u32>) -> DateTime,
    Timetz(Option<u32>) -> DateTime,
    Uuid -> String,
    VarBit(Option<u32>) -> String,
}

impl CockroachType {
    /// Time family types without an argument get a precision of 3.
    pub(super) fn with_default_precision(self) -> Self {
        use CockroachType::*;

        match self {
            Time(None) => Time(Some(3)),
            Timestamp(None) => Timestamp(Some(3)),
            Timestamptz(None) => Timestamptz(Some(3)),
            Timetz(None) => Timetz(Some(3)),
            other => other,
        }
    }
}
