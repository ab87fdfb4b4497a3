crate::native_type_definition! {
    /// The Postgres native type enum.
    PostgresType;
    SmallInt -> Int,
    Integer -> Int,
    BigInt -> BigInt,
    Decimal(Option<(u32, u32)>) -> Decimal,
    Money -> Decimal,
    Inet -> String,
    Oid -> Int,
    Citext -> String,
    Real -> Float,
    DoublePrecision -> Float,
    VarChar(Option<u32>) -> String,
    Char(Option<u32>) -> String,
    Text -> String,
    ByteA -> Bytes,
    Timestamp(Option<u32>) -> DateTime,
    Timestamptz(Option<u32>) -> DateTime,
    Date -> DateTime,
    Time(Option<u32>) -> DateTime,
    Timetz(Option<u32>) -> DateTime,
    Boolean -> Boolean,
    Bit(Option<u32>) -> String,
    VarBit(Option<u32>) -> String,
    Uuid -> String,
    Xml -> String,
    Json -> Json,
    JsonB -> Json,
}

/// Precision of the time family types written without an argument.
pub(super) const DEFAULT_TIME_PRECISION: u32 = 3;

impl PostgresType {
    /// Time family types without an argument get the default precision.
    pub(super) fn with_default_precision(self) -> Self {
        use PostgresType::*;

        let default = Some(DEFAULT_TIME_PRECISION);

        match self {
            Timestamp(None) => Timestamp(default),
            Timestamptz(None) => Timestamptz(default),
            Time(None) => Time(default),
            Timetz(None) => Timetz(default),
            other => other,
        }
    }

    /// The precision of the time family types, where set.
    pub(super) fn time_precision(&self) -> Option<u32> {
        match self {
            PostgresType::Timestamp(p)
            | PostgresType::Timestamptz(p)
            | PostgresType::Time(p)
            | PostgresType::Timetz(p) => *p,
            _ => None,
        }
    }
}
