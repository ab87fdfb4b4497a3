crate::native_type_definition! {
    /// The MySQL native type enum.
    MySqlType;
    Int -> Int,
    UnsignedInt -> Int,
    SmallInt -> Int,
    UnsignedSmallInt -> Int,
    TinyInt -> Boolean | Int,
    UnsignedTinyInt -> Boolean | Int,
    MediumInt -> Int,
    UnsignedMediumInt -> Int,
    BigInt -> BigInt,
    Decimal(Option<(u32, u32)>) -> Decimal,
    UnsignedBigInt -> BigInt,
    Float -> Float,
    Double -> Float,
    Bit(u32) -> Boolean | Bytes,
    Char(u32) -> String,
    VarChar(u32) -> String,
    Binary(u32) -> Bytes,
    VarBinary(u32) -> Bytes,
    TinyBlob -> Bytes,
    Blob -> Bytes,
    MediumBlob -> Bytes,
    LongBlob -> Bytes,
    TinyText -> String,
    Text -> String,
    MediumText -> String,
    LongText -> String,
    Date -> DateTime,
    Time(Option<u32>) -> DateTime,
    DateTime(Option<u32>) -> DateTime,
    Timestamp(Option<u32>) -> DateTime,
    Year -> Int,
    Json -> Json,
}

impl MySqlType {
    /// MySQL stores whole seconds unless a precision is given.
    pub(super) fn with_default_precision(self) -> Self {
        match self {
            MySqlType::Time(None) => MySqlType::Time(Some(0)),
            MySqlType::DateTime(None) => MySqlType::DateTime(Some(0)),
            MySqlType::Timestamp(None) => MySqlType::Timestamp(Some(0)),
            other => other,
        }
    }

    /// The user-defined precision for timestamp columns, where applicable.
    pub fn timestamp_precision(&self) -> Option<u32> {
        match self {
            MySqlType::Time(n) | MySqlType::DateTime(n) | MySqlType::Timestamp(n) => *n,
            _ => None,
        }
    }

    /// Text and blob types need a length prefix to be part of a key.
    pub(super) fn needs_length_prefix_in_keys(&self) -> bool {
        matches!(
            self,
            MySqlType::Text
                | MySqlType::LongText
                | MySqlType::MediumText
                | MySqlType::TinyText
                | MySqlType::Blob
                | MySqlType::TinyBlob
                | MySqlType::MediumBlob
                | MySqlType::LongBlob
        )
    }
}
