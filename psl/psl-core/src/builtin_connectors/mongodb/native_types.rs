crate::native_type_definition! {
    /// MongoDB native types. Deprecated and unsupported BSON types are left
    /// out.
    MongoDbType;
    String -> String,
    Double -> Float,
    BinData -> Bytes,
    ObjectId -> String | Bytes,
    Bool -> Boolean,
    Date -> DateTime,
    Int -> Int,
    Timestamp -> DateTime,
    Long -> BigInt | Int,
    Json -> Json,
}
