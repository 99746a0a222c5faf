use arraydb::{
    Array, CodecRegistry, Compression, Deserializer, Entry, Error, FlatArray, JaggedArray,
    FORMAT_VERSION, MemoryStorage, NdArrayCodec, ROOT_KEY, Result, Serializer, Storage, Version,
    deserialize, deserialize_key, serialize,
};
use serde_json::{Value, json};

fn record(value: Value) -> Entry {
    match value {
        Value::Object(map) => Entry::Record(map),
        other => panic!("not an object: {other}"),
    }
}

fn flat_storage() -> Result<MemoryStorage> {
    let mut storage = MemoryStorage::new();
    serialize(
        &FlatArray::from_vec(vec![1u32, 2, 3]).into(),
        &mut storage,
        Compression::none(),
    )?;
    Ok(storage)
}

fn jagged_storage() -> Result<MemoryStorage> {
    let mut storage = MemoryStorage::new();
    let a = JaggedArray::from_rows(vec![vec![1.1, 2.2, 3.3], vec![], vec![4.4, 5.5]]);
    serialize(&a.into(), &mut storage, Compression::none())?;
    Ok(storage)
}

/// Rewrites one field of the descriptor stored at `key`.
fn patch(storage: &mut MemoryStorage, key: &str, field: &str, value: Value) -> Result<()> {
    let mut descriptor = Deserializer::new(&*storage).descriptor(key)?;
    descriptor.set(field, value)?;
    storage.set(key, Entry::Record(descriptor.into_record()))
}

#[test]
fn test_missing_content_key() -> Result<()> {
    let mut storage = jagged_storage()?;
    let content = Deserializer::new(&storage)
        .descriptor("0")?
        .str_field("content")?
        .to_owned();
    storage.remove(&content)?;

    let err = deserialize(&storage).unwrap_err();
    assert!(matches!(err, Error::MissingKey(key) if key == content));

    Ok(())
}

#[test]
fn test_missing_payload_key() -> Result<()> {
    let mut storage = flat_storage()?;
    storage.remove("1")?;
    assert!(matches!(
        deserialize(&storage),
        Err(Error::MissingKey(key)) if key == "1"
    ));
    Ok(())
}

#[test]
fn test_empty_storage() {
    let storage = MemoryStorage::new();
    assert!(matches!(
        deserialize(&storage),
        Err(Error::MissingKey(key)) if key == ROOT_KEY
    ));
}

#[test]
fn test_unknown_descriptor_kind() -> Result<()> {
    let mut storage = flat_storage()?;
    patch(&mut storage, "0", "kind", json!("sparsearray"))?;

    let err = deserialize(&storage).unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownDescriptorKind { key, kind } if key == "0" && kind == "sparsearray"
    ));

    Ok(())
}

#[test]
fn test_descriptor_without_kind() -> Result<()> {
    let mut storage = flat_storage()?;
    storage.set("0", record(json!({"dtype": "<u4", "shape": [3], "data": "1"})))?;

    assert!(matches!(
        deserialize(&storage),
        Err(Error::InvalidDescriptor { field: "kind", .. })
    ));

    Ok(())
}

#[test]
fn test_malformed_fields() -> Result<()> {
    let cases = [
        ("dtype", json!("<c16")),
        ("dtype", json!(4)),
        ("shape", json!("3")),
        ("shape", json!([-3])),
        ("data", json!(1)),
        ("compression", json!(null)),
    ];

    for (field, value) in cases {
        let mut storage = flat_storage()?;
        patch(&mut storage, "0", field, value.clone())?;
        match deserialize(&storage) {
            Err(Error::InvalidDescriptor { key, field: f, .. }) => {
                assert_eq!(key, "0");
                assert_eq!(f, field, "{value}");
            }
            other => panic!("{field} = {value}: unexpected {other:?}"),
        }
    }

    Ok(())
}

#[test]
fn test_missing_compression_field_means_none() -> Result<()> {
    let mut storage = flat_storage()?;
    let mut descriptor = Deserializer::new(&storage).descriptor("0")?.into_record();
    descriptor.remove("compression");
    storage.set("0", Entry::Record(descriptor))?;

    assert_eq!(
        deserialize(&storage)?,
        Array::from(FlatArray::from_vec(vec![1u32, 2, 3]))
    );

    Ok(())
}

#[test]
fn test_unaddressable_shape() -> Result<()> {
    let mut storage = flat_storage()?;
    patch(&mut storage, "0", "dtype", json!("|u1"))?;
    patch(&mut storage, "0", "shape", json!([usize::MAX, 0]))?;
    storage.set("1", Entry::Bytes(Vec::new()))?;

    assert!(matches!(
        deserialize(&storage),
        Err(Error::InvariantViolation(_))
    ));

    Ok(())
}

#[test]
fn test_payload_size_mismatch() -> Result<()> {
    let mut storage = flat_storage()?;
    storage.set("1", Entry::Bytes(vec![0; 11]))?;

    assert!(matches!(
        deserialize(&storage),
        Err(Error::PayloadSizeMismatch {
            expected: 12,
            actual: 11
        })
    ));

    Ok(())
}

#[test]
fn test_record_and_payload_confusion() -> Result<()> {
    let storage = flat_storage()?;
    assert!(matches!(
        deserialize_key(&storage, "1"),
        Err(Error::ExpectedRecord(key)) if key == "1"
    ));

    let mut storage = flat_storage()?;
    patch(&mut storage, "0", "data", json!("0"))?;
    assert!(matches!(
        deserialize(&storage),
        Err(Error::ExpectedPayload(key)) if key == "0"
    ));

    Ok(())
}

#[test]
fn test_cyclic_reference() -> Result<()> {
    let mut storage = jagged_storage()?;
    patch(&mut storage, "0", "content", json!("0"))?;

    assert!(matches!(
        deserialize(&storage),
        Err(Error::CyclicReference(key)) if key == "0"
    ));

    let mut storage = MemoryStorage::new();
    storage.set(
        ROOT_KEY,
        record(json!({"format": "arraydb", "version": 1, "root": "root"})),
    )?;
    assert!(matches!(
        deserialize(&storage),
        Err(Error::CyclicReference(_))
    ));

    Ok(())
}

#[test]
fn test_newer_format_version() -> Result<()> {
    let mut storage = flat_storage()?;
    storage.set(
        ROOT_KEY,
        record(json!({"format": "arraydb", "version": 2, "root": "0"})),
    )?;

    match deserialize(&storage) {
        Err(Error::DifferentVersion { found, expected }) => {
            assert_eq!(found, Version::from(2));
            assert_eq!(expected, FORMAT_VERSION);
        }
        other => panic!("unexpected {other:?}"),
    }

    // Descriptors stay readable without going through the header.
    assert!(deserialize_key(&storage, "0").is_ok());

    Ok(())
}

#[test]
fn test_offsets_must_be_flat() -> Result<()> {
    let mut storage = jagged_storage()?;
    let nested = JaggedArray::from_rows(vec![vec![1u8], vec![2]]);
    let nested = Serializer::new(&mut storage).serialize(&nested.into())?;
    patch(&mut storage, "0", "offsets", json!(nested))?;

    assert!(matches!(
        deserialize(&storage),
        Err(Error::InvariantViolation(_))
    ));

    Ok(())
}

#[test]
fn test_unsupported_type() -> Result<()> {
    let codecs = CodecRegistry::empty().with(NdArrayCodec);
    let jagged: Array = JaggedArray::from_rows(vec![vec![1i64]]).into();

    let mut storage = MemoryStorage::new();
    let err = Serializer::new(&mut storage)
        .with_codecs(&codecs)
        .serialize(&jagged)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedType("jagged")));
    assert!(storage.is_empty());

    let err = Deserializer::new(&jagged_storage()?)
        .with_codecs(&codecs)
        .deserialize(ROOT_KEY)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownDescriptorKind { kind, .. } if kind == "jaggedarray"
    ));

    Ok(())
}

#[test]
fn test_error_messages() {
    assert_eq!(
        Error::MissingKey("7".to_owned()).to_string(),
        "Missing key \"7\" in storage"
    );
    assert_eq!(
        Error::UnknownDescriptorKind {
            key: "0".to_owned(),
            kind: "sparsearray".to_owned()
        }
        .to_string(),
        "Unknown descriptor kind \"sparsearray\" at key \"0\""
    );
}
