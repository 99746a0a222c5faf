use std::collections::{BTreeSet, HashMap};

use arraydb::{
    Array, BoxError, ByteOrder, Compression, DType, Deserializer, Entry, FlatArray, Functions,
    JaggedArray, MemoryStorage, ROOT_KEY, Result, Serializer, Storage, deserialize,
    deserialize_key, reachable_keys, register_compression, retain_reachable, serialize,
};
use serde_json::{Value, json};

fn record(storage: &dyn Storage, key: &str) -> Value {
    match storage.get(key).unwrap() {
        Some(Entry::Record(record)) => Value::Object(record),
        other => panic!("expected a record at {key:?}, got {other:?}"),
    }
}

fn fail_over_64(bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
    if bytes.len() > 64 {
        return Err(format!("{} bytes is too large", bytes.len()).into());
    }
    Ok(bytes.to_vec())
}

fn identity(bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
    Ok(bytes.to_vec())
}

#[test]
fn test_flat_wire_shape() -> Result<()> {
    let a = FlatArray::from_values(&[1u16, 2, 3, 4], [2, 2], ByteOrder::Big)?;
    let mut storage = MemoryStorage::new();
    let root = serialize(&a.into(), &mut storage, Compression::none())?;

    assert_eq!(root, "0");
    assert_eq!(storage.keys()?, vec!["0", "1", "root"]);
    assert_eq!(
        record(&storage, "0"),
        json!({
            "kind": "ndarray",
            "dtype": ">u2",
            "shape": [2, 2],
            "compression": "none",
            "data": "1",
        })
    );
    assert_eq!(
        storage.get("1")?,
        Some(Entry::Bytes(vec![0, 1, 0, 2, 0, 3, 0, 4]))
    );
    assert_eq!(
        record(&storage, ROOT_KEY),
        json!({"format": "arraydb", "version": 1, "root": "0"})
    );

    Ok(())
}

#[test]
fn test_jagged_wire_shape() -> Result<()> {
    let a = JaggedArray::from_rows(vec![vec![1.5f64], vec![2.5, 3.5]]);
    let mut storage = MemoryStorage::new();
    serialize(&a.into(), &mut storage, Compression::none())?;

    assert_eq!(storage.len(), 6);
    assert_eq!(
        record(&storage, "0"),
        json!({"kind": "jaggedarray", "offsets": "1", "content": "3"})
    );

    let offsets = record(&storage, "1");
    assert_eq!(offsets["kind"], "ndarray");
    assert_eq!(
        offsets["dtype"],
        DType::of::<i64>(ByteOrder::NATIVE).to_string()
    );
    assert_eq!(offsets["shape"], json!([3]));
    assert_eq!(offsets["data"], "2");

    let content = record(&storage, "3");
    assert_eq!(content["shape"], json!([3]));
    assert_eq!(content["data"], "4");

    Ok(())
}

#[test]
fn test_every_key_is_reachable() -> Result<()> {
    let inner = JaggedArray::from_rows(vec![vec![1u8, 2], vec![3]]);
    let outer = JaggedArray::new(FlatArray::from_vec(vec![0i64, 1, 2]), inner)?;

    let mut storage = MemoryStorage::new();
    serialize(&outer.into(), &mut storage, Compression::none())?;

    let reachable = reachable_keys(&storage, ROOT_KEY)?;
    let all: BTreeSet<String> = storage.keys()?.into_iter().collect();
    assert_eq!(reachable, all);
    assert_eq!(retain_reachable(&mut storage, &[ROOT_KEY])?, 0);

    Ok(())
}

#[test]
fn test_existing_keys_are_left_alone() -> Result<()> {
    let mut storage = MemoryStorage::new();
    storage.set("0", Entry::Bytes(vec![42]))?;
    storage.set("2", Entry::Record(serde_json::Map::new()))?;

    let a: Array = FlatArray::from_vec(vec![1.0f32, 2.0]).into();
    let root = Serializer::new(&mut storage).serialize(&a)?;

    assert_eq!(root, "1");
    assert_eq!(storage.get("0")?, Some(Entry::Bytes(vec![42])));
    assert_eq!(record(&storage, "2"), json!({}));
    assert_eq!(record(&storage, "1")["data"], "3");
    assert!(!storage.contains(ROOT_KEY)?);
    assert_eq!(deserialize_key(&storage, &root)?, a);

    Ok(())
}

#[test]
fn test_several_roots_share_a_mapping() -> Result<()> {
    let a: Array = FlatArray::from_vec(vec![1i32, 2, 3]).into();
    let b: Array = JaggedArray::from_rows(vec![vec![4i32], vec![5, 6]]).into();

    let mut storage = MemoryStorage::new();
    let root_a = serialize(&a, &mut storage, Compression::none())?;
    let root_b = serialize(&b, &mut storage, Compression::none())?;

    assert_ne!(root_a, root_b);
    assert_eq!(deserialize(&storage)?, a);
    assert_eq!(deserialize_key(&storage, &root_a)?, a);
    assert_eq!(deserialize_key(&storage, &root_b)?, b);

    // The second value is not reachable from the default root alone.
    let mut pruned = storage.clone();
    assert_eq!(retain_reachable(&mut pruned, &[ROOT_KEY])?, 5);
    assert_eq!(deserialize(&pruned)?, a);

    assert_eq!(retain_reachable(&mut storage, &[ROOT_KEY, root_b.as_str()])?, 0);

    Ok(())
}

#[test]
fn test_key_prefix() -> Result<()> {
    let a: Array = FlatArray::from_vec(vec![7u64, 8, 9]).into();
    let mut storage = MemoryStorage::new();

    let mut serializer = Serializer::new(&mut storage).with_prefix("weights/");
    let root = serializer.serialize(&a)?;
    assert!(serializer.write_header(&root)?);
    assert!(!serializer.write_header("other")?);

    assert_eq!(root, "weights/0");
    assert_eq!(storage.keys()?, vec!["root", "weights/0", "weights/1"]);
    assert_eq!(deserialize(&storage)?, a);

    Ok(())
}

#[test]
fn test_hash_map_storage() -> Result<()> {
    let a: Array = JaggedArray::from_rows(vec![vec![1i8, -1], vec![], vec![2]]).into();
    let mut storage: HashMap<String, Entry> = HashMap::new();

    serialize(&a, &mut storage, Compression::none())?;

    assert_eq!(storage.len(), 6);
    assert_eq!(deserialize(&storage)?, a);

    Ok(())
}

#[test]
fn test_prune_after_failed_serialization() -> Result<()> {
    register_compression(
        "fails-over-64",
        Functions {
            compress: fail_over_64,
            decompress: identity,
        },
    )?;

    let small: Array = FlatArray::from_vec(vec![1u16, 2, 3]).into();
    let mut storage = MemoryStorage::new();
    serialize(&small, &mut storage, "fails-over-64")?;
    assert_eq!(storage.len(), 3);

    // Offsets fit under the limit, the content payload does not.
    let large: Array = JaggedArray::from_rows(vec![vec![0.5f64; 12], vec![1.5; 8]]).into();
    assert!(serialize(&large, &mut storage, "fails-over-64").is_err());
    assert_eq!(storage.keys()?, vec!["0", "1", "3", "4", "root"]);

    assert_eq!(retain_reachable(&mut storage, &[ROOT_KEY])?, 2);
    assert_eq!(storage.keys()?, vec!["0", "1", "root"]);
    assert_eq!(deserialize(&storage)?, small);

    Ok(())
}

#[test]
fn test_reachable_keys_reports_dangling_references() -> Result<()> {
    let a: Array = JaggedArray::from_rows(vec![vec![1u32], vec![2]]).into();
    let mut storage = MemoryStorage::new();
    serialize(&a, &mut storage, Compression::none())?;

    let content = Deserializer::new(&storage)
        .descriptor("0")?
        .str_field("content")?
        .to_owned();
    storage.remove(&content)?;

    assert!(matches!(
        reachable_keys(&storage, ROOT_KEY),
        Err(arraydb::Error::MissingKey(key)) if key == content
    ));

    Ok(())
}

#[test]
fn test_persist_to_file() -> Result<()> {
    let a: Array = JaggedArray::from_rows(vec![vec![0.25f32, 0.5], vec![0.75]]).into();
    let mut storage = MemoryStorage::new();
    serialize(&a, &mut storage, Compression::default())?;

    let temp = tempfile::TempDir::new()?;
    let path = temp.path().join("arrays.json");
    std::fs::write(&path, serde_json::to_vec(&storage)?)?;

    let loaded: MemoryStorage = serde_json::from_slice(&std::fs::read(&path)?)?;
    assert_eq!(loaded, storage);
    assert_eq!(deserialize(&loaded)?, a);

    Ok(())
}
