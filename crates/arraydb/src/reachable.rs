use std::collections::BTreeSet;

use log::{debug, info};

use crate::{CodecRegistry, Descriptor, Entry, Error, Header, Result, Storage};

/// Every key reachable from `root`, `root` included.
///
/// Walks headers and descriptors without decoding payloads. Fails with
/// [`Error::MissingKey`] on the first dangling reference.
pub fn reachable_keys(storage: &dyn Storage, root: &str) -> Result<BTreeSet<String>> {
    reachable_keys_with(storage, root, CodecRegistry::standard())
}

pub fn reachable_keys_with(
    storage: &dyn Storage,
    root: &str,
    codecs: &CodecRegistry,
) -> Result<BTreeSet<String>> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![root.to_owned()];

    while let Some(key) = stack.pop() {
        if seen.contains(&key) {
            continue;
        }
        let entry = storage
            .get(&key)?
            .ok_or_else(|| Error::MissingKey(key.clone()))?;
        if let Entry::Record(record) = entry {
            if Header::is_header(&record) {
                stack.push(Header::from_record(&record)?.root().to_owned());
            } else {
                let descriptor = Descriptor::from_record(&key, record);
                let codec = codecs.strategy_for_decoding(&descriptor)?;
                stack.extend(codec.references(&descriptor)?);
            }
        }
        seen.insert(key);
    }

    Ok(seen)
}

/// Removes every entry not reachable from one of `roots`.
///
/// Useful after a failed serialization left orphaned keys behind. Returns how
/// many entries were removed.
pub fn retain_reachable(storage: &mut dyn Storage, roots: &[&str]) -> Result<usize> {
    let mut keep = BTreeSet::new();
    for root in roots {
        keep.extend(reachable_keys(storage, root)?);
    }

    let orphans: Vec<String> = storage
        .keys()?
        .into_iter()
        .filter(|key| !keep.contains(key))
        .collect();

    for key in &orphans {
        debug!("Removing unreachable key {key:?}.");
        storage.remove(key)?;
    }

    if !orphans.is_empty() {
        info!("Pruned {} unreachable keys.", orphans.len());
    }
    Ok(orphans.len())
}
