//! Sequence helpers: splitting into parts and locating grouped keys.

use std::ops::Range;

use thiserror::Error;

/// Errors from [`chunks`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("cannot split a sequence into zero parts")]
    ZeroParts,
}

/// Split `items` into exactly `n` contiguous parts.
///
/// With `len = q * n + r`, the first `r` parts hold `q + 1` elements and
/// the rest hold `q`. When `n > len` the trailing `n - len` parts are
/// empty. Concatenating the parts in order yields `items`.
pub fn chunks<T>(items: &[T], n: usize) -> Result<Vec<&[T]>, ChunkError> {
    let bounds = chunk_bounds(items.len() as u64, n)?;
    Ok(bounds
        .into_iter()
        .map(|range| &items[range.start as usize..range.end as usize])
        .collect())
}

/// Offsets of the parts [`chunks`] would produce for a sequence of `len`
/// elements, without needing the sequence itself.
pub fn chunk_bounds(len: u64, n: usize) -> Result<Vec<Range<u64>>, ChunkError> {
    if n == 0 {
        return Err(ChunkError::ZeroParts);
    }

    let parts = n as u64;
    let (base, extra) = (len / parts, len % parts);
    let mut bounds = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..parts {
        let size = if i < extra { base + 1 } else { base };
        bounds.push(start..start + size);
        start += size;
    }
    Ok(bounds)
}

/// Index of the first group that contains `key`.
pub fn find<T, G>(key: &T, groups: &[G]) -> Option<usize>
where
    T: PartialEq,
    G: AsRef<[T]>,
{
    groups.iter().position(|group| group.as_ref().contains(key))
}

/// Index of the first JSON value that is, or contains, `key`.
///
/// An array matches when one of its elements equals `key`; any other
/// value matches when it equals `key` itself.
pub fn find_value(key: &serde_json::Value, values: &[serde_json::Value]) -> Option<usize> {
    values.iter().position(|value| match value {
        serde_json::Value::Array(items) => items.contains(key),
        other => other == key,
    })
}
