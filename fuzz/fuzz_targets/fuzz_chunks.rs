//! Fuzz target for sequence splitting.
//!
//! Parts must concatenate back to the input and be balanced.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oj_common::{chunks, find};

fuzz_target!(|input: (Vec<u16>, u8)| {
    let (items, n) = input;
    let n = usize::from(n);

    let Ok(parts) = chunks(&items, n) else {
        assert_eq!(n, 0);
        return;
    };
    assert_eq!(parts.len(), n);
    assert_eq!(parts.concat(), items);

    let max = parts.iter().map(|p| p.len()).max().unwrap_or(0);
    let min = parts.iter().map(|p| p.len()).min().unwrap_or(0);
    assert!(max - min <= 1);

    if let Some(first) = items.first() {
        assert!(find(first, &parts).is_some());
    }
});
