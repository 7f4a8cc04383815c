//! Fuzz target for configuration document loading.
//!
//! Arbitrary bytes go through the full load pipeline (parse, document
//! validation, typed checks). Loading may fail but must never panic, and
//! anything that loads must survive a patch round through its own fields.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use oj_config::{load_str, ConfigurationPatch};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = load_str(text, Path::new("fuzz")) {
        let _ = oj_config::validate::validate_configuration(&config);
        for key in oj_config::Configuration::FIELD_NAMES {
            let _ = config.get(key);
        }
    }

    let _ = ConfigurationPatch::from_json_str(text);
});
