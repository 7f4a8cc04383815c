//! Typed configuration model.
//!
//! These types match the `data/config.json` document. Closed-set fields are
//! enums; their JSON spellings are also exposed as `LITERALS` so validation
//! can name the allowed set in its errors.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::load::ConfigError;

/// Declare a closed-set string enum with its JSON literals.
macro_rules! literal_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $lit:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $lit)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// JSON spelling of every variant, in declaration order.
            pub const LITERALS: &'static [&'static str] = &[$($lit),+];

            /// JSON spelling of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $lit,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($lit => Ok($name::$variant),)+
                    _ => Err(format!(
                        "unknown {}: {} (expected one of: {})",
                        stringify!($name),
                        s,
                        $name::LITERALS.join(", ")
                    )),
                }
            }
        }
    };
}

literal_enum! {
    /// Where problems and submissions are persisted.
    pub enum StorePlace {
        File => "file",
        Sql => "sql",
    }
}

literal_enum! {
    /// Cache backend.
    pub enum CachePlace {
        Redis => "redis",
    }
}

literal_enum! {
    /// Accepted login method.
    pub enum LoginMethod {
        /// Username and password.
        Pwd => "pwd",
        Google => "google",
        Facebook => "facebook",
    }
}

literal_enum! {
    /// How passwords are stored.
    pub enum PassStore {
        Plain => "plain",
        Hashed => "hashed",
    }
}

literal_enum! {
    /// Password hash function. "No hash function" is `Option::None`.
    pub enum HashFunc {
        Bcrypt => "bcrypt",
        Argon2 => "argon2",
        Scrypt => "scrypt",
        Pbkdf2 => "pbkdf2",
        Sha512 => "sha512",
        Sha256 => "sha256",
    }
}

literal_enum! {
    /// Output comparison mode for testcases.
    pub enum TestcaseStrictness {
        /// Byte-exact comparison.
        Strict => "strict",
        /// Whitespace-insensitive comparison.
        Loose => "loose",
    }
}

/// Literal spelling of "no hash function" accepted for `hash_func`.
pub const HASH_FUNC_NONE: &str = "none";

/// Judge dispatch mode, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgeMode(u8);

impl JudgeMode {
    /// Legal values.
    pub const ALLOWED: &'static [u8] = &[0, 1];

    /// Build a mode, rejecting values outside [`JudgeMode::ALLOWED`].
    pub fn new(value: u8) -> Option<Self> {
        Self::ALLOWED.contains(&value).then_some(JudgeMode(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// False only for values smuggled past [`JudgeMode::new`] by deserialization.
    pub fn is_valid(&self) -> bool {
        Self::ALLOWED.contains(&self.0)
    }
}

impl JsonSchema for JudgeMode {
    fn schema_name() -> Cow<'static, str> {
        "JudgeMode".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "description": "Judge dispatch mode.",
            "type": "integer",
            "enum": Self::ALLOWED,
        })
    }
}

impl fmt::Display for JudgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated process configuration.
///
/// Built once at startup by [`crate::load`] and shared by reference
/// afterwards. Fields are public for name-based access; [`Configuration::get`]
/// offers the same values by string key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Configuration {
    /// Default UI language.
    pub lang: String,

    pub store_place: StorePlace,

    pub cache_place: CachePlace,

    pub login_methods: Vec<LoginMethod>,

    pub pass_store: PassStore,

    #[serde(default)]
    #[schemars(schema_with = "crate::schema::hash_func_schema")]
    pub hash_func: Option<HashFunc>,

    /// TCP port of the submission container.
    #[schemars(range(min = 1))]
    pub container_port: u16,

    pub testcase_strict: TestcaseStrictness,

    /// Size in bytes above which stored outputs are compressed.
    pub compress_threshold: u64,

    /// Judge server addresses, never empty.
    #[schemars(length(min = 1), inner(pattern(r"\S")))]
    pub judge_server: Vec<String>,

    pub judge_mode: JudgeMode,
}

impl Configuration {
    /// Recognized keys, in document order.
    pub const FIELD_NAMES: [&'static str; 11] = [
        "lang",
        "store_place",
        "cache_place",
        "login_methods",
        "pass_store",
        "hash_func",
        "container_port",
        "testcase_strict",
        "compress_threshold",
        "judge_server",
        "judge_mode",
    ];

    /// Look up a field by its JSON key.
    pub fn get(&self, key: &str) -> Result<serde_json::Value, ConfigError> {
        let value = match key {
            "lang" => json!(self.lang),
            "store_place" => json!(self.store_place),
            "cache_place" => json!(self.cache_place),
            "login_methods" => json!(self.login_methods),
            "pass_store" => json!(self.pass_store),
            "hash_func" => json!(self.hash_func),
            "container_port" => json!(self.container_port),
            "testcase_strict" => json!(self.testcase_strict),
            "compress_threshold" => json!(self.compress_threshold),
            "judge_server" => json!(self.judge_server),
            "judge_mode" => json!(self.judge_mode),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                })
            }
        };
        Ok(value)
    }

    /// Whether a login method is enabled.
    pub fn allows_login(&self, method: LoginMethod) -> bool {
        self.login_methods.contains(&method)
    }

    /// Whether stored passwords go through a hash function.
    pub fn hashes_passwords(&self) -> bool {
        self.pass_store == PassStore::Hashed && self.hash_func.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample() -> Configuration {
        Configuration {
            lang: "en".into(),
            store_place: StorePlace::File,
            cache_place: CachePlace::Redis,
            login_methods: vec![LoginMethod::Pwd, LoginMethod::Google],
            pass_store: PassStore::Hashed,
            hash_func: Some(HashFunc::Argon2),
            container_port: 8080,
            testcase_strict: TestcaseStrictness::Loose,
            compress_threshold: 4096,
            judge_server: vec!["127.0.0.1:9000".into()],
            judge_mode: JudgeMode::new(1).unwrap(),
        }
    }

    #[test]
    fn test_literals_match_serde() {
        for place in StorePlace::ALL {
            assert_eq!(
                serde_json::to_value(place).unwrap(),
                json!(place.as_str())
            );
        }
        for func in HashFunc::ALL {
            let back: HashFunc = serde_json::from_value(json!(func.as_str())).unwrap();
            assert_eq!(&back, func);
        }
        assert_eq!(LoginMethod::LITERALS, &["pwd", "google", "facebook"]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("sql".parse::<StorePlace>().unwrap(), StorePlace::Sql);
        assert_eq!(
            "loose".parse::<TestcaseStrictness>().unwrap(),
            TestcaseStrictness::Loose
        );
        let err = "xml".parse::<StorePlace>().unwrap_err();
        assert!(err.contains("file, sql"));
    }

    #[test]
    fn test_judge_mode_new() {
        assert_eq!(JudgeMode::new(0).map(|m| m.value()), Some(0));
        assert!(JudgeMode::new(2).is_none());
        assert_eq!(serde_json::to_string(&JudgeMode::new(1).unwrap()).unwrap(), "1");
    }

    #[test]
    fn test_get_matches_fields() {
        let config = sample();
        assert_eq!(config.get("lang").unwrap(), json!("en"));
        assert_eq!(config.get("store_place").unwrap(), json!("file"));
        assert_eq!(config.get("login_methods").unwrap(), json!(["pwd", "google"]));
        assert_eq!(config.get("hash_func").unwrap(), json!("argon2"));
        assert_eq!(config.get("container_port").unwrap(), json!(8080));
        assert_eq!(config.get("judge_mode").unwrap(), json!(1));
    }

    #[test]
    fn test_get_covers_every_field_name() {
        let config = sample();
        let as_json = serde_json::to_value(&config).unwrap();
        for key in Configuration::FIELD_NAMES {
            assert_eq!(config.get(key).unwrap(), as_json[key], "key {key}");
        }
    }

    #[test]
    fn test_get_unknown_key() {
        let err = sample().get("judge_servers").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey { ref key } if key == "judge_servers"));
    }

    #[test]
    fn test_hashes_passwords() {
        let mut config = sample();
        assert!(config.hashes_passwords());
        config.hash_func = None;
        assert!(!config.hashes_passwords());
        assert!(config.allows_login(LoginMethod::Google));
        assert!(!config.allows_login(LoginMethod::Facebook));
    }
}
