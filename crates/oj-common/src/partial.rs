//! Partial models: every field optional, for partial updates.
//!
//! [`partial_model!`](crate::partial_model) writes the patch struct at
//! compile time from a field list, so the all-optional shape is an
//! ordinary type rather than something assembled at runtime.
//!
//! ```ignore
//! #[derive(Debug, Clone)]
//! pub struct Problem {
//!     pub title: String,
//!     pub time_limit_ms: u64,
//! }
//!
//! oj_common::partial_model! {
//!     /// Partial update for [`Problem`].
//!     pub struct ProblemPatch for Problem {
//!         title: String,
//!         time_limit_ms: u64,
//!     }
//! }
//! ```
//!
//! The calling crate must depend on `serde`; the generated struct derives
//! `Serialize` and `Deserialize`, and absent keys deserialize to `None`.

/// A type that can absorb a partial update.
pub trait Partial: Sized {
    /// The all-optional counterpart of `Self`.
    type Patch: Default;

    /// Overwrite every field that is set in `patch`.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Consume `self`, apply `patch`, and return the result.
    fn patched(mut self, patch: Self::Patch) -> Self {
        self.apply_patch(patch);
        self
    }
}

/// Generate the all-optional patch struct for a target type.
///
/// The field list must name fields of the target with their exact types.
#[macro_export]
macro_rules! partial_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $patch:ident for $target:ty {
            $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $patch {
            $(
                $(#[$fmeta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: ::std::option::Option<$ty>,
            )*
        }

        impl $patch {
            /// Names of every field the patch can carry.
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];

            /// True when no field is set.
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }

            /// Names of the fields that are set, in declaration order.
            pub fn set_fields(&self) -> ::std::vec::Vec<&'static str> {
                let mut fields = ::std::vec::Vec::new();
                $(
                    if self.$field.is_some() {
                        fields.push(stringify!($field));
                    }
                )*
                fields
            }
        }

        impl $crate::partial::Partial for $target {
            type Patch = $patch;

            fn apply_patch(&mut self, patch: $patch) {
                $(
                    if let ::std::option::Option::Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::Partial;

    #[derive(Debug, Clone, PartialEq)]
    struct Submission {
        language: String,
        score: u32,
        tags: Vec<String>,
    }

    crate::partial_model! {
        struct SubmissionPatch for Submission {
            language: String,
            score: u32,
            tags: Vec<String>,
        }
    }

    fn sample() -> Submission {
        Submission {
            language: "rust".into(),
            score: 0,
            tags: vec![],
        }
    }

    #[test]
    fn test_default_patch_is_empty_and_noop() {
        let patch = SubmissionPatch::default();
        assert!(patch.is_empty());
        assert_eq!(sample().patched(patch), sample());
    }

    #[test]
    fn test_apply_sets_only_present_fields() {
        let patch = SubmissionPatch {
            score: Some(100),
            ..Default::default()
        };
        assert_eq!(patch.set_fields(), vec!["score"]);

        let updated = sample().patched(patch);
        assert_eq!(updated.score, 100);
        assert_eq!(updated.language, "rust");
    }

    #[test]
    fn test_patch_deserializes_missing_keys_as_none() {
        let patch: SubmissionPatch = serde_json::from_str(r#"{"language": "cpp"}"#).unwrap();
        assert_eq!(patch.language.as_deref(), Some("cpp"));
        assert!(patch.score.is_none());
        assert!(patch.tags.is_none());
    }

    #[test]
    fn test_patch_serialization_skips_unset() {
        let patch = SubmissionPatch {
            tags: Some(vec!["dp".into()]),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"tags":["dp"]}"#);
    }

    #[test]
    fn test_fields_constant() {
        assert_eq!(SubmissionPatch::FIELDS, &["language", "score", "tags"]);
    }
}
