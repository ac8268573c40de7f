//! Password policy model and template-value coercion
//!
//! CloudFormation hands resource state to the provider as loosely typed
//! JSON: booleans and integers routinely arrive as strings ("true", "8").
//! This module owns the strict typed representation, the coercion rules
//! that turn raw template values into it, and the serialization path back
//! to the wire shape the IAM write API expects.

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared type of a policy field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Text,
}

/// One row of the field table: wire name, declared type, and whether the
/// field is included in write requests to the IAM API.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub on_write: bool,
}

/// Ordered field table consulted by [`PasswordPolicy::parse`] and
/// [`PasswordPolicy::serialize`].
///
/// `ResourceId` is a local correlation handle and `ExpirePasswords` is
/// reported by the read API only; neither is sent on writes.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "ResourceId",
        kind: FieldKind::Text,
        on_write: false,
    },
    FieldSpec {
        name: "MinimumPasswordLength",
        kind: FieldKind::Int,
        on_write: true,
    },
    FieldSpec {
        name: "RequireSymbols",
        kind: FieldKind::Bool,
        on_write: true,
    },
    FieldSpec {
        name: "RequireNumbers",
        kind: FieldKind::Bool,
        on_write: true,
    },
    FieldSpec {
        name: "RequireUppercaseCharacters",
        kind: FieldKind::Bool,
        on_write: true,
    },
    FieldSpec {
        name: "RequireLowercaseCharacters",
        kind: FieldKind::Bool,
        on_write: true,
    },
    FieldSpec {
        name: "AllowUsersToChangePassword",
        kind: FieldKind::Bool,
        on_write: true,
    },
    FieldSpec {
        name: "ExpirePasswords",
        kind: FieldKind::Bool,
        on_write: false,
    },
    FieldSpec {
        name: "MaxPasswordAge",
        kind: FieldKind::Int,
        on_write: true,
    },
    FieldSpec {
        name: "PasswordReusePrevention",
        kind: FieldKind::Int,
        on_write: true,
    },
    FieldSpec {
        name: "HardExpiry",
        kind: FieldKind::Bool,
        on_write: true,
    },
];

/// Account password policy resource model
///
/// One AWS account has exactly one password policy; the model carries no
/// secondary identifier. An absent field means "use the account default",
/// not false or zero. `resource_id` is synthetic: the IAM API has no native
/// identifier, so one is generated on the first successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    #[serde(rename = "ResourceId", skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    #[serde(
        rename = "MinimumPasswordLength",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_password_length: Option<i64>,

    #[serde(rename = "RequireSymbols", skip_serializing_if = "Option::is_none")]
    pub require_symbols: Option<bool>,

    #[serde(rename = "RequireNumbers", skip_serializing_if = "Option::is_none")]
    pub require_numbers: Option<bool>,

    #[serde(
        rename = "RequireUppercaseCharacters",
        skip_serializing_if = "Option::is_none"
    )]
    pub require_uppercase_characters: Option<bool>,

    #[serde(
        rename = "RequireLowercaseCharacters",
        skip_serializing_if = "Option::is_none"
    )]
    pub require_lowercase_characters: Option<bool>,

    #[serde(
        rename = "AllowUsersToChangePassword",
        skip_serializing_if = "Option::is_none"
    )]
    pub allow_users_to_change_password: Option<bool>,

    /// Reported by the read API, never sent on writes
    #[serde(rename = "ExpirePasswords", skip_serializing_if = "Option::is_none")]
    pub expire_passwords: Option<bool>,

    #[serde(rename = "MaxPasswordAge", skip_serializing_if = "Option::is_none")]
    pub max_password_age: Option<i64>,

    #[serde(
        rename = "PasswordReusePrevention",
        skip_serializing_if = "Option::is_none"
    )]
    pub password_reuse_prevention: Option<i64>,

    #[serde(rename = "HardExpiry", skip_serializing_if = "Option::is_none")]
    pub hard_expiry: Option<bool>,
}

/// A raw value coerced into its declared field type
enum Coerced {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl PasswordPolicy {
    /// Parse a raw template state map into a typed model
    ///
    /// Consults the field table for each recognized field. Missing keys and
    /// JSON nulls leave the field absent; unrecognized keys are ignored (the
    /// host may attach extra bookkeeping keys). A present value that cannot
    /// be coerced into its declared type fails with a parse error.
    pub fn parse(raw: &Map<String, Value>) -> Result<PasswordPolicy> {
        let mut model = PasswordPolicy::default();
        for spec in FIELDS {
            let Some(value) = raw.get(spec.name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            model.set(spec.name, coerce(spec, value)?);
        }
        Ok(model)
    }

    /// Serialize to the plain key/value shape expected by the IAM write API
    ///
    /// Only present fields marked `on_write` in the field table are emitted,
    /// so the remote API applies its own defaults for unset fields. The
    /// write API has full replacement semantics, not partial patch.
    pub fn serialize(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for spec in FIELDS {
            if !spec.on_write {
                continue;
            }
            if let Some(value) = self.get(spec.name) {
                out.insert(spec.name.to_string(), value);
            }
        }
        out
    }

    /// Overlay fields reported by the remote read API on top of this model
    ///
    /// Remote values win; locally known fields the remote API does not
    /// report (notably `ResourceId`) survive the merge.
    pub fn merge_remote(&self, remote: &Map<String, Value>) -> Result<PasswordPolicy> {
        let overlay = PasswordPolicy::parse(remote)?;
        Ok(PasswordPolicy {
            resource_id: overlay.resource_id.or_else(|| self.resource_id.clone()),
            minimum_password_length: overlay
                .minimum_password_length
                .or(self.minimum_password_length),
            require_symbols: overlay.require_symbols.or(self.require_symbols),
            require_numbers: overlay.require_numbers.or(self.require_numbers),
            require_uppercase_characters: overlay
                .require_uppercase_characters
                .or(self.require_uppercase_characters),
            require_lowercase_characters: overlay
                .require_lowercase_characters
                .or(self.require_lowercase_characters),
            allow_users_to_change_password: overlay
                .allow_users_to_change_password
                .or(self.allow_users_to_change_password),
            expire_passwords: overlay.expire_passwords.or(self.expire_passwords),
            max_password_age: overlay.max_password_age.or(self.max_password_age),
            password_reuse_prevention: overlay
                .password_reuse_prevention
                .or(self.password_reuse_prevention),
            hard_expiry: overlay.hard_expiry.or(self.hard_expiry),
        })
    }

    fn set(&mut self, name: &str, value: Coerced) {
        match (name, value) {
            ("ResourceId", Coerced::Text(v)) => self.resource_id = Some(v),
            ("MinimumPasswordLength", Coerced::Int(v)) => self.minimum_password_length = Some(v),
            ("RequireSymbols", Coerced::Bool(v)) => self.require_symbols = Some(v),
            ("RequireNumbers", Coerced::Bool(v)) => self.require_numbers = Some(v),
            ("RequireUppercaseCharacters", Coerced::Bool(v)) => {
                self.require_uppercase_characters = Some(v)
            }
            ("RequireLowercaseCharacters", Coerced::Bool(v)) => {
                self.require_lowercase_characters = Some(v)
            }
            ("AllowUsersToChangePassword", Coerced::Bool(v)) => {
                self.allow_users_to_change_password = Some(v)
            }
            ("ExpirePasswords", Coerced::Bool(v)) => self.expire_passwords = Some(v),
            ("MaxPasswordAge", Coerced::Int(v)) => self.max_password_age = Some(v),
            ("PasswordReusePrevention", Coerced::Int(v)) => {
                self.password_reuse_prevention = Some(v)
            }
            ("HardExpiry", Coerced::Bool(v)) => self.hard_expiry = Some(v),
            _ => {}
        }
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "ResourceId" => self.resource_id.clone().map(Value::from),
            "MinimumPasswordLength" => self.minimum_password_length.map(Value::from),
            "RequireSymbols" => self.require_symbols.map(Value::from),
            "RequireNumbers" => self.require_numbers.map(Value::from),
            "RequireUppercaseCharacters" => self.require_uppercase_characters.map(Value::from),
            "RequireLowercaseCharacters" => self.require_lowercase_characters.map(Value::from),
            "AllowUsersToChangePassword" => self.allow_users_to_change_password.map(Value::from),
            "ExpirePasswords" => self.expire_passwords.map(Value::from),
            "MaxPasswordAge" => self.max_password_age.map(Value::from),
            "PasswordReusePrevention" => self.password_reuse_prevention.map(Value::from),
            "HardExpiry" => self.hard_expiry.map(Value::from),
            _ => None,
        }
    }
}

fn coerce(spec: &FieldSpec, raw: &Value) -> Result<Coerced> {
    match spec.kind {
        FieldKind::Bool => coerce_bool(spec.name, raw).map(Coerced::Bool),
        FieldKind::Int => coerce_int(spec.name, raw).map(Coerced::Int),
        FieldKind::Text => coerce_text(spec.name, raw).map(Coerced::Text),
    }
}

/// Coerce a raw scalar into a boolean
///
/// Native booleans pass through. Strings are lower-cased and parsed as a
/// JSON boolean, so "true"/"TRUE"/"false"/"FALSE" are accepted and anything
/// else is rejected. Native numbers follow truthiness: zero is false,
/// non-zero is true.
fn coerce_bool(name: &'static str, raw: &Value) -> Result<bool> {
    match raw {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().map_or(true, |f| f != 0.0)),
        Value::String(s) => serde_json::from_str::<bool>(&s.to_ascii_lowercase()).map_err(|_| {
            ProviderError::Parse {
                field: name,
                reason: format!("cannot interpret {:?} as a boolean", s),
            }
        }),
        other => Err(ProviderError::Parse {
            field: name,
            reason: format!("expected a boolean, got {}", other),
        }),
    }
}

/// Coerce a raw scalar into an integer
///
/// Strings parse base-10; fractional numbers truncate toward zero.
fn coerce_int(name: &'static str, raw: &Value) -> Result<i64> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                Ok(f.trunc() as i64)
            } else {
                Err(ProviderError::Parse {
                    field: name,
                    reason: format!("numeric value out of range: {}", n),
                })
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| ProviderError::Parse {
            field: name,
            reason: format!("cannot parse {:?} as a base-10 integer", s),
        }),
        other => Err(ProviderError::Parse {
            field: name,
            reason: format!("expected an integer, got {}", other),
        }),
    }
}

fn coerce_text(name: &'static str, raw: &Value) -> Result<String> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        other => Err(ProviderError::Parse {
            field: name,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_bool_matrix() {
        for (input, expected) in [
            (json!("true"), Some(true)),
            (json!("false"), Some(false)),
            (json!("TRUE"), Some(true)),
            (json!("FALSE"), Some(false)),
            (json!(true), Some(true)),
            (json!(false), Some(false)),
        ] {
            let model = PasswordPolicy::parse(&raw(json!({ "RequireSymbols": input }))).unwrap();
            assert_eq!(model.require_symbols, expected, "input: {:?}", input);
        }

        // Absent and null both mean "use the remote default"
        let model = PasswordPolicy::parse(&raw(json!({}))).unwrap();
        assert_eq!(model.require_symbols, None);
        let model = PasswordPolicy::parse(&raw(json!({ "RequireSymbols": null }))).unwrap();
        assert_eq!(model.require_symbols, None);
    }

    #[test]
    fn test_parse_bool_rejects_other_strings() {
        for input in ["yes", "no", "1", "truthy", ""] {
            let err = PasswordPolicy::parse(&raw(json!({ "HardExpiry": input }))).unwrap_err();
            assert!(
                matches!(err, ProviderError::Parse { field: "HardExpiry", .. }),
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_parse_bool_numeric_truthiness() {
        let model = PasswordPolicy::parse(&raw(json!({ "RequireNumbers": 0 }))).unwrap();
        assert_eq!(model.require_numbers, Some(false));
        let model = PasswordPolicy::parse(&raw(json!({ "RequireNumbers": 1 }))).unwrap();
        assert_eq!(model.require_numbers, Some(true));
    }

    #[test]
    fn test_parse_int_matrix() {
        let model =
            PasswordPolicy::parse(&raw(json!({ "MinimumPasswordLength": "8" }))).unwrap();
        assert_eq!(model.minimum_password_length, Some(8));

        let model = PasswordPolicy::parse(&raw(json!({ "MaxPasswordAge": 90 }))).unwrap();
        assert_eq!(model.max_password_age, Some(90));

        // Fractional values truncate toward zero
        let model =
            PasswordPolicy::parse(&raw(json!({ "PasswordReusePrevention": 5.9 }))).unwrap();
        assert_eq!(model.password_reuse_prevention, Some(5));
        let model = PasswordPolicy::parse(&raw(json!({ "MaxPasswordAge": -3.7 }))).unwrap();
        assert_eq!(model.max_password_age, Some(-3));

        let model = PasswordPolicy::parse(&raw(json!({}))).unwrap();
        assert_eq!(model.minimum_password_length, None);
    }

    #[test]
    fn test_parse_int_rejects_non_numeric() {
        let err =
            PasswordPolicy::parse(&raw(json!({ "MinimumPasswordLength": "eight" }))).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Parse {
                field: "MinimumPasswordLength",
                ..
            }
        ));

        let err = PasswordPolicy::parse(&raw(json!({ "MaxPasswordAge": true }))).unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[test]
    fn test_parse_resource_id_passthrough() {
        let model =
            PasswordPolicy::parse(&raw(json!({ "ResourceId": "MyPolicy" }))).unwrap();
        assert_eq!(model.resource_id.as_deref(), Some("MyPolicy"));

        let err = PasswordPolicy::parse(&raw(json!({ "ResourceId": 42 }))).unwrap_err();
        assert!(matches!(err, ProviderError::Parse { field: "ResourceId", .. }));
    }

    #[test]
    fn test_parse_ignores_unrecognized_keys() {
        let model = PasswordPolicy::parse(&raw(json!({
            "MinimumPasswordLength": "12",
            "SomeHostBookkeeping": { "nested": true },
        })))
        .unwrap();
        assert_eq!(model.minimum_password_length, Some(12));
    }

    #[test]
    fn test_serialize_omits_local_and_readonly_fields() {
        let model = PasswordPolicy {
            resource_id: Some("abc-123".to_string()),
            minimum_password_length: Some(8),
            require_symbols: Some(true),
            expire_passwords: Some(true),
            ..Default::default()
        };

        let wire = model.serialize();
        assert!(!wire.contains_key("ResourceId"));
        assert!(!wire.contains_key("ExpirePasswords"));
        assert_eq!(wire.get("MinimumPasswordLength"), Some(&json!(8)));
        assert_eq!(wire.get("RequireSymbols"), Some(&json!(true)));
        // Absent fields are omitted so the API applies its own defaults
        assert!(!wire.contains_key("MaxPasswordAge"));
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        let model = PasswordPolicy {
            resource_id: Some("abc-123".to_string()),
            minimum_password_length: Some(14),
            require_symbols: Some(true),
            require_lowercase_characters: Some(false),
            max_password_age: Some(90),
            hard_expiry: Some(false),
            ..Default::default()
        };

        let round_tripped = PasswordPolicy::parse(&model.serialize()).unwrap();

        // Every field that survives serialization is reproduced exactly
        let expected = PasswordPolicy {
            resource_id: None,
            ..model
        };
        assert_eq!(round_tripped, expected);
    }

    #[test]
    fn test_merge_remote_prefers_remote_values() {
        let local = PasswordPolicy {
            resource_id: Some("abc-123".to_string()),
            minimum_password_length: Some(8),
            ..Default::default()
        };

        let merged = local
            .merge_remote(&raw(json!({
                "MinimumPasswordLength": 12,
                "ExpirePasswords": true,
            })))
            .unwrap();

        assert_eq!(merged.minimum_password_length, Some(12));
        assert_eq!(merged.expire_passwords, Some(true));
        // Locally known fields the remote API does not report survive
        assert_eq!(merged.resource_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_wire_names_on_serde_path() {
        let model = PasswordPolicy {
            resource_id: Some("abc-123".to_string()),
            require_numbers: Some(true),
            ..Default::default()
        };

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(
            value,
            json!({ "ResourceId": "abc-123", "RequireNumbers": true })
        );
    }
}
