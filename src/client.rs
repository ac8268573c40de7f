//! Remote password policy API boundary
//!
//! Handlers never talk to the IAM service directly: they go through the
//! [`PolicyClient`] capability carried by a [`Session`]. Remote failures
//! surface as a closed error-kind enum so downstream code matches on kinds
//! instead of inspecting service error strings.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Failures surfaced by the remote password policy API
#[derive(Error, Debug)]
pub enum PolicyApiError {
    /// The account has no customized password policy
    #[error("no password policy is set for the account")]
    NoSuchEntity,

    /// Any other transport or service failure, carrying the remote message
    #[error("{0}")]
    Service(String),
}

/// Capability to read, replace, and reset the account password policy
///
/// The account policy is a singleton: reads take no input, writes have full
/// replacement semantics (absent fields revert to the account default), and
/// delete resets the account to the default policy.
#[async_trait]
pub trait PolicyClient: Send + Sync {
    async fn get_account_password_policy(&self) -> Result<Map<String, Value>, PolicyApiError>;

    async fn update_account_password_policy(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<(), PolicyApiError>;

    async fn delete_account_password_policy(&self) -> Result<(), PolicyApiError>;
}

/// Authenticated session handed to the handlers by the host
///
/// Handlers receive `Option<&Session>`; with no session, no remote call is
/// attempted and handlers degrade to dry-run behavior.
#[derive(Clone)]
pub struct Session {
    client: Arc<dyn PolicyClient>,
}

impl Session {
    pub fn new(client: Arc<dyn PolicyClient>) -> Self {
        Session { client }
    }

    /// Build a session against the real IAM API using the default
    /// credential provider chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Session::new(Arc::new(IamPolicyClient::new(aws_sdk_iam::Client::new(
            &config,
        ))))
    }

    pub fn client(&self) -> &dyn PolicyClient {
        self.client.as_ref()
    }
}

/// [`PolicyClient`] backed by the AWS IAM service
pub struct IamPolicyClient {
    inner: aws_sdk_iam::Client,
}

impl IamPolicyClient {
    pub fn new(inner: aws_sdk_iam::Client) -> Self {
        IamPolicyClient { inner }
    }
}

#[async_trait]
impl PolicyClient for IamPolicyClient {
    async fn get_account_password_policy(&self) -> Result<Map<String, Value>, PolicyApiError> {
        let output = self
            .inner
            .get_account_password_policy()
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.is_no_such_entity_exception() {
                    PolicyApiError::NoSuchEntity
                } else {
                    PolicyApiError::Service(service.to_string())
                }
            })?;

        // A 200 with no policy body is indistinguishable from "not set"
        let Some(policy) = output.password_policy() else {
            return Err(PolicyApiError::NoSuchEntity);
        };

        let mut fields = Map::new();
        if let Some(n) = policy.minimum_password_length() {
            fields.insert("MinimumPasswordLength".to_string(), Value::from(n));
        }
        fields.insert(
            "RequireSymbols".to_string(),
            Value::Bool(policy.require_symbols()),
        );
        fields.insert(
            "RequireNumbers".to_string(),
            Value::Bool(policy.require_numbers()),
        );
        fields.insert(
            "RequireUppercaseCharacters".to_string(),
            Value::Bool(policy.require_uppercase_characters()),
        );
        fields.insert(
            "RequireLowercaseCharacters".to_string(),
            Value::Bool(policy.require_lowercase_characters()),
        );
        fields.insert(
            "AllowUsersToChangePassword".to_string(),
            Value::Bool(policy.allow_users_to_change_password()),
        );
        fields.insert(
            "ExpirePasswords".to_string(),
            Value::Bool(policy.expire_passwords()),
        );
        if let Some(n) = policy.max_password_age() {
            fields.insert("MaxPasswordAge".to_string(), Value::from(n));
        }
        if let Some(n) = policy.password_reuse_prevention() {
            fields.insert("PasswordReusePrevention".to_string(), Value::from(n));
        }
        if let Some(b) = policy.hard_expiry() {
            fields.insert("HardExpiry".to_string(), Value::Bool(b));
        }

        debug!("Fetched account password policy: {} fields", fields.len());
        Ok(fields)
    }

    async fn update_account_password_policy(
        &self,
        fields: &Map<String, Value>,
    ) -> Result<(), PolicyApiError> {
        debug!(
            "Replacing account password policy with {} fields",
            fields.len()
        );
        self.inner
            .update_account_password_policy()
            .set_minimum_password_length(int_field(fields, "MinimumPasswordLength"))
            .set_require_symbols(bool_field(fields, "RequireSymbols"))
            .set_require_numbers(bool_field(fields, "RequireNumbers"))
            .set_require_uppercase_characters(bool_field(fields, "RequireUppercaseCharacters"))
            .set_require_lowercase_characters(bool_field(fields, "RequireLowercaseCharacters"))
            .set_allow_users_to_change_password(bool_field(fields, "AllowUsersToChangePassword"))
            .set_max_password_age(int_field(fields, "MaxPasswordAge"))
            .set_password_reuse_prevention(int_field(fields, "PasswordReusePrevention"))
            .set_hard_expiry(bool_field(fields, "HardExpiry"))
            .send()
            .await
            .map_err(|err| PolicyApiError::Service(err.into_service_error().to_string()))?;
        Ok(())
    }

    async fn delete_account_password_policy(&self) -> Result<(), PolicyApiError> {
        self.inner
            .delete_account_password_policy()
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.is_no_such_entity_exception() {
                    PolicyApiError::NoSuchEntity
                } else {
                    PolicyApiError::Service(service.to_string())
                }
            })?;
        Ok(())
    }
}

/// Read an integer wire field, clamped to the SDK's i32 width
fn int_field(fields: &Map<String, Value>, name: &str) -> Option<i32> {
    fields
        .get(name)
        .and_then(Value::as_i64)
        .map(|v| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

fn bool_field(fields: &Map<String, Value>, name: &str) -> Option<bool> {
    fields.get(name).and_then(Value::as_bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_field_clamps_to_i32() {
        let mut fields = Map::new();
        fields.insert("MaxPasswordAge".to_string(), json!(90));
        fields.insert("MinimumPasswordLength".to_string(), json!(i64::MAX));

        assert_eq!(int_field(&fields, "MaxPasswordAge"), Some(90));
        assert_eq!(int_field(&fields, "MinimumPasswordLength"), Some(i32::MAX));
        assert_eq!(int_field(&fields, "PasswordReusePrevention"), None);
    }

    #[test]
    fn test_bool_field_reads_only_booleans() {
        let mut fields = Map::new();
        fields.insert("RequireSymbols".to_string(), json!(true));
        fields.insert("HardExpiry".to_string(), json!("true"));

        assert_eq!(bool_field(&fields, "RequireSymbols"), Some(true));
        // Serialized models carry native booleans; anything else is not ours
        assert_eq!(bool_field(&fields, "HardExpiry"), None);
    }
}
