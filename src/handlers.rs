//! Lifecycle handlers for the account password policy resource
//!
//! Translates the five CloudFormation verbs (Create, Update, Delete, Read,
//! List) into calls against the IAM account password policy API. The policy
//! is an account-wide singleton with no native identifier, so Create is
//! "replace the default policy", Delete is "reset to the default policy",
//! and List returns at most one model.

use crate::client::{PolicyApiError, Session};
use crate::error::{ProviderError, Result};
use crate::model::PasswordPolicy;
use crate::progress::{OperationStatus, ProgressEvent};
use crate::request::{CallbackContext, ResourceHandlerRequest};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// CloudFormation resource type served by this provider
pub const TYPE_NAME: &str = "OC::Organizations::PasswordPolicy";

/// Lifecycle verbs dispatched by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    Read,
    List,
}

impl FromStr for Action {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CREATE" => Ok(Action::Create),
            "UPDATE" => Ok(Action::Update),
            "DELETE" => Ok(Action::Delete),
            "READ" => Ok(Action::Read),
            "LIST" => Ok(Action::List),
            other => Err(ProviderError::InternalFailure(format!(
                "unknown action: {}",
                other
            ))),
        }
    }
}

/// Dispatch a host invocation to the matching handler
pub async fn handle(
    action: Action,
    session: Option<&Session>,
    request: &ResourceHandlerRequest,
    context: &mut CallbackContext,
) -> Result<ProgressEvent> {
    match action {
        Action::Create => create_handler(session, request, context).await,
        Action::Update => update_handler(session, request, context).await,
        Action::Delete => delete_handler(session, request, context).await,
        Action::Read => read_handler(session, request, context).await,
        Action::List => list_handler(session, request, context).await,
    }
}

/// Create: set the account policy to the desired non-default values
///
/// The policy singleton always "exists" remotely (as the account default),
/// so creation is a full-replacement write.
pub async fn create_handler(
    session: Option<&Session>,
    request: &ResourceHandlerRequest,
    _context: &mut CallbackContext,
) -> Result<ProgressEvent> {
    let model = parse_desired(request)?;
    let mut progress = ProgressEvent::progress(model.clone());
    let Some(session) = session else {
        return Ok(progress);
    };

    let model = upsert(session, model, request.logical_resource_identifier.as_deref()).await?;
    progress.resource_model = Some(model);
    progress.status = OperationStatus::Success;
    Ok(progress)
}

/// Update: full-replacement write, gated on the policy existing
///
/// The retrieved state is discarded; the write carries the desired state
/// as-is, with no merge against what is currently configured.
pub async fn update_handler(
    session: Option<&Session>,
    request: &ResourceHandlerRequest,
    _context: &mut CallbackContext,
) -> Result<ProgressEvent> {
    let model = parse_desired(request)?;
    let mut progress = ProgressEvent::progress(model.clone());
    let Some(session) = session else {
        return Ok(progress);
    };

    let logical_id = request.logical_resource_identifier.as_deref();
    retrieve(
        session,
        request.desired_resource_state.as_ref(),
        logical_id,
    )
    .await?;

    let log_id = model.resource_id.clone();
    let model = upsert(session, model, log_id.as_deref().or(logical_id)).await?;
    progress.resource_model = Some(model);
    progress.status = OperationStatus::Success;
    Ok(progress)
}

/// Delete: reset the account to its default policy
pub async fn delete_handler(
    session: Option<&Session>,
    request: &ResourceHandlerRequest,
    _context: &mut CallbackContext,
) -> Result<ProgressEvent> {
    let model = parse_desired(request)?;
    let mut progress = ProgressEvent::progress(model);
    let Some(session) = session else {
        return Ok(progress);
    };

    let logical_id = request.logical_resource_identifier.as_deref();
    let current = retrieve(
        session,
        request.desired_resource_state.as_ref(),
        logical_id,
    )
    .await?;

    session
        .client()
        .delete_account_password_policy()
        .await
        .map_err(|err| ProviderError::InternalFailure(err.to_string()))?;

    info!(
        "{} [{}] [{}] successfully deleted",
        TYPE_NAME,
        current.resource_id.as_deref().unwrap_or(""),
        logical_id.unwrap_or("")
    );

    progress.resource_model = None;
    progress.status = OperationStatus::Success;
    Ok(progress)
}

/// Read: fetch the current policy, stamped with the caller's identifier
pub async fn read_handler(
    session: Option<&Session>,
    request: &ResourceHandlerRequest,
    _context: &mut CallbackContext,
) -> Result<ProgressEvent> {
    let model = parse_desired(request)?;
    let progress = ProgressEvent::progress(model);
    let Some(session) = session else {
        return Ok(progress);
    };

    let model = retrieve(
        session,
        request.desired_resource_state.as_ref(),
        request.logical_resource_identifier.as_deref(),
    )
    .await?;
    Ok(ProgressEvent::success(model))
}

/// List: zero or one model, depending on whether the account has a policy
///
/// "Not found" is expected here and converted into an empty result list;
/// any other failure propagates.
pub async fn list_handler(
    session: Option<&Session>,
    request: &ResourceHandlerRequest,
    _context: &mut CallbackContext,
) -> Result<ProgressEvent> {
    let mut progress = ProgressEvent {
        status: OperationStatus::InProgress,
        resource_model: None,
        resource_models: Some(Vec::new()),
        message: None,
    };
    let Some(session) = session else {
        return Ok(progress);
    };

    let models = match retrieve(
        session,
        request.desired_resource_state.as_ref(),
        request.logical_resource_identifier.as_deref(),
    )
    .await
    {
        Ok(model) => vec![model],
        Err(ProviderError::NotFound { .. }) => Vec::new(),
        Err(err) => return Err(err),
    };

    progress.resource_models = Some(models);
    progress.status = OperationStatus::Success;
    Ok(progress)
}

/// Fetch the remote policy and merge it over the caller-supplied state
///
/// Fails with `NotFound` when the account has never had a custom policy;
/// every other remote failure propagates unchanged so the host can apply
/// its own retry policy. On success the result is stamped with the caller's
/// resource id, falling back to the logical identifier.
async fn retrieve(
    session: &Session,
    state: Option<&Map<String, Value>>,
    logical_id: Option<&str>,
) -> Result<PasswordPolicy> {
    let base = match state {
        Some(raw) => PasswordPolicy::parse(raw)?,
        None => PasswordPolicy::default(),
    };

    match session.client().get_account_password_policy().await {
        Ok(remote) => {
            let mut model = base.merge_remote(&remote)?;
            if model.resource_id.is_none() {
                model.resource_id = logical_id.map(str::to_string);
            }
            info!(
                "{} [{}] [{}] successfully retrieved",
                TYPE_NAME,
                model.resource_id.as_deref().unwrap_or(""),
                logical_id.unwrap_or("")
            );
            Ok(model)
        }
        Err(PolicyApiError::NoSuchEntity) => Err(ProviderError::NotFound {
            type_name: TYPE_NAME,
            identifier: base
                .resource_id
                .or_else(|| logical_id.map(str::to_string))
                .unwrap_or_default(),
        }),
        Err(err) => Err(ProviderError::Service(err)),
    }
}

/// Replace the account policy with the model's present fields
///
/// Assigns a fresh synthetic resource id when the model has none. The id is
/// a local correlation handle only and is never part of the write request.
async fn upsert(
    session: &Session,
    mut model: PasswordPolicy,
    logical_id: Option<&str>,
) -> Result<PasswordPolicy> {
    if model.resource_id.is_none() {
        model.resource_id = Some(Uuid::new_v4().to_string());
    }

    let fields = model.serialize();
    session
        .client()
        .update_account_password_policy(&fields)
        .await
        .map_err(|err| ProviderError::InternalFailure(err.to_string()))?;

    info!(
        "{} [{}] [{}] successfully upserted",
        TYPE_NAME,
        model.resource_id.as_deref().unwrap_or(""),
        logical_id.unwrap_or("")
    );
    Ok(model)
}

fn parse_desired(request: &ResourceHandlerRequest) -> Result<PasswordPolicy> {
    match request.desired_resource_state.as_ref() {
        Some(raw) => PasswordPolicy::parse(raw),
        None => Ok(PasswordPolicy::default()),
    }
}
