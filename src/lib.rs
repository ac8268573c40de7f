//! CloudFormation resource provider core for `OC::Organizations::PasswordPolicy`
//!
//! Manages the account-wide IAM password policy as an infrastructure-as-code
//! resource. The five CloudFormation lifecycle verbs (Create, Update, Delete,
//! Read, List) are translated into calls against the IAM account password
//! policy API, with loosely typed template state normalized into a strict
//! model on the way in.
//!
//! ## Architecture
//!
//! - **Policy model** ([`PasswordPolicy`]) → typed parse/serialize boundary
//!   driven by an explicit field table; template strings like `"true"` and
//!   `"8"` coerce into booleans and integers.
//! - **Lifecycle handlers** ([`handle`] and friends) → fetch, replace, or
//!   reset the remote singleton and report a [`ProgressEvent`] to the host.
//! - **Session / [`PolicyClient`]** → capability boundary over the IAM API;
//!   the production implementation rides on `aws-sdk-iam`, tests inject an
//!   in-memory stand-in.
//!
//! The account policy is a singleton: it is never created or destroyed in
//! the usual sense. Create replaces the account default, Delete resets back
//! to it, and List returns at most one model.
//!
//! ## Example
//!
//! ```no_run
//! use oc_passwordpolicy::{handle, Action, CallbackContext, ResourceHandlerRequest, Session};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let session = Session::from_env().await;
//! let request = ResourceHandlerRequest {
//!     desired_resource_state: json!({
//!         "MinimumPasswordLength": "12",
//!         "RequireSymbols": "true",
//!     })
//!     .as_object()
//!     .cloned(),
//!     previous_resource_state: None,
//!     logical_resource_identifier: Some("AccountPasswordPolicy".to_string()),
//! };
//!
//! let mut context = CallbackContext::default();
//! let progress = handle(Action::Create, Some(&session), &request, &mut context)
//!     .await
//!     .unwrap();
//! println!("{:?}", progress.status);
//! # });
//! ```

mod client;
mod error;
mod handlers;
mod model;
mod progress;
mod request;

pub use client::{IamPolicyClient, PolicyApiError, PolicyClient, Session};
pub use error::{ProviderError, Result};
pub use handlers::{
    create_handler, delete_handler, handle, list_handler, read_handler, update_handler, Action,
    TYPE_NAME,
};
pub use model::{FieldKind, FieldSpec, PasswordPolicy, FIELDS};
pub use progress::{OperationStatus, ProgressEvent};
pub use request::{CallbackContext, ResourceHandlerRequest};
