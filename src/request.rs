//! Host-boundary request types
//!
//! The resource provider host hands each handler invocation the desired and
//! previous resource states as raw, untyped JSON maps plus the logical
//! identifier from the template. Typing happens later, in the model layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single handler invocation's request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHandlerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_resource_state: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_resource_state: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_resource_identifier: Option<String>,
}

/// Opaque callback context threaded through re-invocations by the host
///
/// Every operation on this resource completes in a single synchronous call,
/// so the context is carried but never read or written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackContext(pub Map<String, Value>);
