use crate::error::{Result, StoreError};
use crate::value::Value;

/// A request to transition state, identified by its `type`.
///
/// Actions are immutable once built. Construction does not validate; the
/// store checks [`Action::validate`] before touching any entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    action_type: String,
    payload: Option<Value>,
}

impl Action {
    /// An action without payload.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: None,
        }
    }

    /// An action carrying a payload.
    pub fn with_payload(action_type: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: Some(payload.into()),
        }
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Whether this action has the given type.
    pub fn is(&self, action_type: &str) -> bool {
        self.action_type == action_type
    }

    /// Reject actions whose type is empty or blank.
    pub fn validate(&self) -> Result<()> {
        if self.action_type.trim().is_empty() {
            return Err(StoreError::invalid_action("type must be a non-empty string"));
        }
        Ok(())
    }
}

/// Accepts the loose `{ "type": ..., "payload": ... }` shape.
impl TryFrom<serde_json::Value> for Action {
    type Error = StoreError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(mut fields) = json else {
            return Err(StoreError::invalid_action("action must be an object"));
        };
        let action_type = match fields.remove("type") {
            Some(serde_json::Value::String(s)) => s,
            Some(_) => return Err(StoreError::invalid_action("type must be a string")),
            None => return Err(StoreError::invalid_action("type is missing")),
        };
        let action = Self {
            action_type,
            payload: fields.remove("payload").map(Value::from),
        };
        action.validate()?;
        Ok(action)
    }
}
