use crate::error::{Result, StoreError};
use indexmap::IndexSet;

/// Registry handing out unique action type names.
///
/// Keeps independently written modules from accidentally sharing a type
/// string and reacting to each other's actions.
#[derive(Debug, Default)]
pub struct ActionTypes {
    claimed: IndexSet<String>,
}

impl ActionTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `action_type`, failing if it was claimed before.
    pub fn unique(&mut self, action_type: &str) -> Result<String> {
        if !self.claimed.insert(action_type.to_string()) {
            return Err(StoreError::DuplicateActionType(action_type.to_string()));
        }
        Ok(action_type.to_string())
    }

    /// Claim the first free name among `action_type`, `action_type-1`,
    /// `action_type-2`, ...
    pub fn unique_suffixed(&mut self, action_type: &str) -> String {
        let name = (0..)
            .map(|count| match count {
                0 => action_type.to_string(),
                n => format!("{action_type}-{n}"),
            })
            .find(|candidate| !self.claimed.contains(candidate))
            .unwrap_or_else(|| action_type.to_string());
        self.claimed.insert(name.clone());
        name
    }

    pub fn contains(&self, action_type: &str) -> bool {
        self.claimed.contains(action_type)
    }

    /// Claimed names in claim order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.claimed.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.claimed.clear();
    }
}
