/// Store-wide settings.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Tag attached to this store's log lines.
    pub label: String,
    /// Cache flag used by [`Store::options`](crate::Store::options).
    pub cache_by_default: bool,
}

impl StoreConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn cache_by_default(mut self, cache: bool) -> Self {
        self.cache_by_default = cache;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            label: "store".to_string(),
            cache_by_default: true,
        }
    }
}
