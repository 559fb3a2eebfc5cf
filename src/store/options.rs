use crate::runtime::Notify;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

pub type Initializer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Per-registration settings for a reducer.
#[derive(Clone)]
pub struct RegisterOptions {
    pub(crate) cache: bool,
    pub(crate) init: Option<Initializer>,
    pub(crate) notify: Option<Notify>,
}

impl RegisterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the final state on unregister and resume from it next time.
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Transform the initial state before first use.
    ///
    /// Not applied when the state is resumed from the cache.
    pub fn init<F>(mut self, init: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    /// Called with the next state whenever a dispatch changes it.
    pub fn notify<F>(mut self, notify: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.notify = Some(Arc::new(notify));
        self
    }
}

impl Default for RegisterOptions {
    fn default() -> Self {
        Self {
            cache: true,
            init: None,
            notify: None,
        }
    }
}

impl fmt::Debug for RegisterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterOptions")
            .field("cache", &self.cache)
            .field("init", &self.init.is_some())
            .field("notify", &self.notify.is_some())
            .finish()
    }
}
