use std::fmt;

/// Process-unique handle identifying one registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionKey(u64);

impl SubscriptionKey {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing keys. Never reuses a key until [`reset`](Self::reset).
#[derive(Debug, Default)]
pub struct KeyGenerator {
    next: u64,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_key(&mut self) -> SubscriptionKey {
        let key = SubscriptionKey(self.next);
        self.next += 1;
        key
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
