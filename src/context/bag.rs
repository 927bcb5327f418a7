use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use parking_lot::RwLock;
use serde_json::Value;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Arc<str>);

#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    key:        Identifier,
    attributes: RwLock<HashMap<String, Value>>,
}

impl Identifier {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Context {
    pub(crate) fn new(key: Identifier) -> Self {
        let attributes = RwLock::new(HashMap::new());
        Self {
            inner: Arc::new(Inner { key, attributes }),
        }
    }

    pub fn key(&self) -> &Identifier {
        &self.inner.key
    }

    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.inner.attributes.read().get(key).cloned()
    }

    pub fn set_attribute<V: Into<Value>>(&self, key: &str, value: V) {
        self.inner.attributes.write().insert(key.to_owned(), value.into());
    }

    pub fn remove_attribute(&self, key: &str) -> Option<Value> {
        self.inner.attributes.write().remove(key)
    }

    pub fn attributes(&self) -> HashMap<String, Value> {
        self.inner.attributes.read().clone()
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", &self.0)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("key", &self.inner.key)
            .field("attributes", &*self.inner.attributes.read())
            .finish()
    }
}
