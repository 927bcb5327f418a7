use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::RwLock;
use tracing::debug;
use crate::ex::Generator;
use super::bag::{Context, Identifier};
use super::scope::Scope;

pub struct Controller {
    id:        u64,
    generator: Box<dyn Generator>,
    contexts:  RwLock<HashMap<Identifier, Context>>,
}

thread_local! {
    static CURRENT: RefCell<HashMap<u64, Identifier>> = RefCell::new(HashMap::new());
}

static CONTROLLERS: AtomicU64 = AtomicU64::new(0);

impl Controller {
    pub fn new<G: Generator>(generator: G) -> Self {
        Self {
            id:        CONTROLLERS.fetch_add(1, Ordering::Relaxed),
            generator: Box::new(generator),
            contexts:  RwLock::new(HashMap::new()),
        }
    }

    pub fn create_async_context(&self) -> Identifier {
        let key     = Identifier::from(self.generator.next());
        let context = Context::new(key.clone());

        self.contexts.write().insert(key.clone(), context);
        self.restore_current_context_id(Some(key.clone()));

        debug!(context = %key, "context created");

        key
    }

    pub fn current_context_id(&self) -> Option<Identifier> {
        CURRENT.try_with(|current| {
            current.borrow().get(&self.id).cloned()
        }).ok().flatten()
    }

    pub fn restore_current_context_id(&self, id: Option<Identifier>) {
        let _ = CURRENT.try_with(|current| {
            let mut current = current.borrow_mut();
            match id {
                Some(id) => current.insert(self.id, id),
                None     => current.remove(&self.id),
            };
        });
    }

    pub fn current_context(&self) -> Context {
        let registered = self.current_context_id().and_then(|id| {
            self.contexts.read().get(&id).cloned()
        });

        match registered {
            Some(context) => context,
            None          => Context::new(Identifier::from(self.generator.next())),
        }
    }

    pub fn destroy_async_context(&self, id: &Identifier) {
        if self.contexts.write().remove(id).is_some() {
            debug!(context = %id, "context destroyed");
        }
    }

    pub fn is_registered(&self, id: &Identifier) -> bool {
        self.contexts.read().contains_key(id)
    }

    pub fn enter(&self, id: Option<Identifier>) -> Scope<'_> {
        Scope::enter(self, id)
    }

    pub fn execute_inside<R, F: FnOnce() -> R>(&self, id: Option<Identifier>, work: F) -> R {
        let _scope = self.enter(id);
        work()
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // bindings on other threads are dropped with those threads
        self.restore_current_context_id(None);
    }
}
