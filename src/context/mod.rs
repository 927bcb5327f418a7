use std::sync::OnceLock;
use crate::ex::UuidGenerator;

pub use bag::Context;
pub use bag::Identifier;
pub use controller::Controller;
pub use scope::Scope;

mod bag;
mod controller;
mod scope;

pub fn global() -> &'static Controller {
    static GLOBAL: OnceLock<Controller> = OnceLock::new();
    GLOBAL.get_or_init(|| Controller::new(UuidGenerator))
}

pub fn current() -> Context {
    global().current_context()
}

pub fn execute_inside<R, F: FnOnce() -> R>(id: Option<Identifier>, work: F) -> R {
    global().execute_inside(id, work)
}
