use super::bag::Identifier;
use super::controller::Controller;

#[must_use = "the binding is reverted as soon as the scope is dropped"]
pub struct Scope<'c> {
    controller: &'c Controller,
    saved:      Option<Identifier>,
}

impl<'c> Scope<'c> {
    pub(crate) fn enter(controller: &'c Controller, id: Option<Identifier>) -> Self {
        let saved = controller.current_context_id();
        controller.restore_current_context_id(id);
        Self { controller, saved }
    }

    pub fn saved(&self) -> Option<&Identifier> {
        self.saved.as_ref()
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.controller.restore_current_context_id(self.saved.take());
    }
}
