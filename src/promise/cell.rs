use std::sync::Arc;
use super::failure::{Duplicate, Failure};

pub type Outcome<T> = Result<T, Failure>;

pub struct Cell<T> {
    outcome: Option<Arc<Outcome<T>>>,
}

impl<T> Cell<T> {
    pub fn pending() -> Self {
        Self { outcome: None }
    }

    pub fn settled(outcome: Outcome<T>) -> Self {
        Self { outcome: Some(Arc::new(outcome)) }
    }

    pub fn settle(&mut self, outcome: Outcome<T>) -> Result<Arc<Outcome<T>>, Duplicate> {
        if let Some(first) = &self.outcome {
            return Err(match (first.is_ok(), outcome.is_ok()) {
                (true,  true)  => Duplicate::ResolvedTwice,
                (true,  false) => Duplicate::RejectedAfterResolved,
                (false, false) => Duplicate::RejectedTwice,
                (false, true)  => Duplicate::ResolvedAfterRejected,
            });
        }

        let outcome = Arc::new(outcome);
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    pub fn outcome(&self) -> Option<&Arc<Outcome<T>>> {
        self.outcome.as_ref()
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }
}
