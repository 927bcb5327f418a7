use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};
use super::failure::{panic_message, Abandoned, Duplicate, Error, Failure, Panicked};
use super::pool::Handle;
use super::promise::Shared;

pub struct Deferred<T> {
    settle: Arc<Settle<T>>,
}

struct Settle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Deferred<T> {
    pub(crate) fn new(shared: Arc<Shared<T>>) -> Self {
        Self {
            settle: Arc::new(Settle { shared }),
        }
    }

    pub fn resolve(&self, value: T) -> Result<(), Duplicate> {
        self.settle.shared.settle(Ok(value))
    }

    pub fn reject<E: Into<anyhow::Error>>(&self, error: E) -> Result<(), Duplicate> {
        self.settle.shared.settle(Err(Failure::new(error)))
    }

    pub fn is_settled(&self) -> bool {
        self.settle.shared.is_settled()
    }
}

pub(crate) fn invoke<T, F>(pool: &Handle, deferred: Deferred<T>, producer: F)
where
    T: Send + Sync + 'static,
    F: FnOnce(Deferred<T>) -> anyhow::Result<()> + Send + 'static,
{
    let fallback = deferred.clone();

    if pool.execute(move || run(deferred, producer)).is_err() {
        if let Err(e) = fallback.reject(Error::Terminated) {
            warn!("producer not scheduled: {e}");
        }
    }
}

fn run<T, F>(deferred: Deferred<T>, producer: F)
where
    F: FnOnce(Deferred<T>) -> anyhow::Result<()>,
{
    let handle = deferred.clone();

    let failure = match catch_unwind(AssertUnwindSafe(move || producer(handle))) {
        Ok(Ok(()))   => return,
        Ok(Err(e))   => Failure::new(e),
        Err(payload) => Failure::new(Panicked(panic_message(payload.as_ref()))),
    };

    debug!("producer failed: {failure}");

    if let Err(e) = deferred.reject(failure) {
        warn!("producer failed after settling: {e}");
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            settle: self.settle.clone(),
        }
    }
}

impl<T> Drop for Settle<T> {
    fn drop(&mut self) {
        if !self.shared.is_settled() {
            debug!("deferred dropped while pending");
            let _ = self.shared.settle(Err(Failure::new(Abandoned)));
        }
    }
}
