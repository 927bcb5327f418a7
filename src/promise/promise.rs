use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;
use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::warn;
use super::cell::{Cell, Outcome};
#[cfg(feature = "tokio")]
use super::channel::{settled, Settled};
use super::channel::oneshot;
use super::deferred::{self, Deferred};
use super::failure::{Duplicate, Error, Failure};
use super::pool::{self, Handle};
use super::registry::{Catch, Registry};

pub struct Promise<T> {
    shared: Arc<Shared<T>>,
    pool:   Option<Handle>,
}

pub struct Promises;

pub(crate) struct Shared<T> {
    state: Mutex<State<T>>,
    done:  Condvar,
}

struct State<T> {
    cell:       Cell<T>,
    registry:   Registry<T>,
    dispatched: bool,
    faults:     Vec<String>,
}

impl Promises {
    pub fn of<T, F>(producer: F) -> Promise<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce(Deferred<T>) -> anyhow::Result<()> + Send + 'static,
    {
        match pool::default() {
            Ok(handle) => Self::on(&handle, producer),
            Err(_)     => Self::rejected_by(Error::Terminated),
        }
    }

    pub fn on<T, F>(pool: &Handle, producer: F) -> Promise<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce(Deferred<T>) -> anyhow::Result<()> + Send + 'static,
    {
        let promise  = Promise::pending(Some(pool.clone()));
        let deferred = Deferred::new(promise.shared.clone());
        deferred::invoke(pool, deferred, producer);
        promise
    }

    pub fn resolved_by<T: Send + Sync + 'static>(value: T) -> Promise<T> {
        Promise::ready(Ok(value))
    }

    pub fn rejected_by<T, E>(error: E) -> Promise<T>
    where
        T: Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Promise::ready(Err(Failure::new(error)))
    }
}

impl<T: Send + Sync + 'static> Promise<T> {
    fn pending(pool: Option<Handle>) -> Self {
        let shared = Shared::new(Cell::pending(), false);
        Self { shared, pool }
    }

    fn ready(outcome: Outcome<T>) -> Self {
        let shared = Shared::new(Cell::settled(outcome), true);
        Self { shared, pool: None }
    }

    pub fn then<F: FnOnce(&T) + Send + 'static>(self, handler: F) -> Self {
        self.shared.register(|r| r.push_then(Box::new(handler)));
        self
    }

    pub fn error<F: FnOnce(&Failure) + Send + 'static>(self, handler: F) -> Self {
        self.shared.register(|r| r.push_catch(Catch::any(handler)));
        self
    }

    pub fn error_of<E, F>(self, handler: F) -> Self
    where
        E: StdError + Send + Sync + 'static,
        F: FnOnce(&E) + Send + 'static,
    {
        self.shared.register(|r| r.push_catch(Catch::typed::<E, F>(handler)));
        self
    }

    pub fn finalize<F: FnOnce() + Send + 'static>(self, handler: F) -> Self {
        self.shared.register(|r| r.push_finally(Box::new(move |_: &Outcome<T>| handler())));
        self
    }

    pub fn chain<R, F>(self, producer: F) -> Promise<R>
    where
        T: Clone,
        R: Send + Sync + 'static,
        F: FnOnce(T, Deferred<R>) -> anyhow::Result<()> + Send + 'static,
    {
        let child    = Promise::<R>::pending(self.pool.clone());
        let deferred = Deferred::new(child.shared.clone());
        let pool     = self.pool.clone();

        self.shared.register(move |r| r.push_finally(Box::new(move |outcome: &Outcome<T>| {
            match outcome {
                Ok(value) => {
                    let value = value.clone();
                    let pool  = match pool {
                        Some(pool) => Ok(pool),
                        None       => pool::default(),
                    };
                    match pool {
                        Ok(pool) => deferred::invoke(&pool, deferred, move |d| producer(value, d)),
                        Err(_)   => reject(&deferred, Error::Terminated),
                    }
                }
                Err(failure) => reject(&deferred, failure.clone()),
            }
        })));

        child
    }

    pub fn wait(&self) -> Result<(), Error> {
        let mut state = self.shared.state.lock();
        while !state.dispatched {
            self.shared.done.wait(&mut state);
        }
        match state.faults.first() {
            Some(fault) => Err(Error::Handler(fault.clone())),
            None        => Ok(()),
        }
    }

    pub fn get<D: Into<Duration>>(&self, timeout: D) -> Result<T, Error>
    where
        T: Clone,
    {
        let (tx, rx) = oneshot();
        self.shared.register(|r| r.push_finally(Box::new(move |outcome: &Outcome<T>| {
            tx.send(outcome.clone());
        })));
        rx.recv_timeout(timeout.into())
    }

    #[cfg(feature = "tokio")]
    pub fn settled(&self) -> Settled<T>
    where
        T: Clone,
    {
        let (tx, rx) = settled();
        self.shared.register(|r| r.push_finally(Box::new(move |outcome: &Outcome<T>| {
            let _ = tx.send(outcome.clone());
        })));
        rx
    }

    pub fn is_settled(&self) -> bool {
        self.shared.is_settled()
    }
}

impl<T> Shared<T> {
    fn new(cell: Cell<T>, dispatched: bool) -> Arc<Self> {
        let state = State {
            cell:       cell,
            registry:   Registry::new(),
            dispatched: dispatched,
            faults:     Vec::new(),
        };

        Arc::new(Self {
            state: Mutex::new(state),
            done:  Condvar::new(),
        })
    }

    pub(crate) fn settle(&self, outcome: Outcome<T>) -> Result<(), Duplicate> {
        let mut state = self.state.lock();
        let outcome   = state.cell.settle(outcome)?;

        // handlers registered while a batch runs are picked up on the next pass
        while let Some(batch) = state.registry.take(&outcome) {
            let faults = MutexGuard::unlocked(&mut state, || batch.run(&outcome));
            state.faults.extend(faults);
        }

        state.dispatched = true;
        self.done.notify_all();

        Ok(())
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.state.lock().cell.is_settled()
    }

    fn register<F: FnOnce(&mut Registry<T>)>(&self, push: F) {
        let mut state = self.state.lock();
        push(&mut state.registry);

        let outcome = match state.cell.outcome() {
            Some(outcome) => outcome.clone(),
            None          => return,
        };

        if let Some(batch) = state.registry.take(&outcome) {
            let faults = MutexGuard::unlocked(&mut state, || batch.run(&outcome));
            state.faults.extend(faults);
        }
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            pool:   self.pool.clone(),
        }
    }
}

fn reject<R>(deferred: &Deferred<R>, failure: impl Into<anyhow::Error>) {
    if let Err(e) = deferred.reject(failure) {
        warn!("chained promise already settled: {e}");
    }
}
