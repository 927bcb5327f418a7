use std::error::Error as StdError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;
use super::cell::Outcome;
use super::failure::{panic_message, Failure};

pub type Then<T>    = Box<dyn FnOnce(&T) + Send>;
pub type Finally<T> = Box<dyn FnOnce(&Outcome<T>) + Send>;

pub struct Catch {
    matches: fn(&Failure) -> bool,
    handler: Box<dyn FnOnce(&Failure) + Send>,
}

pub struct Registry<T> {
    then:    Vec<Then<T>>,
    catch:   Vec<Catch>,
    finally: Vec<Finally<T>>,
    handled: bool,
}

pub struct Batch<T> {
    then:    Vec<Then<T>>,
    catch:   Option<Catch>,
    finally: Vec<Finally<T>>,
    skipped: (Vec<Then<T>>, Vec<Catch>),
}

impl Catch {
    pub fn any<F: FnOnce(&Failure) + Send + 'static>(handler: F) -> Self {
        Self {
            matches: |_| true,
            handler: Box::new(handler),
        }
    }

    pub fn typed<E, F>(handler: F) -> Self
    where
        E: StdError + Send + Sync + 'static,
        F: FnOnce(&E) + Send + 'static,
    {
        Self {
            matches: |failure| failure.is::<E>(),
            handler: Box::new(move |failure| {
                if let Some(e) = failure.downcast_ref::<E>() {
                    handler(e);
                }
            }),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            then:    Vec::new(),
            catch:   Vec::new(),
            finally: Vec::new(),
            handled: false,
        }
    }

    pub fn push_then(&mut self, handler: Then<T>) {
        self.then.push(handler);
    }

    pub fn push_catch(&mut self, catch: Catch) {
        self.catch.push(catch);
    }

    pub fn push_finally(&mut self, handler: Finally<T>) {
        self.finally.push(handler);
    }

    pub fn take(&mut self, outcome: &Outcome<T>) -> Option<Batch<T>> {
        if self.then.is_empty() && self.catch.is_empty() && self.finally.is_empty() {
            return None;
        }

        let then        = std::mem::take(&mut self.then);
        let mut catches = std::mem::take(&mut self.catch);
        let finally     = std::mem::take(&mut self.finally);

        let batch = match outcome {
            Ok(_) => Batch {
                then:    then,
                catch:   None,
                finally: finally,
                skipped: (Vec::new(), catches),
            },
            Err(failure) => Batch {
                then:    Vec::new(),
                catch:   self.select(&mut catches, failure),
                finally: finally,
                skipped: (then, catches),
            },
        };

        Some(batch)
    }

    fn select(&mut self, catches: &mut Vec<Catch>, failure: &Failure) -> Option<Catch> {
        if self.handled {
            return None;
        }
        let index = catches.iter().position(|c| (c.matches)(failure))?;
        self.handled = true;
        Some(catches.remove(index))
    }
}

impl<T> Batch<T> {
    pub fn run(self, outcome: &Outcome<T>) -> Vec<String> {
        let Self { then, catch, finally, skipped } = self;
        let mut faults = Vec::new();

        match outcome {
            Ok(value) => {
                for handler in then {
                    contain(&mut faults, || handler(value));
                }
            }
            Err(failure) => {
                if let Some(Catch { handler, .. }) = catch {
                    contain(&mut faults, || handler(failure));
                }
            }
        }

        for handler in finally {
            contain(&mut faults, || handler(outcome));
        }

        drop(skipped);
        faults
    }
}

fn contain<F: FnOnce()>(faults: &mut Vec<String>, f: F) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
        let msg = panic_message(payload.as_ref());
        error!("handler panicked: {msg}");
        faults.push(msg);
    }
}
