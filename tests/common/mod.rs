#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Once};
use parking_lot::Mutex;
use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as layer, registry};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

pub const RESPONSE: &str = "HELLO WORLD!";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("connection reset")]
pub struct Io;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("request refused: {reason}")]
pub struct Refused {
    pub reason: String,
    #[source]
    pub source: Io,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid input")]
pub struct Invalid;

pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        filter = filter.add_directive(LevelFilter::WARN.into());
        let print = layer::layer().compact().with_test_writer();
        let _ = registry().with(filter).with(print).try_init();
    });
}

pub struct History<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> History<T> {
    pub fn new() -> Self {
        Self { entries: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn record(&self, entry: T) {
        self.entries.lock().push(entry);
    }

    pub fn recorder(&self) -> impl FnOnce(&T) + Send + 'static {
        let entries = self.entries.clone();
        move |value: &T| entries.lock().push(value.clone())
    }

    pub fn entries(&self) -> Vec<T> {
        self.entries.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<T> Clone for History<T> {
    fn clone(&self) -> Self {
        Self { entries: self.entries.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.lock().iter()).finish()
    }
}
