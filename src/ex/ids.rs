use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

pub trait Generator: Send + Sync + 'static {
    fn next(&self) -> String;
}

#[derive(Debug, Default)]
pub struct UuidGenerator;

#[derive(Debug)]
pub struct SequenceGenerator {
    prefix:  String,
    counter: AtomicU64,
}

impl Generator for UuidGenerator {
    fn next(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl SequenceGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix:  prefix.to_owned(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Generator for SequenceGenerator {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

impl<F: Fn() -> String + Send + Sync + 'static> Generator for F {
    fn next(&self) -> String {
        self()
    }
}
