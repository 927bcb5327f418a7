use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone)]
pub struct Failure(Arc<anyhow::Error>);

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Duplicate {
    #[error("promise resolved twice")]
    ResolvedTwice,
    #[error("promise rejected after it was resolved")]
    RejectedAfterResolved,
    #[error("promise rejected twice")]
    RejectedTwice,
    #[error("promise resolved after it was rejected")]
    ResolvedAfterRejected,
}

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Rejected(Failure),
    #[error("promise not settled within {0:?}")]
    Timeout(Duration),
    #[error("handler panicked: {0}")]
    Handler(String),
    #[error("worker pool terminated")]
    Terminated,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("promise abandoned by its producer")]
pub struct Abandoned;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("producer panicked: {0}")]
pub struct Panicked(pub String);

impl Failure {
    pub fn new<E: Into<anyhow::Error>>(error: E) -> Self {
        match error.into().downcast::<Failure>() {
            Ok(failure) => failure,
            Err(error)  => Self(Arc::new(error)),
        }
    }

    pub fn is<E: StdError + Send + Sync + 'static>(&self) -> bool {
        self.downcast_ref::<E>().is_some()
    }

    pub fn downcast_ref<E: StdError + Send + Sync + 'static>(&self) -> Option<&E> {
        match self.0.downcast_ref::<E>() {
            Some(e) => Some(e),
            None    => self.0.chain().find_map(|e| e.downcast_ref::<E>()),
        }
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.0
    }
}

impl Duplicate {
    pub fn is_resolution_duplicate(&self) -> bool {
        matches!(self, Self::ResolvedTwice | Self::RejectedAfterResolved)
    }

    pub fn is_rejection_duplicate(&self) -> bool {
        matches!(self, Self::RejectedTwice | Self::ResolvedAfterRejected)
    }
}

impl Error {
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Rejected(failure) => Some(failure),
            _                       => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failure({:?})", self.0)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&**self.0)
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    match payload.downcast_ref::<&str>() {
        Some(s) => (*s).to_owned(),
        None    => match payload.downcast_ref::<String>() {
            Some(s) => s.clone(),
            None    => "unknown panic".to_owned(),
        },
    }
}
