use std::time::Duration;
#[cfg(feature = "tokio")]
use std::{future::Future, pin::Pin, task::{Context, Poll}};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
#[cfg(feature = "tokio")]
use tokio::sync::oneshot;
use super::cell::Outcome;
use super::failure::{Abandoned, Error, Failure};

pub struct Tx<T>(Sender<Outcome<T>>);
pub struct Rx<T>(Receiver<Outcome<T>>);

pub fn oneshot<T>() -> (Tx<T>, Rx<T>) {
    let (tx, rx) = bounded(1);
    (Tx(tx), Rx(rx))
}

impl<T> Tx<T> {
    pub fn send(self, outcome: Outcome<T>) {
        match self.0.send(outcome) {
            Ok(()) => (),
            Err(_) => (),
        }
    }
}

impl<T> Rx<T> {
    pub fn recv_timeout(self, timeout: Duration) -> Result<T, Error> {
        match self.0.recv_timeout(timeout) {
            Ok(outcome)                         => outcome.map_err(Error::Rejected),
            Err(RecvTimeoutError::Timeout)      => Err(Error::Timeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Rejected(Failure::new(Abandoned))),
        }
    }
}

#[cfg(feature = "tokio")]
pub struct Settled<T>(oneshot::Receiver<Outcome<T>>);

#[cfg(feature = "tokio")]
pub fn settled<T>() -> (oneshot::Sender<Outcome<T>>, Settled<T>) {
    let (tx, rx) = oneshot::channel();
    (tx, Settled(rx))
}

#[cfg(feature = "tokio")]
impl<T> Future for Settled<T> {
    type Output = Result<T, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(Ok(r))  => Poll::Ready(r.map_err(Error::Rejected)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Error::Rejected(Failure::new(Abandoned)))),
            Poll::Pending       => Poll::Pending,
        }
    }
}
