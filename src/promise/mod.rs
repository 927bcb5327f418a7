pub use cell::Outcome;
#[cfg(feature = "tokio")]
pub use channel::Settled;
pub use deferred::Deferred;
pub use failure::Abandoned;
pub use failure::Duplicate;
pub use failure::Error;
pub use failure::Failure;
pub use failure::Panicked;
pub use pool::Config;
pub use pool::Guard;
pub use pool::Handle;
pub use pool::Pool;
pub use promise::Promise;
pub use promise::Promises;

mod cell;
mod channel;
mod deferred;
mod failure;
mod pool;
mod promise;
mod registry;
