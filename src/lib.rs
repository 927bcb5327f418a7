pub use context::Context;
pub use context::Controller;
pub use context::Identifier;
pub use promise::Deferred;
pub use promise::Failure;
pub use promise::Promise;
pub use promise::Promises;

pub mod context;
pub mod ex;
pub mod promise;
