//! Capability traits that registered services may implement.

mod dispose;
#[cfg(feature = "async")]
mod ready;

pub use dispose::Dispose;
#[cfg(feature = "async")]
pub use ready::ReadyCheck;
