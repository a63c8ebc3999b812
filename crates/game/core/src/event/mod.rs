//! Event pipeline: kinds, the per-dispatch context and the dispatcher.
//!
//! Every interception point builds a fresh [`EventContext`], hands it to
//! [`EventDispatcher::dispatch`] and reads the flags, payload and cancellation
//! state afterwards. Nothing in the context outlives the call.

mod context;
mod dispatcher;
mod kind;

pub use context::{EventContext, flags, payload};
pub use dispatcher::{DispatchError, EventDispatcher};
pub use kind::GameEventKind;
