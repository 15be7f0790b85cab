//! Worker primitives shared by the scheduler and the render coordinator.
//!
//! * [`TaskClass`] tags work as interactive (render now) or background (may lag).
//! * [`spawn`] runs a future on the caller's tokio runtime inside a class span.
//! * [`TokenCell`] issues monotonic [`FetchToken`]s used to reject stale results.
//! * [`DisposeFlag`] marks an owner as torn down so late results stay inert.

mod class;
mod spawn;
mod token;

pub use class::TaskClass;
pub use spawn::{NoRuntime, spawn};
pub use token::{DisposeFlag, FetchToken, TokenCell};
