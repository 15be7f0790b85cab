//! Debounced server-render coordination.
//!
//! A [`FetchCoordinator`] turns a stream of [`RenderRequest`]s into a stream of
//! [`RenderState`]s while keeping the network quiet and the state honest:
//!
//! - The first request goes out immediately; later ones are debounced so a
//!   burst of attribute edits produces one call with the final attributes.
//! - Every issued call carries a [`FetchToken`](folio_worker::FetchToken).
//!   A response whose token has been superseded is dropped, so a slow old
//!   response can never overwrite a newer one.
//! - After [`FetchCoordinator::dispose`] no response changes anything.
//!
//! The network itself sits behind [`RenderTransport`]. With the `http`
//! feature, [`HttpTransport`] implements it over `reqwest`.

mod coordinator;
#[cfg(feature = "http")]
mod http;
mod path;
mod request;
mod state;
mod transport;

pub use coordinator::{CoordinatorOptions, DEFAULT_DEBOUNCE, Dispatch, FetchCoordinator};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use path::{DEFAULT_CONTEXT, DEFAULT_PATH_PREFIX, PathOptions, renderer_path};
pub use request::RenderRequest;
pub use state::{DisplayBranch, RenderState};
pub use transport::{FetchCall, RenderTransport, RenderedPayload, TransportError};
