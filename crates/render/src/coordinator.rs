use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use folio_worker::{DisposeFlag, FetchToken, TaskClass, TokenCell, spawn};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::path::PathOptions;
use crate::request::RenderRequest;
use crate::state::{DisplayBranch, RenderState};
use crate::transport::{FetchCall, RenderTransport, RenderedPayload, TransportError};

/// Quiet period after the last request before a debounced call is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Tunables of a [`FetchCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorOptions {
	pub debounce: Duration,
	pub path: PathOptions,
}

impl Default for CoordinatorOptions {
	fn default() -> Self {
		Self {
			debounce: DEFAULT_DEBOUNCE,
			path: PathOptions::default(),
		}
	}
}

/// How a request reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
	/// Issued in the calling turn. Used for the first request only.
	Immediate,
	/// Issued after the window passes without a newer request.
	Debounced(Duration),
}

impl Dispatch {
	const fn select(has_fired: bool, window: Duration) -> Self {
		if has_fired { Self::Debounced(window) } else { Self::Immediate }
	}
}

struct Inner<T> {
	transport: T,
	options: CoordinatorOptions,
	tokens: TokenCell,
	disposed: DisposeFlag,
	fired: AtomicBool,
	state: watch::Sender<RenderState>,
	/// Markup of the last successful render, shown under the loading spinner.
	previous: Mutex<Option<String>>,
	last_input: Mutex<Option<RenderRequest>>,
	/// Timer of the pending debounced request.
	pending: Mutex<Option<JoinHandle<()>>>,
}

/// Coordinates server renders of one block.
///
/// # Invariants
///
/// - Only the most recently issued call may change state. Issuing replaces
///   the current token before anything else happens.
/// - After [`dispose`](Self::dispose) the state never changes again.
/// - Transport failures become [`RenderState::Error`]; nothing is returned
///   to or raised at the caller.
///
/// Dropping the coordinator disposes it. Calls already on the wire are not
/// cancelled; their responses are ignored.
pub struct FetchCoordinator<T: RenderTransport> {
	inner: Arc<Inner<T>>,
}

impl<T: RenderTransport> std::fmt::Debug for FetchCoordinator<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FetchCoordinator")
			.field("state", &*self.inner.state.borrow())
			.field("token", &self.inner.tokens.current())
			.field("disposed", &self.inner.disposed.is_disposed())
			.finish()
	}
}

impl<T: RenderTransport> FetchCoordinator<T> {
	pub fn new(transport: T, options: CoordinatorOptions) -> Self {
		let (state, _) = watch::channel(RenderState::Idle);
		Self {
			inner: Arc::new(Inner {
				transport,
				options,
				tokens: TokenCell::new(),
				disposed: DisposeFlag::new(),
				fired: AtomicBool::new(false),
				state,
				previous: Mutex::new(None),
				last_input: Mutex::new(None),
				pending: Mutex::new(None),
			}),
		}
	}

	/// Routes `request` to the network.
	///
	/// The first request is issued immediately; every later one replaces any
	/// pending debounced request and waits out the debounce window. Returns
	/// the dispatch used, or `None` once disposed.
	pub fn request_render(&self, request: RenderRequest) -> Option<Dispatch> {
		let inner = &self.inner;
		if inner.disposed.is_disposed() {
			trace!(target = %request.target, "render.request.after_dispose");
			return None;
		}
		*inner.last_input.lock() = Some(request.clone());

		let dispatch = Dispatch::select(inner.fired.swap(true, Ordering::AcqRel), inner.options.debounce);
		match dispatch {
			Dispatch::Immediate => issue(inner, request),
			Dispatch::Debounced(window) => {
				let mut pending = inner.pending.lock();
				if let Some(timer) = pending.take() {
					timer.abort();
					trace!("render.request.superseded");
				}
				let task_inner = Arc::clone(inner);
				let timer = spawn(TaskClass::Background, async move {
					tokio::time::sleep(window).await;
					issue(&task_inner, request);
				});
				match timer {
					Ok(timer) => *pending = Some(timer),
					Err(err) => {
						drop(pending);
						inner.settle(inner.tokens.issue(), Err(TransportError::new(err.to_string())));
					}
				}
			}
		}
		Some(dispatch)
	}

	/// Re-renders when `request` differs from the last input seen.
	///
	/// The first call always renders. Returns `None` when the input is
	/// unchanged or the coordinator is disposed.
	pub fn sync(&self, request: RenderRequest) -> Option<Dispatch> {
		if self.inner.last_input.lock().as_ref() == Some(&request) {
			return None;
		}
		self.request_render(request)
	}

	/// Current state.
	pub fn state(&self) -> RenderState {
		self.inner.state.borrow().clone()
	}

	/// Subscribes to state changes.
	pub fn subscribe(&self) -> watch::Receiver<RenderState> {
		self.inner.state.subscribe()
	}

	/// Resolves what a display host should show right now.
	pub fn display(&self) -> DisplayBranch {
		let state = self.inner.state.borrow().clone();
		let previous = self.inner.previous.lock();
		DisplayBranch::resolve(&state, previous.as_deref())
	}

	/// Token of the most recently issued call.
	pub fn current_token(&self) -> Option<FetchToken> {
		self.inner.tokens.current()
	}

	/// Returns true once the first request has been dispatched.
	pub fn has_fired(&self) -> bool {
		self.inner.fired.load(Ordering::Acquire)
	}

	pub fn is_disposed(&self) -> bool {
		self.inner.disposed.is_disposed()
	}

	/// Tears the coordinator down. Idempotent.
	///
	/// A pending debounced request is dropped before it reaches the network;
	/// responses of calls already issued are ignored when they arrive.
	pub fn dispose(&self) {
		let inner = &self.inner;
		let mut first = false;
		// Flipped under the state lock so no transition straddles teardown.
		inner.state.send_if_modified(|_| {
			first = !inner.disposed.is_disposed();
			inner.disposed.dispose();
			false
		});
		if !first {
			return;
		}
		if let Some(timer) = inner.pending.lock().take() {
			timer.abort();
		}
		debug!(token = ?inner.tokens.current(), "render.disposed");
	}
}

impl<T: RenderTransport> Drop for FetchCoordinator<T> {
	fn drop(&mut self) {
		self.dispose();
	}
}

fn issue<T: RenderTransport>(inner: &Arc<Inner<T>>, request: RenderRequest) {
	let token = inner.tokens.issue();
	if inner.disposed.is_disposed() {
		return;
	}

	let call = FetchCall::for_request(&request, &inner.options.path);
	debug!(
		token = token.generation(),
		target = %request.target,
		method = %call.method,
		path = %call.path,
		"render.fetch.issued"
	);
	inner.commit(token, RenderState::Loading);

	let task_inner = Arc::clone(inner);
	let spawned = spawn(TaskClass::Background, async move {
		let result = task_inner.transport.fetch(call).await;
		task_inner.settle(token, result);
	});
	if let Err(err) = spawned {
		inner.settle(token, Err(TransportError::new(err.to_string())));
	}
}

impl<T> Inner<T> {
	fn settle(&self, token: FetchToken, result: Result<RenderedPayload, TransportError>) {
		let next = match result {
			Ok(payload) if payload.rendered.is_empty() => RenderState::Empty,
			Ok(payload) => RenderState::Success(payload.rendered),
			Err(err) => RenderState::Error(err.message),
		};
		self.commit(token, next);
	}

	/// Publishes `next` on behalf of the call holding `token`.
	///
	/// Runs under the state channel's write lock, which [`FetchCoordinator::dispose`]
	/// also takes. Returns false when the owner is disposed or `token` was
	/// superseded; the state is then left untouched.
	fn commit(&self, token: FetchToken, next: RenderState) -> bool {
		self.state.send_if_modified(|state| {
			if self.disposed.is_disposed() {
				trace!(token = token.generation(), "render.response.after_dispose");
				return false;
			}
			if !self.tokens.is_current(token) {
				trace!(
					token = token.generation(),
					current = ?self.tokens.current(),
					"render.response.stale"
				);
				return false;
			}

			let mut previous = self.previous.lock();
			match &next {
				RenderState::Success(markup) => *previous = Some(markup.clone()),
				RenderState::Empty => *previous = None,
				RenderState::Error(message) => {
					warn!(token = token.generation(), error = %message, "render.fetch.failed");
					*previous = None;
				}
				RenderState::Idle | RenderState::Loading => {}
			}
			debug!(token = token.generation(), state = ?next, "render.state");
			*state = next;
			true
		})
	}
}
