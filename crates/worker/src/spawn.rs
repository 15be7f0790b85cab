use std::future::Future;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::TaskClass;

/// Returned when work is spawned from a thread with no tokio runtime.
///
/// Folio never starts a runtime of its own: all tasks of one owner share the
/// caller's runtime so its state changes stay on one event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no tokio runtime available for {class} task")]
pub struct NoRuntime {
	pub class: TaskClass,
}

/// Spawns `fut` on the caller's runtime inside a span carrying its class.
pub fn spawn<F>(class: TaskClass, fut: F) -> Result<JoinHandle<F::Output>, NoRuntime>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	let handle = Handle::try_current().map_err(|_| NoRuntime { class })?;
	let span = tracing::trace_span!("worker.task", class = class.as_str());
	Ok(handle.spawn(fut.instrument(span)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_spawn_uses_ambient_runtime() {
		let handle = spawn(TaskClass::Background, async { 7 }).unwrap();
		assert_eq!(handle.await.unwrap(), 7);
	}

	#[test]
	fn test_spawn_without_runtime_is_an_error() {
		let err = spawn(TaskClass::Interactive, async {}).unwrap_err();
		assert_eq!(err, NoRuntime { class: TaskClass::Interactive });
		assert_eq!(err.to_string(), "no tokio runtime available for interactive task");
	}
}
