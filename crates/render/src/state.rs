use std::fmt;

/// Observable state of a [`FetchCoordinator`](crate::FetchCoordinator).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenderState {
	/// Nothing requested yet.
	#[default]
	Idle,
	/// A call is in flight.
	Loading,
	/// The server rendered non-empty markup.
	Success(String),
	/// The server rendered nothing. Not an error.
	Empty,
	/// The call failed; the message is the transport's, verbatim.
	Error(String),
}

impl RenderState {
	/// Returns true for `Success`, `Empty`, and `Error`.
	pub const fn is_settled(&self) -> bool {
		matches!(self, Self::Success(_) | Self::Empty | Self::Error(_))
	}
}

/// What a display host shows for a [`RenderState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBranch {
	Idle,
	/// Spinner over the last successfully rendered markup, if any.
	Loading { previous: Option<String> },
	Empty,
	Error { message: String },
	Markup(String),
}

impl DisplayBranch {
	/// Resolves the branch for `state`, given the last successful markup.
	pub fn resolve(state: &RenderState, previous: Option<&str>) -> Self {
		match state {
			RenderState::Idle => Self::Idle,
			RenderState::Loading => Self::Loading {
				previous: previous.map(str::to_string),
			},
			RenderState::Empty => Self::Empty,
			RenderState::Error(message) => Self::Error {
				message: message.clone(),
			},
			RenderState::Success(markup) => Self::Markup(markup.clone()),
		}
	}

	/// Placeholder text for branches that have no markup of their own.
	pub fn placeholder(&self) -> Option<String> {
		match self {
			Self::Empty => Some("Block rendered as empty.".to_string()),
			Self::Error { message } => Some(format!("Error loading block: {message}")),
			Self::Idle | Self::Loading { .. } | Self::Markup(_) => None,
		}
	}
}

impl fmt::Display for DisplayBranch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Idle => Ok(()),
			Self::Loading { previous: Some(markup) } => write!(f, "[loading] {markup}"),
			Self::Loading { previous: None } => f.write_str("[loading]"),
			Self::Markup(markup) => f.write_str(markup),
			Self::Empty | Self::Error { .. } => f.write_str(&self.placeholder().unwrap_or_default()),
		}
	}
}
