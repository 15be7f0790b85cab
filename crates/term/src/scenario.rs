//! Visibility scenario replay for the `schedule` subcommand.
//!
//! A scenario is a JSON document:
//!
//! ```json
//! {
//!   "order": ["a", "b", "c"],
//!   "selected": ["b"],
//!   "unsupported": false,
//!   "batches": [
//!     [{ "item": "a", "intersecting": true }, { "intersecting": true }]
//!   ]
//! }
//! ```
//!
//! Entries without `item` model elements lacking a block identifier.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use folio_primitives::ItemId;
use folio_visibility::{
	ContainerRef, IntersectionHost, IntersectionObserver, MemoryStore, ObservationEntry, ObserverOptions, Schedule,
	ThresholdError, VisibilityScheduler,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },
	#[error("invalid scenario: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("duplicate item in order: {0}")]
	DuplicateItem(String),
	#[error(transparent)]
	Threshold(#[from] ThresholdError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
	pub order: Vec<ItemId>,
	#[serde(default)]
	pub selected: Vec<ItemId>,
	/// Simulates a host without an intersection API.
	#[serde(default)]
	pub unsupported: bool,
	#[serde(default)]
	pub batches: Vec<Vec<ScenarioEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioEntry {
	#[serde(default)]
	pub item: Option<ItemId>,
	pub intersecting: bool,
}

impl From<&ScenarioEntry> for ObservationEntry {
	fn from(entry: &ScenarioEntry) -> Self {
		Self {
			item: entry.item.clone(),
			is_intersecting: entry.intersecting,
		}
	}
}

impl Scenario {
	pub fn load(path: &Path) -> Result<Self, ScenarioError> {
		let input = std::fs::read_to_string(path).map_err(|error| ScenarioError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&input)
	}

	pub fn parse(input: &str) -> Result<Self, ScenarioError> {
		let scenario: Self = serde_json::from_str(input)?;
		let mut seen = HashSet::new();
		if let Some(dup) = scenario.order.iter().find(|id| !seen.insert(id.as_str())) {
			return Err(ScenarioError::DuplicateItem(dup.to_string()));
		}
		Ok(scenario)
	}
}

/// Host used for replays; observers accept registrations and do nothing else,
/// since batches come from the scenario.
struct ReplayHost {
	supported: bool,
}

struct ReplayObserver;

impl IntersectionHost for ReplayHost {
	fn create_observer(&self, _options: ObserverOptions) -> Option<Box<dyn IntersectionObserver>> {
		self.supported.then(|| Box::new(ReplayObserver) as Box<dyn IntersectionObserver>)
	}
}

impl IntersectionObserver for ReplayObserver {
	fn observe(&mut self, _item: &ItemId) {}
	fn unobserve(&mut self, _item: &ItemId) {}
	fn disconnect(&mut self) {}
}

/// Replays `scenario` and returns one report line per step: the initial
/// schedule, then the schedule after each batch.
pub fn replay(scenario: &Scenario, threshold: f32) -> Result<Vec<String>, ScenarioError> {
	let mut store = MemoryStore::new();
	store.set_children(None, scenario.order.iter().cloned());
	store.select(scenario.selected.iter().cloned());

	let scheduler = VisibilityScheduler::with_threshold(threshold)?;
	for item in &scenario.order {
		scheduler.observe_item(item);
	}
	let phase = scheduler.attach(
		ContainerRef::new("scenario"),
		&ReplayHost {
			supported: !scenario.unsupported,
		},
	);

	let mut lines = vec![format!("phase {phase:?}"), format!("initial: {}", describe(&scheduler.schedule(&store, None)))];
	for (index, batch) in scenario.batches.iter().enumerate() {
		let entries: Vec<ObservationEntry> = batch.iter().map(ObservationEntry::from).collect();
		scheduler.apply_batch(&entries);
		lines.push(format!("batch {}: {}", index + 1, describe(&scheduler.schedule(&store, None))));
	}
	scheduler.dispose();
	Ok(lines)
}

fn describe(schedule: &Schedule) -> String {
	if schedule.is_empty() {
		return "(empty list)".to_string();
	}
	schedule
		.iter()
		.map(|item| format!("{}={}", item.id, if item.deferred() { "deferred" } else { "immediate" }))
		.collect::<Vec<_>>()
		.join(" ")
}
