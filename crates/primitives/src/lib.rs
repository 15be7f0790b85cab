//! Shared vocabulary for the block list scheduler and the server-render coordinator.

/// Content descriptors naming what the server renders.
pub mod descriptor;
/// Opaque block identifiers.
pub mod item;
/// Request methods for render calls.
pub mod method;

pub use descriptor::{Attributes, ContentDescriptor, DescriptorError};
pub use item::ItemId;
pub use method::{HttpMethod, ParseMethodError};
