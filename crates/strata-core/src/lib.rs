//! Core types for Strata: the world and entity contracts a population reads.
//!
//! The lifecycle engine in `strata-sim` never owns tiles or creatures. It
//! queries them through the [`TileMap`] and [`EntityQuery`] traits defined
//! here. [`GridMap`] and [`EntityTable`] are small in-memory implementations
//! for hosts that have nothing better, and for tests.

/// Component values attached to entities under a tag.
pub mod component;
/// Entity identifiers, the entity query contract, and an in-memory table.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Tile classification.
pub mod tile;
/// The tile map contract and a dense grid implementation.
pub mod world;

/// Re-export of [`component::ComponentValue`].
pub use component::ComponentValue;
/// Re-export entity types.
pub use entity::{EntityId, EntityQuery, EntityTable};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export of [`tile::TileKind`].
pub use tile::TileKind;
/// Re-export world types.
pub use world::{GridMap, TileMap};
