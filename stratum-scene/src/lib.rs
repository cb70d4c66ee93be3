//! Stratum Scene Crate
//!
//! The rendering capability that stratum layers draw into. Layers never touch a
//! global renderer; every operation receives a `&mut dyn SceneGraph`.
//!
//! ## Modules
//!
//! - [`handle`]: typed group/primitive handles
//! - [`color`]: RGBA colors shared by every primitive
//! - [`graph`]: the [`SceneGraph`] trait and primitive descriptions
//! - [`retained`]: an in-memory scene that records everything it is asked to draw

pub mod color;
pub mod error;
pub mod graph;
pub mod handle;
pub mod retained;

pub use color::Color;
pub use error::SceneError;
pub use graph::{PrimitiveDesc, SceneGraph};
pub use handle::{Group, GroupHandle, Handle, Primitive, PrimitiveHandle};
pub use retained::RetainedScene;
