//! Procedurally grown, decorated tree
//!
//! Branches sprout and extend over time, baubles and lights appear at the
//! growing tips, and presents rise into place underneath. The simulation is
//! a pure state-in, state-out [`frame::Scene::tick`]; drawing goes through
//! the [`surface::Surface`] trait so any backend can host it.

pub mod canvas;
pub mod config;
pub mod decoration;
pub mod error;
pub mod frame;
pub mod growth;
pub mod palette;
pub mod present;
pub mod render;
pub mod settings;
pub mod surface;
pub mod vector;

/// Milliseconds on the host's clock
pub type Timestamp = i64;

pub use error::{Result, TreeError};
pub use frame::{tick, AnimationState, FrameTime, Scene};
pub use palette::{Colour, Palette};
