//! petri engine
//!
//! Advances a two-state cellular automaton (classic B3/S23 Game of Life)
//! over a packed bit grid and republishes every state change to registered
//! observers. The engine is single-threaded and cooperative: the host's
//! event loop drives due ticks through [`Simulation::pump`], and every
//! command runs to completion on the same timeline.

pub mod clock;
pub mod engine;
pub mod error;
pub mod observer;

pub use clock::Clock;
pub use engine::{RunState, Simulation};
pub use error::{Error, Result};
pub use observer::{Observer, Observers, SharedObserver};

pub use petri_field::{BitField, FieldError};
