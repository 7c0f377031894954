/// Invaders — a minimal 2D arcade shooter.
///
/// The library holds the whole simulation: game objects, the hit-test and
/// timer model, and the `GameWindow` that owns everything and steps it.
/// Terminal I/O lives in the binary only.

pub mod assets;
pub mod clock;
pub mod compute;
pub mod config;
pub mod entities;
pub mod input;
