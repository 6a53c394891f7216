//! Episodic grid-world simulation: an agent walks a character grid and
//! collects rewards until it reaches the goal, falls into a trap, or its
//! score collapses.

pub mod error;
pub mod movement;
pub mod policy;
pub mod report;
pub mod simulation;
pub mod world;

pub use crate::error::{Result, SimError, WorldError};
pub use crate::movement::Movement;
pub use crate::simulation::Simulation;
pub use crate::world::{Grid, Pos, World, WorldGenerator};
