//! Cyclic Coordinate Descent inverse kinematics for skeletal rigs.
//!
//! # Architecture
//!
//! ```text
//! IkConfig ──resolve──► Chain(s) ──► CcdSolver ──► joint orientations
//! ```
//!
//! An [`IkConfig`](marionette_core::IkConfig) is resolved against a live
//! [`Skeleton`](marionette_skeleton::Skeleton) into [`Chain`]s holding
//! bone handles and per-joint rotation limits. Each animation frame the
//! host moves chain goals and calls [`CcdSolver::solve`] (or
//! [`IkRig::update`] to drive every chain), which rotates joints in
//! place, effector-adjacent first, until the effector converges on the
//! goal or the pass budget runs out.

pub mod chain;
pub mod rig;
pub mod solver;

pub use chain::{resolve, Chain, Joint, ResolveError};
pub use rig::IkRig;
pub use solver::{CcdConfig, CcdSolver, SolveReport};
