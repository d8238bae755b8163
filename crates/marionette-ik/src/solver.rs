//! Cyclic Coordinate Descent solver.
//!
//! Each pass walks the chain's joints effector-adjacent first, rotating
//! every joint so the joint-to-effector direction swings toward the
//! joint-to-goal direction, then clamping the result into the joint's
//! Euler limits and propagating world transforms before the next joint
//! reads them. A pass in which no joint moved means convergence.

use nalgebra::{Unit, UnitQuaternion};

use marionette_skeleton::Skeleton;

use crate::chain::Chain;

/// Directions shorter than this carry no attitude information; the joint
/// is skipped for the pass rather than producing NaN.
const DEGENERATE_LENGTH: f64 = 1e-6;

// ---------------------------------------------------------------------------
// CcdConfig
// ---------------------------------------------------------------------------

/// Configuration for the CCD solver.
#[derive(Debug, Clone)]
pub struct CcdConfig {
    /// Maximum passes over the chain per solve call. Doubles as the only
    /// bounded-latency guarantee; there is no other timeout.
    pub max_iterations: u32,
    /// Angular error (radians) below which a joint counts as aligned.
    pub angle_threshold: f64,
    /// Optional cap on the per-pass rotation step (radians). `None`
    /// leaves single-pass rotations unbounded.
    pub max_step: Option<f64>,
}

impl Default for CcdConfig {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            angle_threshold: 1e-5,
            max_step: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SolveReport
// ---------------------------------------------------------------------------

/// Outcome of a solve call. Informational only; solving has no error path.
#[derive(Debug, Clone, Copy)]
pub struct SolveReport {
    /// Full passes executed before convergence or budget exhaustion.
    pub iterations: u32,
    /// Whether a pass completed with every joint already aligned.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// CcdSolver
// ---------------------------------------------------------------------------

/// Cyclic Coordinate Descent solver.
///
/// Synchronous and single-threaded: a call runs to completion on the
/// caller's thread, mutating joint orientations through the skeleton.
/// One chain must not be solved concurrently from two threads; distinct
/// skeletons may be solved in parallel. All intermediates are stack
/// values, so a call performs no heap allocation.
#[derive(Debug, Clone)]
pub struct CcdSolver {
    config: CcdConfig,
}

impl CcdSolver {
    /// Create a solver with the given configuration.
    pub const fn new(config: CcdConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CcdConfig::default())
    }

    /// The active configuration.
    pub const fn config(&self) -> &CcdConfig {
        &self.config
    }

    /// Drive `chain`'s effector toward its goal by rotating the chain's
    /// joints in place.
    ///
    /// The goal is read once at call start; a goal moved mid-call takes
    /// effect on the next call. Never fails: degenerate geometry (goal or
    /// effector coincident with a joint, antiparallel directions) skips
    /// the affected joint for the pass.
    pub fn solve(&self, skeleton: &mut impl Skeleton, chain: &Chain) -> SolveReport {
        let goal = chain.goal();

        for pass in 0..self.config.max_iterations {
            let mut rotated = false;

            for joint in chain.joints() {
                let joint_pos = skeleton.world_position(joint.bone);
                let world_inv = skeleton.world_rotation(joint.bone).inverse();

                // The effector moves as earlier joints in this same pass
                // rotate, so its position is re-read per joint.
                let effector_pos = skeleton.world_position(chain.effector());
                let Some(to_effector) =
                    Unit::try_new(world_inv * (effector_pos - joint_pos), DEGENERATE_LENGTH)
                else {
                    continue;
                };
                let Some(to_goal) = Unit::try_new(world_inv * (goal - joint_pos), DEGENERATE_LENGTH)
                else {
                    continue;
                };

                let angle = to_effector.dot(&to_goal).clamp(-1.0, 1.0).acos();
                if angle < self.config.angle_threshold {
                    continue;
                }
                let Some(axis) = Unit::try_new(to_effector.cross(&to_goal), DEGENERATE_LENGTH)
                else {
                    continue;
                };

                let step = match self.config.max_step {
                    Some(max) => angle.min(max),
                    None => angle,
                };
                let turned =
                    skeleton.local_rotation(joint.bone) * UnitQuaternion::from_axis_angle(&axis, step);
                skeleton.set_local_rotation(joint.bone, joint.constrain(&turned));
                skeleton.propagate(joint.bone);
                rotated = true;
            }

            if !rotated {
                return SolveReport {
                    iterations: pass,
                    converged: true,
                };
            }
        }

        SolveReport {
            iterations: self.config.max_iterations,
            converged: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
