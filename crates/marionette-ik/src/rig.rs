//! Frame-loop driver owning resolved chains and their solver.
//!
//! An [`IkRig`] is the lifecycle boundary between the host and the
//! solver: resolve once at setup, move goals and call [`IkRig::update`]
//! once per animation frame, re-resolve when the configuration changes.
//! The host is responsible for sequencing `update` strictly between its
//! own scene writes and reads within a frame.

use log::debug;
use nalgebra::Vector3;

use marionette_core::IkConfig;
use marionette_skeleton::Skeleton;

use crate::chain::{resolve, Chain, ResolveError};
use crate::solver::{CcdConfig, CcdSolver, SolveReport};

/// Resolved chains plus the solver that drives them each frame.
#[derive(Debug, Clone)]
pub struct IkRig {
    chains: Vec<Chain>,
    solver: CcdSolver,
}

impl IkRig {
    /// Bind every enabled chain of `config` to `skeleton` and configure
    /// the solver from the config's iteration budget.
    pub fn resolve(config: &IkConfig, skeleton: &impl Skeleton) -> Result<Self, ResolveError> {
        let chains = resolve(config, skeleton)?;
        let solver = CcdSolver::new(CcdConfig {
            max_iterations: config.iterations,
            ..CcdConfig::default()
        });
        debug!("rig resolved with {} active chains", chains.len());
        Ok(Self { chains, solver })
    }

    /// Solve every chain once. Call once per animation frame, after goal
    /// updates and before the host reads bone transforms back.
    pub fn update(&self, skeleton: &mut impl Skeleton) {
        for chain in &self.chains {
            self.solver.solve(skeleton, chain);
        }
    }

    /// Like [`update`](IkRig::update), reporting per-chain outcomes in
    /// chain order.
    pub fn update_reporting(&self, skeleton: &mut impl Skeleton) -> Vec<SolveReport> {
        self.chains
            .iter()
            .map(|chain| self.solver.solve(skeleton, chain))
            .collect()
    }

    /// The resolved chains, in configuration order (disabled configs
    /// excluded). An interaction layer reads goals and effectors from
    /// here to attach manipulation handles.
    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    /// Mutable access to one chain, for goal movement.
    pub fn chain_mut(&mut self, index: usize) -> Option<&mut Chain> {
        self.chains.get_mut(index)
    }

    /// Move one chain's goal. Out-of-range indices are ignored.
    pub fn set_goal(&mut self, index: usize, goal: Vector3<f64>) {
        if let Some(chain) = self.chains.get_mut(index) {
            chain.set_goal(goal);
        }
    }

    /// The solver shared by all chains.
    pub const fn solver(&self) -> &CcdSolver {
        &self.solver
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
