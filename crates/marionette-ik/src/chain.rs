//! Runtime chain model, resolved from configuration against a skeleton.
//!
//! A [`Chain`] holds non-owning bone handles: the skeleton owns every
//! transform, and a chain must not outlive the skeleton it was resolved
//! against. Joints are ordered effector-adjacent first, root-most last;
//! the solver walks them in that order each pass.

use log::debug;
use nalgebra::{UnitQuaternion, Vector3};

use marionette_core::{ChainConfig, IkConfig, RotationOrder};
use marionette_skeleton::{BoneId, Skeleton};

/// Errors raised while binding configuration to a skeleton.
///
/// Resolution is the only failing step: a chain that resolves can always
/// be solved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A configured bone identifier does not exist on the skeleton.
    #[error("unknown bone: {0}")]
    UnknownBone(String),

    /// The chain has no joints to rotate.
    #[error("chain with effector {effector} has no joints")]
    EmptyChain { effector: String },
}

// ---------------------------------------------------------------------------
// Joint
// ---------------------------------------------------------------------------

/// One rotatable joint of a resolved chain.
///
/// The orientation state lives in the skeleton node; this struct carries
/// the handle plus the limit data the solver clamps against.
#[derive(Debug, Clone)]
pub struct Joint {
    /// The skeleton node this joint rotates.
    pub bone: BoneId,
    /// Euler ordering the limits are expressed in; fixed for the joint's
    /// lifetime.
    pub order: RotationOrder,
    /// Componentwise lower limits (radians).
    pub rotation_min: Vector3<f64>,
    /// Componentwise upper limits (radians).
    pub rotation_max: Vector3<f64>,
}

impl Joint {
    /// Clamp a rotation into this joint's limits.
    ///
    /// Decomposes under the joint's own Euler ordering, clamps each axis,
    /// and rebuilds. Different joints may use different orderings, so the
    /// same limits can admit different rotations on different joints.
    pub fn constrain(&self, rotation: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        let angles = self.order.to_euler(rotation);
        let clamped = Vector3::new(
            angles.x.clamp(self.rotation_min.x, self.rotation_max.x),
            angles.y.clamp(self.rotation_min.y, self.rotation_max.y),
            angles.z.clamp(self.rotation_min.z, self.rotation_max.z),
        );
        self.order.from_euler(clamped)
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Goal, effector, and ordered joints solved together as one IK unit.
#[derive(Debug, Clone)]
pub struct Chain {
    goal: Vector3<f64>,
    effector: BoneId,
    joints: Vec<Joint>,
}

impl Chain {
    /// Build a chain directly from resolved parts.
    ///
    /// # Panics
    ///
    /// Panics if `joints` is empty; malformed chains are rejected at
    /// construction, never inside the solver.
    pub fn new(goal: Vector3<f64>, effector: BoneId, joints: Vec<Joint>) -> Self {
        assert!(!joints.is_empty(), "a chain needs at least one joint");
        Self {
            goal,
            effector,
            joints,
        }
    }

    /// Bind one [`ChainConfig`] to a skeleton.
    ///
    /// Every bone identifier is looked up eagerly; the first miss fails
    /// the whole chain. The goal starts at the effector's current world
    /// position, so a freshly resolved chain is already converged.
    pub fn resolve(config: &ChainConfig, skeleton: &impl Skeleton) -> Result<Self, ResolveError> {
        if config.joints.is_empty() {
            return Err(ResolveError::EmptyChain {
                effector: config.effector.clone(),
            });
        }
        let effector = skeleton
            .bone(&config.effector)
            .ok_or_else(|| ResolveError::UnknownBone(config.effector.clone()))?;

        let mut joints = Vec::with_capacity(config.joints.len());
        for jc in &config.joints {
            let bone = skeleton
                .bone(&jc.bone)
                .ok_or_else(|| ResolveError::UnknownBone(jc.bone.clone()))?;
            joints.push(Joint {
                bone,
                order: jc.order,
                rotation_min: Vector3::from(jc.rotation_min),
                rotation_max: Vector3::from(jc.rotation_max),
            });
        }

        debug!(
            "resolved chain: effector {} with {} joints",
            config.effector,
            joints.len()
        );
        Ok(Self {
            goal: skeleton.world_position(effector),
            effector,
            joints,
        })
    }

    /// The target world position the effector is driven toward.
    pub fn goal(&self) -> Vector3<f64> {
        self.goal
    }

    /// Move the goal. Called by the host (or an interaction layer's
    /// manipulation handle) between solves.
    pub fn set_goal(&mut self, goal: Vector3<f64>) {
        self.goal = goal;
    }

    /// The bone whose world position should approach the goal.
    pub fn effector(&self) -> BoneId {
        self.effector
    }

    /// Joints, effector-adjacent first. Never empty.
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

/// Bind every enabled chain of `config` to a skeleton.
///
/// Fails on the first unknown bone. Hosts that prefer to keep healthy
/// chains when one is broken can call [`Chain::resolve`] per config and
/// skip the failures.
pub fn resolve(config: &IkConfig, skeleton: &impl Skeleton) -> Result<Vec<Chain>, ResolveError> {
    config
        .chains
        .iter()
        .filter(|c| c.enabled)
        .map(|c| Chain::resolve(c, skeleton))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use marionette_core::JointConfig;
    use marionette_skeleton::BoneTree;
    use std::f64::consts::PI;

    fn arm() -> BoneTree {
        let mut tree = BoneTree::new();
        let shoulder = tree.add_bone("shoulder", None, Vector3::zeros()).unwrap();
        let elbow = tree
            .add_bone("elbow", Some(shoulder), Vector3::new(1.0, 0.0, 0.0))
            .unwrap();
        tree.add_bone("wrist", Some(elbow), Vector3::new(1.0, 0.0, 0.0))
            .unwrap();
        tree
    }

    fn arm_chain_config() -> ChainConfig {
        ChainConfig {
            joints: vec![
                JointConfig::free("elbow", RotationOrder::Xyz),
                JointConfig::free("shoulder", RotationOrder::Xyz),
            ],
            effector: "wrist".into(),
            enabled: true,
        }
    }

    // ---- resolution ----

    #[test]
    fn resolve_binds_handles_in_order() {
        let tree = arm();
        let chain = Chain::resolve(&arm_chain_config(), &tree).unwrap();
        assert_eq!(chain.joints().len(), 2);
        assert_eq!(chain.joints()[0].bone, tree.bone("elbow").unwrap());
        assert_eq!(chain.joints()[1].bone, tree.bone("shoulder").unwrap());
        assert_eq!(chain.effector(), tree.bone("wrist").unwrap());
    }

    #[test]
    fn resolve_seeds_goal_at_effector() {
        let tree = arm();
        let chain = Chain::resolve(&arm_chain_config(), &tree).unwrap();
        let wrist = tree.bone("wrist").unwrap();
        assert_relative_eq!((chain.goal() - tree.world_position(wrist)).norm(), 0.0);
    }

    #[test]
    fn resolve_unknown_effector() {
        let tree = arm();
        let mut config = arm_chain_config();
        config.effector = "hand".into();
        let err = Chain::resolve(&config, &tree).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownBone(name) if name == "hand"));
    }

    #[test]
    fn resolve_unknown_joint_bone() {
        let tree = arm();
        let mut config = arm_chain_config();
        config.joints[1].bone = "clavicle".into();
        let err = Chain::resolve(&config, &tree).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownBone(name) if name == "clavicle"));
    }

    #[test]
    fn resolve_rejects_empty_chain() {
        let tree = arm();
        let config = ChainConfig {
            joints: Vec::new(),
            effector: "wrist".into(),
            enabled: true,
        };
        let err = Chain::resolve(&config, &tree).unwrap_err();
        assert!(matches!(err, ResolveError::EmptyChain { effector } if effector == "wrist"));
    }

    #[test]
    fn resolve_all_skips_disabled_chains() {
        let tree = arm();
        let mut disabled = arm_chain_config();
        disabled.enabled = false;
        // The disabled chain may reference bones the skeleton lacks.
        disabled.joints[0].bone = "LeftLowerLeg".into();

        let config = IkConfig {
            chains: vec![arm_chain_config(), disabled],
            ..IkConfig::default()
        };
        let chains = resolve(&config, &tree).unwrap();
        assert_eq!(chains.len(), 1);
    }

    #[test]
    fn resolve_all_surfaces_first_failure() {
        let tree = arm();
        let mut broken = arm_chain_config();
        broken.effector = "hand".into();
        let config = IkConfig {
            chains: vec![broken, arm_chain_config()],
            ..IkConfig::default()
        };
        assert!(resolve(&config, &tree).is_err());
    }

    #[test]
    #[should_panic(expected = "at least one joint")]
    fn chain_new_rejects_empty_joints() {
        let tree = arm();
        let wrist = tree.bone("wrist").unwrap();
        let _ = Chain::new(Vector3::zeros(), wrist, Vec::new());
    }

    // ---- constrain ----

    #[test]
    fn constrain_free_joint_is_identity_transform() {
        let tree = arm();
        let chain = Chain::resolve(&arm_chain_config(), &tree).unwrap();
        let q = RotationOrder::Xyz.from_euler(Vector3::new(0.4, -0.2, 0.9));
        let clamped = chain.joints()[0].constrain(&q);
        assert_relative_eq!(q.angle_to(&clamped), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn constrain_locked_joint_collapses_to_identity() {
        let joint = Joint {
            bone: BoneId(0),
            order: RotationOrder::Zxy,
            rotation_min: Vector3::zeros(),
            rotation_max: Vector3::zeros(),
        };
        let q = RotationOrder::Zxy.from_euler(Vector3::new(0.7, -1.1, 0.3));
        let clamped = joint.constrain(&q);
        assert_relative_eq!(clamped.angle(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn constrain_clamps_into_range() {
        // Y-hinge joint: X and Z locked, Y in [-pi, -0.1].
        let joint = Joint {
            bone: BoneId(0),
            order: RotationOrder::Yzx,
            rotation_min: Vector3::new(0.0, -PI, 0.0),
            rotation_max: Vector3::new(0.0, -0.1, 0.0),
        };
        let q = RotationOrder::Yzx.from_euler(Vector3::new(0.0, 0.5, 0.0));
        let clamped = joint.constrain(&q);
        let angles = RotationOrder::Yzx.to_euler(&clamped);
        assert_relative_eq!(angles.y, -0.1, epsilon = 1e-5);
        assert_relative_eq!(angles.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(angles.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn constrain_depends_on_rotation_order() {
        // Same limits, different ordering, different outcome: Z locked,
        // X and Y free. The rotation Rx(0.3) * Ry(0.4) has a zero Z angle
        // under XYZ but not under YXZ.
        let limits_min = Vector3::new(-PI, -PI, 0.0);
        let limits_max = Vector3::new(PI, PI, 0.0);
        let q = RotationOrder::Xyz.from_euler(Vector3::new(0.3, 0.4, 0.0));

        let xyz_joint = Joint {
            bone: BoneId(0),
            order: RotationOrder::Xyz,
            rotation_min: limits_min,
            rotation_max: limits_max,
        };
        let yxz_joint = Joint {
            bone: BoneId(0),
            order: RotationOrder::Yxz,
            rotation_min: limits_min,
            rotation_max: limits_max,
        };

        let under_xyz = xyz_joint.constrain(&q);
        let under_yxz = yxz_joint.constrain(&q);

        assert_relative_eq!(q.angle_to(&under_xyz), 0.0, epsilon = 1e-5);
        assert!(q.angle_to(&under_yxz) > 1e-3);
    }

    // ---- errors ----

    #[test]
    fn error_display_messages() {
        let e = ResolveError::UnknownBone("LeftHand".into());
        assert_eq!(e.to_string(), "unknown bone: LeftHand");

        let e = ResolveError::EmptyChain {
            effector: "Neck".into(),
        };
        assert_eq!(e.to_string(), "chain with effector Neck has no joints");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<ResolveError>();
    }
}
