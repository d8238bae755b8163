//! Static IK configuration: pure data, no skeleton references.
//!
//! An [`IkConfig`] describes which bones participate in which chains, in
//! what order, and with what rotation limits. It is supplied once at
//! setup (from code or a TOML file) and stays immutable; binding it to a
//! live skeleton is the resolver's job, not this module's.

use std::collections::HashSet;
use std::f64::consts::{FRAC_PI_2, PI};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::euler::RotationOrder;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_iterations() -> u32 {
    8
}
const fn default_true() -> bool {
    true
}
const fn default_rotation_min() -> [f64; 3] {
    [-PI; 3]
}
const fn default_rotation_max() -> [f64; 3] {
    [PI; 3]
}

const AXES: [char; 3] = ['x', 'y', 'z'];

// ---------------------------------------------------------------------------
// JointConfig
// ---------------------------------------------------------------------------

/// One rotatable joint in a chain: bone identifier, Euler ordering, and
/// per-axis rotation limits in radians, each within `[-pi, pi]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointConfig {
    /// Bone identifier, resolved against the skeleton at bind time.
    pub bone: String,

    /// Euler axis ordering the limits are expressed in (default: `XYZ`).
    #[serde(default)]
    pub order: RotationOrder,

    /// Componentwise lower limits (default: fully free).
    #[serde(default = "default_rotation_min")]
    pub rotation_min: [f64; 3],

    /// Componentwise upper limits (default: fully free).
    #[serde(default = "default_rotation_max")]
    pub rotation_max: [f64; 3],
}

impl JointConfig {
    /// A joint with the full `[-pi, pi]` range on every axis.
    pub fn free(bone: impl Into<String>, order: RotationOrder) -> Self {
        Self {
            bone: bone.into(),
            order,
            rotation_min: default_rotation_min(),
            rotation_max: default_rotation_max(),
        }
    }

    /// A joint clamped to the zero rotation on every axis.
    pub fn locked(bone: impl Into<String>, order: RotationOrder) -> Self {
        Self {
            bone: bone.into(),
            order,
            rotation_min: [0.0; 3],
            rotation_max: [0.0; 3],
        }
    }
}

// ---------------------------------------------------------------------------
// ChainConfig
// ---------------------------------------------------------------------------

/// One IK chain: ordered joints (effector-adjacent first, root-most last)
/// plus the effector bone the chain drives toward its goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Bone whose world position should approach the goal.
    pub effector: String,

    /// Disabled chains are kept in the configuration but skipped at
    /// resolution time (default: enabled).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Joints from the effector's parent outward to the chain root.
    /// Serialized last: TOML wants plain values ahead of table arrays.
    pub joints: Vec<JointConfig>,
}

// ---------------------------------------------------------------------------
// IkConfig
// ---------------------------------------------------------------------------

/// Complete IK setup: the per-solve pass budget and every chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IkConfig {
    /// Maximum CCD passes per solve call (default: 8).
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// All chains, enabled or not.
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            chains: Vec::new(),
        }
    }
}

impl IkConfig {
    /// Validate configuration. Returns Err on the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        for chain in &self.chains {
            if chain.joints.is_empty() {
                return Err(ConfigError::EmptyChain {
                    effector: chain.effector.clone(),
                });
            }
            for joint in &chain.joints {
                for (i, axis) in AXES.into_iter().enumerate() {
                    let (min, max) = (joint.rotation_min[i], joint.rotation_max[i]);
                    for value in [min, max] {
                        if !(-PI..=PI).contains(&value) {
                            return Err(ConfigError::LimitOutOfRange {
                                bone: joint.bone.clone(),
                                axis,
                                value,
                            });
                        }
                    }
                    if min > max {
                        return Err(ConfigError::MinExceedsMax {
                            bone: joint.bone.clone(),
                            axis,
                            min,
                            max,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Load from a TOML file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.into(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Bone identifiers referenced by enabled chains (joints + effectors).
    pub fn referenced_bones(&self) -> HashSet<&str> {
        let mut bones = HashSet::new();
        for chain in self.chains.iter().filter(|c| c.enabled) {
            bones.insert(chain.effector.as_str());
            for joint in &chain.joints {
                bones.insert(joint.bone.as_str());
            }
        }
        bones
    }

    /// The stock humanoid arm setup.
    ///
    /// Hand chains drive the wrists through a hinge-limited lower arm and
    /// a half-free upper arm; elbow chains position the elbows through the
    /// upper arm alone. Spine and leg chains ship disabled so a host can
    /// toggle them on without touching solver code.
    pub fn humanoid() -> Self {
        let hinge = 0.1_f64.to_radians();

        let left_upper = JointConfig {
            bone: "LeftUpperArm".into(),
            order: RotationOrder::Zxy,
            rotation_min: [-FRAC_PI_2, -PI, -PI],
            rotation_max: [FRAC_PI_2, PI, PI],
        };
        let right_upper = JointConfig {
            bone: "RightUpperArm".into(),
            order: RotationOrder::Zxy,
            rotation_min: [-FRAC_PI_2, -PI, -PI],
            rotation_max: [FRAC_PI_2, PI, PI],
        };

        Self {
            iterations: default_iterations(),
            chains: vec![
                // Left shoulder -> hand
                ChainConfig {
                    joints: vec![
                        JointConfig {
                            bone: "LeftLowerArm".into(),
                            order: RotationOrder::Yzx,
                            rotation_min: [0.0, -PI, 0.0],
                            rotation_max: [0.0, -hinge, 0.0],
                        },
                        left_upper.clone(),
                    ],
                    effector: "LeftHand".into(),
                    enabled: true,
                },
                // Left shoulder -> elbow
                ChainConfig {
                    joints: vec![left_upper],
                    effector: "LeftLowerArm".into(),
                    enabled: true,
                },
                // Right shoulder -> hand
                ChainConfig {
                    joints: vec![
                        JointConfig {
                            bone: "RightLowerArm".into(),
                            order: RotationOrder::Yzx,
                            rotation_min: [0.0, hinge, 0.0],
                            rotation_max: [0.0, PI, 0.0],
                        },
                        right_upper.clone(),
                    ],
                    effector: "RightHand".into(),
                    enabled: true,
                },
                // Right shoulder -> elbow
                ChainConfig {
                    joints: vec![right_upper],
                    effector: "RightLowerArm".into(),
                    enabled: true,
                },
                // Hip -> head, off by default
                ChainConfig {
                    joints: vec![
                        JointConfig::free("Chest", RotationOrder::Xyz),
                        JointConfig::free("Spine", RotationOrder::Xyz),
                        JointConfig::free("Hips", RotationOrder::Xyz),
                    ],
                    effector: "Neck".into(),
                    enabled: false,
                },
                // Legs, off by default
                ChainConfig {
                    joints: vec![
                        JointConfig {
                            bone: "LeftLowerLeg".into(),
                            order: RotationOrder::Xyz,
                            rotation_min: [-PI, 0.0, 0.0],
                            rotation_max: [0.0, 0.0, 0.0],
                        },
                        JointConfig::free("LeftUpperLeg", RotationOrder::Xyz),
                    ],
                    effector: "LeftFoot".into(),
                    enabled: false,
                },
                ChainConfig {
                    joints: vec![
                        JointConfig {
                            bone: "RightLowerLeg".into(),
                            order: RotationOrder::Xyz,
                            rotation_min: [-PI, 0.0, 0.0],
                            rotation_max: [0.0, 0.0, 0.0],
                        },
                        JointConfig::free("RightUpperLeg", RotationOrder::Xyz),
                    ],
                    effector: "RightFoot".into(),
                    enabled: false,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
