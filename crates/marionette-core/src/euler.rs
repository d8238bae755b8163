//! Euler axis orderings and conversions to and from quaternions.
//!
//! Joint rotation limits are expressed as Euler angles, and each joint
//! fixes one of the six canonical axis orderings for its lifetime. The
//! convention is intrinsic: order `XYZ` composes `R = Rx * Ry * Rz`,
//! applied to column vectors, so the X rotation is the outermost.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Sine magnitude beyond which the middle angle is treated as gimbal-locked.
const GIMBAL_EPS: f64 = 0.999_99;

/// One of the six canonical Euler axis orderings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationOrder {
    #[default]
    #[serde(rename = "XYZ")]
    Xyz,
    #[serde(rename = "YZX")]
    Yzx,
    #[serde(rename = "ZXY")]
    Zxy,
    #[serde(rename = "XZY")]
    Xzy,
    #[serde(rename = "YXZ")]
    Yxz,
    #[serde(rename = "ZYX")]
    Zyx,
}

impl RotationOrder {
    /// All six orderings.
    pub const ALL: [Self; 6] = [
        Self::Xyz,
        Self::Yzx,
        Self::Zxy,
        Self::Xzy,
        Self::Yxz,
        Self::Zyx,
    ];

    /// Build a rotation from Euler angles under this ordering.
    ///
    /// `angles` holds the X, Y, and Z angles in radians regardless of the
    /// ordering; the ordering only controls composition.
    pub fn from_euler(self, angles: Vector3<f64>) -> UnitQuaternion<f64> {
        let qx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angles.x);
        let qy = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angles.y);
        let qz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angles.z);

        match self {
            Self::Xyz => qx * qy * qz,
            Self::Yzx => qy * qz * qx,
            Self::Zxy => qz * qx * qy,
            Self::Xzy => qx * qz * qy,
            Self::Yxz => qy * qx * qz,
            Self::Zyx => qz * qy * qx,
        }
    }

    /// Decompose a rotation into Euler angles under this ordering.
    ///
    /// At gimbal lock (middle angle at ±π/2) the decomposition is not
    /// unique; one outer angle is pinned to zero, the same resolution a
    /// scene graph's matrix extraction applies. Away from lock,
    /// `from_euler(to_euler(q)) == q` up to sign.
    pub fn to_euler(self, rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
        let rot = rotation.to_rotation_matrix();
        let m = rot.matrix();
        let (m11, m12, m13) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
        let (m21, m22, m23) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
        let (m31, m32, m33) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

        match self {
            Self::Xyz => {
                let y = m13.clamp(-1.0, 1.0).asin();
                if m13.abs() < GIMBAL_EPS {
                    Vector3::new((-m23).atan2(m33), y, (-m12).atan2(m11))
                } else {
                    Vector3::new(m32.atan2(m22), y, 0.0)
                }
            }
            Self::Yzx => {
                let z = m21.clamp(-1.0, 1.0).asin();
                if m21.abs() < GIMBAL_EPS {
                    Vector3::new((-m23).atan2(m22), (-m31).atan2(m11), z)
                } else {
                    Vector3::new(0.0, m13.atan2(m33), z)
                }
            }
            Self::Zxy => {
                let x = m32.clamp(-1.0, 1.0).asin();
                if m32.abs() < GIMBAL_EPS {
                    Vector3::new(x, (-m31).atan2(m33), (-m12).atan2(m22))
                } else {
                    Vector3::new(x, 0.0, m21.atan2(m11))
                }
            }
            Self::Xzy => {
                let z = (-m12.clamp(-1.0, 1.0)).asin();
                if m12.abs() < GIMBAL_EPS {
                    Vector3::new(m32.atan2(m22), m13.atan2(m11), z)
                } else {
                    Vector3::new((-m23).atan2(m33), 0.0, z)
                }
            }
            Self::Yxz => {
                let x = (-m23.clamp(-1.0, 1.0)).asin();
                if m23.abs() < GIMBAL_EPS {
                    Vector3::new(x, m13.atan2(m33), m21.atan2(m22))
                } else {
                    Vector3::new(x, (-m31).atan2(m11), 0.0)
                }
            }
            Self::Zyx => {
                let y = (-m31.clamp(-1.0, 1.0)).asin();
                if m31.abs() < GIMBAL_EPS {
                    Vector3::new(m32.atan2(m33), y, m21.atan2(m11))
                } else {
                    Vector3::new(0.0, y, (-m12).atan2(m22))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
