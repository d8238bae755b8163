//! The capability interface between the IK core and a host scene graph.

use nalgebra::{UnitQuaternion, Vector3};

/// Opaque handle to a bone within a skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoneId(pub u32);

impl BoneId {
    /// The handle as a storage index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What the IK core needs from a skeleton provider.
///
/// Implementations own the bone transforms; the solver mutates local
/// orientations through this trait and calls [`propagate`] after each
/// write so that descendant world transforms (the effector's included)
/// stay current within a solve pass.
///
/// World transforms are expected to be cached: the read methods must not
/// recompute the hierarchy, and writes must not implicitly propagate.
///
/// [`propagate`]: Skeleton::propagate
pub trait Skeleton {
    /// Look up a bone by identifier.
    fn bone(&self, name: &str) -> Option<BoneId>;

    /// World-space position of a bone.
    fn world_position(&self, bone: BoneId) -> Vector3<f64>;

    /// World-space orientation of a bone.
    fn world_rotation(&self, bone: BoneId) -> UnitQuaternion<f64>;

    /// Local orientation of a bone relative to its parent.
    fn local_rotation(&self, bone: BoneId) -> UnitQuaternion<f64>;

    /// Overwrite a bone's local orientation. Does not propagate.
    fn set_local_rotation(&mut self, bone: BoneId, rotation: UnitQuaternion<f64>);

    /// Recompute the world transforms of `bone` and all its descendants
    /// from their (unchanged) local transforms.
    fn propagate(&mut self, bone: BoneId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bone_id_round_trips_index() {
        assert_eq!(BoneId(7).index(), 7);
    }

    #[test]
    fn skeleton_is_object_safe() {
        fn _takes_dyn(_: &dyn Skeleton) {}
    }
}
