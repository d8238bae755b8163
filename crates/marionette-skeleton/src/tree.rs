//! Flat bone-hierarchy storage with cached world transforms.
//!
//! Bones live in a `Vec`, parents always at a lower index than their
//! children (enforced by construction), with a name map for identifier
//! lookup. World isometries are cached and refreshed either for a whole
//! subtree via [`Skeleton::propagate`] or for the full tree via
//! [`BoneTree::refresh`].

use std::collections::HashMap;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::traits::{BoneId, Skeleton};

/// Errors that can occur while building a [`BoneTree`].
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A bone with this name already exists.
    #[error("duplicate bone name: {0}")]
    DuplicateBone(String),

    /// The given parent handle does not refer to a bone in this tree.
    #[error("unknown parent for bone {bone}")]
    UnknownParent { bone: String },
}

#[derive(Debug, Clone)]
struct Bone {
    name: String,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    local_translation: Vector3<f64>,
    local_rotation: UnitQuaternion<f64>,
    world: Isometry3<f64>,
}

impl Bone {
    fn local_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.local_translation), self.local_rotation)
    }
}

/// A concrete bone hierarchy implementing [`Skeleton`].
#[derive(Debug, Clone, Default)]
pub struct BoneTree {
    bones: Vec<Bone>,
    names: HashMap<String, BoneId>,
}

impl BoneTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bone under `parent` (or as a root), at `translation` in the
    /// parent's space, with identity local rotation. The world transform
    /// is computed immediately.
    ///
    /// # Errors
    ///
    /// [`TreeError::DuplicateBone`] if the name is taken,
    /// [`TreeError::UnknownParent`] if `parent` is not in this tree.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
        translation: Vector3<f64>,
    ) -> Result<BoneId, TreeError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(TreeError::DuplicateBone(name));
        }
        if let Some(p) = parent {
            if p.index() >= self.bones.len() {
                return Err(TreeError::UnknownParent { bone: name });
            }
        }

        let id = BoneId(self.bones.len() as u32);
        let parent_world = match parent {
            Some(p) => self.bones[p.index()].world,
            None => Isometry3::identity(),
        };
        let bone = Bone {
            name: name.clone(),
            parent,
            children: Vec::new(),
            local_translation: translation,
            local_rotation: UnitQuaternion::identity(),
            world: parent_world
                * Isometry3::from_parts(Translation3::from(translation), UnitQuaternion::identity()),
        };
        self.bones.push(bone);
        self.names.insert(name, id);
        if let Some(p) = parent {
            self.bones[p.index()].children.push(id);
        }
        Ok(id)
    }

    /// Number of bones.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Whether the tree holds no bones.
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Name of a bone.
    pub fn name(&self, bone: BoneId) -> &str {
        &self.bones[bone.index()].name
    }

    /// Parent of a bone, if any.
    pub fn parent(&self, bone: BoneId) -> Option<BoneId> {
        self.bones[bone.index()].parent
    }

    /// Local translation of a bone in its parent's space.
    pub fn local_translation(&self, bone: BoneId) -> Vector3<f64> {
        self.bones[bone.index()].local_translation
    }

    /// Cached world isometry of a bone.
    pub fn world_isometry(&self, bone: BoneId) -> &Isometry3<f64> {
        &self.bones[bone.index()].world
    }

    /// Recompute every cached world transform from the local transforms.
    /// Parents precede children in storage, so a single in-order sweep
    /// suffices.
    pub fn refresh(&mut self) {
        for i in 0..self.bones.len() {
            self.recompute(BoneId(i as u32));
        }
    }

    fn recompute(&mut self, bone: BoneId) {
        let parent_world = match self.bones[bone.index()].parent {
            Some(p) => self.bones[p.index()].world,
            None => Isometry3::identity(),
        };
        let b = &mut self.bones[bone.index()];
        b.world = parent_world * b.local_isometry();
    }
}

impl Skeleton for BoneTree {
    fn bone(&self, name: &str) -> Option<BoneId> {
        self.names.get(name).copied()
    }

    fn world_position(&self, bone: BoneId) -> Vector3<f64> {
        self.bones[bone.index()].world.translation.vector
    }

    fn world_rotation(&self, bone: BoneId) -> UnitQuaternion<f64> {
        self.bones[bone.index()].world.rotation
    }

    fn local_rotation(&self, bone: BoneId) -> UnitQuaternion<f64> {
        self.bones[bone.index()].local_rotation
    }

    fn set_local_rotation(&mut self, bone: BoneId, rotation: UnitQuaternion<f64>) {
        self.bones[bone.index()].local_rotation = rotation;
    }

    fn propagate(&mut self, bone: BoneId) {
        self.recompute(bone);
        let mut i = 0;
        while i < self.bones[bone.index()].children.len() {
            let child = self.bones[bone.index()].children[i];
            self.propagate(child);
            i += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
