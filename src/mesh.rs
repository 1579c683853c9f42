// src/mesh.rs - Glove models driven by the pose applier
use crate::skeleton::{HandSide, JointName, RootTransform, Rotation};
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

// Anything with a named joint list whose pose can be driven per joint.
pub trait RenderableMesh {
    fn joint_names(&self) -> &[String];
    fn set_root_transform(&mut self, transform: RootTransform);
    fn set_joint_rotation(&mut self, index: usize, rotation: Rotation);
    fn set_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone)]
pub struct GloveMesh {
    name: String,
    joint_names: Vec<String>,
    root_transform: RootTransform,
    joint_rotations: Vec<Rotation>,
    visible: bool,
}

impl GloveMesh {
    pub fn new(name: impl Into<String>, joint_names: Vec<String>) -> Self {
        let joint_rotations = vec![Rotation::identity(); joint_names.len()];
        Self {
            name: name.into(),
            joint_names,
            root_transform: RootTransform::identity(),
            joint_rotations,
            visible: false,
        }
    }

    // Glove rigged with the standard hierarchical hand joint names.
    pub fn standard(name: impl Into<String>, side: HandSide) -> Self {
        Self::new(name, standard_joint_names(side).to_vec())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_transform(&self) -> &RootTransform {
        &self.root_transform
    }

    pub fn joint_rotations(&self) -> &[Rotation] {
        &self.joint_rotations
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn into_shared(self) -> SharedMesh {
        Arc::new(Mutex::new(self))
    }
}

impl RenderableMesh for GloveMesh {
    fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    fn set_root_transform(&mut self, transform: RootTransform) {
        self.root_transform = transform;
    }

    fn set_joint_rotation(&mut self, index: usize, rotation: Rotation) {
        if let Some(slot) = self.joint_rotations.get_mut(index) {
            *slot = rotation;
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

// Handle shared between the pose applier and a renderer reading on its own schedule.
pub type SharedMesh = Arc<Mutex<GloveMesh>>;

// Mesh bound to the applier, keeping its joint names so reads don't need the lock.
pub struct SharedGlove {
    mesh: SharedMesh,
    joint_names: Vec<String>,
}

impl SharedGlove {
    pub fn new(mesh: SharedMesh) -> Self {
        let joint_names = match mesh.lock() {
            Ok(guard) => guard.joint_names.clone(),
            Err(poisoned) => poisoned.into_inner().joint_names.clone(),
        };
        Self { mesh, joint_names }
    }

    fn with_mesh(&self, func: impl FnOnce(&mut GloveMesh)) {
        match self.mesh.lock() {
            Ok(mut guard) => func(&mut *guard),
            Err(poisoned) => func(&mut *poisoned.into_inner()),
        }
    }
}

impl RenderableMesh for SharedGlove {
    fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    fn set_root_transform(&mut self, transform: RootTransform) {
        self.with_mesh(|mesh| mesh.set_root_transform(transform));
    }

    fn set_joint_rotation(&mut self, index: usize, rotation: Rotation) {
        self.with_mesh(|mesh| mesh.set_joint_rotation(index, rotation));
    }

    fn set_visible(&mut self, visible: bool) {
        self.with_mesh(|mesh| mesh.set_visible(visible));
    }
}

static LEFT_JOINT_NAMES: Lazy<Vec<String>> = Lazy::new(|| build_joint_names(HandSide::Left));
static RIGHT_JOINT_NAMES: Lazy<Vec<String>> = Lazy::new(|| build_joint_names(HandSide::Right));

pub fn standard_joint_names(side: HandSide) -> &'static [String] {
    match side {
        HandSide::Left => LEFT_JOINT_NAMES.as_slice(),
        HandSide::Right => RIGHT_JOINT_NAMES.as_slice(),
    }
}

// Each finger joint sits under the previous one of the same finger, fingers under the wrist.
fn build_joint_names(side: HandSide) -> Vec<String> {
    let forearm = format!("root/{}", JointName::ForearmArm.pattern(side));
    let twist = format!("{}/{}", forearm, JointName::ForearmWrist.pattern(side));
    let wrist = format!("{}/{}", twist, JointName::Wrist.pattern(side));

    let mut names = Vec::with_capacity(JointName::ALL.len());
    let mut chain = wrist.clone();

    for joint in JointName::ALL {
        let path = match joint {
            JointName::Wrist => wrist.clone(),
            JointName::ForearmArm => forearm.clone(),
            JointName::ForearmWrist => twist.clone(),
            JointName::ThumbKnuckle
            | JointName::IndexFingerMetacarpal
            | JointName::MiddleFingerMetacarpal
            | JointName::RingFingerMetacarpal
            | JointName::LittleFingerMetacarpal => {
                chain = format!("{}/{}", wrist, joint.pattern(side));
                chain.clone()
            }
            _ => {
                chain = format!("{}/{}", chain, joint.pattern(side));
                chain.clone()
            }
        };
        names.push(path);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::JOINT_COUNT;
    use nalgebra::Vector3;

    #[test]
    fn test_new_glove_is_hidden_at_rest() {
        let glove = GloveMesh::new("glove", vec!["a".into(), "b".into()]);
        assert!(!glove.is_visible());
        assert_eq!(glove.joint_rotations().len(), 2);
        assert_eq!(*glove.root_transform(), RootTransform::identity());
    }

    #[test]
    fn test_out_of_range_rotation_is_ignored() {
        let mut glove = GloveMesh::new("glove", vec!["a".into()]);
        let rotation = Rotation::from_axis_angle(&Vector3::x_axis(), 0.5);
        glove.set_joint_rotation(3, rotation);
        assert_eq!(glove.joint_rotations(), &[Rotation::identity()]);
    }

    #[test]
    fn test_standard_names_cover_skeleton() {
        for side in HandSide::BOTH {
            let names = standard_joint_names(side);
            assert_eq!(names.len(), JOINT_COUNT);
            assert!(names[0].starts_with("root/"));
            assert!(names[0].ends_with(&format!("/{}_hand_joint", side)));
            assert!(names[9].ends_with(&format!(
                "{0}_handIndex_3_joint/{0}_handIndexEnd_joint",
                side
            )));
        }
    }

    #[test]
    fn test_shared_glove_writes_through() {
        let shared = GloveMesh::standard("LeftGlove", HandSide::Left).into_shared();
        let mut glove = SharedGlove::new(Arc::clone(&shared));
        assert_eq!(glove.joint_names().len(), JOINT_COUNT);

        glove.set_visible(true);
        glove.set_joint_rotation(1, Rotation::from_axis_angle(&Vector3::z_axis(), 1.0));

        let mesh = shared.lock().unwrap();
        assert!(mesh.is_visible());
        assert_ne!(mesh.joint_rotations()[1], Rotation::identity());
    }
}
