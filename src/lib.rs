// src/lib.rs
pub mod applier;
pub mod assets;
pub mod config;
pub mod data;
pub mod error;
pub mod mapping;
pub mod mesh;
pub mod session;
pub mod skeleton;
pub mod tracking;

pub use applier::{ApplyOutcome, ApplyStats, PoseApplier};
pub use error::RetargetError;
pub use mapping::{JointMap, MatchingMode};
pub use mesh::{GloveMesh, RenderableMesh, SharedMesh};
pub use skeleton::{AnchorUpdate, HandSide, JointName, JOINT_COUNT};
