// src/assets.rs - Glove model lookup with logged load failures
use crate::error::{Result, RetargetError};
use crate::mesh::{standard_joint_names, GloveMesh};
use crate::skeleton::HandSide;
use std::collections::HashMap;
use tracing::{debug, error, warn};

pub trait AssetLoader {
    fn load_mesh(&self, identifier: &str) -> Result<GloveMesh>;
}

// Loader over models already held in memory, keyed by identifier.
#[derive(Default)]
pub struct InMemoryAssets {
    meshes: HashMap<String, Vec<String>>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    // The standard left and right gloves under the given identifiers.
    pub fn with_standard_gloves(left: &str, right: &str) -> Self {
        let mut assets = Self::new();
        assets.insert(left, standard_joint_names(HandSide::Left).to_vec());
        assets.insert(right, standard_joint_names(HandSide::Right).to_vec());
        assets
    }

    pub fn insert(&mut self, identifier: impl Into<String>, joint_names: Vec<String>) {
        self.meshes.insert(identifier.into(), joint_names);
    }
}

impl AssetLoader for InMemoryAssets {
    fn load_mesh(&self, identifier: &str) -> Result<GloveMesh> {
        let joint_names = self
            .meshes
            .get(identifier)
            .ok_or_else(|| RetargetError::AssetNotFound(identifier.to_string()))?;

        if joint_names.is_empty() {
            return Err(RetargetError::AssetLoadFailure {
                identifier: identifier.to_string(),
                reason: "model has no skeleton".to_string(),
            });
        }

        Ok(GloveMesh::new(identifier, joint_names.clone()))
    }
}

// Failures are logged, never retried. Joint counts are checked when binding.
pub fn load_glove(loader: &dyn AssetLoader, identifier: &str) -> Option<GloveMesh> {
    match loader.load_mesh(identifier) {
        Ok(glove) => {
            debug!("Loaded glove model {}", glove.name());
            Some(glove)
        }
        Err(RetargetError::AssetNotFound(name)) => {
            warn!("Glove model not found: {}", name);
            None
        }
        Err(e) => {
            error!("Failed to load {}: {}", identifier, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::RenderableMesh;

    #[test]
    fn test_missing_asset_is_not_found() {
        let assets = InMemoryAssets::new();
        assert!(matches!(
            assets.load_mesh("LeftGlove"),
            Err(RetargetError::AssetNotFound(name)) if name == "LeftGlove"
        ));
        assert!(load_glove(&assets, "LeftGlove").is_none());
    }

    #[test]
    fn test_empty_skeleton_fails_to_load() {
        let mut assets = InMemoryAssets::new();
        assets.insert("Broken", Vec::new());
        assert!(matches!(
            assets.load_mesh("Broken"),
            Err(RetargetError::AssetLoadFailure { .. })
        ));
    }

    #[test]
    fn test_short_skeleton_loads_for_bind_to_judge() {
        let mut assets = InMemoryAssets::new();
        assets.insert("Mitten", (0..19).map(|i| format!("j{}", i)).collect());
        let glove = load_glove(&assets, "Mitten").unwrap();
        assert_eq!(glove.joint_names().len(), 19);
    }

    #[test]
    fn test_standard_gloves_load() {
        let assets = InMemoryAssets::with_standard_gloves("LeftGlove", "RightGlove");
        let glove = load_glove(&assets, "RightGlove").unwrap();
        assert_eq!(glove.name(), "RightGlove");
    }
}
