// src/mapping.rs - Correspondence between the hand skeleton and glove joints
use crate::skeleton::{HandSide, JointName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    // Match glove joints by `<side>_<suffix>` name.
    #[default]
    ByName,
    // Glove joint `i` is the i-th joint of the tracking skeleton.
    ByPosition,
}

// Canonical joint -> glove joint index. Built once per bound glove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JointMap {
    indices: HashMap<JointName, usize>,
}

impl JointMap {
    pub fn build(joint_names: &[String], side: HandSide, mode: MatchingMode) -> Self {
        match mode {
            MatchingMode::ByName => Self::by_name(joint_names, side),
            MatchingMode::ByPosition => Self::by_position(joint_names),
        }
    }

    pub fn by_name(joint_names: &[String], side: HandSide) -> Self {
        let mut indices = HashMap::new();

        for joint in JointName::ALL {
            let pattern = joint.pattern(side);
            if let Some(index) = find_joint(joint_names, &pattern) {
                indices.insert(joint, index);
            }
        }

        Self { indices }
    }

    pub fn by_position(joint_names: &[String]) -> Self {
        let indices = JointName::ALL
            .iter()
            .filter(|joint| joint.ordinal() < joint_names.len())
            .map(|joint| (*joint, joint.ordinal()))
            .collect();

        Self { indices }
    }

    pub fn get(&self, joint: JointName) -> Option<usize> {
        self.indices.get(&joint).copied()
    }

    pub fn contains(&self, joint: JointName) -> bool {
        self.indices.contains_key(&joint)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn unmapped(&self) -> Vec<JointName> {
        JointName::ALL
            .iter()
            .copied()
            .filter(|joint| !self.contains(*joint))
            .collect()
    }
}

// Exact name, or the last segment of a `/`-separated joint path.
fn find_joint(joint_names: &[String], pattern: &str) -> Option<usize> {
    joint_names.iter().position(|name| {
        name == pattern
            || name
                .strip_suffix(pattern)
                .map_or(false, |prefix| prefix.ends_with('/'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_and_indexed_match() {
        let joints = names(&["right_hand_joint", "right_handIndex_1_joint"]);
        let map = JointMap::by_name(&joints, HandSide::Right);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(JointName::Wrist), Some(0));
        assert_eq!(map.get(JointName::IndexFingerKnuckle), Some(1));
    }

    #[test]
    fn test_path_prefix_is_ignored() {
        let joints = names(&[
            "root",
            "root/hips/spine/left_arm/left_hand_joint",
            "a/b/c/left_handIndex_1_joint",
        ]);
        let map = JointMap::by_name(&joints, HandSide::Left);

        assert_eq!(map.get(JointName::Wrist), Some(1));
        assert_eq!(map.get(JointName::IndexFingerKnuckle), Some(2));
    }

    #[test]
    fn test_suffix_without_separator_does_not_match() {
        let joints = names(&["xleft_hand_joint", "left_hand_joint_end"]);
        let map = JointMap::by_name(&joints, HandSide::Left);
        assert!(map.get(JointName::Wrist).is_none());
    }

    #[test]
    fn test_other_side_is_not_matched() {
        let joints = names(&["left_hand_joint"]);
        let map = JointMap::by_name(&joints, HandSide::Right);
        assert!(map.is_empty());
    }

    #[test]
    fn test_missing_joint_is_absent() {
        let joints = names(&["right_hand_joint"]);
        let map = JointMap::by_name(&joints, HandSide::Right);

        assert!(!map.contains(JointName::ThumbTip));
        assert_eq!(map.unmapped().len(), JointName::ALL.len() - 1);
    }

    #[test]
    fn test_first_match_wins() {
        let joints = names(&["a/right_hand_joint", "b/right_hand_joint"]);
        let map = JointMap::by_name(&joints, HandSide::Right);
        assert_eq!(map.get(JointName::Wrist), Some(0));
    }

    #[test]
    fn test_empty_names_give_empty_map() {
        assert!(JointMap::by_name(&[], HandSide::Left).is_empty());
        assert!(JointMap::by_position(&[]).is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let joints = names(&["x/left_handRing_2_joint", "left_forearm_joint", "other"]);
        let first = JointMap::build(&joints, HandSide::Left, MatchingMode::ByName);
        let second = JointMap::build(&joints, HandSide::Left, MatchingMode::ByName);
        assert_eq!(first, second);
        assert_eq!(first.get(JointName::RingFingerIntermediateBase), Some(0));
        assert_eq!(first.get(JointName::ForearmArm), Some(1));
    }

    #[test]
    fn test_by_position_follows_skeleton_order() {
        let joints = names(&["j0", "j1", "j2"]);
        let map = JointMap::build(&joints, HandSide::Left, MatchingMode::ByPosition);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(JointName::Wrist), Some(0));
        assert_eq!(map.get(JointName::ThumbKnuckle), Some(1));
        assert_eq!(map.get(JointName::ThumbIntermediateBase), Some(2));
        assert!(map.get(JointName::ThumbTip).is_none());
    }

    #[test]
    fn test_indices_within_joint_list() {
        let joints = names(&["q/right_handPinkyEnd_joint", "right_handThumbStart_joint"]);
        let map = JointMap::by_name(&joints, HandSide::Right);
        let indices: Vec<usize> = JointName::ALL.iter().filter_map(|j| map.get(*j)).collect();
        assert_eq!(indices.len(), 2);
        assert!(indices.iter().all(|index| *index < joints.len()));
    }
}
