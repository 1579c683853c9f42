// src/skeleton.rs - Canonical hand skeleton shared by both hands
use nalgebra::{Matrix4, UnitQuaternion};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub type Rotation = UnitQuaternion<f32>;
pub type RootTransform = Matrix4<f32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub const BOTH: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    // Token used as the prefix of glove joint names.
    pub fn token(self) -> &'static str {
        match self {
            HandSide::Left => "left",
            HandSide::Right => "right",
        }
    }
}

impl fmt::Display for HandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// Joints reported by the hand tracking provider, in its enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointName {
    Wrist,
    ThumbKnuckle,
    ThumbIntermediateBase,
    ThumbIntermediateTip,
    ThumbTip,
    IndexFingerMetacarpal,
    IndexFingerKnuckle,
    IndexFingerIntermediateBase,
    IndexFingerIntermediateTip,
    IndexFingerTip,
    MiddleFingerMetacarpal,
    MiddleFingerKnuckle,
    MiddleFingerIntermediateBase,
    MiddleFingerIntermediateTip,
    MiddleFingerTip,
    RingFingerMetacarpal,
    RingFingerKnuckle,
    RingFingerIntermediateBase,
    RingFingerIntermediateTip,
    RingFingerTip,
    LittleFingerMetacarpal,
    LittleFingerKnuckle,
    LittleFingerIntermediateBase,
    LittleFingerIntermediateTip,
    LittleFingerTip,
    ForearmWrist,
    ForearmArm,
}

pub const JOINT_COUNT: usize = 27;

impl JointName {
    pub const ALL: [JointName; JOINT_COUNT] = [
        JointName::Wrist,
        JointName::ThumbKnuckle,
        JointName::ThumbIntermediateBase,
        JointName::ThumbIntermediateTip,
        JointName::ThumbTip,
        JointName::IndexFingerMetacarpal,
        JointName::IndexFingerKnuckle,
        JointName::IndexFingerIntermediateBase,
        JointName::IndexFingerIntermediateTip,
        JointName::IndexFingerTip,
        JointName::MiddleFingerMetacarpal,
        JointName::MiddleFingerKnuckle,
        JointName::MiddleFingerIntermediateBase,
        JointName::MiddleFingerIntermediateTip,
        JointName::MiddleFingerTip,
        JointName::RingFingerMetacarpal,
        JointName::RingFingerKnuckle,
        JointName::RingFingerIntermediateBase,
        JointName::RingFingerIntermediateTip,
        JointName::RingFingerTip,
        JointName::LittleFingerMetacarpal,
        JointName::LittleFingerKnuckle,
        JointName::LittleFingerIntermediateBase,
        JointName::LittleFingerIntermediateTip,
        JointName::LittleFingerTip,
        JointName::ForearmWrist,
        JointName::ForearmArm,
    ];

    // Glove joint name suffix, appended to `<side>_`.
    pub fn suffix(self) -> &'static str {
        match self {
            JointName::Wrist => "hand_joint",
            JointName::ForearmWrist => "hand_twist_2_joint",
            JointName::ForearmArm => "forearm_joint",

            JointName::ThumbKnuckle => "handThumbStart_joint",
            JointName::ThumbIntermediateBase => "handThumb_1_joint",
            JointName::ThumbIntermediateTip => "handThumb_2_joint",
            JointName::ThumbTip => "handThumbEnd_joint",

            JointName::IndexFingerMetacarpal => "handIndexStart_joint",
            JointName::IndexFingerKnuckle => "handIndex_1_joint",
            JointName::IndexFingerIntermediateBase => "handIndex_2_joint",
            JointName::IndexFingerIntermediateTip => "handIndex_3_joint",
            JointName::IndexFingerTip => "handIndexEnd_joint",

            JointName::MiddleFingerMetacarpal => "handMidStart_joint",
            JointName::MiddleFingerKnuckle => "handMid_1_joint",
            JointName::MiddleFingerIntermediateBase => "handMid_2_joint",
            JointName::MiddleFingerIntermediateTip => "handMid_3_joint",
            JointName::MiddleFingerTip => "handMidEnd_joint",

            JointName::RingFingerMetacarpal => "handRingStart_joint",
            JointName::RingFingerKnuckle => "handRing_1_joint",
            JointName::RingFingerIntermediateBase => "handRing_2_joint",
            JointName::RingFingerIntermediateTip => "handRing_3_joint",
            JointName::RingFingerTip => "handRingEnd_joint",

            JointName::LittleFingerMetacarpal => "handPinkyStart_joint",
            JointName::LittleFingerKnuckle => "handPinky_1_joint",
            JointName::LittleFingerIntermediateBase => "handPinky_2_joint",
            JointName::LittleFingerIntermediateTip => "handPinky_3_joint",
            JointName::LittleFingerTip => "handPinkyEnd_joint",
        }
    }

    // Full expected glove joint name for a hand, e.g. `right_handIndex_1_joint`.
    pub fn pattern(self, side: HandSide) -> String {
        format!("{}_{}", side.token(), self.suffix())
    }

    // Position in the tracking provider's enumeration order.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

// One hand's skeleton update as delivered by a tracking source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorUpdate {
    pub side: HandSide,
    pub tracked: bool,
    pub root_transform: RootTransform,
    pub joint_rotations: HashMap<JointName, Rotation>,
    pub timestamp: f64,
}

impl AnchorUpdate {
    pub fn untracked(side: HandSide, timestamp: f64) -> Self {
        Self {
            side,
            tracked: false,
            root_transform: RootTransform::identity(),
            joint_rotations: HashMap::new(),
            timestamp,
        }
    }
}
