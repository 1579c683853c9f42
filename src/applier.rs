// src/applier.rs - Drives bound glove meshes from hand anchor updates
use crate::error::{Result, RetargetError};
use crate::mapping::{JointMap, MatchingMode};
use crate::mesh::RenderableMesh;
use crate::skeleton::{AnchorUpdate, HandSide, JOINT_COUNT};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApplyOutcome {
    // No glove bound for the update's hand.
    Ignored,
    // Hand not tracked; glove hidden with its last pose.
    Hidden,
    Applied { joints_written: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyStats {
    pub applied: usize,
    pub hidden: usize,
    pub ignored: usize,
}

impl ApplyStats {
    pub fn record(&mut self, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Ignored => self.ignored += 1,
            ApplyOutcome::Hidden => self.hidden += 1,
            ApplyOutcome::Applied { .. } => self.applied += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.applied + self.hidden + self.ignored
    }
}

struct BoundGlove {
    mesh: Box<dyn RenderableMesh + Send>,
    joints: JointMap,
}

pub struct PoseApplier {
    mode: MatchingMode,
    left: Option<BoundGlove>,
    right: Option<BoundGlove>,
}

impl PoseApplier {
    pub fn new(mode: MatchingMode) -> Self {
        Self {
            mode,
            left: None,
            right: None,
        }
    }

    // Binds a glove to a hand. Rejected when its joint count differs from the skeleton's.
    pub fn bind<M>(&mut self, side: HandSide, mesh: M) -> Result<&JointMap>
    where
        M: RenderableMesh + Send + 'static,
    {
        let actual = mesh.joint_names().len();
        if actual != JOINT_COUNT {
            let err = RetargetError::JointCountMismatch {
                side,
                expected: JOINT_COUNT,
                actual,
            };
            warn!("{}", err);
            return Err(err);
        }

        let joints = JointMap::build(mesh.joint_names(), side, self.mode);
        let unmapped = joints.unmapped();
        if !unmapped.is_empty() {
            debug!("{} glove leaves {} joints unmapped: {:?}", side, unmapped.len(), unmapped);
        }
        info!("Bound {} glove ({} of {} joints mapped)", side, joints.len(), JOINT_COUNT);

        let slot = self.slot_mut(side);
        let bound = slot.insert(BoundGlove {
            mesh: Box::new(mesh),
            joints,
        });
        Ok(&bound.joints)
    }

    pub fn is_bound(&self, side: HandSide) -> bool {
        self.slot(side).is_some()
    }

    pub fn apply(&mut self, update: &AnchorUpdate) -> ApplyOutcome {
        let Some(bound) = self.slot_mut(update.side).as_mut() else {
            return ApplyOutcome::Ignored;
        };

        bound.mesh.set_visible(update.tracked);
        if !update.tracked {
            return ApplyOutcome::Hidden;
        }

        bound.mesh.set_root_transform(update.root_transform);

        let mut joints_written = 0;
        for (joint, rotation) in &update.joint_rotations {
            let Some(index) = bound.joints.get(*joint) else {
                continue;
            };
            bound.mesh.set_joint_rotation(index, *rotation);
            joints_written += 1;
        }

        ApplyOutcome::Applied { joints_written }
    }

    // Applies updates in delivery order until the stream ends or `cancel` turns true.
    // Queued updates are dropped on cancellation; an update in progress always completes.
    pub async fn run<F>(
        &mut self,
        mut updates: mpsc::Receiver<AnchorUpdate>,
        mut cancel: watch::Receiver<bool>,
        mut on_update: F,
    ) -> ApplyStats
    where
        F: FnMut(&AnchorUpdate, ApplyOutcome),
    {
        let mut stats = ApplyStats::default();
        let mut cancel_open = true;

        loop {
            if *cancel.borrow() {
                debug!("Hand tracking loop cancelled");
                break;
            }

            tokio::select! {
                biased;

                changed = cancel.changed(), if cancel_open => {
                    if changed.is_err() {
                        // Sender gone, nobody can cancel any more.
                        cancel_open = false;
                    }
                }
                update = updates.recv() => {
                    let Some(update) = update else {
                        debug!("Hand anchor stream ended");
                        break;
                    };
                    let outcome = self.apply(&update);
                    stats.record(outcome);
                    on_update(&update, outcome);
                }
            }
        }

        info!(
            "Hand tracking loop finished: {} applied, {} hidden, {} ignored",
            stats.applied, stats.hidden, stats.ignored
        );
        stats
    }

    fn slot(&self, side: HandSide) -> Option<&BoundGlove> {
        match side {
            HandSide::Left => self.left.as_ref(),
            HandSide::Right => self.right.as_ref(),
        }
    }

    fn slot_mut(&mut self, side: HandSide) -> &mut Option<BoundGlove> {
        match side {
            HandSide::Left => &mut self.left,
            HandSide::Right => &mut self.right,
        }
    }
}
