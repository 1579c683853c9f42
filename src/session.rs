// src/session.rs - Wires assets, a tracking source and the pose applier together
use crate::applier::{ApplyStats, PoseApplier};
use crate::assets::{load_glove, AssetLoader};
use crate::config::RetargetConfig;
use crate::data::FrameLog;
use crate::mesh::{SharedGlove, SharedMesh};
use crate::skeleton::HandSide;
use crate::error::RetargetError;
use crate::tracking::{AuthorizationStatus, TrackingSource};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub left_bound: bool,
    pub right_bound: bool,
    pub tracking_started: bool,
    pub stats: ApplyStats,
}

pub struct HandSession {
    applier: PoseApplier,
    left: Option<SharedMesh>,
    right: Option<SharedMesh>,
    channel_capacity: usize,
}

impl HandSession {
    // Loads and binds both gloves. A glove that fails to load leaves its hand unbound.
    pub fn new(config: &RetargetConfig, loader: &dyn AssetLoader) -> Self {
        let mut session = Self {
            applier: PoseApplier::new(config.matching_mode),
            left: None,
            right: None,
            channel_capacity: config.update_channel_capacity,
        };

        session.left = session.bind_glove(loader, HandSide::Left, &config.left_glove);
        session.right = session.bind_glove(loader, HandSide::Right, &config.right_glove);
        session
    }

    fn bind_glove(
        &mut self,
        loader: &dyn AssetLoader,
        side: HandSide,
        identifier: &str,
    ) -> Option<SharedMesh> {
        let glove = load_glove(loader, identifier)?.into_shared();
        // bind() logs its own rejection.
        self.applier
            .bind(side, SharedGlove::new(glove.clone()))
            .ok()
            .map(|_| glove)
    }

    // Renderer-side handle to a hand's glove, if one is bound.
    pub fn glove(&self, side: HandSide) -> Option<SharedMesh> {
        match side {
            HandSide::Left => self.left.clone(),
            HandSide::Right => self.right.clone(),
        }
    }

    pub async fn run(
        &mut self,
        source: &mut dyn TrackingSource,
        cancel: watch::Receiver<bool>,
        mut frame_log: Option<&mut FrameLog>,
    ) -> SessionSummary {
        let mut summary = SessionSummary {
            left_bound: self.applier.is_bound(HandSide::Left),
            right_bound: self.applier.is_bound(HandSide::Right),
            ..Default::default()
        };

        if source.authorization_status() == AuthorizationStatus::Denied {
            error!("Failed to start hand tracking: {}", RetargetError::AuthorizationDenied);
            return summary;
        }

        let updates = match source.start(self.channel_capacity) {
            Ok(updates) => updates,
            Err(e) => {
                error!("Failed to start hand tracking: {}", e);
                return summary;
            }
        };
        summary.tracking_started = true;
        info!(
            "Hand tracking running (left glove: {}, right glove: {})",
            summary.left_bound, summary.right_bound
        );

        summary.stats = self
            .applier
            .run(updates, cancel, |update, outcome| {
                if let Some(log) = frame_log.as_deref_mut() {
                    log.record(update, outcome);
                }
            })
            .await;

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryAssets;
    use crate::skeleton::Rotation;
    use crate::tracking::{
        AuthorizationMonitor, DataProvider, SimulatedHandTracker, SimulationConfig, TrackingEvent,
    };

    fn simulated_with(monitor: &AuthorizationMonitor, frames: usize) -> SimulatedHandTracker {
        SimulatedHandTracker::new(
            SimulationConfig {
                rate_hz: 0.0,
                frame_limit: Some(frames),
                ..Default::default()
            },
            monitor.subscribe(),
        )
    }

    fn simulated(frames: usize) -> SimulatedHandTracker {
        simulated_with(&AuthorizationMonitor::new(AuthorizationStatus::Allowed), frames)
    }

    #[tokio::test]
    async fn test_session_drives_both_gloves() {
        let config = RetargetConfig::default();
        let assets = InMemoryAssets::with_standard_gloves("LeftGlove", "RightGlove");
        let mut session = HandSession::new(&config, &assets);
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let mut log = FrameLog::new("unused", Some("session".into()));

        let summary = session
            .run(&mut simulated(10), cancel_rx, Some(&mut log))
            .await;

        assert!(summary.left_bound && summary.right_bound && summary.tracking_started);
        assert_eq!(summary.stats.applied, 10);
        assert_eq!(log.len(), 10);

        let right = session.glove(HandSide::Right).unwrap();
        let mesh = right.lock().unwrap();
        assert!(mesh.is_visible());
        assert!(mesh.joint_rotations().iter().any(|r| *r != Rotation::identity()));
    }

    #[tokio::test]
    async fn test_missing_glove_leaves_hand_unbound() {
        let config = RetargetConfig::default();
        let mut assets = InMemoryAssets::with_standard_gloves("LeftGlove", "Unused");
        assets.insert("RightGlove", (0..19).map(|i| format!("j{}", i)).collect());
        let mut session = HandSession::new(&config, &assets);
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let summary = session.run(&mut simulated(6), cancel_rx, None).await;

        assert!(summary.left_bound);
        assert!(!summary.right_bound);
        assert!(session.glove(HandSide::Right).is_none());
        assert_eq!(summary.stats.applied, 3);
        assert_eq!(summary.stats.ignored, 3);
    }

    #[tokio::test]
    async fn test_denied_tracking_is_not_fatal() {
        let config = RetargetConfig::default();
        let assets = InMemoryAssets::with_standard_gloves("LeftGlove", "RightGlove");
        let mut session = HandSession::new(&config, &assets);
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let monitor = AuthorizationMonitor::new(AuthorizationStatus::Allowed);
        let mut source = simulated_with(&monitor, 10);

        // Revoked after the source was created; the session must see it at start.
        monitor.handle(&TrackingEvent::AuthorizationChanged {
            provider: DataProvider::HandTracking,
            status: AuthorizationStatus::Denied,
        });

        let summary = session.run(&mut source, cancel_rx, None).await;

        assert!(!summary.tracking_started);
        assert_eq!(summary.stats.total(), 0);
        assert!(!session.glove(HandSide::Left).unwrap().lock().unwrap().is_visible());
    }
}
