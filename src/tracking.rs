// src/tracking.rs - Hand tracking sources feeding the pose applier
use crate::error::{Result, RetargetError};
use crate::skeleton::{AnchorUpdate, HandSide, JointName, Rotation, RootTransform};
use nalgebra::{Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Allowed,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataProvider {
    HandTracking,
    WorldTracking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingEvent {
    AuthorizationChanged {
        provider: DataProvider,
        status: AuthorizationStatus,
    },
    DataProviderStopped(DataProvider),
}

// Something that streams hand anchor updates once started.
pub trait TrackingSource {
    fn authorization_status(&self) -> AuthorizationStatus;

    // Starts the session. The returned stream is ordered and has a single consumer.
    fn start(&mut self, capacity: usize) -> Result<mpsc::Receiver<AnchorUpdate>>;
}

// Keeps the latest hand tracking authorization status.
pub struct AuthorizationMonitor {
    status: watch::Sender<AuthorizationStatus>,
}

impl AuthorizationMonitor {
    pub fn new(initial: AuthorizationStatus) -> Self {
        let (status, _) = watch::channel(initial);
        Self { status }
    }

    pub fn status(&self) -> AuthorizationStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthorizationStatus> {
        self.status.subscribe()
    }

    pub fn handle(&self, event: &TrackingEvent) {
        if let TrackingEvent::AuthorizationChanged {
            provider: DataProvider::HandTracking,
            status,
        } = event
        {
            info!("Hand tracking authorization changed to {:?}", status);
            self.status.send_replace(*status);
        }
    }

    pub async fn observe(&self, mut events: mpsc::Receiver<TrackingEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(&event);
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub rate_hz: f64,
    pub frame_limit: Option<usize>,
    // Every Nth update of a hand reports it as untracked.
    pub dropout_every: Option<usize>,
    pub supported: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rate_hz: 90.0,
            frame_limit: None,
            dropout_every: None,
            supported: true,
        }
    }
}

// Hardware-free source producing both hands slowly opening and closing.
// Authorization comes from an `AuthorizationMonitor` subscription.
pub struct SimulatedHandTracker {
    config: SimulationConfig,
    authorization: watch::Receiver<AuthorizationStatus>,
    started: bool,
}

impl SimulatedHandTracker {
    pub fn new(
        config: SimulationConfig,
        authorization: watch::Receiver<AuthorizationStatus>,
    ) -> Self {
        Self {
            config,
            authorization,
            started: false,
        }
    }
}

impl TrackingSource for SimulatedHandTracker {
    fn authorization_status(&self) -> AuthorizationStatus {
        *self.authorization.borrow()
    }

    fn start(&mut self, capacity: usize) -> Result<mpsc::Receiver<AnchorUpdate>> {
        match self.authorization_status() {
            AuthorizationStatus::Allowed => {}
            AuthorizationStatus::Denied => return Err(RetargetError::AuthorizationDenied),
            AuthorizationStatus::NotDetermined => {
                return Err(RetargetError::SessionStartFailure(
                    "hand tracking authorization not determined".to_string(),
                ))
            }
        }
        if !self.config.supported {
            return Err(RetargetError::SessionStartFailure(
                "hand tracking is not supported on this device".to_string(),
            ));
        }
        if self.started {
            return Err(RetargetError::SessionStartFailure(
                "hand anchor updates already have a subscriber".to_string(),
            ));
        }
        self.started = true;

        let (tx, rx) = mpsc::channel(capacity.max(1));
        let mut frames = SimulatedFrames::new(self.config.rate_hz, self.config.dropout_every);
        let frame_limit = self.config.frame_limit;
        // Rates too high for a nonzero period run unpaced; interval() panics on zero.
        let period = (self.config.rate_hz > 0.0)
            .then(|| Duration::from_secs_f64(1.0 / self.config.rate_hz))
            .filter(|period| !period.is_zero());
        if period.is_none() && self.config.rate_hz > 0.0 {
            warn!(
                "Simulation rate {} Hz is too high to pace, producing updates unpaced",
                self.config.rate_hz
            );
        }

        tokio::spawn(async move {
            let mut interval = period.map(tokio::time::interval);
            let mut sent = 0usize;

            while frame_limit.map_or(true, |limit| sent < limit) {
                match interval.as_mut() {
                    Some(interval) => {
                        interval.tick().await;
                    }
                    None => tokio::task::yield_now().await,
                }

                if tx.send(frames.next_update()).await.is_err() {
                    debug!("Hand anchor subscriber dropped, stopping simulation");
                    return;
                }
                sent += 1;
            }
            debug!("Simulated hand tracking finished after {} updates", sent);
        });

        info!("Simulated hand tracking started at {:.0} Hz", self.config.rate_hz);
        Ok(rx)
    }
}

// Deterministic frame generator behind `SimulatedHandTracker`.
pub struct SimulatedFrames {
    dt: f64,
    frame: usize,
    dropout_every: Option<usize>,
    per_side: HashMap<HandSide, usize>,
}

impl SimulatedFrames {
    pub fn new(rate_hz: f64, dropout_every: Option<usize>) -> Self {
        let dt = if rate_hz > 0.0 { 1.0 / rate_hz } else { 1.0 / 90.0 };
        Self {
            dt,
            frame: 0,
            dropout_every,
            per_side: HashMap::new(),
        }
    }

    pub fn next_update(&mut self) -> AnchorUpdate {
        let side = if self.frame % 2 == 0 {
            HandSide::Left
        } else {
            HandSide::Right
        };
        // Both hands share a timestamp per left/right pair.
        let t = (self.frame / 2) as f64 * self.dt;
        self.frame += 1;

        let count = self.per_side.entry(side).or_insert(0);
        let side_frame = *count;
        *count += 1;

        let dropped = self
            .dropout_every
            .filter(|every| *every > 0)
            .map_or(false, |every| side_frame % every == every - 1);
        if dropped {
            return AnchorUpdate::untracked(side, t);
        }

        AnchorUpdate {
            side,
            tracked: true,
            root_transform: Self::root_transform(side, t),
            joint_rotations: Self::joint_rotations(side, t),
            timestamp: t,
        }
    }

    fn root_transform(side: HandSide, t: f64) -> RootTransform {
        let x = match side {
            HandSide::Left => -0.2,
            HandSide::Right => 0.2,
        };
        let sway = 0.05 * t.sin() as f32;
        Translation3::new(x + sway, 1.0 + 0.03 * (t * 0.5).cos() as f32, -0.4).to_homogeneous()
    }

    fn joint_rotations(side: HandSide, t: f64) -> HashMap<JointName, Rotation> {
        let phase = match side {
            HandSide::Left => 0.0,
            HandSide::Right => std::f64::consts::FRAC_PI_2,
        };
        // 0 = open hand, 1 = fist
        let curl = (0.5 * (1.0 + (t * 2.0 + phase).sin())) as f32;

        JointName::ALL
            .iter()
            .map(|joint| {
                let rotation = match joint {
                    JointName::Wrist | JointName::ForearmWrist | JointName::ForearmArm => {
                        UnitQuaternion::identity()
                    }
                    JointName::ThumbKnuckle
                    | JointName::ThumbIntermediateBase
                    | JointName::ThumbIntermediateTip
                    | JointName::ThumbTip => {
                        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.6 * curl)
                    }
                    JointName::IndexFingerMetacarpal
                    | JointName::MiddleFingerMetacarpal
                    | JointName::RingFingerMetacarpal
                    | JointName::LittleFingerMetacarpal => UnitQuaternion::identity(),
                    _ => UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 1.2 * curl),
                };
                (*joint, rotation)
            })
            .collect()
    }
}
