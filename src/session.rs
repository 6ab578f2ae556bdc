//! Driving session
//!
//! Owns everything one run needs and exposes the host-facing surface: key
//! events in, frame deltas in, pose and moving flag out.

use crate::camera::FollowCamera;
use crate::config::{ConfigError, DriveConfig, TrackConfig};
use crate::sim::{
    ControlKey, ControlSet, FixedStep, InputSampler, Pose, PoseSource, TickReport, Track,
    VehicleState, tick,
};

#[derive(Debug, Clone)]
pub struct Session {
    config: DriveConfig,
    /// `None` until geometry is ready; ticks fail closed meanwhile
    track: Option<Track>,
    vehicle: VehicleState,
    input: InputSampler,
    clock: FixedStep,
    camera: FollowCamera,
    last_report: Option<TickReport>,
}

impl Session {
    pub fn new(drive: DriveConfig, track: &TrackConfig) -> Result<Self, ConfigError> {
        let track = Track::from_config(track)?;
        let mut session = Self::without_track(drive)?;
        session.track = Some(track);
        Ok(session)
    }

    /// Session whose track arrives later via [`Session::set_track`]
    pub fn without_track(drive: DriveConfig) -> Result<Self, ConfigError> {
        drive.validate()?;
        let vehicle = VehicleState::from_config(&drive);
        let camera = FollowCamera::framing(&vehicle);
        log::info!(
            "Session starting at {:?}, yaw {:.3}",
            vehicle.pose.position,
            vehicle.pose.yaw
        );
        Ok(Self {
            config: drive,
            track: None,
            vehicle,
            input: InputSampler::new(),
            clock: FixedStep::default(),
            camera,
            last_report: None,
        })
    }

    pub fn set_track(&mut self, track: Track) {
        self.track = Some(track);
    }

    // === Input ===

    pub fn key_down(&mut self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.input.key_up(key)
    }

    pub fn press(&mut self, key: ControlKey) {
        self.input.press(key);
    }

    pub fn release(&mut self, key: ControlKey) {
        self.input.release(key);
    }

    /// Focus lost: nothing stays held
    pub fn release_all(&mut self) {
        self.input.release_all();
    }

    // === Stepping ===

    /// Run exactly one simulation tick
    pub fn step(&mut self) -> TickReport {
        let controls = self.input.snapshot();
        let report = tick(&mut self.vehicle, controls, &self.track, &self.config);
        self.camera.update(&self.vehicle);
        self.last_report = Some(report);
        report
    }

    /// Feed a wall-clock frame delta (seconds); returns ticks run
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        let ticks = self.clock.advance(frame_dt);
        for _ in 0..ticks {
            self.step();
        }
        ticks
    }

    /// Back to the spawn pose, keys released
    pub fn reset(&mut self) {
        self.vehicle = VehicleState::from_config(&self.config);
        self.input.release_all();
        self.clock.reset();
        self.camera = FollowCamera::framing(&self.vehicle);
        self.last_report = None;
    }

    // === Read-only views ===

    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    pub fn pose(&self) -> Pose {
        self.vehicle.pose
    }

    pub fn speed(&self) -> f32 {
        self.vehicle.speed.current
    }

    /// Keys held right now
    pub fn held(&self) -> ControlSet {
        self.input.snapshot()
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }
}

impl PoseSource for Session {
    fn current_pose(&self) -> Pose {
        self.vehicle.pose
    }

    fn is_moving(&self) -> bool {
        self.vehicle.is_moving()
    }
}
