//! Driving and track configuration
//!
//! Validated once at construction; the tick never re-checks these values.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How throttle input treats the sign of the speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccelerationPolicy {
    /// Throttle adds to the magnitude and forces the sign of the held key
    #[default]
    ForceSign,
    /// Throttle adds to a signed accumulator that may cross zero in one step
    SignedAccumulator,
}

/// What happens when a tick would leave the drivable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryPolicy {
    /// Return to the pre-tick position and lose `bump_deceleration`
    #[default]
    Revert,
    /// Keep the tentative position, flip the decelerated speed and move back
    Bounce,
}

/// Which track geometry to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrackKind {
    /// Rounded-rectangle street around an infield
    #[default]
    StreetLoop,
    /// Concentric squares: infield, boundary band, scenery
    Layout,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::StreetLoop => "street",
            TrackKind::Layout => "layout",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "street" | "loop" | "street_loop" => Some(TrackKind::StreetLoop),
            "layout" => Some(TrackKind::Layout),
            _ => None,
        }
    }
}

/// Configuration errors, reported at construction time
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero (got {value:.3})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value:.3})")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} must be at most {max:.3} (got {value:.3})")]
    TooLarge {
        field: &'static str,
        max: f32,
        value: f32,
    },
    #[error("arc_segments must be at least 1")]
    NoArcSegments,
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if finite(field, value)? > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if finite(field, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn at_most(field: &'static str, value: f32, max: f32) -> Result<f32, ConfigError> {
    if value <= max {
        Ok(value)
    } else {
        Err(ConfigError::TooLarge { field, max, value })
    }
}

/// Vehicle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    // === Speed ===
    pub acceleration: f32,
    pub max_speed: f32,
    pub brake_deceleration: f32,
    pub friction: f32,
    pub acceleration_policy: AccelerationPolicy,

    // === Boundary response ===
    pub bump_deceleration: f32,
    pub inner_bump_deceleration: f32,
    pub boundary_policy: BoundaryPolicy,

    // === Steering ===
    /// Heading change per tick at low speed (radians)
    pub turn_step: f32,
    pub min_speed_to_turn: f32,
    /// |speed| above this counts as moving
    pub moving_threshold: f32,

    // === Spawn ===
    pub initial_position: Vec3,
    pub initial_yaw: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            max_speed: MAX_SPEED,
            brake_deceleration: BRAKE_DECELERATION,
            friction: FRICTION,
            acceleration_policy: AccelerationPolicy::ForceSign,

            bump_deceleration: BUMP_DECELERATION,
            inner_bump_deceleration: INNER_BUMP_DECELERATION,
            boundary_policy: BoundaryPolicy::Revert,

            turn_step: TURN_STEP,
            min_speed_to_turn: MIN_SPEED_TO_TURN,
            moving_threshold: MOVING_THRESHOLD,

            // Middle of the left straight of the default street loop
            initial_position: Vec3::new(-LOOP_SIZE / 2.0 + STREET_WIDTH / 2.0, 0.0, 0.0),
            initial_yaw: 0.0,
        }
    }
}

impl DriveConfig {
    /// Parse a (possibly partial) JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_speed = positive("max_speed", self.max_speed)?;
        positive("acceleration", self.acceleration)?;
        at_most("acceleration", self.acceleration, max_speed)?;
        non_negative("brake_deceleration", self.brake_deceleration)?;
        non_negative("friction", self.friction)?;
        non_negative("bump_deceleration", self.bump_deceleration)?;
        non_negative("inner_bump_deceleration", self.inner_bump_deceleration)?;
        positive("turn_step", self.turn_step)?;
        non_negative("min_speed_to_turn", self.min_speed_to_turn)?;
        non_negative("moving_threshold", self.moving_threshold)?;
        at_most("moving_threshold", self.moving_threshold, max_speed)?;
        finite("initial_position.x", self.initial_position.x)?;
        finite("initial_position.y", self.initial_position.y)?;
        finite("initial_position.z", self.initial_position.z)?;
        finite("initial_yaw", self.initial_yaw)?;
        Ok(())
    }
}

/// Extrusion bevel; grows the bounding volumes of a region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bevel {
    /// Extent along the extrusion axis, both caps
    pub thickness: f32,
    /// Extent in the profile plane
    pub size: f32,
}

impl Default for Bevel {
    fn default() -> Self {
        Self {
            thickness: BEVEL_THICKNESS,
            size: BEVEL_SIZE,
        }
    }
}

/// Track geometry parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub kind: TrackKind,

    // === Street loop ===
    pub loop_size: f32,
    pub street_width: f32,
    pub corner_radius: f32,
    pub inner_corner_radius: f32,
    pub street_depth: f32,
    pub street_inner_depth: f32,

    // === Layout ===
    pub layout_size: f32,
    pub layout_depth: f32,
    pub boundary_depth: f32,
    pub outerside_depth: f32,

    // === Extrusion ===
    pub bevel: Option<Bevel>,
    /// Line segments per corner fillet
    pub arc_segments: u32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            kind: TrackKind::StreetLoop,

            loop_size: LOOP_SIZE,
            street_width: STREET_WIDTH,
            corner_radius: CORNER_RADIUS,
            inner_corner_radius: INNER_CORNER_RADIUS,
            street_depth: STREET_DEPTH,
            street_inner_depth: STREET_INNER_DEPTH,

            layout_size: LAYOUT_SIZE,
            layout_depth: LAYOUT_DEPTH,
            boundary_depth: BOUNDARY_DEPTH,
            outerside_depth: OUTERSIDE_DEPTH,

            bevel: Some(Bevel::default()),
            arc_segments: ARC_SEGMENTS,
        }
    }
}

impl TrackConfig {
    /// Default dimensions for a given track kind
    pub fn for_kind(kind: TrackKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arc_segments == 0 {
            return Err(ConfigError::NoArcSegments);
        }
        if let Some(bevel) = self.bevel {
            non_negative("bevel.thickness", bevel.thickness)?;
            non_negative("bevel.size", bevel.size)?;
        }

        match self.kind {
            TrackKind::StreetLoop => {
                let size = positive("loop_size", self.loop_size)?;
                let width = positive("street_width", self.street_width)?;
                // The infield must keep a positive extent
                if width * 2.0 >= size {
                    return Err(ConfigError::TooLarge {
                        field: "street_width",
                        max: size / 2.0,
                        value: width,
                    });
                }
                let corner = non_negative("corner_radius", self.corner_radius)?;
                at_most("corner_radius", corner, size / 2.0)?;
                let inner = non_negative("inner_corner_radius", self.inner_corner_radius)?;
                at_most("inner_corner_radius", inner, size / 2.0 - width)?;
                finite("street_depth", self.street_depth)?;
                finite("street_inner_depth", self.street_inner_depth)?;
            }
            TrackKind::Layout => {
                positive("layout_size", self.layout_size)?;
                finite("layout_depth", self.layout_depth)?;
                finite("boundary_depth", self.boundary_depth)?;
                finite("outerside_depth", self.outerside_depth)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        DriveConfig::default().validate().unwrap();
        TrackConfig::default().validate().unwrap();
        TrackConfig::for_kind(TrackKind::Layout).validate().unwrap();
    }

    #[test]
    fn test_negative_max_speed_rejected() {
        let config = DriveConfig {
            max_speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "max_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let config = DriveConfig {
            friction: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "friction",
                ..
            })
        ));
    }

    #[test]
    fn test_street_wider_than_loop_rejected() {
        let config = TrackConfig {
            street_width: 150.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge {
                field: "street_width",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DriveConfig::from_json(r#"{ "max_speed": 1.0, "boundary_policy": "Bounce" }"#)
            .unwrap();
        assert_eq!(config.max_speed, 1.0);
        assert_eq!(config.boundary_policy, BoundaryPolicy::Bounce);
        assert_eq!(config.acceleration, ACCELERATION);
    }

    #[test]
    fn test_json_validation_runs() {
        let result = DriveConfig::from_json(r#"{ "max_speed": 0.0 }"#);
        assert!(matches!(result, Err(ConfigError::NotPositive { .. })));

        let result = TrackConfig::from_json("not json");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_track_kind_from_str() {
        assert_eq!(TrackKind::from_str("Layout"), Some(TrackKind::Layout));
        assert_eq!(TrackKind::from_str("street"), Some(TrackKind::StreetLoop));
        assert_eq!(TrackKind::from_str("oval"), None);
    }
}
