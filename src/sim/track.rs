//! Track geometry
//!
//! Closed profile curves (straight edges joined by circular fillets) are
//! extruded into thin slabs and laid flat on the XZ ground plane. Only the
//! bounding volumes of the resulting vertices are used for boundary queries;
//! the curves themselves are never consulted after construction.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::bounds::{BoundaryOracle, BoundaryVerdict, BoundsCheck, BoundsError, RegionBounds};
use crate::config::{Bevel, ConfigError, TrackConfig, TrackKind};
use crate::{normalize_angle, polar_to_cartesian};

/// A circular corner fillet, counter-clockwise from `theta_start` to `theta_end`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fillet {
    pub center: Vec2,
    pub radius: f32,
    /// Start angle (radians, normalized to [-π, π))
    pub theta_start: f32,
    /// End angle (radians, normalized to [-π, π))
    pub theta_end: f32,
}

impl Fillet {
    pub fn new(center: Vec2, radius: f32, theta_start: f32, theta_end: f32) -> Self {
        Self {
            center,
            radius,
            theta_start: normalize_angle(theta_start),
            theta_end: normalize_angle(theta_end),
        }
    }

    /// Angular span of the arc (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.theta_end - self.theta_start;
        if span < 0.0 {
            span += std::f32::consts::TAU;
        }
        span
    }

    /// Sample `segments + 1` points along the arc, endpoints included
    pub fn sample(&self, segments: u32) -> Vec<Vec2> {
        if self.radius <= 0.0 {
            return vec![self.center];
        }
        let span = self.angular_span();
        let segments = segments.max(1);

        (0..=segments)
            .map(|i| {
                let t = i as f32 / segments as f32;
                let theta = self.theta_start + t * span;
                self.center + polar_to_cartesian(self.radius, theta)
            })
            .collect()
    }
}

/// Closed outline in the sketch plane, counter-clockwise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    points: Vec<Vec2>,
}

impl Profile {
    pub fn from_points(points: Vec<Vec2>) -> Self {
        let mut profile = Self { points };
        profile.dedup();
        if profile.signed_area() < 0.0 {
            profile.points.reverse();
        }
        profile
    }

    /// Axis-aligned rectangle with its lower-left corner at `origin`
    pub fn rect(origin: Vec2, width: f32, height: f32) -> Self {
        Self::from_points(vec![
            origin,
            origin + Vec2::new(width, 0.0),
            origin + Vec2::new(width, height),
            origin + Vec2::new(0.0, height),
        ])
    }

    /// Rectangle whose four corners are replaced by fillets of `radius`
    pub fn rounded_rect(
        origin: Vec2,
        width: f32,
        height: f32,
        radius: f32,
        arc_segments: u32,
    ) -> Self {
        use std::f32::consts::{FRAC_PI_2, PI};

        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        let (x0, y0) = (origin.x, origin.y);
        let (x1, y1) = (origin.x + width, origin.y + height);

        // Bottom-right, top-right, top-left, bottom-left; each picks up where
        // the previous straight edge ends
        let corners = [
            Fillet::new(Vec2::new(x1 - r, y0 + r), r, -FRAC_PI_2, 0.0),
            Fillet::new(Vec2::new(x1 - r, y1 - r), r, 0.0, FRAC_PI_2),
            Fillet::new(Vec2::new(x0 + r, y1 - r), r, FRAC_PI_2, PI),
            Fillet::new(Vec2::new(x0 + r, y0 + r), r, PI, PI * 1.5),
        ];

        let points = corners
            .iter()
            .flat_map(|corner| {
                if r > 0.0 {
                    corner.sample(arc_segments)
                } else {
                    vec![corner.center]
                }
            })
            .collect();

        Self::from_points(points)
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area; positive for counter-clockwise outlines
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f32>()
            * 0.5
    }

    /// Outline pushed outward by `distance`, mitering at each vertex
    pub fn offset(&self, distance: f32) -> Self {
        let n = self.points.len();
        if n < 3 || distance == 0.0 {
            return self.clone();
        }

        let outward = |a: Vec2, b: Vec2| {
            let edge = (b - a).normalize_or_zero();
            Vec2::new(edge.y, -edge.x)
        };

        let points = (0..n)
            .map(|i| {
                let prev = self.points[(i + n - 1) % n];
                let here = self.points[i];
                let next = self.points[(i + 1) % n];
                let n1 = outward(prev, here);
                let n2 = outward(here, next);
                let miter = (n1 + n2).normalize_or_zero();
                let cos = miter.dot(n1);
                if cos <= f32::EPSILON {
                    here + n1 * distance
                } else {
                    here + miter * (distance / cos)
                }
            })
            .collect();

        Self { points }
    }

    fn dedup(&mut self) {
        self.points.dedup_by(|a, b| a.distance_squared(*b) < 1e-10);
        let n = self.points.len();
        if n > 1 && self.points[n - 1].distance_squared(self.points[0]) < 1e-10 {
            self.points.pop();
        }
    }
}

/// Lay a sketch-plane point at extrusion height `z` onto the ground plane
/// (a -90° turn about X: sketch Y runs along world -Z, extrusion along +Y)
#[inline]
fn to_ground(p: Vec2, z: f32) -> Vec3 {
    Vec3::new(p.x, z, -p.y)
}

/// Extrude a profile by `depth` (may be negative) and return its vertices on
/// the ground plane. A bevel widens the side walls by `size` and pushes the
/// caps out by `thickness`.
pub fn extrude(profile: &Profile, depth: f32, bevel: Option<Bevel>) -> Vec<Vec3> {
    if profile.is_empty() {
        return Vec::new();
    }

    let mut rings: Vec<(Profile, f32)> = Vec::with_capacity(4);
    match bevel {
        Some(bevel) => {
            let (lo, hi) = if depth < 0.0 { (depth, 0.0) } else { (0.0, depth) };
            let walls = profile.offset(bevel.size);
            rings.push((profile.clone(), lo - bevel.thickness));
            rings.push((walls.clone(), lo));
            rings.push((walls, hi));
            rings.push((profile.clone(), hi + bevel.thickness));
        }
        None => {
            rings.push((profile.clone(), 0.0));
            rings.push((profile.clone(), depth));
        }
    }

    rings
        .iter()
        .flat_map(|(ring, z)| ring.points().iter().map(move |p| to_ground(*p, *z)))
        .collect()
}

/// How a region takes part in boundary queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionRole {
    /// Driving here is allowed
    Drivable,
    /// Inside a drivable region, but discouraged (infield)
    Exclusion,
    /// Decoration only; never consulted
    Scenery,
}

/// A named slab of track geometry with precomputed bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub role: RegionRole,
    bounds: Option<RegionBounds>,
}

impl Region {
    /// Build from extruded vertices; no vertices means no bounds yet
    pub fn from_vertices(name: impl Into<String>, role: RegionRole, vertices: &[Vec3]) -> Self {
        Self {
            name: name.into(),
            role,
            bounds: RegionBounds::from_points(vertices).ok(),
        }
    }

    pub fn extruded(
        name: impl Into<String>,
        role: RegionRole,
        profile: &Profile,
        depth: f32,
        bevel: Option<Bevel>,
    ) -> Self {
        Self::from_vertices(name, role, &extrude(profile, depth, bevel))
    }

    pub fn bounds(&self) -> Option<&RegionBounds> {
        self.bounds.as_ref()
    }

    pub fn contains(&self, p: Vec3) -> Result<bool, BoundsError> {
        self.bounds
            .as_ref()
            .map(|b| b.contains(p))
            .ok_or(BoundsError::GeometryNotReady)
    }
}

/// Static track description; immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub kind: TrackKind,
    regions: Vec<Region>,
}

impl Track {
    pub fn new(kind: TrackKind, regions: Vec<Region>) -> Self {
        Self { kind, regions }
    }

    pub fn from_config(config: &TrackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let track = match config.kind {
            TrackKind::StreetLoop => Self::street_loop(config),
            TrackKind::Layout => Self::layout(config),
        };
        log::info!(
            "Built {} track with {} regions",
            track.kind.as_str(),
            track.regions.len()
        );
        Ok(track)
    }

    /// Rounded street around an inset infield, centred on the origin
    fn street_loop(config: &TrackConfig) -> Self {
        let size = config.loop_size;
        let width = config.street_width;
        let half = size / 2.0;

        let outer = Profile::rounded_rect(
            Vec2::splat(-half),
            size,
            size,
            config.corner_radius,
            config.arc_segments,
        );
        let inner = Profile::rounded_rect(
            Vec2::splat(-half + width),
            size - 2.0 * width,
            size - 2.0 * width,
            config.inner_corner_radius,
            config.arc_segments,
        );

        Self::new(
            TrackKind::StreetLoop,
            vec![
                Region::extruded(
                    "street",
                    RegionRole::Drivable,
                    &outer,
                    config.street_depth,
                    config.bevel,
                ),
                Region::extruded(
                    "infield",
                    RegionRole::Exclusion,
                    &inner,
                    config.street_inner_depth,
                    config.bevel,
                ),
            ],
        )
    }

    /// Concentric squares: both the infield and the boundary band are drivable
    fn layout(config: &TrackConfig) -> Self {
        let size = config.layout_size;
        let square = |scale: f32| {
            let side = scale * size;
            Profile::rect(Vec2::splat(-side / 2.0), side, side)
        };

        Self::new(
            TrackKind::Layout,
            vec![
                Region::extruded(
                    "infield",
                    RegionRole::Drivable,
                    &square(1.0),
                    config.layout_depth,
                    config.bevel,
                ),
                Region::extruded(
                    "boundary",
                    RegionRole::Drivable,
                    &square(2.0),
                    config.boundary_depth,
                    config.bevel,
                ),
                Region::extruded(
                    "outerside",
                    RegionRole::Scenery,
                    &square(3.0),
                    config.outerside_depth,
                    None,
                ),
            ],
        )
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    fn any_contains(&self, role: RegionRole, p: Vec3) -> Result<bool, BoundsError> {
        let mut found = false;
        for region in self.regions.iter().filter(|r| r.role == role) {
            found |= region.contains(p)?;
        }
        Ok(found)
    }

    /// Two-flag form of [`BoundaryOracle::classify`]
    pub fn check_bounds(&self, p: Vec3) -> Result<BoundsCheck, BoundsError> {
        if !p.is_finite() {
            return Err(BoundsError::NonFinitePosition);
        }
        Ok(BoundsCheck {
            within_outer: self.any_contains(RegionRole::Drivable, p)?,
            within_inner: self.any_contains(RegionRole::Exclusion, p)?,
        })
    }
}

impl BoundaryOracle for Track {
    fn classify(&self, position: Vec3) -> Result<BoundaryVerdict, BoundsError> {
        Ok(self.check_bounds(position)?.verdict())
    }
}
