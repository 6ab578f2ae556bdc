//! Bounding volumes and boundary verdicts
//!
//! A region counts as containing a point only when its box AND its sphere
//! both contain it. Boxes alone over-report around rounded corners.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a position against the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryVerdict {
    /// On the drivable surface
    OnTrack,
    /// Inside an exclusion zone such as the infield
    InInnerExclusion,
    /// Outside every drivable region
    OutOfBounds,
}

impl BoundaryVerdict {
    pub fn is_on_track(&self) -> bool {
        matches!(self, BoundaryVerdict::OnTrack)
    }
}

/// Legacy two-region answer: inside the outer bounds / inside the inner bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundsCheck {
    pub within_outer: bool,
    pub within_inner: bool,
}

impl BoundsCheck {
    pub fn verdict(&self) -> BoundaryVerdict {
        if !self.within_outer {
            BoundaryVerdict::OutOfBounds
        } else if self.within_inner {
            BoundaryVerdict::InInnerExclusion
        } else {
            BoundaryVerdict::OnTrack
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum BoundsError {
    #[error("track geometry has no bounds yet")]
    GeometryNotReady,
    #[error("position is not finite")]
    NonFinitePosition,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Inclusive on every face
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Grow by `amount` on each side along each axis
    pub fn expanded(&self, amount: Vec3) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }
}

/// Bounding sphere centred on the box centre, reaching the farthest point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let center = Aabb::from_points(points)?.center();
        let radius_sq = points
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max);
        Some(Self {
            center,
            radius: radius_sq.sqrt(),
        })
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Precomputed box + sphere for one region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub aabb: Aabb,
    pub sphere: BoundingSphere,
}

impl RegionBounds {
    pub fn from_points(points: &[Vec3]) -> Result<Self, BoundsError> {
        let aabb = Aabb::from_points(points).ok_or(BoundsError::GeometryNotReady)?;
        let sphere = BoundingSphere::from_points(points).ok_or(BoundsError::GeometryNotReady)?;
        Ok(Self { aabb, sphere })
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        self.aabb.contains(p) && self.sphere.contains(p)
    }
}

/// Anything that can classify a position against static track geometry
pub trait BoundaryOracle {
    fn classify(&self, position: Vec3) -> Result<BoundaryVerdict, BoundsError>;
}

impl<T: BoundaryOracle + ?Sized> BoundaryOracle for &T {
    fn classify(&self, position: Vec3) -> Result<BoundaryVerdict, BoundsError> {
        (**self).classify(position)
    }
}

/// A track that hasn't been built yet has no bounds
impl<T: BoundaryOracle> BoundaryOracle for Option<T> {
    fn classify(&self, position: Vec3) -> Result<BoundaryVerdict, BoundsError> {
        match self {
            Some(oracle) => oracle.classify(position),
            None => Err(BoundsError::GeometryNotReady),
        }
    }
}
