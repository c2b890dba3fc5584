//! Axis-aligned bounding boxes with indexed corners.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use nalgebra::Point3;

/// An axis-aligned box with the eight corners numbered the way hosts usually number them:
/// bit 0 selects the x max, bit 1 the y max, bit 2 the z max.
///
/// Corners 0, 2, 3, 1 therefore walk the floor rectangle of the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub aabb: Aabb,
}

impl BoundingBox {
    pub fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self {
            aabb: Aabb::new(mins, maxs),
        }
    }

    /// Smallest box holding every point; `None` for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<Real>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (mut mins, mut maxs) = (first, first);
        for p in iter {
            mins.x = mins.x.min(p.x);
            mins.y = mins.y.min(p.y);
            mins.z = mins.z.min(p.z);
            maxs.x = maxs.x.max(p.x);
            maxs.y = maxs.y.max(p.y);
            maxs.z = maxs.z.max(p.z);
        }
        Some(Self::new(mins, maxs))
    }

    #[inline]
    pub fn min(&self) -> Point3<Real> {
        self.aabb.mins
    }

    #[inline]
    pub fn max(&self) -> Point3<Real> {
        self.aabb.maxs
    }

    /// Corner `index` in `0..8`; higher bits are ignored.
    pub fn corner(&self, index: usize) -> Point3<Real> {
        let (mins, maxs) = (self.aabb.mins, self.aabb.maxs);
        Point3::new(
            if index & 1 == 0 { mins.x } else { maxs.x },
            if index & 2 == 0 { mins.y } else { maxs.y },
            if index & 4 == 0 { mins.z } else { maxs.z },
        )
    }

    pub fn corners(&self) -> [Point3<Real>; 8] {
        std::array::from_fn(|i| self.corner(i))
    }

    pub fn width(&self) -> Real {
        self.aabb.maxs.x - self.aabb.mins.x
    }

    pub fn depth(&self) -> Real {
        self.aabb.maxs.y - self.aabb.mins.y
    }

    /// Extent along Z.
    pub fn height(&self) -> Real {
        self.aabb.maxs.z - self.aabb.mins.z
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let corners = [self.min(), self.max(), other.min(), other.max()];
        // four points, never empty
        Self::from_points(corners.iter()).unwrap_or(*self)
    }

    /// Overlap test loosened by `eps` on every side.
    pub fn intersects(&self, other: &BoundingBox, eps: Real) -> bool {
        let (a, b) = (&self.aabb, &other.aabb);
        a.maxs.x + eps >= b.mins.x
            && a.mins.x - eps <= b.maxs.x
            && a.maxs.y + eps >= b.mins.y
            && a.mins.y - eps <= b.maxs.y
            && a.maxs.z + eps >= b.mins.z
            && a.mins.z - eps <= b.maxs.z
    }
}

impl From<Aabb> for BoundingBox {
    fn from(aabb: Aabb) -> Self {
        Self { aabb }
    }
}
