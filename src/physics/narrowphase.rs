//! Narrowphase collision detection: specialized 2D tests per shape pair.
//!
//! All tests take world-space shape centers and return a [`ContactInfo`]
//! whose normal points from shape A to shape B.

use glam::Vec2;

use crate::ecs::components::physics::ColliderShape;

use super::contact::ContactInfo;

/// Circle-circle intersection test.
pub fn circle_circle(radius_a: f32, center_a: Vec2, radius_b: f32, center_b: Vec2) -> Option<ContactInfo> {
    let d = center_b - center_a;
    let dist_sq = d.length_squared();
    let radius_sum = radius_a + radius_b;

    if dist_sq > radius_sum * radius_sum {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 { d / dist } else { Vec2::Y };
    let penetration = radius_sum - dist;

    Some(ContactInfo {
        normal,
        penetration,
        point: center_a + normal * (radius_a - penetration * 0.5),
    })
}

/// Axis-aligned rectangle intersection test (SAT on the two world axes).
pub fn rect_rect(half_a: Vec2, center_a: Vec2, half_b: Vec2, center_b: Vec2) -> Option<ContactInfo> {
    let d = center_b - center_a;
    let overlap = half_a + half_b - d.abs();

    if overlap.x < 0.0 || overlap.y < 0.0 {
        return None;
    }

    let (normal, penetration) = if overlap.x < overlap.y {
        (Vec2::new(sign_or_positive(d.x), 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, sign_or_positive(d.y)), overlap.y)
    };

    // Center of the overlap region
    let min = (center_a - half_a).max(center_b - half_b);
    let max = (center_a + half_a).min(center_b + half_b);

    Some(ContactInfo {
        normal,
        penetration,
        point: (min + max) * 0.5,
    })
}

/// Circle (A) against axis-aligned rectangle (B).
pub fn circle_rect(radius: f32, circle_center: Vec2, half: Vec2, rect_center: Vec2) -> Option<ContactInfo> {
    let local = circle_center - rect_center;
    let clamped = local.clamp(-half, half);

    if clamped == local {
        // Circle center inside the rectangle: push out through the nearest face
        let depth = half - local.abs();
        let (outward, face_depth) = if depth.x < depth.y {
            (Vec2::new(sign_or_positive(local.x), 0.0), depth.x)
        } else {
            (Vec2::new(0.0, sign_or_positive(local.y)), depth.y)
        };
        let face_point = rect_center + local - outward * face_depth;
        return Some(ContactInfo {
            normal: -outward,
            penetration: radius + face_depth,
            point: face_point,
        });
    }

    let diff = local - clamped;
    let dist_sq = diff.length_squared();
    if dist_sq > radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let outward = if dist > 1e-6 { diff / dist } else { Vec2::Y };

    Some(ContactInfo {
        normal: -outward,
        penetration: radius - dist,
        point: rect_center + clamped,
    })
}

/// Closest point to `p` on the segment `a`-`b`.
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Segment (A) against circle (B).
pub fn segment_circle(a: Vec2, b: Vec2, radius: f32, center: Vec2) -> Option<ContactInfo> {
    let closest = closest_point_on_segment(center, a, b);
    let diff = center - closest;
    let dist_sq = diff.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 {
        diff / dist
    } else {
        (b - a).perp().normalize_or(Vec2::Y)
    };

    Some(ContactInfo {
        normal,
        penetration: radius - dist,
        point: closest,
    })
}

/// Segment (A) against axis-aligned rectangle (B), separating axis test on
/// the two world axes and the segment normal.
pub fn segment_rect(a: Vec2, b: Vec2, half: Vec2, center: Vec2) -> Option<ContactInfo> {
    let seg_normal = (b - a).perp().normalize_or(Vec2::Y);
    let midpoint = (a + b) * 0.5;

    let mut best_axis = Vec2::ZERO;
    let mut best_overlap = f32::MAX;

    for axis in [Vec2::X, Vec2::Y, seg_normal] {
        let rect_center = center.dot(axis);
        let rect_radius = half.x * axis.x.abs() + half.y * axis.y.abs();
        let (pa, pb) = (a.dot(axis), b.dot(axis));
        let seg_min = pa.min(pb);
        let seg_max = pa.max(pb);

        let overlap = (rect_center + rect_radius - seg_min).min(seg_max - (rect_center - rect_radius));
        if overlap < 0.0 {
            return None;
        }

        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = axis;
        }
    }

    // Orient from segment towards the rectangle
    if (center - midpoint).dot(best_axis) < 0.0 {
        best_axis = -best_axis;
    }

    let closest = closest_point_on_segment(center, a, b);

    Some(ContactInfo {
        normal: best_axis,
        penetration: best_overlap,
        point: closest.clamp(center - half, center + half),
    })
}

/// Chain (A) against a non-chain shape (B). Picks the deepest segment contact.
pub fn chain_shape(points: &[Vec2], chain_origin: Vec2, shape: &ColliderShape, center: Vec2) -> Option<ContactInfo> {
    let mut best: Option<ContactInfo> = None;

    for segment in points.windows(2) {
        let a = chain_origin + segment[0];
        let b = chain_origin + segment[1];
        let info = match shape {
            ColliderShape::Circle { radius } => segment_circle(a, b, *radius, center),
            ColliderShape::Rect { half_extents } => segment_rect(a, b, *half_extents, center),
            ColliderShape::Chain { .. } => None,
        };

        if let Some(info) = info {
            if best.map_or(true, |current| info.penetration > current.penetration) {
                best = Some(info);
            }
        }
    }

    best
}

/// Detect collision between two shapes at the given world-space centers.
///
/// Dispatches to specialized tests. Chain-chain pairs never collide.
pub fn detect_collision(
    shape_a: &ColliderShape,
    center_a: Vec2,
    shape_b: &ColliderShape,
    center_b: Vec2,
) -> Option<ContactInfo> {
    match (shape_a, shape_b) {
        (ColliderShape::Circle { radius: ra }, ColliderShape::Circle { radius: rb }) => {
            circle_circle(*ra, center_a, *rb, center_b)
        }
        (ColliderShape::Rect { half_extents: ha }, ColliderShape::Rect { half_extents: hb }) => {
            rect_rect(*ha, center_a, *hb, center_b)
        }
        (ColliderShape::Circle { radius }, ColliderShape::Rect { half_extents }) => {
            circle_rect(*radius, center_a, *half_extents, center_b)
        }
        (ColliderShape::Rect { half_extents }, ColliderShape::Circle { radius }) => {
            circle_rect(*radius, center_b, *half_extents, center_a).map(ContactInfo::flipped)
        }
        (ColliderShape::Chain { .. }, ColliderShape::Chain { .. }) => None,
        (ColliderShape::Chain { points }, other) => chain_shape(points, center_a, other, center_b),
        (other, ColliderShape::Chain { points }) => {
            chain_shape(points, center_b, other, center_a).map(ContactInfo::flipped)
        }
    }
}

#[inline]
fn sign_or_positive(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_circle_circle_intersection() {
        let info = circle_circle(1.0, Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0)).unwrap();
        assert!((info.normal - Vec2::X).length() < EPS);
        assert!((info.penetration - 0.5).abs() < EPS);
    }

    #[test]
    fn test_circle_circle_no_intersection() {
        assert!(circle_circle(1.0, Vec2::ZERO, 1.0, Vec2::new(3.0, 0.0)).is_none());
    }

    #[test]
    fn test_rect_rect_intersection() {
        let info = rect_rect(Vec2::ONE, Vec2::ZERO, Vec2::ONE, Vec2::new(0.0, 1.8)).unwrap();
        assert!((info.normal - Vec2::Y).length() < EPS);
        assert!((info.penetration - 0.2).abs() < EPS);
        assert!((info.point - Vec2::new(0.0, 0.9)).length() < EPS);
    }

    #[test]
    fn test_rect_rect_no_intersection() {
        assert!(rect_rect(Vec2::ONE, Vec2::ZERO, Vec2::ONE, Vec2::new(3.0, 0.0)).is_none());
    }

    #[test]
    fn test_circle_above_rect() {
        let info = circle_rect(0.5, Vec2::new(0.0, 1.4), Vec2::ONE, Vec2::ZERO).unwrap();
        // normal from circle to rect points down
        assert!((info.normal - Vec2::NEG_Y).length() < EPS);
        assert!((info.penetration - 0.1).abs() < EPS);
    }

    #[test]
    fn test_circle_inside_rect() {
        let info = circle_rect(0.25, Vec2::new(0.0, 0.9), Vec2::ONE, Vec2::ZERO).unwrap();
        assert!((info.normal - Vec2::NEG_Y).length() < EPS);
        assert!((info.penetration - 0.35).abs() < EPS);
    }

    #[test]
    fn test_segment_circle() {
        let info = segment_circle(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0), 0.5, Vec2::new(1.0, 0.4)).unwrap();
        assert!((info.normal - Vec2::Y).length() < EPS);
        assert!((info.penetration - 0.1).abs() < EPS);
        assert!((info.point - Vec2::new(1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_segment_rect_resting() {
        let info = segment_rect(
            Vec2::new(-5.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.0, 0.45),
        )
        .unwrap();
        assert!((info.normal - Vec2::Y).length() < EPS);
        assert!((info.penetration - 0.05).abs() < EPS);
    }

    #[test]
    fn test_segment_rect_separated() {
        assert!(segment_rect(
            Vec2::new(-5.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.0, 2.0),
        )
        .is_none());
    }

    #[test]
    fn test_chain_picks_deepest_segment() {
        let points = vec![Vec2::new(-2.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(0.0, 2.0)];
        let shape = ColliderShape::Circle { radius: 0.5 };
        let info = chain_shape(&points, Vec2::ZERO, &shape, Vec2::new(-1.0, 0.2)).unwrap();
        assert!((info.normal - Vec2::Y).length() < EPS);
        assert!((info.penetration - 0.3).abs() < EPS);
    }

    #[test]
    fn test_detect_collision_dispatch_flips_normal() {
        let rect = ColliderShape::Rect {
            half_extents: Vec2::ONE,
        };
        let circle = ColliderShape::Circle { radius: 0.5 };

        let ab = detect_collision(&circle, Vec2::new(0.0, 1.4), &rect, Vec2::ZERO).unwrap();
        let ba = detect_collision(&rect, Vec2::ZERO, &circle, Vec2::new(0.0, 1.4)).unwrap();
        assert!((ab.normal + ba.normal).length() < EPS);

        let chain = ColliderShape::Chain {
            points: vec![Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)],
        };
        let on_ground = detect_collision(&circle, Vec2::new(0.0, 0.45), &chain, Vec2::ZERO).unwrap();
        assert!((on_ground.normal - Vec2::NEG_Y).length() < EPS);
        assert!(detect_collision(&chain, Vec2::ZERO, &chain, Vec2::ZERO).is_none());
    }
}
