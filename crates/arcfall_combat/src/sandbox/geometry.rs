//! Геометрия sandbox: сферы и AABB, ничего сложнее

use bevy::prelude::*;

/// Axis-aligned box статического terrain
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) <= radius * radius
    }
}

/// Дистанция вдоль нормализованного луча до сферы (None — мимо или сфера позади)
pub fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;

    // Origin внутри сферы — попадание сразу
    if c <= 0.0 {
        return Some(0.0);
    }
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    Some(-b - discriminant.sqrt())
}

/// Slab test: дистанция до входа в box (0 — origin внутри)
pub fn ray_aabb(origin: Vec3, direction: Vec3, aabb: &Aabb) -> Option<f32> {
    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let (t0, t1) = {
            let a = (lo - o) * inv;
            let b = (hi - o) * inv;
            if a < b { (a, b) } else { (b, a) }
        };

        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ray_sphere_front_hit() {
        let hit = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 1.0);
        assert_abs_diff_eq!(hit.unwrap_or(-1.0), 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_sphere_behind_and_miss() {
        assert_eq!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 1.0), None);
        assert_eq!(ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(3.0, 0.0, 5.0), 1.0), None);
    }

    #[test]
    fn test_ray_aabb_wall() {
        let wall = Aabb::new(Vec3::new(-5.0, 0.0, 10.0), Vec3::new(5.0, 4.0, 11.0));

        let hit = ray_aabb(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, &wall);
        assert_abs_diff_eq!(hit.unwrap_or(-1.0), 10.0, epsilon = 1e-5);

        assert_eq!(ray_aabb(Vec3::new(0.0, 1.0, 0.0), -Vec3::Z, &wall), None);
        assert_eq!(ray_aabb(Vec3::new(0.0, 6.0, 0.0), Vec3::Z, &wall), None);
    }

    #[test]
    fn test_aabb_sphere_overlap() {
        let floor = Aabb::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0));
        assert!(floor.intersects_sphere(Vec3::new(0.0, 0.2, 0.0), 0.3));
        assert!(!floor.intersects_sphere(Vec3::new(0.0, 0.5, 0.0), 0.3));
    }
}
