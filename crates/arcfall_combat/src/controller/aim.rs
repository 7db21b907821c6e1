//! Aim ray: от ретикла камеры к точке в мире, потом от weapon anchor к этой точке
//!
//! Камера смещена over-the-shoulder, поэтому forward камеры не совпадает с прицелом:
//! yaw подкручен на константу (и сильнее при большом pitch), origin луча сдвинут
//! по film offset и отодвинут назад на половину zoom.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ability::Cast;
use crate::context::SimContext;
use crate::shared::{right_of, rotate_about_y};
use crate::world::CombatantId;

use super::input::CameraState;

/// Подобранные вручную константы камеры
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct AimConfig {
    pub max_distance: f32,
    /// Базовый поворот yaw (радианы)
    pub yaw_bias: f32,
    /// Доп. поворот yaw: `pitch² * k`
    pub pitch_yaw_factor: f32,
    pub film_offset_scale: f32,
    pub anchor_forward: f32,
    pub anchor_up: f32,
    pub anchor_right: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            max_distance: 50.0,
            yaw_bias: -0.285,
            pitch_yaw_factor: 0.18,
            film_offset_scale: 0.038,
            anchor_forward: 0.15,
            anchor_up: 0.36,
            anchor_right: 0.35,
        }
    }
}

/// Геометрия прицела до raycast (чистая функция от позиции и камеры)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimRay {
    /// Откуда кастуем луч (около ретикла)
    pub ray_origin: Vec3,
    /// Нормализованное направление прицела
    pub ray_direction: Vec3,
    /// Weapon anchor — откуда вылетает эффект
    pub weapon_origin: Vec3,
}

impl AimConfig {
    pub fn ray(&self, position: Vec3, camera: &CameraState) -> AimRay {
        let forward = camera.facing.normalize_or_zero();
        let pitch = camera.pitch;

        let horizontal = Vec3::new(forward.x, 0.0, forward.z);
        let right = right_of(forward);

        let yaw = self.yaw_bias - pitch * pitch * self.pitch_yaw_factor;
        let rotated = rotate_about_y(horizontal, yaw);

        let ray_direction = Vec3::new(rotated.x * pitch.cos(), pitch.sin(), rotated.z * pitch.cos()).normalize_or_zero();

        let side = camera.film_offset * self.film_offset_scale;
        let ray_origin = Vec3::new(
            position.x + right.x * side,
            position.y + camera.offset.y,
            position.z + right.z * side,
        ) + forward * (-camera.zoom / 2.0);

        let weapon_origin = position
            + ray_direction * self.anchor_forward
            + Vec3::new(right.x * self.anchor_right, self.anchor_up, right.z * self.anchor_right);

        AimRay {
            ray_origin,
            ray_direction,
            weapon_origin,
        }
    }
}

/// Полный aim: raycast из камеры (без собственного тела), цель — точка попадания или max distance.
/// None — бойца нет в мире (detached).
pub fn calculate_aim(ctx: &SimContext, user: CombatantId, camera: &CameraState, config: &AimConfig) -> Option<Cast> {
    let position = ctx.world.combatant_position(user)?;
    let ray = config.ray(position, camera);

    let exclude = ctx.world.combatant_body(user);
    let target = ctx
        .world
        .raycast(ray.ray_origin, ray.ray_direction, config.max_distance, exclude)
        .map(|hit| hit.point)
        .unwrap_or(ray.ray_origin + ray.ray_direction * config.max_distance);

    Some(Cast {
        origin: ray.weapon_origin,
        direction: target - ray.weapon_origin,
        source: user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_level_aim_is_biased_left_of_camera() {
        let config = AimConfig::default();
        let ray = config.ray(Vec3::ZERO, &CameraState::looking(Vec3::Z));

        // pitch 0 → чисто горизонтальный луч, повёрнутый на yaw_bias
        assert_abs_diff_eq!(ray.ray_direction.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ray.ray_direction.length(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ray.ray_direction.z, (-0.285f32).cos(), epsilon = 1e-5);
        assert_abs_diff_eq!(ray.ray_direction.x, (-0.285f32).sin(), epsilon = 1e-5);
    }

    #[test]
    fn test_weapon_anchor_offsets() {
        let config = AimConfig::default();
        let ray = config.ray(Vec3::new(1.0, 2.0, 3.0), &CameraState::looking(Vec3::Z));

        // right_of(+Z) = -X
        let expected = Vec3::new(1.0, 2.0, 3.0) + ray.ray_direction * 0.15 + Vec3::new(-0.35, 0.36, 0.0);
        assert_abs_diff_eq!(ray.weapon_origin.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(ray.weapon_origin.y, expected.y, epsilon = 1e-5);
        assert_abs_diff_eq!(ray.weapon_origin.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_zoom_pulls_ray_origin_back() {
        let config = AimConfig::default();
        let camera = CameraState {
            zoom: 4.0,
            offset: Vec3::new(0.0, 1.5, 0.0),
            ..CameraState::looking(Vec3::Z)
        };
        let ray = config.ray(Vec3::ZERO, &camera);

        assert_abs_diff_eq!(ray.ray_origin.z, -2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ray.ray_origin.y, 1.5, epsilon = 1e-6);
    }
}
