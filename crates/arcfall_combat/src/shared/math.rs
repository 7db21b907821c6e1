//! Векторные helpers поверх glam (bevy::math)

use bevy::prelude::*;

/// Горизонтальный "right" для направления взгляда/полёта: (-z, 0, x), нормализованный.
/// Для вертикального направления — ноль.
pub fn right_of(direction: Vec3) -> Vec3 {
    Vec3::new(-direction.z, 0.0, direction.x).normalize_or_zero()
}

/// Поворот вектора вокруг мировой оси Y
pub fn rotate_about_y(vector: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * vector
}

/// Ориентация модели "носом" вдоль направления (+Z forward): сначала yaw, потом pitch
pub fn facing_rotation(direction: Vec3) -> Quat {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let yaw = direction.x.atan2(direction.z);
    let pitch = direction.y.clamp(-1.0, 1.0).asin();

    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-pitch)
}
