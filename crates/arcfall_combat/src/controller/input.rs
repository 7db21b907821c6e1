//! Per-tick input одного игрока

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Slot;

/// Ориентация камеры (third-person, камера привязана к бойцу)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct CameraState {
    /// Forward камеры (не обязан быть нормализован)
    pub facing: Vec3,
    /// Вертикальный угол, радианы (вверх — положительный)
    pub pitch: f32,
    pub zoom: f32,
    /// Горизонтальный сдвиг кадра (over-the-shoulder)
    pub film_offset: f32,
    /// Смещение камеры относительно бойца
    pub offset: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            facing: Vec3::Z,
            pitch: 0.0,
            zoom: 0.0,
            film_offset: 0.0,
            offset: Vec3::ZERO,
        }
    }
}

impl CameraState {
    pub fn looking(facing: Vec3) -> Self {
        Self {
            facing,
            ..Default::default()
        }
    }
}

/// Кнопки способностей + камера. Отфильтрованная копия уходит дальше в gameplay (movement).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Reflect)]
pub struct TickInput {
    pub primary: bool,
    pub secondary: bool,
    pub camera: CameraState,
}

impl TickInput {
    pub fn new(primary: bool, secondary: bool, camera: CameraState) -> Self {
        Self {
            primary,
            secondary,
            camera,
        }
    }

    pub fn button(&self, slot: Slot) -> bool {
        match slot {
            Slot::Primary => self.primary,
            Slot::Secondary => self.secondary,
        }
    }

    pub fn clear(&mut self, slot: Slot) {
        match slot {
            Slot::Primary => self.primary = false,
            Slot::Secondary => self.secondary = false,
        }
    }
}
