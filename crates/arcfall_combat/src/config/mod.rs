//! Ability configs (immutable, authored per ability)
//!
//! Один `AbilityConfig` = одна способность в слоте (например "Fireball").
//! Конфиги serde-совместимы: loadout'ы можно собирать в коде (`presets`)
//! или грузить из RON (`loadout::ClassLoadout::load`).
//!
//! Валидации на этом уровне нет: кривые значения (min == max у charge range,
//! нулевая скорость) деградируют в константу/инертное поведение, loader только предупреждает.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod loadout;
pub mod presets;

pub use loadout::{ClassLoadout, ClassStats, ConfigError};

/// Точка привязки способности на контроллере
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub enum Slot {
    Primary,
    Secondary,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Primary, Slot::Secondary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Primary => "primary",
            Slot::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
pub enum ResourceKind {
    Health,
    #[default]
    Mana,
    Stamina,
}

/// Как зажатая кнопка превращается в вызовы эффекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum ActivationMode {
    /// Полная активация каждый тик, пока кнопка down (throttle — через cooldown)
    #[default]
    Instant,
    /// Tick-вариант эффекта каждый тик, пока кнопка down
    HoldContinuous,
    /// Bounded burst: tick-вариант 10 раз с шагом 0.1s после нажатия
    ToggleContinuous,
}

/// Линейный диапазон параметра по уровню заряда
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeRange {
    pub min: f32,
    pub max: f32,
}

impl ChargeRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `min + (max - min) * level`
    pub fn at(&self, level: f32) -> f32 {
        self.min + (self.max - self.min) * level
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeConfig {
    #[serde(default)]
    pub min_charge_time: f32,
    #[serde(default = "default_max_charge_time")]
    pub max_charge_time: f32,
    #[serde(default)]
    pub speed: Option<ChargeRange>,
    #[serde(default)]
    pub damage: Option<ChargeRange>,
    #[serde(default)]
    pub gravity: Option<ChargeRange>,
    /// Бонус к размеру модели/коллайдера
    #[serde(default)]
    pub size: Option<ChargeRange>,
    /// Переопределяет `UseImpulse::force` на этот выстрел
    #[serde(default)]
    pub impulse_force: Option<ChargeRange>,
}

fn default_max_charge_time() -> f32 {
    1.0
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            min_charge_time: 0.0,
            max_charge_time: default_max_charge_time(),
            speed: None,
            damage: None,
            gravity: None,
            size: None,
            impulse_force: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AoeConfig {
    pub radius: f32,
    pub damage: f32,
    #[serde(default)]
    pub knockback: f32,
    #[serde(default)]
    pub falloff: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiHitConfig {
    pub max_hits: u32,
    /// Повторный удар по той же цели не раньше чем через N секунд
    pub hit_cooldown: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityReverseConfig {
    /// Возраст снаряда, после которого он летит обратно
    pub time: f32,
    /// Хранится для совместимости данных; разворот мгновенный
    #[serde(default)]
    pub duration: f32,
    #[serde(default = "default_one")]
    pub speed_multiplier: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum ImpulseDirection {
    Backward,
    Forward,
    Up,
}

/// Импульс кастеру в момент use (отдача, рывок)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UseImpulse {
    pub direction: ImpulseDirection,
    pub force: f32,
    /// true — по aim direction, false — по facing модели
    #[serde(default)]
    pub use_aim_direction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub uri: String,
    /// None — громкость по умолчанию для категории звука
    #[serde(default)]
    pub volume: Option<f32>,
    #[serde(default = "default_reference_distance")]
    pub reference_distance: f32,
}

fn default_reference_distance() -> f32 {
    10.0
}

impl SoundCue {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            volume: None,
            reference_distance: default_reference_distance(),
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn with_reference_distance(mut self, reference_distance: f32) -> Self {
        self.reference_distance = reference_distance;
        self
    }
}

/// Физический снаряд (fireball, стрела, топор-бумеранг)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub damage: f32,
    /// None — дальность не ограничена
    #[serde(default)]
    pub max_range: Option<f32>,
    /// Явное время жизни (приоритетнее `max_range / speed`)
    #[serde(default)]
    pub life_time: Option<f32>,
    pub radius: f32,
    #[serde(default = "default_one")]
    pub gravity_scale: f32,
    #[serde(default)]
    pub torque: Option<f32>,
    #[serde(default)]
    pub knockback: f32,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_one")]
    pub model_scale: f32,
    #[serde(default)]
    pub face_velocity: bool,
    #[serde(default)]
    pub sensor: bool,
    /// Terrain overlap игнорируется полностью
    #[serde(default)]
    pub no_hit_on_terrain: bool,
    /// Overlap с бойцами игнорируется полностью (снаряд работает только через AOE)
    #[serde(default)]
    pub no_hit_on_entity: bool,
    /// Для multi-hit: terrain всё равно terminal
    #[serde(default)]
    pub destroy_on_terrain: bool,
    #[serde(default)]
    pub hit_effect: Option<String>,
    #[serde(default)]
    pub aoe: Option<AoeConfig>,
    #[serde(default)]
    pub multi_hit: Option<MultiHitConfig>,
    #[serde(default)]
    pub velocity_reverse: Option<VelocityReverseConfig>,
}

fn default_one() -> f32 {
    1.0
}

impl ProjectileConfig {
    /// Базовый снаряд без опций
    pub fn new(speed: f32, damage: f32, radius: f32) -> Self {
        Self {
            speed,
            damage,
            max_range: None,
            life_time: None,
            radius,
            gravity_scale: 1.0,
            torque: None,
            knockback: 0.0,
            model: None,
            model_scale: 1.0,
            face_velocity: false,
            sensor: false,
            no_hit_on_terrain: false,
            no_hit_on_entity: false,
            destroy_on_terrain: false,
            hit_effect: None,
            aoe: None,
            multi_hit: None,
            velocity_reverse: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    pub range: f32,
    pub damage_per_tick: f32,
    /// Секунды между уронными тиками (визуал обновляется каждый тик)
    pub tick_interval: f32,
    #[serde(default)]
    pub effect: Option<String>,
}

/// Что именно делает способность
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectConfig {
    Projectile(ProjectileConfig),
    /// Hitscan урон первому бойцу на луче
    Raycast { damage: f32, max_range: f32 },
    /// Hitscan heal
    TargetedHeal { healing: f32, max_range: f32 },
    /// Телепорт вдоль aim direction
    Blink { distance: f32 },
    Beam(BeamConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityConfig {
    pub name: String,
    pub slot: Slot,
    pub cooldown: f32,
    #[serde(default)]
    pub resource_cost: f32,
    #[serde(default)]
    pub resource_kind: ResourceKind,
    #[serde(default)]
    pub activation: ActivationMode,
    #[serde(default)]
    pub charge: Option<ChargeConfig>,
    #[serde(default)]
    pub use_impulse: Option<UseImpulse>,
    #[serde(default)]
    pub use_sound: Option<SoundCue>,
    #[serde(default)]
    pub hit_sound: Option<SoundCue>,
    #[serde(default)]
    pub charge_sound: Option<SoundCue>,
    #[serde(default)]
    pub use_effect: Option<String>,
    #[serde(default = "default_animation")]
    pub animation: String,
    pub effect: EffectConfig,
}

fn default_animation() -> String {
    "simple_interact".to_string()
}

impl AbilityConfig {
    /// Минимальный конфиг: instant, mana, без заряда и звуков
    pub fn new(name: impl Into<String>, slot: Slot, cooldown: f32, effect: EffectConfig) -> Self {
        Self {
            name: name.into(),
            slot,
            cooldown,
            resource_cost: 0.0,
            resource_kind: ResourceKind::Mana,
            activation: ActivationMode::Instant,
            charge: None,
            use_impulse: None,
            use_sound: None,
            hit_sound: None,
            charge_sound: None,
            use_effect: None,
            animation: default_animation(),
            effect,
        }
    }

    pub fn with_cost(mut self, kind: ResourceKind, cost: f32) -> Self {
        self.resource_kind = kind;
        self.resource_cost = cost;
        self
    }

    pub fn with_activation(mut self, activation: ActivationMode) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_charge(mut self, charge: ChargeConfig) -> Self {
        self.charge = Some(charge);
        self
    }

    pub fn with_use_impulse(mut self, impulse: UseImpulse) -> Self {
        self.use_impulse = Some(impulse);
        self
    }

    pub fn is_chargeable(&self) -> bool {
        self.charge.is_some()
    }

    pub fn projectile(&self) -> Option<&ProjectileConfig> {
        match &self.effect {
            EffectConfig::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }

    /// Предупреждения о конфигурации, которая деградирует молча
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(charge) = &self.charge {
            if charge.max_charge_time <= charge.min_charge_time {
                warnings.push(format!(
                    "{}: max_charge_time {} <= min_charge_time {} (charge level becomes a step)",
                    self.name, charge.max_charge_time, charge.min_charge_time
                ));
            }
        }

        if let EffectConfig::Projectile(projectile) = &self.effect {
            if projectile.speed <= 0.0 {
                warnings.push(format!("{}: projectile speed {} <= 0", self.name, projectile.speed));
            }
            if projectile.model_scale <= 0.0 {
                warnings.push(format!("{}: model_scale {} <= 0", self.name, projectile.model_scale));
            }
        }

        if self.activation != ActivationMode::Instant && self.charge.is_some() {
            warnings.push(format!(
                "{}: activation {:?} is ignored for chargeable abilities",
                self.name, self.activation
            ));
        }

        warnings
    }
}
