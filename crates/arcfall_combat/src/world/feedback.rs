//! Feedback events (движок → UI / audio / VFX)
//!
//! Fire-and-forget: никакая логика боя не зависит от того, обработал ли
//! кто-то эти события. Plugin пробрасывает их в bevy `Events<CombatFeedback>`.

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

use super::CombatantId;
use crate::config::{SoundCue, Slot};

/// Pitch jitter + громкость по умолчанию для категории звука
#[derive(Debug, Clone)]
pub struct SoundProfile {
    pub pitch: Range<f32>,
    pub default_volume: f32,
}

/// use/hit звуки
pub const IMPACT_SOUND: SoundProfile = SoundProfile {
    pitch: 0.8..1.0,
    default_volume: 1.0,
};

/// Звук начала заряда (тише, pitch вокруг 1.0)
pub const CHARGE_SOUND: SoundProfile = SoundProfile {
    pitch: 0.9..1.1,
    default_volume: 0.6,
};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    ChargeBegin {
        combatant: CombatantId,
        slot: Slot,
    },
    /// Pull-based: шлётся каждый тик, пока кнопка зажата
    ChargeLevel {
        combatant: CombatantId,
        slot: Slot,
        level: f32,
    },
    ChargeEnd {
        combatant: CombatantId,
        slot: Slot,
    },
    CooldownStarted {
        combatant: CombatantId,
        slot: Slot,
        duration: f32,
    },
    Sound {
        uri: String,
        position: Vec3,
        volume: f32,
        reference_distance: f32,
        pitch: f32,
    },
    Effect {
        effect: String,
        position: Vec3,
    },
    Animation {
        combatant: CombatantId,
        name: String,
    },
    BeamSegment {
        combatant: CombatantId,
        from: Vec3,
        to: Vec3,
    },
    /// Slow-walk пока заряжаем (movement controller снаружи)
    MovementHint {
        combatant: CombatantId,
        slow_walk: bool,
    },
}

/// Очередь событий за тик (engine владеет, plugin дренирует)
#[derive(Debug, Default)]
pub struct FeedbackQueue {
    events: Vec<FeedbackEvent>,
}

impl FeedbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FeedbackEvent) {
        self.events.push(event);
    }

    pub fn play_sound(&mut self, cue: &SoundCue, position: Vec3, rng: &mut ChaCha8Rng, profile: &SoundProfile) {
        let pitch = rng.gen_range(profile.pitch.clone());
        self.push(FeedbackEvent::Sound {
            uri: cue.uri.clone(),
            position,
            volume: cue.volume.unwrap_or(profile.default_volume),
            reference_distance: cue.reference_distance,
            pitch,
        });
    }

    pub fn spawn_effect(&mut self, effect: &str, position: Vec3) {
        self.push(FeedbackEvent::Effect {
            effect: effect.to_string(),
            position,
        });
    }

    pub fn events(&self) -> &[FeedbackEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
