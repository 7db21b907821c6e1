//! Bevy integration: AbilityPlugin<W>
//!
//! Движок — обычная Rust-структура; plugin лишь оборачивает её в Resource и
//! гоняет `CombatEngine::step` в FixedUpdate:
//!
//! ```text
//! CombatSet::Physics  → шаг мира W (система мира, если есть)
//! CombatSet::Engine   → CombatEngine::step(W, PlayerIntents)
//! CombatSet::Feedback → FeedbackQueue → Events<CombatFeedback>
//! ```

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::controller::TickInput;
use crate::engine::CombatEngine;
use crate::world::{CombatWorld, CombatantDied, CombatantId, DamageDealt, FeedbackEvent};

/// Порядок систем боя внутри FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    Physics,
    Engine,
    Feedback,
}

/// Feedback движка в виде bevy Event (UI/audio/VFX слушают его)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CombatFeedback {
    pub tick: u64,
    pub event: FeedbackEvent,
}

/// Текущее состояние кнопок игроков (держится, пока не перезаписано)
#[derive(Resource, Debug, Default, Clone)]
pub struct PlayerIntents {
    pressed: BTreeMap<CombatantId, TickInput>,
    /// Input после mutual exclusion прошлого тика (для movement)
    filtered: BTreeMap<CombatantId, TickInput>,
}

impl PlayerIntents {
    pub fn set(&mut self, combatant: CombatantId, input: TickInput) {
        self.pressed.insert(combatant, input);
    }

    pub fn release(&mut self, combatant: CombatantId) {
        if let Some(input) = self.pressed.get_mut(&combatant) {
            input.primary = false;
            input.secondary = false;
        }
    }

    pub fn get(&self, combatant: CombatantId) -> Option<&TickInput> {
        self.pressed.get(&combatant)
    }

    pub fn filtered(&self, combatant: CombatantId) -> Option<&TickInput> {
        self.filtered.get(&combatant)
    }
}

/// Plugin боя поверх мира `W` (W — Resource, реализующий оба collaborator trait'а)
pub struct AbilityPlugin<W> {
    _world: PhantomData<fn() -> W>,
}

impl<W> Default for AbilityPlugin<W> {
    fn default() -> Self {
        Self { _world: PhantomData }
    }
}

impl<W: CombatWorld + Resource> Plugin for AbilityPlugin<W> {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatFeedback>()
            .add_event::<DamageDealt>()
            .add_event::<CombatantDied>()
            .init_resource::<CombatEngine>()
            .init_resource::<PlayerIntents>()
            .configure_sets(
                FixedUpdate,
                (CombatSet::Physics, CombatSet::Engine, CombatSet::Feedback).chain(),
            )
            .add_systems(FixedUpdate, step_combat_engine::<W>.in_set(CombatSet::Engine))
            .add_systems(FixedUpdate, forward_feedback.in_set(CombatSet::Feedback));
    }
}

/// Система: один тик движка
pub fn step_combat_engine<W: CombatWorld + Resource>(
    time: Res<Time<Fixed>>,
    mut engine: ResMut<CombatEngine>,
    mut world: ResMut<W>,
    mut intents: ResMut<PlayerIntents>,
) {
    let dt = time.timestep().as_secs_f32();
    let world: &mut W = &mut world;
    let filtered = engine.step(world, &intents.pressed, dt);
    intents.filtered = filtered;
}

/// Система: FeedbackQueue → Events<CombatFeedback>
pub fn forward_feedback(mut engine: ResMut<CombatEngine>, mut writer: EventWriter<CombatFeedback>) {
    let tick = engine.clock().tick();
    for event in engine.drain_feedback() {
        writer.write(CombatFeedback { tick, event });
    }
}
