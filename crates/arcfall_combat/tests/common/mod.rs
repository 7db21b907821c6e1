//! Общий harness для integration тестов: engine + sandbox world

#![allow(dead_code)]

use arcfall_combat::sandbox::CombatantSpawn;
use arcfall_combat::{
    AimConfig, CameraState, ClassLoadout, CombatEngine, CombatantId, EngineConfig, FeedbackEvent, SandboxWorld,
    TickInput,
};
use std::collections::BTreeMap;

/// Прицел строго по facing (без over-the-shoulder смещений)
pub fn straight_aim() -> AimConfig {
    AimConfig {
        yaw_bias: 0.0,
        pitch_yaw_factor: 0.0,
        anchor_forward: 0.0,
        anchor_up: 0.0,
        anchor_right: 0.0,
        ..Default::default()
    }
}

pub struct Arena {
    pub engine: CombatEngine,
    pub world: SandboxWorld,
    pub inputs: BTreeMap<CombatantId, TickInput>,
}

impl Arena {
    pub fn new() -> Self {
        let config = EngineConfig {
            aim: straight_aim(),
            ..EngineConfig::with_seed(7)
        };
        Self {
            engine: CombatEngine::new(config),
            world: SandboxWorld::new(),
            inputs: BTreeMap::new(),
        }
    }

    pub fn spawn(&mut self, spawn: CombatantSpawn) -> CombatantId {
        self.world.spawn_combatant(spawn)
    }

    pub fn arm(&mut self, combatant: CombatantId, loadout: &ClassLoadout) {
        self.engine.add_combatant(&mut self.world, combatant, loadout);
    }

    pub fn press(&mut self, combatant: CombatantId, primary: bool, secondary: bool) {
        self.inputs
            .insert(combatant, TickInput::new(primary, secondary, CameraState::default()));
    }

    /// Один fixed tick: физика мира, потом движок
    pub fn step(&mut self) -> BTreeMap<CombatantId, TickInput> {
        let dt = self.engine.config().timestep();
        self.world.step(dt);
        self.engine.step(&mut self.world, &self.inputs, dt)
    }

    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn cooldowns_started(&mut self) -> usize {
        self.engine
            .drain_feedback()
            .iter()
            .filter(|event| matches!(event, FeedbackEvent::CooldownStarted { .. }))
            .count()
    }
}
