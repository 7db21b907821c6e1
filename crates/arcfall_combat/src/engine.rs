//! CombatEngine — один fixed tick боя
//!
//! Порядок тика:
//! 1. `SimClock::advance(dt)`
//! 2. drain collision events мира → `handle_collision` (снаряды)
//! 3. controllers по возрастанию CombatantId → dispatch input
//! 4. `advance_projectiles` (reversal, lifetime, orphans)
//!
//! Физика мира шагает ДО engine step (в plugin — отдельной системой в той же цепочке).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clock::SimClock;
use crate::config::ClassLoadout;
use crate::context::SimContext;
use crate::controller::{AbilityController, AimConfig, TickInput};
use crate::projectile::{advance_projectiles, handle_collision, ProjectileRegistry};
use crate::world::{CombatWorld, CombatantId, FeedbackEvent, FeedbackQueue};

/// 64Hz: шаг 1/64 точно представим в f32 (таймеры без накопления ошибки)
pub const DEFAULT_TICK_RATE: f64 = 64.0;

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tick_rate: f64,
    pub seed: u64,
    #[serde(default)]
    pub aim: AimConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            seed: DEFAULT_SEED,
            aim: AimConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn timestep(&self) -> f32 {
        (1.0 / self.tick_rate) as f32
    }
}

#[derive(Resource)]
pub struct CombatEngine {
    config: EngineConfig,
    clock: SimClock,
    controllers: BTreeMap<CombatantId, AbilityController>,
    projectiles: ProjectileRegistry,
    feedback: FeedbackQueue,
    rng: ChaCha8Rng,
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CombatEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            clock: SimClock::new(),
            controllers: BTreeMap::new(),
            projectiles: ProjectileRegistry::new(),
            feedback: FeedbackQueue::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn projectiles(&self) -> &ProjectileRegistry {
        &self.projectiles
    }

    pub fn feedback(&self) -> &FeedbackQueue {
        &self.feedback
    }

    pub fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        self.feedback.drain()
    }

    pub fn controller(&self, combatant: CombatantId) -> Option<&AbilityController> {
        self.controllers.get(&combatant)
    }

    pub fn controller_mut(&mut self, combatant: CombatantId) -> Option<&mut AbilityController> {
        self.controllers.get_mut(&combatant)
    }

    pub fn combatants(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.controllers.keys().copied()
    }

    /// Контроллер по loadout + attach (class stats применяются к бойцу)
    pub fn add_combatant(&mut self, world: &mut dyn CombatWorld, combatant: CombatantId, loadout: &ClassLoadout) {
        let controller = AbilityController::from_loadout(loadout, self.config.aim);
        self.add_controller(world, combatant, controller);
    }

    pub fn add_controller(&mut self, world: &mut dyn CombatWorld, combatant: CombatantId, mut controller: AbilityController) {
        controller.attach(world, combatant);
        if let Some(mut previous) = self.controllers.insert(combatant, controller) {
            previous.detach();
        }
    }

    /// Detach + удаление. Уже выпущенные снаряды летят дальше (пока владелец есть в мире).
    pub fn remove_combatant(&mut self, combatant: CombatantId) -> Option<AbilityController> {
        let mut controller = self.controllers.remove(&combatant)?;
        controller.detach();
        Some(controller)
    }

    /// Контекст вне тика (ручной вызов способностей в тестах/тулзах)
    pub fn context<'a>(&'a mut self, world: &'a mut dyn CombatWorld) -> SimContext<'a> {
        SimContext::new(
            self.clock.now(),
            world,
            &mut self.feedback,
            &mut self.projectiles,
            &mut self.rng,
        )
    }

    /// Один fixed tick. Бойцы без input'а в этом тике получают "всё отпущено".
    /// Возвращает отфильтрованный input (mutual exclusion) для gameplay.
    pub fn step(
        &mut self,
        world: &mut dyn CombatWorld,
        inputs: &BTreeMap<CombatantId, TickInput>,
        dt: f32,
    ) -> BTreeMap<CombatantId, TickInput> {
        let now = self.clock.advance(dt);
        let collisions = world.drain_collisions();

        let mut ctx = SimContext::new(now, world, &mut self.feedback, &mut self.projectiles, &mut self.rng);

        for event in &collisions {
            handle_collision(&mut ctx, event);
        }

        let mut filtered = BTreeMap::new();
        for (combatant, controller) in self.controllers.iter_mut() {
            let input = inputs.get(combatant).copied().unwrap_or_default();
            filtered.insert(*combatant, controller.tick(&mut ctx, input));
        }

        advance_projectiles(&mut ctx);

        filtered
    }
}
