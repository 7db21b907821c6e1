//! ARCFALL Combat Core
//!
//! Ability & projectile engine на Bevy 0.16 (fixed tick, детерминированный).
//!
//! Слои:
//! - `config` — что умеет способность (serde, RON loadouts, presets классов)
//! - `ability` — cooldown/charge/resource state + эффекты (projectile, hitscan, blink, beam)
//! - `controller` — input dispatch по слотам, aim ray, toggle bursts
//! - `projectile` — жизнь снаряда после выстрела (reversal, multi-hit, AOE)
//! - `engine` — порядок тика; `plugin` — обёртка в FixedUpdate
//! - `world` — узкие trait'ы к физике и реестру бойцов (реализует игра)
//! - `sandbox` — минимальный мир для тестов и headless демо

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

// Публичные модули
pub mod ability;
pub mod clock;
pub mod config;
pub mod context;
pub mod controller;
pub mod engine;
pub mod logger;
pub mod plugin;
pub mod projectile;
pub mod sandbox;
pub mod shared;
pub mod world;

// Re-export для удобства
pub use ability::{build_ability, Ability, AbilityCore, Cast};
pub use clock::SimClock;
pub use config::{
    presets, AbilityConfig, ActivationMode, ClassLoadout, ClassStats, ConfigError, EffectConfig, ProjectileConfig,
    ResourceKind, Slot,
};
pub use context::SimContext;
pub use controller::{AbilityController, AimConfig, CameraState, TickInput};
pub use engine::{CombatEngine, EngineConfig};
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use plugin::{AbilityPlugin, CombatFeedback, CombatSet, PlayerIntents};
pub use projectile::{Projectile, ProjectileRegistry};
pub use sandbox::{CombatantSpawn, SandboxWorld};
pub use world::{
    BodyHandle, CombatWorld, CombatantDied, CombatantId, CombatantRegistry, Contact, DamageDealt, FeedbackEvent,
    PhysicsWorld,
};

/// Главный plugin симуляции: 64Hz fixed tick + RNG + sandbox мир + бой
pub struct SimulationPlugin {
    pub seed: u64,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            seed: engine::DEFAULT_SEED,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = EngineConfig::with_seed(self.seed);

        app
            // 64Hz: шаг 1/64 точно представим в f32
            .insert_resource(Time::<Fixed>::from_hz(config.tick_rate))
            .insert_resource(DeterministicRng::new(self.seed))
            .insert_resource(CombatEngine::new(config))
            .init_resource::<SandboxWorld>()
            .add_plugins(AbilityPlugin::<SandboxWorld>::default())
            .add_systems(
                FixedUpdate,
                sandbox::step_sandbox_physics.in_set(CombatSet::Physics),
            )
            .add_systems(
                FixedUpdate,
                sandbox::forward_sandbox_outcomes.in_set(CombatSet::Feedback),
            );
    }
}

/// Детерминистичный RNG resource (seeded) для gameplay-систем вне движка
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal Bevy App для headless симуляции.
/// Каждый `app.update()` (кроме самого первого) продвигает время ровно на один fixed tick, без wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let tick = Duration::from_secs_f64(1.0 / engine::DEFAULT_TICK_RATE);
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick))
        .add_plugins(SimulationPlugin { seed });

    app
}

/// Snapshot боя для сравнения детерминизма (sandbox мир + часы + живые снаряды)
pub fn world_snapshot(world: &World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    if let Some(engine) = world.get_resource::<CombatEngine>() {
        snapshot.extend_from_slice(&engine.clock().tick().to_le_bytes());
        snapshot.extend_from_slice(&engine.now().to_le_bytes());
        snapshot.extend_from_slice(&(engine.projectiles().len() as u64).to_le_bytes());
    }
    if let Some(sandbox) = world.get_resource::<SandboxWorld>() {
        snapshot.extend_from_slice(sandbox.snapshot().as_bytes());
    }

    snapshot
}

/// Спавн бойца в sandbox мире + контроллер по loadout (для headless app)
pub fn spawn_combatant(app: &mut App, spawn: CombatantSpawn, loadout: &ClassLoadout) -> CombatantId {
    app.world_mut()
        .resource_scope(|world, mut sandbox: Mut<SandboxWorld>| {
            let id = sandbox.spawn_combatant(spawn);
            let mut engine = world.resource_mut::<CombatEngine>();
            engine.add_combatant(&mut *sandbox, id, loadout);
            id
        })
}
