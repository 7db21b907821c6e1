//! Headless дуэль ARCFALL
//!
//! Два бота с классами из presets (или RON loadout) стреляют друг в друга
//! в sandbox мире. Печатает урон/смерти и итоговый snapshot.

use arcfall_combat::{
    create_headless_app, log_error, log_info, presets, spawn_combatant, world_snapshot, CameraState, ClassLoadout,
    CombatantDied, CombatantId, CombatantRegistry, CombatantSpawn, DamageDealt, DeterministicRng, PlayerIntents,
    SandboxWorld, TickInput,
};
use bevy::prelude::*;
use clap::Parser;
use rand::Rng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arcfall_headless", about = "Headless ARCFALL ability duel")]
struct Args {
    /// RNG seed (sound pitch, bot aim jitter)
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fixed ticks to simulate (64 per second)
    #[arg(long, default_value_t = 640)]
    ticks: u32,

    /// Class of the first duelist (wizard / fighter / archer)
    #[arg(long, default_value = "wizard")]
    red: String,

    /// Class of the second duelist
    #[arg(long, default_value = "archer")]
    blue: String,

    /// RON loadout overriding the first duelist's class
    #[arg(long)]
    red_loadout: Option<PathBuf>,

    /// Distance between duelists (meters)
    #[arg(long, default_value_t = 8.0)]
    distance: f32,
}

/// Пара бойцов, которыми управляют боты
#[derive(Resource)]
struct Duelists {
    pairs: Vec<(CombatantId, CombatantId)>,
}

fn resolve_loadout(class: &str, path: Option<&PathBuf>) -> Option<ClassLoadout> {
    if let Some(path) = path {
        return match ClassLoadout::load(path) {
            Ok(loadout) => Some(loadout),
            Err(err) => {
                log_error(&format!("{}", err));
                None
            }
        };
    }
    let loadout = presets::by_name(class);
    if loadout.is_none() {
        log_error(&format!("Unknown class '{}'", class));
    }
    loadout
}

/// Бот: смотрит на противника, держит primary 0.5s / отпускает 0.25s,
/// secondary раз в ~2s. Aim pitch слегка дрожит.
fn drive_duel_bots(
    duelists: Res<Duelists>,
    world: Res<SandboxWorld>,
    mut intents: ResMut<PlayerIntents>,
    mut rng: ResMut<DeterministicRng>,
    mut tick: Local<u32>,
) {
    *tick += 1;

    for (bot, target) in &duelists.pairs {
        let (Some(from), Some(to)) = (world.combatant_position(*bot), world.combatant_position(*target)) else {
            intents.release(*bot);
            continue;
        };
        if world.is_dead(*bot) || world.is_dead(*target) {
            intents.release(*bot);
            continue;
        }

        let pitch = rng.rng.gen_range(-0.05..0.05);
        let camera = CameraState {
            facing: (to - from).normalize_or_zero(),
            pitch,
            ..Default::default()
        };

        let phase = (*tick + bot.0 as u32 * 7) % 48;
        let input = TickInput::new(phase < 32, *tick % 128 > 120, camera);
        intents.set(*bot, input);
    }
}

fn main() {
    let args = Args::parse();

    let (Some(red_loadout), Some(blue_loadout)) = (
        resolve_loadout(&args.red, args.red_loadout.as_ref()),
        resolve_loadout(&args.blue, None),
    ) else {
        std::process::exit(2);
    };

    let mut app = create_headless_app(args.seed);
    app.world_mut().resource_mut::<SandboxWorld>().add_floor(0.0);

    let red = spawn_combatant(
        &mut app,
        CombatantSpawn::new("red", Vec3::new(0.0, 1.0, 0.0)).team(1),
        &red_loadout,
    );
    let blue = spawn_combatant(
        &mut app,
        CombatantSpawn::new("blue", Vec3::new(0.0, 1.0, args.distance))
            .team(2)
            .facing(-Vec3::Z),
        &blue_loadout,
    );

    app.insert_resource(Duelists {
        pairs: vec![(red, blue), (blue, red)],
    })
    .add_systems(FixedUpdate, drive_duel_bots.before(arcfall_combat::CombatSet::Physics));

    log_info(&format!(
        "Starting ARCFALL duel: {} vs {} (seed {}, {} ticks)",
        red_loadout.class, blue_loadout.class, args.seed, args.ticks
    ));

    let mut damage_reader = app.world_mut().resource_mut::<Events<DamageDealt>>().get_cursor();
    let mut death_reader = app.world_mut().resource_mut::<Events<CombatantDied>>().get_cursor();

    for tick in 0..args.ticks {
        app.update();

        let world = app.world();
        for hit in damage_reader.read(world.resource::<Events<DamageDealt>>()) {
            log_info(&format!(
                "tick {}: {:?} → {:?} -{:.1}{}",
                tick,
                hit.attacker,
                hit.target,
                hit.damage,
                if hit.target_died { " (fatal)" } else { "" }
            ));
        }
        for death in death_reader.read(world.resource::<Events<CombatantDied>>()) {
            log_info(&format!("tick {}: {:?} died (killer {:?})", tick, death.combatant, death.killer));
        }
    }

    let sandbox = app.world().resource::<SandboxWorld>();
    println!("{}", sandbox.snapshot());
    println!("snapshot bytes: {}", world_snapshot(app.world()).len());
}
