//! # Barrow Demo Driver
//!
//! Headless, self-playing session for exercising the simulation core from
//! the command line: generates a dungeon from a seed, feeds the engine a
//! scripted stream of commands for a fixed number of turns, then dumps the
//! explored map and a JSON run summary.
//!
//! Presentation proper (colors, tilesets, input translation) lives outside
//! the core; this driver stands in for those collaborators.

use barrow::{
    config, generation, BarrowResult, Command, DungeonGenerator, Engine, EntitySpec,
    GenerationConfig, Generator, Navigator, SpawnTable, Vision,
};
use clap::Parser;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Command line arguments for the demo driver.
#[derive(Parser, Debug)]
#[command(name = "barrow")]
#[command(about = "Turn-driven dungeon crawler simulation core")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Map width in tiles
    #[arg(long, default_value_t = config::DEFAULT_MAP_WIDTH)]
    width: u32,

    /// Map height in tiles
    #[arg(long, default_value_t = config::DEFAULT_MAP_HEIGHT)]
    height: u32,

    /// Number of self-played turns
    #[arg(short, long, default_value_t = 60)]
    turns: u32,
}

/// The external entity table this driver stands in for.
fn archetypes() -> (EntitySpec, SpawnTable) {
    let player = EntitySpec::new("Player", '@', (255, 255, 255), true);
    let spawns = SpawnTable::new(
        EntitySpec::new("Orc", 'o', (63, 127, 63), true),
        EntitySpec::new("Troll", 'T', (0, 127, 0), true),
        0.2,
    );
    (player, spawns)
}

fn main() -> BarrowResult<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or(42);
    info!("starting barrow v{} with seed {}", barrow::VERSION, seed);

    let config = GenerationConfig {
        width: args.width,
        height: args.height,
        ..GenerationConfig::new(seed)
    };

    let (player, spawns) = archetypes();
    let generator = DungeonGenerator::new(player, spawns);
    let mut rng = generation::utils::create_rng(&config);
    let dungeon = generator.generate(&config, &mut rng)?;
    generator.validate(&dungeon, &config)?;

    let mut map = dungeon.map;
    let mut entities = dungeon.entities;
    let mut engine = Engine::new();
    let vision = Vision::new();
    let navigator = Navigator::new();

    // Opening perception refresh, before the first command arrives
    if let Some(id) = entities.player_id() {
        if let Some(entity) = entities.get(id) {
            vision.refresh(&mut map, entity.position);
        }
    }

    // Scripted stand-in for the input translator: random bumps with the
    // occasional undo.
    let mut policy = StdRng::seed_from_u64(seed ^ 0x5eed);
    let mut messages = 0usize;
    for turn in 0..args.turns {
        let command = if turn % 8 == 7 {
            Command::Undo
        } else {
            let (dx, dy) = random_step(&mut policy);
            Command::Bump { dx, dy }
        };

        let report = engine.process_turn(command, &mut map, &mut entities, &vision, &navigator)?;
        messages += report.events.len();
        if report.quit() {
            break;
        }
    }

    print_map(&map, &entities);

    let explored = map.positions().filter(|&p| map.is_explored(p)).count();
    let summary = serde_json::json!({
        "seed": seed,
        "turns": engine.turn_number(),
        "rooms": dungeon.rooms.len(),
        "entities": entities.len(),
        "events": messages,
        "explored_cells": explored,
        "history_len": engine.history_len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn random_step(rng: &mut StdRng) -> (i32, i32) {
    loop {
        let dx = rng.gen_range(-1..=1);
        let dy = rng.gen_range(-1..=1);
        if dx != 0 || dy != 0 {
            return (dx, dy);
        }
    }
}

/// ASCII view of what the player knows: entity glyphs where visible, floor
/// and wall where explored, blank where shrouded.
fn print_map(map: &barrow::GameMap, entities: &barrow::EntitySet) {
    for y in 0..map.height as i32 {
        let mut line = String::with_capacity(map.width as usize);
        for x in 0..map.width as i32 {
            let pos = barrow::Position::new(x, y);
            let entity_glyph = entities
                .iter()
                .find(|e| e.is_alive && e.position == pos && map.is_visible(pos))
                .map(|e| e.glyph);

            let ch = if let Some(glyph) = entity_glyph {
                glyph
            } else if map.is_explored(pos) {
                if map.is_walkable(pos) {
                    '.'
                } else {
                    '#'
                }
            } else {
                ' '
            };
            line.push(ch);
        }
        println!("{}", line);
    }
}
