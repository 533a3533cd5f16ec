#![forbid(unsafe_code)]

mod config;
mod player;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use voxbox_chunk::VoxelGrid;
use voxbox_edit::EditorSession;
use voxbox_geom::Vec3;
use voxbox_io::WorldMeta;
use voxbox_runtime::WorldSession;

use crate::config::Config;
use crate::player::Player;

#[derive(Parser, Debug)]
#[command(name = "voxbox", version, about = "Chunked voxel sandbox tools")]
struct Cli {
    /// TOML config file (defaults to ./voxbox.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a small demo world
    New {
        out: PathBuf,
        #[arg(long, default_value = "demo")]
        name: String,
        /// Edge of the square floor plate, in voxels
        #[arg(long, default_value_t = 64)]
        size: i32,
        #[arg(long, value_parser = parse_vec3)]
        spawn: Option<Vec3>,
    },
    /// Print a summary of a world archive
    Info { archive: PathBuf },
    /// Fly the player through a world with collision
    Walk {
        archive: PathBuf,
        /// Input along X, scaled by the player speed
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f32,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dz: f32,
        #[arg(long, default_value_t = 60)]
        ticks: u32,
        /// Seconds per tick
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
    },
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected X,Y,Z, got {s:?}"));
    };
    let f = |v: &str| v.parse::<f32>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Vec3::new(f(*x)?, f(*y)?, f(*z)?))
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let cfg = Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::New {
            out,
            name,
            size,
            spawn,
        } => cmd_new(&cfg, out, &name, size, spawn),
        Command::Info { archive } => cmd_info(&cfg, archive),
        Command::Walk {
            archive,
            dx,
            dy,
            dz,
            ticks,
            dt,
        } => cmd_walk(&cfg, archive, Vec3::new(dx, dy, dz), ticks, dt),
    }
}

fn open_session(cfg: &Config, path: PathBuf) -> Result<WorldSession, Box<dyn Error>> {
    let mut session = WorldSession::new(cfg.world.chunk_size, cfg.palette())?;
    *session.editor_mut() = EditorSession::with_slots(cfg.palette.slot_array());
    session.load_path(&path)?;
    Ok(session)
}

/// Floor plate at y = 0 plus a staggered row of floating 8-blocks in the next slot materials.
fn demo_world(grid_size: usize, editor: &EditorSession, size: i32) -> Result<VoxelGrid, Box<dyn Error>> {
    let mut grid = VoxelGrid::new(grid_size)?;
    let half = size.max(1) / 2;
    let floor = editor.slots()[0];
    for z in -half..size.max(1) - half {
        for x in -half..size.max(1) - half {
            grid.set(x, 0, z, floor);
        }
    }
    for (i, m) in editor.slots().iter().skip(1).take(4).enumerate() {
        let x = -16 + 10 * i as i32;
        grid.set_block(x, 8 * (1 + i as i32 % 2), 16, *m);
    }
    Ok(grid)
}

fn cmd_new(
    cfg: &Config,
    out: PathBuf,
    name: &str,
    size: i32,
    spawn: Option<Vec3>,
) -> Result<(), Box<dyn Error>> {
    let editor = EditorSession::with_slots(cfg.palette.slot_array());
    let grid = demo_world(cfg.world.chunk_size, &editor, size)?;
    let mut meta = WorldMeta::new(name);
    let standing = Player::standing_at(Vec3::new(0.0, 1.0, 0.0), &cfg.player);
    meta.spawn = Some(spawn.unwrap_or(standing.eye));
    voxbox_io::save_world(&out, &grid, &meta)?;
    log::info!(
        "created {} ({} chunks, {} voxels)",
        out.display(),
        grid.len(),
        grid.solid_count()
    );
    Ok(())
}

fn cmd_info(cfg: &Config, path: PathBuf) -> Result<(), Box<dyn Error>> {
    let session = open_session(cfg, path)?;
    let grid = session.grid();
    let meta = session.meta();
    println!("name:       {}", meta.name());
    match meta.spawn {
        Some(s) => println!("spawn:      {:.2}, {:.2}, {:.2}", s.x, s.y, s.z),
        None => println!("spawn:      unset"),
    }
    println!("chunk size: {}", grid.chunk_size());
    println!("chunks:     {}", grid.len());
    println!("voxels:     {}", grid.solid_count());
    println!("faces:      {}", session.total_faces());
    for coord in grid.sorted_coords() {
        let faces = session.mesh(coord).map_or(0, |m| m.face_count());
        println!("  {:>14} {:>8} faces", coord.key(), faces);
    }
    Ok(())
}

/// Flies `player` for `ticks` steps of `dt` seconds; returns how many ticks hit something.
fn walk(grid: &VoxelGrid, player: &mut Player, wish: Vec3, ticks: u32, dt: f32) -> u32 {
    let mut blocked_ticks = 0u32;
    for tick in 0..ticks {
        let sweep = player.fly(grid, wish, dt);
        if sweep.hit_anything() {
            blocked_ticks += 1;
            log::debug!("tick {tick}: blocked {:?} at {:?}", sweep.blocked, player.eye);
        }
    }
    blocked_ticks
}

fn cmd_walk(
    cfg: &Config,
    path: PathBuf,
    wish: Vec3,
    ticks: u32,
    dt: f32,
) -> Result<(), Box<dyn Error>> {
    let session = open_session(cfg, path)?;
    let start = session.meta().spawn.unwrap_or(Vec3::new(0.0, 20.0, 0.0));
    let mut player = Player::new(start, &cfg.player);
    let blocked_ticks = walk(session.grid(), &mut player, wish, ticks, dt);
    let (e, f) = (player.eye, player.feet());
    println!("start:   {:.3}, {:.3}, {:.3}", start.x, start.y, start.z);
    println!("end:     {:.3}, {:.3}, {:.3}", e.x, e.y, e.z);
    println!("feet:    {:.3}, {:.3}, {:.3}", f.x, f.y, f.z);
    println!("blocked: {blocked_ticks}/{ticks} ticks");
    println!("ground:  {}", player.on_ground);
    Ok(())
}
