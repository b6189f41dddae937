use clap::{Parser, ValueEnum};
use fire_propagation_core::grid::{BoxVolume, SphereVolume, TargetedOverlap, VolumeWorld};
use fire_propagation_core::{
    EffectHandle, FireController, FireEffects, FirePhase, FireSettings, FireState, HeatSource,
    IgnitionPacing, ObjectId, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shape {
    Box,
    Sphere,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Pacing {
    /// Every eligible cell ignites in the tick it crosses its threshold
    All,
    /// At most one new ignition per tick
    Single,
}

impl From<Pacing> for IgnitionPacing {
    fn from(value: Pacing) -> Self {
        match value {
            Pacing::All => IgnitionPacing::AllEligible,
            Pacing::Single => IgnitionPacing::SingleIgnitionPerTick,
        }
    }
}

/// Headless fire propagation demo
#[derive(Parser, Debug)]
#[command(name = "fire-propagation-demo")]
#[command(about = "Burns a synthetic object cell by cell", long_about = None)]
struct Args {
    /// Shape of the burning object
    #[arg(long, value_enum, default_value_t = Shape::Sphere)]
    shape: Shape,

    /// Object edge length / diameter in meters
    #[arg(long, default_value_t = 4.0)]
    size: f32,

    /// Cells along the X axis (overrides the settings file)
    #[arg(short, long)]
    resolution: Option<u32>,

    /// JSON fire behavior block
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Ignition pacing (overrides the settings file)
    #[arg(long, value_enum)]
    pacing: Option<Pacing>,

    /// Maximum number of ticks
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,

    /// Heat source reach in meters
    #[arg(long, default_value_t = 1.0)]
    heat_range: f32,

    /// Randomize the heat source direction with this seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print a status line every N ticks
    #[arg(long, default_value_t = 15)]
    report_every: u32,
}

/// Effects layer that only tracks how many flames are alive
#[derive(Default)]
struct FlameCounter {
    next: u64,
    live: usize,
    peak: usize,
}

impl FireEffects for FlameCounter {
    fn on_ignite(&mut self, _object: ObjectId, _position: Vec3) -> EffectHandle {
        self.next += 1;
        self.live += 1;
        self.peak = self.peak.max(self.live);
        EffectHandle(self.next)
    }

    fn on_extinguish(&mut self, _object: ObjectId, _position: Vec3, _handle: EffectHandle) {
        self.live = self.live.saturating_sub(1);
    }
}

const TARGET: ObjectId = ObjectId(1);
const NEIGHBOUR: ObjectId = ObjectId(2);

/// Target object at the origin plus a half-size crate touching its +X side
fn build_world(shape: Shape, size: f32) -> VolumeWorld {
    let mut world = VolumeWorld::new();
    match shape {
        Shape::Box => world.add(TARGET, BoxVolume::new(Vec3::zeros(), Vec3::repeat(size))),
        Shape::Sphere => world.add(TARGET, SphereVolume::new(Vec3::zeros(), size / 2.0)),
    }
    world.add(
        NEIGHBOUR,
        BoxVolume::new(Vec3::new(size * 0.75, 0.0, 0.0), Vec3::repeat(size / 2.0)),
    );
    world
}

fn load_settings(args: &Args) -> Result<FireSettings, Box<dyn Error>> {
    let mut settings = match &args.settings {
        Some(path) => FireSettings::from_json_str(&std::fs::read_to_string(path)?)?,
        None => FireSettings::default(),
    };
    if let Some(resolution) = args.resolution {
        settings = settings.with_grid_resolution(resolution);
    }
    if let Some(pacing) = args.pacing {
        settings = settings.with_ignition_pacing(pacing.into());
    }
    settings.validate()?;
    Ok(settings)
}

/// Heat source just outside the object, straight above it or in a seeded direction
fn place_heat_source(args: &Args) -> HeatSource {
    let distance = args.size / 2.0 + args.heat_range * 0.5;
    let direction = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            let theta = rng.random_range(0.0..std::f32::consts::TAU);
            let z: f32 = rng.random_range(-1.0..1.0);
            let r = (1.0 - z * z).sqrt();
            Vec3::new(r * theta.cos(), r * theta.sin(), z)
        }
        None => Vec3::new(0.0, 1.0, 0.0),
    };
    HeatSource::new(direction * distance, args.heat_range)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let settings = load_settings(args)?;

    println!("=== Fire Propagation Demo ===\n");
    println!(
        "Object: {:?}, size {:.2}m, resolution {}, pacing {:?}",
        args.shape, args.size, settings.grid_resolution, settings.ignition_pacing
    );
    println!(
        "Ignition {:.1} (+{:.1}/tick), burn {:.2}s, dt {:.4}s\n",
        settings.ignition_temperature,
        settings.temperature_change_per_tick,
        settings.burn_duration,
        args.dt
    );

    let world = build_world(args.shape, args.size);
    let mut objects = Vec::new();
    for id in [TARGET, NEIGHBOUR] {
        let bounds = world
            .bounds(id)
            .ok_or_else(|| format!("{id} missing from world"))?;
        objects.push(FireController::new(id, bounds, settings));
    }
    let query = TargetedOverlap(world);

    let source = place_heat_source(args);
    println!(
        "Heat source at [{:.2}, {:.2}, {:.2}], range {:.2}m",
        source.position.x, source.position.y, source.position.z, source.heat_range
    );
    let poll = source.poll_overlapping(&mut objects, &query);
    for (id, err) in &poll.failed {
        println!("Could not ignite {id}: {err}");
    }
    if poll.seeded.is_empty() {
        println!("Nothing within reach of the heat source");
        return Ok(());
    }
    for object in &objects {
        if let Some(grid) = object.grid() {
            println!(
                "{}: {} cells, radius {:.3}m",
                object.object(),
                grid.len(),
                grid.radius()
            );
        }
    }

    println!("\n Tick | Time(s) | Active | Burning | Burnt");
    println!("------|---------|--------|---------|------");

    let mut effects = FlameCounter::default();
    let mut tick = 0;
    while tick < args.ticks
        && objects
            .iter()
            .any(|o| o.phase() == FirePhase::Igniting)
    {
        for object in &mut objects {
            object.tick(args.dt, &mut effects);
        }
        tick += 1;

        if tick % args.report_every.max(1) == 0 {
            let active: usize = objects.iter().map(FireController::active_count).sum();
            let burning: usize = objects.iter().map(FireController::burning_count).sum();
            let burnt: usize = objects.iter().map(FireController::burnt_count).sum();
            println!(
                "{:5} | {:7.2} | {:6} | {:7} | {:5}",
                tick,
                tick as f32 * args.dt,
                active,
                burning,
                burnt
            );
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("Ticks: {} ({:.2}s)", tick, tick as f32 * args.dt);
    println!("Peak live flames: {}", effects.peak);
    for object in &objects {
        let cells = object.grid().map_or(0, |g| g.len());
        let state = object.fire_state();
        println!(
            "{}: {:?}, {}/{} cells burnt",
            object.object(),
            state,
            object.burnt_count(),
            cells
        );
        if state == FireState::OnFire {
            info!("{} still burning at tick limit", object.object());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fire_propagation_core::grid::OverlapQuery;

    #[test]
    fn test_neighbour_touches_target() {
        for shape in [Shape::Box, Shape::Sphere] {
            let world = build_world(shape, 4.0);
            let target = world.bounds(TARGET).unwrap();
            let neighbour = world.bounds(NEIGHBOUR).unwrap();
            assert!((neighbour.min().x - target.max().x).abs() < 1e-6);

            let contact = Vec3::new(2.0, 0.0, 0.0);
            let hits = world.overlap_sphere(contact, 0.01);
            assert!(hits.contains(&TARGET));
            assert!(hits.contains(&NEIGHBOUR));
        }
    }
}
