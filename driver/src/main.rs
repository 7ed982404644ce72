use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use shared::physics::ObjectKind;
use shared::{load_config, save_config, SceneVariant, DENSITY_RANGE};

mod init;

use init::RunPlan;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    Deep,
    Shallow,
}

impl From<VariantArg> for SceneVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Deep => SceneVariant::DeepPool,
            VariantArg::Shallow => SceneVariant::ShallowPool,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ObjectArg {
    Duck,
    Ship,
}

impl From<ObjectArg> for ObjectKind {
    fn from(value: ObjectArg) -> Self {
        match value {
            ObjectArg::Duck => ObjectKind::Duck,
            ObjectArg::Ship => ObjectKind::Ship,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Headless buoyancy pool simulation", long_about = None)]
struct Args {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Scene layout, overrides the config file
    #[arg(short, long, value_enum)]
    variant: Option<VariantArg>,

    #[arg(short, long, value_enum, default_value_t = ObjectArg::Duck)]
    object: ObjectArg,

    /// Object density relative to water
    #[arg(short, long, default_value_t = 0.5)]
    density: f32,

    /// Normalized water level (0.0 - 1.0)
    #[arg(short, long, default_value_t = 0.5)]
    water_level: f32,

    /// Bubble intensity (0 - 10)
    #[arg(short, long)]
    bubble_rate: Option<f32>,

    /// Frame at which to toggle day/night
    #[arg(short, long)]
    toggle_frame: Option<u32>,

    /// Frames per second, 0 runs as fast as possible
    #[arg(long, default_value_t = 60)]
    tick_rate: u32,

    /// RON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective config to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    #[arg(short, long)]
    seed: Option<u64>,
}

fn fail(message: &str, got: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    eprintln!("Got: {got}");
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();

    if !(args.density > 0.0 && args.density <= DENSITY_RANGE.1) {
        fail(
            &format!("density must be in (0, {}].", DENSITY_RANGE.1),
            args.density,
        );
    }
    if !(0.0..=1.0).contains(&args.water_level) {
        fail("water_level must be between 0 and 1 (inclusive).", args.water_level);
    }
    if let Some(rate) = args.bubble_rate {
        if !(0.0..=10.0).contains(&rate) {
            fail("bubble_rate must be between 0 and 10 (inclusive).", rate);
        }
    }
    if let Some(frame) = args.toggle_frame {
        if frame >= args.frames {
            fail("toggle_frame must come before the last frame.", frame);
        }
    }

    let mut config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(err) => fail("could not read config file.", err),
        },
        None => Default::default(),
    };
    if let Some(variant) = args.variant {
        config.variant = variant.into();
    }
    if let Some(rate) = args.bubble_rate {
        config.bubbles.spawn_rate = rate;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if let Some(path) = &args.write_config {
        if let Err(err) = save_config(&config, path) {
            fail("could not write config file.", err);
        }
        return;
    }

    let plan = RunPlan {
        frames: args.frames,
        toggle_frame: args.toggle_frame,
        object: args.object.into(),
        density: args.density,
        water_level: args.water_level,
        tick_rate: args.tick_rate,
    };

    if init::init(config, plan).is_error() {
        std::process::exit(1);
    }
}
