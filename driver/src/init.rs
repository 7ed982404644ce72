use bevy::prelude::*;
use bevy_app::ScheduleRunnerPlugin;
use bevy_log::{error, info};
use shared::environment::TransitionEvent;
use shared::physics::ObjectKind;
use shared::sets::SimulationUpdateSet;
use shared::{
    BuoyancyPlugin, EnvironmentEvent, FrameReadoutEvent, SimulationCommand, SimulationConfig,
    SimulationFault,
};
use std::time::Duration;

/// Bounding boxes standing in for the loaded object models.
const DUCK_BOUNDS: Vec3 = Vec3::new(1.2, 1.0, 0.9);
const SHIP_BOUNDS: Vec3 = Vec3::new(2.4, 0.8, 1.0);

/// Readouts are logged once per this many frames.
const REPORT_INTERVAL: u32 = 60;

/// What the headless run does, frame by frame.
#[derive(Resource, Debug, Clone)]
pub struct RunPlan {
    pub frames: u32,
    pub toggle_frame: Option<u32>,
    pub object: ObjectKind,
    pub density: f32,
    pub water_level: f32,
    pub tick_rate: u32,
}

#[derive(Resource, Debug, Default)]
pub struct FrameCounter(pub u32);

pub fn object_bounds(kind: ObjectKind) -> Vec3 {
    match kind {
        ObjectKind::Duck => DUCK_BOUNDS,
        ObjectKind::Ship => SHIP_BOUNDS,
    }
}

pub fn init(config: SimulationConfig, plan: RunPlan) -> AppExit {
    let mut app = App::new();
    let wait = if plan.tick_rate == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(1.0 / plan.tick_rate as f64)
    };
    app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(wait)));
    app.add_plugins(bevy::log::LogPlugin::default());

    info!(
        "Simulating {} frames of a {} in {:?}",
        plan.frames,
        plan.object.as_str(),
        config.variant
    );

    app.add_plugins(BuoyancyPlugin { config });
    app.insert_resource(plan);
    app.init_resource::<FrameCounter>();

    app.add_systems(Startup, queue_initial_commands);
    app.add_systems(
        Update,
        schedule_toggle.before(SimulationUpdateSet::Input),
    );
    app.add_systems(
        Update,
        (report_progress, finish_run)
            .chain()
            .after(SimulationUpdateSet::Environment),
    );

    app.run()
}

/// Startup sequence: the pool becomes available, then the sliders are set
/// and the object is loaded.
fn queue_initial_commands(plan: Res<RunPlan>, mut commands: EventWriter<SimulationCommand>) {
    commands.write(SimulationCommand::InstallWater);
    commands.write(SimulationCommand::SetWaterLevel(plan.water_level));
    commands.write(SimulationCommand::SetDensity(plan.density));
    commands.write(SimulationCommand::SwitchObject {
        kind: plan.object,
        size: object_bounds(plan.object),
    });
}

fn schedule_toggle(
    plan: Res<RunPlan>,
    counter: Res<FrameCounter>,
    mut commands: EventWriter<SimulationCommand>,
) {
    if plan.toggle_frame == Some(counter.0) {
        info!("Frame {}: toggling day/night", counter.0);
        commands.write(SimulationCommand::ToggleEnvironment);
    }
}

fn report_progress(
    counter: Res<FrameCounter>,
    mut readouts: EventReader<FrameReadoutEvent>,
    mut environment: EventReader<EnvironmentEvent>,
) {
    if let Some(FrameReadoutEvent(readout)) = readouts.read().last() {
        if counter.0 % REPORT_INTERVAL == 0 {
            info!(
                "Frame {:>5}: {} ({}) height {:+.3} v {:+.4} ratio {:.3} buoyancy {:.1} N gravity {:.1} N bubbles {}",
                counter.0,
                readout.status,
                readout.status.label_id(),
                readout.display_height,
                readout.velocity,
                readout.submerged_ratio,
                readout.buoyancy_force,
                readout.gravity_force,
                readout.active_bubbles
            );
        }
    }

    for EnvironmentEvent(event) in environment.read() {
        if let TransitionEvent::Completed { mode, .. } = event {
            info!("Frame {}: transition to {:?} complete", counter.0, mode);
        }
    }
}

fn finish_run(
    plan: Res<RunPlan>,
    fault: Res<SimulationFault>,
    mut counter: ResMut<FrameCounter>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(err) = &fault.0 {
        error!("Aborting run at frame {}: {}", counter.0, err);
        exit.write(AppExit::error());
        return;
    }

    counter.0 += 1;
    if counter.0 >= plan.frames {
        info!("Finished {} frames", counter.0);
        exit.write(AppExit::Success);
    }
}
