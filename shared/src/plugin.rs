//! Bevy plugin running a [`SimulationSession`] inside an app.

use bevy::prelude::*;
use bevy_log::{debug, error, info, warn};

use crate::config::SimulationConfig;
use crate::environment::TransitionEvent;
use crate::error::SimulationError;
use crate::physics::ObjectKind;
use crate::session::{FrameReadout, SimulationSession};
use crate::sets::SimulationUpdateSet;

/// User input forwarded to the session.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SimulationCommand {
    /// The pool asset is ready: create the water surface.
    InstallWater,
    /// Normalized level in `[0, 1]`.
    SetWaterLevel(f32),
    SetDensity(f32),
    SwitchObject { kind: ObjectKind, size: Vec3 },
    Reset,
    ToggleEnvironment,
    SetBubbleRate(f32),
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FrameReadoutEvent(pub FrameReadout);

#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnvironmentEvent(pub TransitionEvent);

/// Set once a step produced a non-finite value. Stepping stops for good.
#[derive(Resource, Debug, Default)]
pub struct SimulationFault(pub Option<SimulationError>);

#[derive(Default)]
pub struct BuoyancyPlugin {
    pub config: SimulationConfig,
}

impl Plugin for BuoyancyPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(SimulationSession::new(self.config.clone()))
            .init_resource::<SimulationFault>()
            .add_event::<SimulationCommand>()
            .add_event::<FrameReadoutEvent>()
            .add_event::<EnvironmentEvent>()
            .configure_sets(
                Update,
                (
                    SimulationUpdateSet::Input,
                    SimulationUpdateSet::Physics,
                    SimulationUpdateSet::Environment,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                apply_simulation_commands.in_set(SimulationUpdateSet::Input),
            )
            .add_systems(Update, step_simulation.in_set(SimulationUpdateSet::Physics))
            .add_systems(
                Update,
                advance_environment.in_set(SimulationUpdateSet::Environment),
            );
    }
}

fn apply_simulation_commands(
    mut commands: EventReader<SimulationCommand>,
    mut session: ResMut<SimulationSession>,
    mut readouts: EventWriter<FrameReadoutEvent>,
    time: Res<Time>,
) {
    for command in commands.read() {
        let result = match command {
            SimulationCommand::InstallWater => {
                session.install_water();
                Ok(None)
            }
            SimulationCommand::SetWaterLevel(level) => session.set_water_level(*level).map(|y| {
                debug!("Water level {} -> y = {:.3}", level, y);
                None
            }),
            SimulationCommand::SetDensity(density) => session.set_object_density(*density),
            SimulationCommand::SwitchObject { kind, size } => session.switch_object(*kind, *size),
            SimulationCommand::Reset => Ok(session.reset()),
            SimulationCommand::ToggleEnvironment => {
                session.toggle_environment(time.elapsed());
                Ok(None)
            }
            SimulationCommand::SetBubbleRate(rate) => {
                session.set_bubble_rate(*rate);
                Ok(None)
            }
        };

        match result {
            Ok(Some(readout)) => {
                readouts.write(FrameReadoutEvent(readout));
            }
            Ok(None) => {}
            Err(err) => warn!("Ignoring {:?}: {}", command, err),
        }
    }
}

fn step_simulation(
    mut session: ResMut<SimulationSession>,
    mut fault: ResMut<SimulationFault>,
    mut readouts: EventWriter<FrameReadoutEvent>,
    time: Res<Time>,
) {
    if fault.0.is_some() {
        return;
    }

    match session.step_frame(time.elapsed_secs()) {
        Ok(Some(readout)) => {
            readouts.write(FrameReadoutEvent(readout));
        }
        Ok(None) => {}
        Err(err) => {
            error!("Simulation stopped: {}", err);
            fault.0 = Some(err);
        }
    }
}

fn advance_environment(
    mut session: ResMut<SimulationSession>,
    mut events: EventWriter<EnvironmentEvent>,
    time: Res<Time>,
) {
    for event in session.poll_environment(time.elapsed()) {
        match &event {
            TransitionEvent::GlyphChanged { glyph, label } => {
                debug!("Toggle button now shows {} {}", glyph, label)
            }
            TransitionEvent::StarfieldMaterialized { stars } => {
                info!("Night fell, {} stars out", stars)
            }
            TransitionEvent::StarfieldDisposed => info!("Daybreak, starfield removed"),
            TransitionEvent::Completed { mode, .. } => info!("Environment is now {:?}", mode),
            TransitionEvent::Progress { .. } => {}
        }
        events.write(EnvironmentEvent(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::TimeOfDay;
    use crate::physics::ObjectStatus;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_plugins(BuoyancyPlugin {
                config: SimulationConfig {
                    seed: Some(3),
                    ..Default::default()
                },
            });
        app
    }

    fn session(app: &App) -> &SimulationSession {
        app.world().resource::<SimulationSession>()
    }

    #[test]
    fn test_commands_drive_the_session() {
        let mut app = app();
        app.world_mut().send_event(SimulationCommand::InstallWater);
        app.world_mut().send_event(SimulationCommand::SetDensity(2.0));
        app.world_mut().send_event(SimulationCommand::SwitchObject {
            kind: ObjectKind::Duck,
            size: Vec3::new(1.0, 1.0, 1.0),
        });
        app.update();

        assert!(session(&app).water_y().is_some());
        assert_eq!(session(&app).body().map(|b| b.density()), Some(2.0));

        for _ in 0..400 {
            app.update();
        }

        let readout = app
            .world()
            .resource::<Events<FrameReadoutEvent>>()
            .iter_current_update_events()
            .last()
            .map(|event| event.0)
            .unwrap();
        assert_eq!(readout.status, ObjectStatus::Sunk);
        assert_eq!(readout.velocity, 0.0);
        assert!((readout.position_y - (-7.5)).abs() < 1e-6);
        assert!(app.world().resource::<SimulationFault>().0.is_none());
    }

    #[test]
    fn test_rejected_input_leaves_state_alone() {
        let mut app = app();
        app.world_mut().send_event(SimulationCommand::InstallWater);
        app.world_mut().send_event(SimulationCommand::SetDensity(1.2));
        app.update();
        app.world_mut().send_event(SimulationCommand::SetDensity(-1.0));
        app.world_mut().send_event(SimulationCommand::SetWaterLevel(f32::NAN));
        app.update();

        assert_eq!(session(&app).density(), 1.2);
        assert_eq!(session(&app).water().map(|w| w.level()), Some(0.5));
    }

    #[test]
    fn test_non_finite_step_halts_simulation() {
        let mut app = app();
        app.world_mut().send_event(SimulationCommand::InstallWater);
        app.world_mut().send_event(SimulationCommand::SetDensity(3.0));
        // Accepted bounds whose mass overflows to infinity
        app.world_mut().send_event(SimulationCommand::SwitchObject {
            kind: ObjectKind::Ship,
            size: Vec3::new(1e20, 1.0, 1e18),
        });
        app.update();

        assert!(matches!(
            app.world().resource::<SimulationFault>().0,
            Some(SimulationError::NonFinite { .. })
        ));

        app.update();
        app.update();
        let readouts = app.world().resource::<Events<FrameReadoutEvent>>();
        assert_eq!(readouts.iter_current_update_events().count(), 0);
    }

    #[test]
    fn test_environment_toggle_completes() {
        let mut app = app();
        app.world_mut().send_event(SimulationCommand::ToggleEnvironment);
        for _ in 0..20 {
            app.update();
        }

        assert_eq!(session(&app).time_of_day(), TimeOfDay::Night);
        assert!(session(&app).starfield().is_some());
    }
}
