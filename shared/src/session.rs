//! The simulation session: sole owner of every piece of mutable state.
//!
//! A frame is one buoyancy step at [`FIXED_FRAME_DT`], a classification of the
//! resulting forces, then one bubble update with the same submersion. The
//! day/night transition is clocked separately through
//! [`SimulationSession::poll_environment`].

use bevy::math::Vec3;
use bevy_ecs::resource::Resource;
use bevy_log::{debug, info};
use std::time::Duration;

use crate::bubbles::BubbleParticleSystem;
use crate::config::SimulationConfig;
use crate::environment::{
    EnvironmentPreset, EnvironmentTransition, Starfield, TimeOfDay, TransitionEvent,
    TransitionTicket,
};
use crate::error::SimulationError;
use crate::physics::{classify, BuoyancyForces, BuoyancyModel, FloatingBody, ObjectKind, ObjectStatus};
use crate::variant::VariantParams;
use crate::water::{WaterRange, WaterSurface};
use crate::{DEFAULT_DENSITY, DEFAULT_WATER_LEVEL, DENSITY_RANGE, FIXED_FRAME_DT, OBJECT_SPAWN_POSITION};

/// Values shown to the user after a frame or a parameter change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReadout {
    /// Newtons.
    pub buoyancy_force: f32,
    /// Newtons.
    pub gravity_force: f32,
    pub submerged_ratio: f32,
    pub position_y: f32,
    /// Height relative to the spawn point.
    pub display_height: f32,
    pub velocity: f32,
    pub status: ObjectStatus,
    pub active_bubbles: usize,
}

#[derive(Resource, Debug)]
pub struct SimulationSession {
    params: VariantParams,
    model: BuoyancyModel,
    water_range: WaterRange,
    /// Normalized level requested before the water exists.
    pending_level: f32,
    water: Option<WaterSurface>,
    body: Option<FloatingBody>,
    density: f32,
    status: Option<ObjectStatus>,
    bubbles: BubbleParticleSystem,
    environment: EnvironmentTransition,
}

impl Default for SimulationSession {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl SimulationSession {
    pub fn new(config: SimulationConfig) -> Self {
        let params = config.variant.to_params();
        let environment_seed = config.seed.unwrap_or_else(rand::random);
        info!(
            "Creating simulation session for {:?} (seed: {:?})",
            config.variant, config.seed
        );

        Self {
            model: BuoyancyModel::from(&params),
            water_range: WaterRange::from(&params),
            pending_level: DEFAULT_WATER_LEVEL,
            water: None,
            body: None,
            density: DEFAULT_DENSITY,
            status: None,
            bubbles: BubbleParticleSystem::new(config.bubbles.clone(), config.seed),
            environment: EnvironmentTransition::new(
                config.transition,
                config.starfield,
                environment_seed,
            ),
            params,
        }
    }

    /// Create the water surface at the last requested level (half-full unless
    /// [`Self::set_water_level`] ran earlier). Until this is called frames are
    /// no-ops.
    pub fn install_water(&mut self) {
        let surface = WaterSurface::at_level(self.water_range, self.pending_level);
        info!("Water installed at y = {:.3}", surface.height());
        self.water = Some(surface);
    }

    /// Set the normalized water level (clamped to `[0, 1]`) and return the
    /// absolute water height.
    ///
    /// Without water installed the level is kept and applied by
    /// [`Self::install_water`].
    pub fn set_water_level(&mut self, normalized: f32) -> Result<f32, SimulationError> {
        match self.water.as_mut() {
            Some(water) => water.set_level(normalized),
            None => {
                if !normalized.is_finite() {
                    return Err(SimulationError::InvalidWaterLevel(normalized));
                }
                self.pending_level = normalized.clamp(0.0, 1.0);
                debug!("Water level {} kept until the water is installed", self.pending_level);
                Ok(self.water_range.height_at(self.pending_level))
            }
        }
    }

    /// Set the object density relative to water.
    ///
    /// Non-positive or non-finite values are rejected and the previous density
    /// stays. Accepted values are clamped to the slider range. Forces are
    /// recomputed at the current position without an integration step; the
    /// body only moves on the next frame.
    pub fn set_object_density(
        &mut self,
        density: f32,
    ) -> Result<Option<FrameReadout>, SimulationError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(SimulationError::InvalidDensity(density));
        }
        let density = density.clamp(DENSITY_RANGE.0, DENSITY_RANGE.1);
        if let Some(body) = self.body.as_mut() {
            body.set_density(density)?;
        }
        self.density = density;
        Ok(self.refresh_readout())
    }

    /// Replace the current object with a new one built from its bounding box
    /// size. The old body's bubbles go back to the pool.
    ///
    /// Invalid bounds leave the current object in place.
    pub fn switch_object(
        &mut self,
        kind: ObjectKind,
        size: Vec3,
    ) -> Result<Option<FrameReadout>, SimulationError> {
        let body = FloatingBody::from_bounds(
            kind,
            OBJECT_SPAWN_POSITION,
            size,
            self.params.packing(kind),
            self.density,
        )?;

        if let Some(previous) = self.body.take() {
            debug!("Detaching {}", previous.kind.as_str());
        }
        self.bubbles.recycle_all();
        info!(
            "Switched to {} (volume {:.3} m³, mass {:.1} kg)",
            kind.as_str(),
            body.volume(),
            body.mass()
        );
        self.body = Some(body);
        Ok(self.refresh_readout())
    }

    /// Back to the initial state: half-full pool, default density, object at
    /// the spawn point at rest, no bubbles. The readout holds the forces at
    /// the spawn point; no integration step runs until the next frame.
    pub fn reset(&mut self) -> Option<FrameReadout> {
        self.pending_level = DEFAULT_WATER_LEVEL;
        if let Some(water) = self.water.as_mut() {
            water.reset();
        }
        self.density = DEFAULT_DENSITY;
        if let Some(body) = self.body.as_mut() {
            body.reset(OBJECT_SPAWN_POSITION);
        }
        self.bubbles.recycle_all();
        info!("Simulation reset");
        self.refresh_readout()
    }

    /// Advance one rendered frame. `time` is in seconds and only drives the
    /// cosmetic motion.
    ///
    /// Returns `Ok(None)` when there is no object or no water yet.
    pub fn step_frame(&mut self, time: f32) -> Result<Option<FrameReadout>, SimulationError> {
        let (Some(body), Some(water)) = (self.body.as_mut(), self.water.as_ref()) else {
            return Ok(None);
        };
        let water_y = water.height();

        let step = self.model.step(body, water_y, FIXED_FRAME_DT, time)?;
        let status = classify(
            step.buoyancy_force,
            step.gravity_force,
            step.submerged_ratio,
            &self.params.thresholds,
        );
        self.bubbles
            .spawn_and_advance(body, step.submerged_ratio, water_y, FIXED_FRAME_DT, time);

        if self.status != Some(status) {
            debug!("{} is now {}", body.kind.as_str(), status);
        }
        self.status = Some(status);

        Ok(Some(FrameReadout {
            buoyancy_force: step.buoyancy_force,
            gravity_force: step.gravity_force,
            submerged_ratio: step.submerged_ratio,
            position_y: step.position.y,
            display_height: step.position.y - OBJECT_SPAWN_POSITION.y,
            velocity: step.velocity,
            status,
            active_bubbles: self.bubbles.active_count(),
        }))
    }

    /// Start a day/night cross-fade at `now`, cancelling any in progress.
    pub fn toggle_environment(&mut self, now: Duration) -> TransitionTicket {
        self.environment.toggle(now)
    }

    /// Run the transition steps due at `now`.
    pub fn poll_environment(&mut self, now: Duration) -> Vec<TransitionEvent> {
        self.environment.poll(now)
    }

    pub fn set_bubble_rate(&mut self, rate: f32) {
        self.bubbles.set_spawn_rate(rate);
    }

    /// Forces at the current position, classified, without integrating.
    fn refresh_readout(&mut self) -> Option<FrameReadout> {
        let (body, water) = (self.body.as_ref()?, self.water.as_ref()?);
        let forces: BuoyancyForces = self.model.forces(body, water.height());
        let status = classify(
            forces.buoyancy_force,
            forces.gravity_force,
            forces.submerged_ratio,
            &self.params.thresholds,
        );
        self.status = Some(status);

        Some(FrameReadout {
            buoyancy_force: forces.buoyancy_force,
            gravity_force: forces.gravity_force,
            submerged_ratio: forces.submerged_ratio,
            position_y: body.position.y,
            display_height: body.position.y - OBJECT_SPAWN_POSITION.y,
            velocity: body.velocity,
            status,
            active_bubbles: self.bubbles.active_count(),
        })
    }

    pub fn params(&self) -> &VariantParams {
        &self.params
    }

    pub fn water_y(&self) -> Option<f32> {
        self.water.as_ref().map(WaterSurface::height)
    }

    pub fn water(&self) -> Option<&WaterSurface> {
        self.water.as_ref()
    }

    pub fn body(&self) -> Option<&FloatingBody> {
        self.body.as_ref()
    }

    /// Density applied to the current object and to the next one switched in.
    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn status(&self) -> Option<ObjectStatus> {
        self.status
    }

    pub fn bubbles(&self) -> &BubbleParticleSystem {
        &self.bubbles
    }

    pub fn environment(&self) -> &EnvironmentPreset {
        self.environment.live()
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        self.environment.mode()
    }

    pub fn starfield(&self) -> Option<&Starfield> {
        self.environment.starfield()
    }
}
