#![deny(unsafe_code)]
//! Flow-field steering engine.
//!
//! A fixed population of [`Vehicle`]s wanders a toroidal plane, each tick
//! steering toward the direction stored in the [`FlowField`] cell beneath it.
//! The field is sampled from noise once at start-up and never changes; the
//! vehicles never see each other.
//!
//! [`FlowSim`] is the driver. It owns the field and the vehicles, and
//! implements [`Engine`] so the registry and CLI can run it by name.

pub mod flow_field;
pub mod vehicle;

pub use flow_field::{CellView, FlowField, NOISE_SCALE};
pub use vehicle::{compute_steer, Vehicle};

use flowfield_core::error::EngineError;
use flowfield_core::noise_source::{noise_from_name, NoiseSource, NOISE_NAMES};
use flowfield_core::params::{
    param_bool, param_count, param_f64, param_string, param_u32, validate_range,
};
use flowfield_core::prng::fold_seed;
use flowfield_core::{AgentView, Engine, Field, Plane, Xorshift64};
use serde_json::{json, Value};

const DEFAULT_WIDTH: f64 = 360.0;
const DEFAULT_HEIGHT: f64 = 240.0;
/// Default flow field cell size.
const DEFAULT_RESOLUTION: f64 = 20.0;
const DEFAULT_VEHICLE_COUNT: usize = 120;
const DEFAULT_MIN_SPEED: f64 = 2.0;
const DEFAULT_MAX_SPEED: f64 = 5.0;
const DEFAULT_MIN_FORCE: f64 = 0.1;
const DEFAULT_MAX_FORCE: f64 = 0.5;
/// Trail intensity added under each vehicle per tick.
const DEFAULT_TRAIL_DEPOSIT: f64 = 0.05;
const DEFAULT_NOISE: &str = "octave";

/// Everything needed to set up a run, apart from noise and randomness.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    pub width: f64,
    pub height: f64,
    /// Flow field cell size in plane units.
    pub resolution: f64,
    pub vehicle_count: usize,
    /// `[min, max)` range each vehicle's speed limit is drawn from.
    pub speed_range: (f64, f64),
    /// `[min, max)` range each vehicle's force limit is drawn from.
    pub force_range: (f64, f64),
    pub trail_deposit: f64,
    /// Ask the renderer to overlay the field. Only echoed back in `params()`.
    pub debug: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            resolution: DEFAULT_RESOLUTION,
            vehicle_count: DEFAULT_VEHICLE_COUNT,
            speed_range: (DEFAULT_MIN_SPEED, DEFAULT_MAX_SPEED),
            force_range: (DEFAULT_MIN_FORCE, DEFAULT_MAX_FORCE),
            trail_deposit: DEFAULT_TRAIL_DEPOSIT,
            debug: false,
        }
    }
}

impl FlowConfig {
    /// Reads a config from JSON params over a `width × height` plane.
    ///
    /// Missing or wrongly-typed keys fall back to defaults, except
    /// `vehicle_count`, which must be a non-negative integer when present.
    pub fn from_json(width: f64, height: f64, params: &Value) -> Result<Self, EngineError> {
        Ok(Self {
            width,
            height,
            resolution: param_f64(params, "resolution", DEFAULT_RESOLUTION),
            vehicle_count: param_count(params, "vehicle_count", DEFAULT_VEHICLE_COUNT)?,
            speed_range: (
                param_f64(params, "min_speed", DEFAULT_MIN_SPEED),
                param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            ),
            force_range: (
                param_f64(params, "min_force", DEFAULT_MIN_FORCE),
                param_f64(params, "max_force", DEFAULT_MAX_FORCE),
            ),
            trail_deposit: param_f64(params, "trail_deposit", DEFAULT_TRAIL_DEPOSIT)
                .clamp(0.0, 1.0),
            debug: param_bool(params, "debug", false),
        })
    }

    /// Checks the plane, resolution, and both limit ranges.
    pub fn validate(&self) -> Result<Plane, EngineError> {
        let plane = Plane::new(self.width, self.height)?;
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(EngineError::InvalidResolution(self.resolution));
        }
        validate_range("speed", self.speed_range.0, self.speed_range.1)?;
        validate_range("force", self.force_range.0, self.force_range.1)?;
        Ok(plane)
    }
}

/// Name and seed of a registry noise source, kept for `params()`.
#[derive(Debug, Clone, PartialEq)]
struct NoiseChoice {
    name: String,
    seed: u32,
}

/// Flow-following simulation driver.
pub struct FlowSim {
    config: FlowConfig,
    plane: Plane,
    field: FlowField,
    vehicles: Vec<Vehicle>,
    trail: Field,
    noise: Option<NoiseChoice>,
    ticks: u64,
}

impl FlowSim {
    /// Validates `config`, builds the field from `noise`, and spawns
    /// `config.vehicle_count` vehicles at random positions with random limits
    /// drawn from `rng`.
    ///
    /// Nothing is constructed unless the whole config is valid.
    pub fn initialize<N>(
        config: FlowConfig,
        noise: &N,
        rng: &mut Xorshift64,
    ) -> Result<Self, EngineError>
    where
        N: NoiseSource + ?Sized,
    {
        let plane = config.validate()?;
        let field = FlowField::build(noise, plane.width(), plane.height(), config.resolution)?;
        let trail = Field::for_plane(plane.width(), plane.height())?;

        let (min_speed, max_speed) = config.speed_range;
        let (min_force, max_force) = config.force_range;
        let vehicles: Vec<Vehicle> = (0..config.vehicle_count)
            .map(|_| {
                let position = plane.random_point(rng);
                let speed = rng.next_range(min_speed, max_speed);
                let force = rng.next_range(min_force, max_force);
                Vehicle::new(position, speed, force)
            })
            .collect();

        tracing::debug!(
            vehicles = vehicles.len(),
            cols = field.cols(),
            rows = field.rows(),
            "flow simulation initialized"
        );

        Ok(Self {
            config,
            plane,
            field,
            vehicles,
            trail,
            noise: None,
            ticks: 0,
        })
    }

    /// Assembles a simulation from a prebuilt field and vehicle list.
    ///
    /// The vehicle count of `config` is replaced by `vehicles.len()` and its
    /// resolution by the field's. Returns `EngineError::InvalidDimensions`
    /// when the field was built for a different plane.
    pub fn from_parts(
        mut config: FlowConfig,
        field: FlowField,
        vehicles: Vec<Vehicle>,
    ) -> Result<Self, EngineError> {
        config.vehicle_count = vehicles.len();
        config.resolution = field.resolution();
        let plane = config.validate()?;
        let shape = flow_field::grid_shape(plane.width(), plane.height(), field.resolution());
        if shape != (field.cols(), field.rows()) {
            return Err(EngineError::InvalidDimensions);
        }
        let trail = Field::for_plane(plane.width(), plane.height())?;
        let vehicles = vehicles
            .into_iter()
            .map(|mut v| {
                v.wrap_onto(&plane);
                v
            })
            .collect();
        Ok(Self {
            config,
            plane,
            field,
            vehicles,
            trail,
            noise: None,
            ticks: 0,
        })
    }

    /// Builds from CLI/registry JSON params.
    ///
    /// `noise` picks the source (see [`NOISE_NAMES`]); `noise_seed` defaults to
    /// the low 32 bits of `seed` folded with the high ones.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        let config = FlowConfig::from_json(width as f64, height as f64, params)?;
        let name = param_string(params, "noise", DEFAULT_NOISE);
        let noise_seed = param_u32(params, "noise_seed", fold_seed(seed));
        let noise = noise_from_name(&name, noise_seed)?;
        let mut rng = Xorshift64::new(seed);
        let mut sim = Self::initialize(config, &*noise, &mut rng)?;
        sim.noise = Some(NoiseChoice {
            name,
            seed: noise_seed,
        });
        Ok(sim)
    }

    /// Runs one tick: every vehicle follows the field, then integrates.
    pub fn tick(&mut self) {
        let deposit = self.config.trail_deposit;
        for vehicle in &mut self.vehicles {
            vehicle.follow(&self.field);
            vehicle.integrate(&self.plane);
            let p = vehicle.position();
            self.trail.deposit(p.x, p.y, deposit);
        }
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, "flow tick");
    }

    /// Rebuilds a field from `noise` with this run's plane and resolution.
    ///
    /// With the noise the run was started with, the result equals
    /// [`FlowSim::flow_field`] bit for bit: ticking never touches the field.
    pub fn rebuild_field<N>(&self, noise: &N) -> Result<FlowField, EngineError>
    where
        N: NoiseSource + ?Sized,
    {
        FlowField::build(
            noise,
            self.plane.width(),
            self.plane.height(),
            self.config.resolution,
        )
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn flow_field(&self) -> &FlowField {
        &self.field
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Every field cell, for a debug overlay.
    pub fn field_view(&self) -> impl Iterator<Item = CellView> + '_ {
        self.field.views()
    }

    /// Position and heading of every vehicle.
    pub fn vehicle_view(&self) -> Vec<AgentView> {
        self.vehicles.iter().map(Vehicle::view).collect()
    }
}

impl Engine for FlowSim {
    fn step(&mut self) -> Result<(), EngineError> {
        self.tick();
        Ok(())
    }

    fn field(&self) -> &Field {
        &self.trail
    }

    fn params(&self) -> Value {
        let (noise, noise_seed) = match &self.noise {
            Some(choice) => (choice.name.as_str(), Some(choice.seed)),
            None => ("custom", None),
        };
        json!({
            "resolution": self.config.resolution,
            "vehicle_count": self.vehicles.len(),
            "min_speed": self.config.speed_range.0,
            "max_speed": self.config.speed_range.1,
            "min_force": self.config.force_range.0,
            "max_force": self.config.force_range.1,
            "trail_deposit": self.config.trail_deposit,
            "noise": noise,
            "noise_seed": noise_seed,
            "debug": self.config.debug,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "resolution": {
                "type": "number",
                "default": DEFAULT_RESOLUTION,
                "min": 1.0,
                "max": 200.0,
                "description": "Flow field cell size in plane units"
            },
            "vehicle_count": {
                "type": "integer",
                "default": DEFAULT_VEHICLE_COUNT,
                "min": 0,
                "max": 10000,
                "description": "Number of vehicles, fixed for the run"
            },
            "min_speed": {
                "type": "number",
                "default": DEFAULT_MIN_SPEED,
                "min": 0.1,
                "max": 20.0,
                "description": "Lower bound of per-vehicle max speed"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "min": 0.1,
                "max": 20.0,
                "description": "Upper bound of per-vehicle max speed"
            },
            "min_force": {
                "type": "number",
                "default": DEFAULT_MIN_FORCE,
                "min": 0.01,
                "max": 5.0,
                "description": "Lower bound of per-vehicle max steering force"
            },
            "max_force": {
                "type": "number",
                "default": DEFAULT_MAX_FORCE,
                "min": 0.01,
                "max": 5.0,
                "description": "Upper bound of per-vehicle max steering force"
            },
            "trail_deposit": {
                "type": "number",
                "default": DEFAULT_TRAIL_DEPOSIT,
                "min": 0.0,
                "max": 1.0,
                "description": "Trail intensity left under each vehicle per tick"
            },
            "noise": {
                "type": "string",
                "default": DEFAULT_NOISE,
                "options": NOISE_NAMES,
                "description": "Noise source the flow field is sampled from"
            },
            "noise_seed": {
                "type": "integer",
                "default": "derived from seed",
                "description": "Seed for the noise source"
            },
            "debug": {
                "type": "boolean",
                "default": false,
                "description": "Include flow field cells in renderer output"
            }
        })
    }

    fn agents(&self) -> Vec<AgentView> {
        self.vehicle_view()
    }

    fn debug_view(&self) -> Option<Value> {
        let cells: Vec<CellView> = self.field_view().collect();
        Some(json!({
            "resolution": self.field.resolution(),
            "cols": self.field.cols(),
            "rows": self.field.rows(),
            "cells": cells,
        }))
    }
}
