//! Autonomous agents that steer along a flow field.
//!
//! Motion is explicit Euler with a unit time step: forces accumulate into
//! `acceleration`, [`Vehicle::integrate`] folds that into a speed-clamped
//! velocity, moves, wraps onto the plane, and clears the accumulator.

use crate::flow_field::FlowField;
use flowfield_core::{AgentView, DVec2, Plane};

/// Reynolds steering: the force that turns `velocity` toward `desired`,
/// limited to `max_force`.
///
/// A zero `velocity` is fine; nothing here normalizes it.
pub fn compute_steer(desired: DVec2, velocity: DVec2, max_force: f64) -> DVec2 {
    (desired - velocity).clamp_length_max(max_force)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    position: DVec2,
    velocity: DVec2,
    acceleration: DVec2,
    max_speed: f64,
    max_force: f64,
}

impl Vehicle {
    /// A vehicle at rest at `position`. Negative limits are treated as 0.
    pub fn new(position: DVec2, max_speed: f64, max_force: f64) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            max_speed: max_speed.max(0.0),
            max_force: max_force.max(0.0),
        }
    }

    /// Starts the vehicle moving, clamped to its speed limit.
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity.clamp_length_max(self.max_speed);
        self
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Forces applied since the last [`integrate`](Self::integrate).
    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn max_force(&self) -> f64 {
        self.max_force
    }

    /// Unit direction of travel, or zero when at rest.
    pub fn heading(&self) -> DVec2 {
        self.velocity.normalize_or_zero()
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            position: self.position,
            heading: self.heading(),
        }
    }

    /// Adds `force` to the accumulator.
    pub fn apply_force(&mut self, force: DVec2) {
        self.acceleration += force;
    }

    /// Steers toward the field direction under the vehicle, at full speed.
    ///
    /// Returns the applied steering force; its length never exceeds
    /// `max_force`.
    pub fn follow(&mut self, field: &FlowField) -> DVec2 {
        let desired = field.lookup(self.position) * self.max_speed;
        let steer = compute_steer(desired, self.velocity, self.max_force);
        self.apply_force(steer);
        steer
    }

    /// Moves the vehicle back onto `plane` without otherwise changing it.
    pub fn wrap_onto(&mut self, plane: &Plane) {
        self.position = plane.wrap(self.position);
    }

    /// One unit time step: accelerate, clamp speed, move, wrap, reset forces.
    pub fn integrate(&mut self, plane: &Plane) {
        self.velocity = (self.velocity + self.acceleration).clamp_length_max(self.max_speed);
        self.position = plane.wrap(self.position + self.velocity);
        self.acceleration = DVec2::ZERO;
    }
}
