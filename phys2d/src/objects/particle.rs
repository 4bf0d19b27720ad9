// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Point-mass dynamics
//!
//! A [`Particle`] carries the linear state shared by every simulated object:
//! position, velocity, a force accumulator, mass, damping, motion type and
//! sleep state. [`Body`](crate::Body) builds rotation and shapes on top of it.

use crate::events::{BodyEvent, ListenerId, Observers};
use crate::math::DVec2;

/// How an object participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionType {
    /// Never moves; ignores forces and impulses
    Static,
    /// Moves by its velocity; infinite mass unless given one
    Kinematic,
    /// Fully simulated
    Dynamic,
}

/// Sleep bookkeeping state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepState {
    /// Integrated normally
    Awake,
    /// Below the sleep thresholds, waiting to fall asleep
    Sleepy,
    /// Position integration is skipped until woken
    Sleeping,
}

/// Point mass with semi-implicit Euler integration
///
/// # Examples
///
/// ```
/// use phys2d::{MotionType, Particle};
/// use phys2d::math::DVec2;
///
/// let mut p = Particle::new(2.0).with_velocity(DVec2::new(1.0, 0.0));
/// assert_eq!(p.motion_type(), MotionType::Dynamic);
/// assert_eq!(p.inv_mass(), 0.5);
///
/// p.update(0.5);
/// assert_eq!(p.position(), DVec2::new(0.5, 0.0));
/// ```
#[derive(Debug)]
pub struct Particle {
    position: DVec2,
    velocity: DVec2,
    force: DVec2,
    mass: f64,
    inv_mass: f64,
    linear_damping: f64,
    motion_type: MotionType,
    sleep_state: SleepState,
    observers: Observers<BodyEvent>,
}

impl Particle {
    /// Create a particle at the origin
    ///
    /// A positive mass makes it Dynamic, anything else Static.
    pub fn new(mass: f64) -> Self {
        let mass = if mass.is_finite() && mass > 0.0 { mass } else { 0.0 };
        let motion_type = if mass > 0.0 {
            MotionType::Dynamic
        } else {
            MotionType::Static
        };
        let mut particle = Particle {
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            force: DVec2::ZERO,
            mass,
            inv_mass: 0.0,
            linear_damping: 0.0,
            motion_type,
            sleep_state: SleepState::Awake,
            observers: Observers::new(),
        };
        particle.refresh_inv_mass();
        particle
    }

    /// Set the initial position
    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the linear damping coefficient
    pub fn with_linear_damping(mut self, damping: f64) -> Self {
        self.set_linear_damping(damping);
        self
    }

    /// Override the motion type derived from the mass
    pub fn with_motion_type(mut self, motion_type: MotionType) -> Self {
        self.motion_type = motion_type;
        self.refresh_inv_mass();
        self
    }

    /// Get the position
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Set the position
    pub fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Get the velocity
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Set the velocity
    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    /// Get the force accumulated since the last integration
    pub fn force(&self) -> DVec2 {
        self.force
    }

    /// Overwrite the force accumulator
    pub(crate) fn set_force(&mut self, force: DVec2) {
        self.force = force;
    }

    /// Add to the force accumulator without touching the sleep state
    pub(crate) fn accumulate_force(&mut self, force: DVec2) {
        self.force += force;
    }

    /// Get the mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Get the inverse mass (0 for infinite mass)
    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    /// Set the mass
    ///
    /// Negative or non-finite values are rejected with a warning.
    pub fn set_mass(&mut self, mass: f64) {
        if !mass.is_finite() || mass < 0.0 {
            log::warn!("Particle::set_mass: ignoring invalid mass {mass}");
            return;
        }
        self.mass = mass;
        self.refresh_inv_mass();
    }

    /// Get the linear damping coefficient
    pub fn linear_damping(&self) -> f64 {
        self.linear_damping
    }

    /// Set the linear damping coefficient, clamped to `[0, 1]`
    pub fn set_linear_damping(&mut self, damping: f64) {
        self.linear_damping = clamp_damping(damping);
    }

    /// Get the motion type
    pub fn motion_type(&self) -> MotionType {
        self.motion_type
    }

    /// Change the motion type
    ///
    /// Clears velocity and force and wakes the particle. No-op if unchanged.
    pub fn set_motion_type(&mut self, motion_type: MotionType) {
        if self.motion_type == motion_type {
            return;
        }
        self.motion_type = motion_type;
        self.velocity = DVec2::ZERO;
        self.force = DVec2::ZERO;
        self.refresh_inv_mass();
        self.wake();
    }

    /// Get the sleep state
    pub fn sleep_state(&self) -> SleepState {
        self.sleep_state
    }

    pub(crate) fn set_sleepy(&mut self) {
        if self.sleep_state == SleepState::Awake {
            self.sleep_state = SleepState::Sleepy;
        }
    }

    pub(crate) fn clear_sleepy(&mut self) {
        if self.sleep_state == SleepState::Sleepy {
            self.sleep_state = SleepState::Awake;
        }
    }

    /// Whether the particle is awake
    pub fn is_awake(&self) -> bool {
        self.sleep_state == SleepState::Awake
    }

    /// Whether the particle is sleeping
    pub fn is_sleeping(&self) -> bool {
        self.sleep_state == SleepState::Sleeping
    }

    /// Whether the motion type is Dynamic
    pub fn is_dynamic(&self) -> bool {
        self.motion_type == MotionType::Dynamic
    }

    /// Whether the motion type is Static
    pub fn is_static(&self) -> bool {
        self.motion_type == MotionType::Static
    }

    /// Whether the motion type is Kinematic
    pub fn is_kinematic(&self) -> bool {
        self.motion_type == MotionType::Kinematic
    }

    /// Wake the particle, emitting [`BodyEvent::Wake`] if it was not awake
    pub fn wake(&mut self) {
        if self.sleep_state != SleepState::Awake {
            self.sleep_state = SleepState::Awake;
            self.observers.emit(&BodyEvent::Wake);
        }
    }

    /// Put the particle to sleep, emitting [`BodyEvent::Sleep`] if it was not sleeping
    pub fn sleep(&mut self) {
        if self.sleep_state != SleepState::Sleeping {
            self.sleep_state = SleepState::Sleeping;
            self.observers.emit(&BodyEvent::Sleep);
        }
    }

    /// Add a force through the center of mass
    ///
    /// Wakes the particle first. Ignored for Static particles.
    pub fn apply_force(&mut self, force: DVec2) {
        if self.is_static() {
            return;
        }
        if !self.is_awake() {
            self.wake();
        }
        self.force += force;
    }

    /// Apply an instantaneous change of momentum
    ///
    /// Wakes the particle first. Ignored for Static particles.
    pub fn apply_impulse(&mut self, impulse: DVec2) {
        if self.is_static() {
            return;
        }
        if !self.is_awake() {
            self.wake();
        }
        self.velocity += impulse * self.inv_mass;
    }

    /// Advance the particle by `dt`
    ///
    /// `v += f * inv_mass * dt`, then the accumulator is cleared and damping
    /// applied; the position only moves while not sleeping.
    pub fn update(&mut self, dt: f64) {
        if self.is_static() {
            return;
        }
        self.integrate_velocity(dt);
        if !self.is_sleeping() {
            self.integrate_position(dt);
        }
    }

    pub(crate) fn integrate_velocity(&mut self, dt: f64) {
        self.velocity += self.force * self.inv_mass * dt;
        self.force = DVec2::ZERO;
        self.velocity *= damping_factor(self.linear_damping, dt);
    }

    pub(crate) fn integrate_position(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Kinetic energy of the linear motion (0 for infinite mass)
    pub fn kinetic_energy(&self) -> f64 {
        if self.inv_mass == 0.0 {
            return 0.0;
        }
        0.5 * self.mass * self.velocity.length_squared()
    }

    /// Subscribe to wake/sleep and shape notifications
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&BodyEvent) + Send + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Remove a listener
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub(crate) fn emit(&mut self, event: BodyEvent) {
        self.observers.emit(&event);
    }

    fn refresh_inv_mass(&mut self) {
        self.inv_mass = if self.mass > 0.0 && !self.is_static() {
            1.0 / self.mass
        } else {
            0.0
        };
    }
}

impl Default for Particle {
    fn default() -> Self {
        Particle::new(0.0)
    }
}

pub(crate) fn clamp_damping(damping: f64) -> f64 {
    if damping.is_finite() {
        damping.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Exponential damping `(1 - c)^dt`
pub(crate) fn damping_factor(coefficient: f64, dt: f64) -> f64 {
    if coefficient == 0.0 {
        1.0
    } else {
        (1.0 - coefficient).powf(dt)
    }
}
