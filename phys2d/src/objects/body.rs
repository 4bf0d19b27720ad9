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
//! Rigid bodies
//!
//! A [`Body`] extends a [`Particle`] with rotation, torque, rotational
//! inertia and an ordered list of shapes. Mass and inertia are derived from
//! the shapes when the body is Dynamic; the body's bounding box is the union
//! of its shapes' boxes.
//!
//! Bodies are plain values until they are moved into a
//! [`Space`](crate::Space). World data (transform, shape placement, bounding
//! box) is only maintained while registered.

use super::particle::{clamp_damping, damping_factor, MotionType, Particle, SleepState};
use super::shape::Shape;
use crate::events::{BodyEvent, ListenerId};
use crate::forces::AppliedForce;
use crate::handle::{BodyHandle, ShapeId};
use crate::math::{compose, cross, Aabb2, DAffine2, DVec2};
use crate::space::SleepConfig;

/// Rigid body with rotation and attached shapes
#[derive(Debug)]
pub struct Body {
    particle: Particle,
    rotation: f64,
    angular_velocity: f64,
    torque: f64,
    inertia: f64,
    inv_inertia: f64,
    angular_damping: f64,
    shapes: Vec<(ShapeId, Shape)>,
    next_shape_id: u32,
    transform: DAffine2,
    aabb: Aabb2,
    handle: Option<BodyHandle>,
    idle_time: f64,
}

impl Body {
    /// Create a Dynamic body at the origin with no shapes and zero mass
    ///
    /// # Examples
    ///
    /// ```
    /// use phys2d::{Body, Circle};
    /// use phys2d::math::DVec2;
    ///
    /// let mut body = Body::new().with_position(DVec2::new(0.0, 5.0));
    /// body.add_shape(Circle::new(1.0));
    /// assert_eq!(body.shape_count(), 1);
    /// ```
    pub fn new() -> Self {
        Body::from(Particle::new(0.0).with_motion_type(MotionType::Dynamic))
    }

    /// Set the initial position
    pub fn with_position(mut self, position: DVec2) -> Self {
        self.set_position(position);
        self
    }

    /// Set the initial rotation in radians
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.particle.set_velocity(velocity);
        self
    }

    /// Set the initial angular velocity
    pub fn with_angular_velocity(mut self, angular_velocity: f64) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Set the mass explicitly
    ///
    /// Shapes of a registered Dynamic body override this value.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.set_mass(mass);
        self
    }

    /// Set the moment of inertia explicitly
    pub fn with_inertia(mut self, inertia: f64) -> Self {
        self.set_inertia(inertia);
        self
    }

    /// Set the linear damping coefficient
    pub fn with_linear_damping(mut self, damping: f64) -> Self {
        self.particle.set_linear_damping(damping);
        self
    }

    /// Set the angular damping coefficient
    pub fn with_angular_damping(mut self, damping: f64) -> Self {
        self.set_angular_damping(damping);
        self
    }

    /// Set the motion type
    pub fn with_motion_type(mut self, motion_type: MotionType) -> Self {
        self.set_motion_type(motion_type);
        self
    }

    /// Attach a shape
    pub fn with_shape(mut self, shape: impl Into<Shape>) -> Self {
        self.add_shape(shape);
        self
    }

    /// Linear state
    pub fn particle(&self) -> &Particle {
        &self.particle
    }

    /// Get the position
    pub fn position(&self) -> DVec2 {
        self.particle.position()
    }

    /// Move the body, refreshing world data if registered
    pub fn set_position(&mut self, position: DVec2) {
        self.particle.set_position(position);
        self.refresh_placement();
    }

    /// Get the rotation in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Rotate the body, refreshing world data if registered
    pub fn set_rotation(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.refresh_placement();
    }

    /// Get the velocity
    pub fn velocity(&self) -> DVec2 {
        self.particle.velocity()
    }

    /// Set the velocity
    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.particle.set_velocity(velocity);
    }

    /// Get the angular velocity
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Set the angular velocity
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    /// Force accumulated since the last integration
    pub fn force(&self) -> DVec2 {
        self.particle.force()
    }

    /// Torque accumulated since the last integration
    pub fn torque(&self) -> f64 {
        self.torque
    }

    /// Get the mass
    pub fn mass(&self) -> f64 {
        self.particle.mass()
    }

    /// Get the inverse mass
    pub fn inv_mass(&self) -> f64 {
        self.particle.inv_mass()
    }

    /// Set the mass; invalid values are ignored with a warning
    pub fn set_mass(&mut self, mass: f64) {
        self.particle.set_mass(mass);
    }

    /// Get the moment of inertia
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Get the inverse moment of inertia
    pub fn inv_inertia(&self) -> f64 {
        self.inv_inertia
    }

    /// Set the moment of inertia; invalid values are ignored with a warning
    pub fn set_inertia(&mut self, inertia: f64) {
        if !inertia.is_finite() || inertia < 0.0 {
            log::warn!("Body::set_inertia: ignoring invalid inertia {inertia}");
            return;
        }
        self.inertia = inertia;
        self.refresh_inv_inertia();
    }

    /// Get the linear damping coefficient
    pub fn linear_damping(&self) -> f64 {
        self.particle.linear_damping()
    }

    /// Set the linear damping coefficient
    pub fn set_linear_damping(&mut self, damping: f64) {
        self.particle.set_linear_damping(damping);
    }

    /// Get the angular damping coefficient
    pub fn angular_damping(&self) -> f64 {
        self.angular_damping
    }

    /// Set the angular damping coefficient, clamped to `[0, 1]`
    pub fn set_angular_damping(&mut self, damping: f64) {
        self.angular_damping = clamp_damping(damping);
    }

    /// Get the motion type
    pub fn motion_type(&self) -> MotionType {
        self.particle.motion_type()
    }

    /// Change the motion type
    ///
    /// Clears linear and angular velocity, force and torque, then wakes the
    /// body. A registered body that becomes Dynamic re-derives its mass from
    /// its shapes.
    pub fn set_motion_type(&mut self, motion_type: MotionType) {
        if self.motion_type() == motion_type {
            return;
        }
        self.angular_velocity = 0.0;
        self.torque = 0.0;
        self.particle.set_motion_type(motion_type);
        self.refresh_inv_inertia();
        self.idle_time = 0.0;
        if self.is_registered() {
            self.reset_mass_data();
        }
    }

    /// Get the sleep state
    pub fn sleep_state(&self) -> SleepState {
        self.particle.sleep_state()
    }

    /// Whether the body is awake
    pub fn is_awake(&self) -> bool {
        self.particle.is_awake()
    }

    /// Whether the body is sleeping
    pub fn is_sleeping(&self) -> bool {
        self.particle.is_sleeping()
    }

    /// Whether the body is Dynamic
    pub fn is_dynamic(&self) -> bool {
        self.particle.is_dynamic()
    }

    /// Whether the body is Static
    pub fn is_static(&self) -> bool {
        self.particle.is_static()
    }

    /// Whether the body is Kinematic
    pub fn is_kinematic(&self) -> bool {
        self.particle.is_kinematic()
    }

    /// Wake the body
    pub fn wake(&mut self) {
        self.idle_time = 0.0;
        self.particle.wake();
    }

    /// Put the body to sleep
    pub fn sleep(&mut self) {
        self.particle.sleep();
    }

    /// Handle assigned by the owning space, if registered
    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    /// Whether the body belongs to a space
    pub fn is_registered(&self) -> bool {
        self.handle.is_some()
    }

    /// Body-to-world transform
    pub fn transform(&self) -> DAffine2 {
        self.transform
    }

    /// Union of the shapes' world boxes (a point box for a shapeless body)
    pub fn aabb(&self) -> Aabb2 {
        self.aabb
    }

    /// Attached shapes in insertion order
    pub fn shapes(
        &self,
    ) -> impl DoubleEndedIterator<Item = (ShapeId, &Shape)> + ExactSizeIterator + '_ {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    /// Look up a shape by id
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|(sid, _)| *sid == id).map(|(_, s)| s)
    }

    /// Mutable access to a shape
    ///
    /// Call [`Body::reset_mass_data`] after changing its density.
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes
            .iter_mut()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s)
    }

    pub(crate) fn shape_at(&self, index: usize) -> Option<(ShapeId, &Shape)> {
        self.shapes.get(index).map(|(id, s)| (*id, s))
    }

    /// Number of attached shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the body has no shapes
    pub fn has_shapes(&self) -> bool {
        !self.shapes.is_empty()
    }

    /// Attach a shape and return its id
    ///
    /// Emits [`BodyEvent::ShapeAdded`]. On a registered body the shape is
    /// placed immediately and mass data is re-derived.
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> ShapeId {
        let id = ShapeId::new(self.next_shape_id);
        self.next_shape_id += 1;
        self.shapes.push((id, shape.into()));
        self.particle.emit(BodyEvent::ShapeAdded(id));

        if self.is_registered() {
            self.refresh_world_data();
            self.reset_mass_data();
        }
        id
    }

    /// Detach a shape
    ///
    /// Returns `None` with a warning if the id is not attached. Emits
    /// [`BodyEvent::ShapeRemoved`] and, on a registered body, re-derives mass
    /// data and the bounding box.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let Some(index) = self.shapes.iter().position(|(sid, _)| *sid == id) else {
            log::warn!("Body::remove_shape: {id} is not attached");
            return None;
        };
        let (_, shape) = self.shapes.remove(index);
        self.particle.emit(BodyEvent::ShapeRemoved(id));

        if self.is_registered() {
            self.refresh_world_data();
            self.reset_mass_data();
        }
        Some(shape)
    }

    /// Add a force at a world point (the body position when `None`)
    ///
    /// An off-center force also adds torque `r x f`. Wakes the body first;
    /// ignored for Static bodies.
    pub fn apply_force(&mut self, force: DVec2, point: Option<DVec2>) {
        if self.is_static() {
            return;
        }
        self.wake_for_input();
        let r = point.map_or(DVec2::ZERO, |p| p - self.position());
        self.particle.accumulate_force(force);
        self.torque += cross(r, force);
    }

    /// Add a torque; wakes the body, ignored for Static bodies
    pub fn apply_torque(&mut self, torque: f64) {
        if self.is_static() {
            return;
        }
        self.wake_for_input();
        self.torque += torque;
    }

    /// Apply an impulse at a world point (the body position when `None`)
    ///
    /// `v += i * inv_mass` and `w += (r x i) * inv_inertia`. Wakes the body
    /// first; ignored for Static bodies.
    pub fn apply_impulse(&mut self, impulse: DVec2, point: Option<DVec2>) {
        if self.is_static() {
            return;
        }
        self.wake_for_input();
        let r = point.map_or(DVec2::ZERO, |p| p - self.position());
        let v = self.velocity() + impulse * self.inv_mass();
        self.particle.set_velocity(v);
        self.angular_velocity += cross(r, impulse) * self.inv_inertia;
    }

    fn wake_for_input(&mut self) {
        if !self.is_awake() {
            self.wake();
        }
    }

    /// Overwrite the force accumulator; used by the gravity pass
    pub(crate) fn set_force(&mut self, force: DVec2) {
        self.particle.set_force(force);
    }

    /// Add an externally computed force without changing the sleep state
    pub(crate) fn accumulate(&mut self, applied: AppliedForce) {
        self.particle.accumulate_force(applied.force);
        self.torque += applied.torque;
    }

    /// Re-derive mass and inertia from the shapes
    ///
    /// Only Dynamic bodies with at least one shape are affected; anything
    /// else keeps its explicitly set values. Inertia is shifted from the body
    /// origin to the center of mass.
    pub fn reset_mass_data(&mut self) {
        if !self.is_dynamic() || self.shapes.is_empty() {
            return;
        }

        let mut total_mass = 0.0;
        let mut total_inertia = 0.0;
        let mut weighted_center = DVec2::ZERO;
        for (_, shape) in self.shapes.iter().rev() {
            let mass = shape.mass();
            total_mass += mass;
            weighted_center += shape.centroid() * mass;
            total_inertia += shape.inertia(mass);
        }

        let center = if total_mass > 0.0 {
            weighted_center / total_mass
        } else {
            DVec2::ZERO
        };
        self.set_mass(total_mass);
        self.set_inertia((total_inertia - total_mass * center.length_squared()).max(0.0));
    }

    /// Prepare a freshly registered body
    pub(crate) fn attach(&mut self, handle: BodyHandle) {
        self.handle = Some(handle);
        self.refresh_world_data();
        self.reset_mass_data();
    }

    /// Clear the space back-reference; other state is left as is
    pub(crate) fn detach(&mut self) {
        self.handle = None;
    }

    /// Advance the body by `dt`
    ///
    /// Static bodies are skipped. Velocities integrate before positions
    /// (semi-implicit Euler), accumulators are cleared and damping applied.
    /// Sleeping bodies keep their position, rotation and world data.
    pub fn update(&mut self, dt: f64) {
        if self.is_static() {
            return;
        }

        self.particle.integrate_velocity(dt);
        self.angular_velocity += self.torque * self.inv_inertia * dt;
        self.torque = 0.0;
        self.angular_velocity *= damping_factor(self.angular_damping, dt);

        if !self.is_sleeping() {
            self.particle.integrate_position(dt);
            self.rotation += self.angular_velocity * dt;
            self.refresh_world_data();
        }
    }

    /// Track idle time and put the body to sleep once it has been still long enough
    pub(crate) fn update_sleep(&mut self, config: &SleepConfig, dt: f64) {
        if !config.enabled || !self.is_dynamic() || self.is_sleeping() {
            return;
        }

        let linear = config.linear_threshold;
        let still = self.velocity().length_squared() <= linear * linear
            && self.angular_velocity.abs() <= config.angular_threshold;
        if !still {
            self.idle_time = 0.0;
            self.particle.clear_sleepy();
            return;
        }

        self.idle_time += dt;
        self.particle.set_sleepy();
        if self.idle_time >= config.time_to_sleep {
            self.particle.set_velocity(DVec2::ZERO);
            self.angular_velocity = 0.0;
            self.particle.sleep();
        }
    }

    /// Linear plus rotational kinetic energy
    pub fn kinetic_energy(&self) -> f64 {
        let rotational = if self.inv_inertia == 0.0 {
            0.0
        } else {
            0.5 * self.inertia * self.angular_velocity * self.angular_velocity
        };
        self.particle.kinetic_energy() + rotational
    }

    /// Subscribe to body events
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&BodyEvent) + Send + 'static,
    {
        self.particle.subscribe(listener)
    }

    /// Remove a listener
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.particle.unsubscribe(id)
    }

    fn refresh_placement(&mut self) {
        if self.is_registered() {
            self.refresh_world_data();
        } else {
            self.transform = compose(self.position(), self.rotation);
        }
    }

    /// Recompose the transform, place every shape and rebuild the bounding box
    fn refresh_world_data(&mut self) {
        self.transform = compose(self.position(), self.rotation);
        if self.shapes.is_empty() {
            self.aabb = Aabb2::point(self.position());
            return;
        }

        self.aabb.clear();
        for (_, shape) in self.shapes.iter_mut().rev() {
            shape.update(&self.transform);
            self.aabb.union(&shape.aabb());
        }
    }

    fn refresh_inv_inertia(&mut self) {
        self.inv_inertia = if self.inertia > 0.0 && !self.is_static() {
            1.0 / self.inertia
        } else {
            0.0
        };
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::new()
    }
}

impl From<Particle> for Body {
    fn from(particle: Particle) -> Self {
        let transform = compose(particle.position(), 0.0);
        let aabb = Aabb2::point(particle.position());
        Body {
            particle,
            rotation: 0.0,
            angular_velocity: 0.0,
            torque: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            angular_damping: 0.0,
            shapes: Vec::new(),
            next_shape_id: 0,
            transform,
            aabb,
            handle: None,
            idle_time: 0.0,
        }
    }
}
