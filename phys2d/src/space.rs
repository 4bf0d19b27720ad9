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
//! The simulation world
//!
//! A [`Space`] owns its bodies and advances them with [`Space::update`].
//! Each step runs, in order:
//!
//! 1. gravity: every body's force accumulator is overwritten with
//!    `gravity * mass` (bodies visited last to first)
//! 2. registered [`ForceProvider`]s add their contributions
//! 3. the broadphase produces candidate pairs
//! 4. the narrowphase turns them into contacts
//! 5. the installed [`ContactResolver`], if any, responds to the contacts
//! 6. every body is integrated (last to first), then auto-sleep is updated
//!
//! Bodies are stored densely; the indices in [`Contact`] and
//! [`Candidate`] refer to [`Space::bodies`] and stay valid until the next
//! add or remove.

use crate::collision::{Broadphase, BruteForceBroadphase, Candidate, Contact, Nearphase};
use crate::error::ResolverError;
use crate::events::{ListenerId, Observers, SpaceEvent};
use crate::forces::{ForceProvider, ForceRegistry, DEFAULT_MAX_FORCE_MAGNITUDE};
use crate::handle::{BodyHandle, HandleAllocator, ShapeId};
use crate::math::DVec2;
use crate::objects::Body;
use crate::resolver::{check_compatibility, ContactResolver};

/// Default gravitational acceleration
pub const DEFAULT_GRAVITY: DVec2 = DVec2::new(0.0, -9.801);

/// Automatic sleep settings
///
/// Disabled by default: bodies only sleep when told to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepConfig {
    /// Whether idle Dynamic bodies are put to sleep
    pub enabled: bool,
    /// Speed below which a body counts as idle
    pub linear_threshold: f64,
    /// Angular speed below which a body counts as idle
    pub angular_threshold: f64,
    /// Idle time before a body falls asleep, in seconds
    pub time_to_sleep: f64,
}

impl SleepConfig {
    /// Enable or disable automatic sleep
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the idle thresholds
    pub fn with_thresholds(mut self, linear: f64, angular: f64) -> Self {
        self.linear_threshold = linear;
        self.angular_threshold = angular;
        self
    }

    /// Set the idle time before sleeping
    pub fn with_time_to_sleep(mut self, seconds: f64) -> Self {
        self.time_to_sleep = seconds;
        self
    }
}

impl Default for SleepConfig {
    fn default() -> Self {
        SleepConfig {
            enabled: false,
            linear_threshold: 0.05,
            angular_threshold: 0.05,
            time_to_sleep: 0.5,
        }
    }
}

/// Configuration for a [`Space`]
///
/// # Examples
///
/// ```
/// use phys2d::{Space, SpaceConfig};
/// use phys2d::math::DVec2;
///
/// let config = SpaceConfig::new()
///     .with_gravity(DVec2::new(0.0, -1.62))
///     .with_capacity(64, 256);
/// let space = Space::with_config(config);
/// assert_eq!(space.gravity(), DVec2::new(0.0, -1.62));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceConfig {
    /// Gravitational acceleration applied to every body
    pub gravity: DVec2,
    /// Automatic sleep settings
    pub sleep: SleepConfig,
    /// Initial capacity of each candidate pair list
    pub pair_capacity: usize,
    /// Initial capacity of the contact list
    pub contact_capacity: usize,
    /// Clamp for the combined force of the registered providers
    pub max_force_magnitude: f64,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        SpaceConfig {
            gravity: DEFAULT_GRAVITY,
            sleep: SleepConfig::default(),
            pair_capacity: 128,
            contact_capacity: 256,
            max_force_magnitude: DEFAULT_MAX_FORCE_MAGNITUDE,
        }
    }
}

impl SpaceConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gravity
    pub fn with_gravity(mut self, gravity: DVec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the automatic sleep settings
    pub fn with_sleep(mut self, sleep: SleepConfig) -> Self {
        self.sleep = sleep;
        self
    }

    /// Set the initial pair and contact capacities
    pub fn with_capacity(mut self, pairs: usize, contacts: usize) -> Self {
        self.pair_capacity = pairs;
        self.contact_capacity = contacts;
        self
    }

    /// Set the provider force clamp
    pub fn with_max_force_magnitude(mut self, max: f64) -> Self {
        self.max_force_magnitude = max;
        self
    }
}

/// Container of bodies advanced together in time
pub struct Space {
    config: SpaceConfig,
    handles: HandleAllocator,
    bodies: Vec<Body>,
    broadphase: Box<dyn Broadphase>,
    nearphase: Nearphase,
    pairs_a: Vec<Candidate>,
    pairs_b: Vec<Candidate>,
    contacts: Vec<Contact>,
    forces: ForceRegistry,
    resolver: Option<Box<dyn ContactResolver>>,
    observers: Observers<SpaceEvent>,
    steps: u64,
}

impl Space {
    /// Create an empty space with default configuration
    ///
    /// # Examples
    ///
    /// ```
    /// use phys2d::{Body, Space};
    ///
    /// let mut space = Space::new();
    /// let ball = space.add_body(Body::new().with_mass(1.0));
    /// space.update(1.0 / 60.0);
    /// assert!(space.body(ball).unwrap().velocity().y < 0.0);
    /// ```
    pub fn new() -> Self {
        Space::with_config(SpaceConfig::default())
    }

    /// Create an empty space
    pub fn with_config(config: SpaceConfig) -> Self {
        let mut forces = ForceRegistry::new();
        forces.max_force_magnitude = config.max_force_magnitude;
        Space {
            config,
            handles: HandleAllocator::new(),
            bodies: Vec::new(),
            broadphase: Box::new(BruteForceBroadphase::new()),
            nearphase: Nearphase::new(),
            pairs_a: Vec::with_capacity(config.pair_capacity),
            pairs_b: Vec::with_capacity(config.pair_capacity),
            contacts: Vec::with_capacity(config.contact_capacity),
            forces,
            resolver: None,
            observers: Observers::new(),
            steps: 0,
        }
    }

    /// Replace the broadphase strategy
    pub fn with_broadphase(mut self, broadphase: Box<dyn Broadphase>) -> Self {
        self.broadphase = broadphase;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Get the gravity
    pub fn gravity(&self) -> DVec2 {
        self.config.gravity
    }

    /// Set the gravity
    pub fn set_gravity(&mut self, gravity: DVec2) {
        self.config.gravity = gravity;
    }

    /// Set the automatic sleep settings
    pub fn set_sleep_config(&mut self, sleep: SleepConfig) {
        self.config.sleep = sleep;
    }

    /// Register a body and return its handle
    ///
    /// The body's transform, shape placement and bounding box are computed
    /// and, for a Dynamic body with shapes, its mass data is derived.
    /// Emits [`SpaceEvent::BodyAdded`].
    pub fn add_body(&mut self, body: impl Into<Body>) -> BodyHandle {
        let mut body = body.into();
        let handle = self.handles.allocate();
        body.attach(handle);
        self.bodies.push(body);
        log::debug!("added {handle} ({} bodies)", self.bodies.len());
        self.observers.emit(&SpaceEvent::BodyAdded(handle));
        handle
    }

    /// Unregister a body and hand it back
    ///
    /// Returns `None` with a warning if the handle is not registered here.
    /// Emits [`SpaceEvent::BodyRemoved`].
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        let Some(index) = self.index_of(handle) else {
            log::warn!("Space::remove_body: {handle} is not in this space");
            return None;
        };
        let mut body = self.bodies.remove(index);
        body.detach();
        self.handles.retire(handle);
        log::debug!("removed {handle} ({} bodies)", self.bodies.len());
        self.observers.emit(&SpaceEvent::BodyRemoved(handle));
        Some(body)
    }

    /// Move a body into another space, returning its new handle there
    pub fn transfer_body(&mut self, handle: BodyHandle, target: &mut Space) -> Option<BodyHandle> {
        let body = self.remove_body(handle)?;
        Some(target.add_body(body))
    }

    /// Whether a handle is registered in this space
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.handles.is_alive(handle)
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        if !self.handles.is_alive(handle) {
            return None;
        }
        self.bodies.iter().position(|b| b.handle() == Some(handle))
    }

    /// Look up a body
    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.index_of(handle).map(|i| &self.bodies[i])
    }

    /// Look up a body mutably
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.index_of(handle).map(move |i| &mut self.bodies[i])
    }

    /// Registered bodies in registration order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Handles of the registered bodies in registration order
    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.iter().filter_map(|b| b.handle())
    }

    /// Number of registered bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Contacts found by the last step
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Candidate pairs found by the last step
    pub fn candidate_pairs(&self) -> (&[Candidate], &[Candidate]) {
        (&self.pairs_a, &self.pairs_b)
    }

    /// Number of completed steps
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Register a force provider
    pub fn add_force_provider(&mut self, provider: Box<dyn ForceProvider>) {
        log::debug!("registered force provider '{}'", provider.name());
        self.forces.register_provider(provider);
    }

    /// Registered force providers
    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    /// Install a contact resolver after checking its API version
    ///
    /// Replaces any previous resolver.
    pub fn set_resolver(&mut self, resolver: Box<dyn ContactResolver>) -> Result<(), ResolverError> {
        check_compatibility(resolver.as_ref())?;
        log::info!(
            "installed contact resolver '{}' v{}",
            resolver.name(),
            resolver.version()
        );
        self.resolver = Some(resolver);
        Ok(())
    }

    /// Remove and return the installed resolver
    pub fn take_resolver(&mut self) -> Option<Box<dyn ContactResolver>> {
        self.resolver.take()
    }

    /// Whether a resolver is installed
    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    /// Subscribe to body added/removed notifications
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&SpaceEvent) + Send + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Remove a listener
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Bodies and shapes containing a world point
    ///
    /// Shapeless bodies never match.
    pub fn point_query(&self, point: DVec2) -> Vec<(BodyHandle, ShapeId)> {
        let mut hits = Vec::new();
        for body in &self.bodies {
            let Some(handle) = body.handle() else {
                continue;
            };
            if !body.aabb().contains(point) {
                continue;
            }
            for (id, shape) in body.shapes() {
                if shape.point_query(point) {
                    hits.push((handle, id));
                }
            }
        }
        hits
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// A zero, negative or non-finite `dt` skips the step with a warning.
    pub fn update(&mut self, dt: f64) {
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("Space::update: skipping step with invalid dt {dt}");
            return;
        }

        let gravity = self.config.gravity;
        for body in self.bodies.iter_mut().rev() {
            let weight = gravity * body.mass();
            body.set_force(weight);
        }
        self.forces.apply(&mut self.bodies);

        self.broadphase
            .collisions(&self.bodies, &mut self.pairs_a, &mut self.pairs_b);
        self.nearphase.collisions(
            &self.bodies,
            &self.pairs_a,
            &self.pairs_b,
            &mut self.contacts,
        );

        if let Some(resolver) = self.resolver.as_mut() {
            if let Err(err) = resolver.resolve(&mut self.bodies, &self.contacts, dt) {
                log::warn!("contact resolver '{}' failed: {err}", resolver.name());
            }
        }

        let sleep = self.config.sleep;
        for body in self.bodies.iter_mut().rev() {
            body.update(dt);
            body.update_sleep(&sleep, dt);
        }

        self.steps += 1;
        log::trace!(
            "step {}: {} bodies, {} pairs, {} contacts",
            self.steps,
            self.bodies.len(),
            self.pairs_a.len(),
            self.contacts.len()
        );
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Space")
            .field("config", &self.config)
            .field("bodies", &self.bodies.len())
            .field("contacts", &self.contacts.len())
            .field("forces", &self.forces)
            .field("resolver", &self.resolver.as_ref().map(|r| r.name().to_string()))
            .field("steps", &self.steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SpaceEvent;
    use crate::objects::{Circle, MotionType};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_add_and_remove_body() {
        let mut space = Space::new();
        let handle = space.add_body(Body::new().with_shape(Circle::new(1.0)));
        assert!(space.contains(handle));
        assert_eq!(space.body_count(), 1);
        assert!(space.body(handle).unwrap().is_registered());

        let body = space.remove_body(handle).unwrap();
        assert!(!body.is_registered());
        assert!(!space.contains(handle));
        assert!(space.remove_body(handle).is_none());
    }

    #[test]
    fn test_transfer_body() {
        let mut a = Space::new();
        let mut b = Space::new();
        let handle = a.add_body(Body::new().with_mass(1.0));
        let moved = a.transfer_body(handle, &mut b).unwrap();
        assert_eq!(a.body_count(), 0);
        assert!(b.contains(moved));
        assert_eq!(b.body(moved).unwrap().mass(), 1.0);
    }

    #[test]
    fn test_space_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut space = Space::new();
        let sink = Arc::clone(&events);
        space.subscribe(move |e| sink.lock().unwrap().push(*e));

        let handle = space.add_body(Body::new());
        space.remove_body(handle);
        assert_eq!(
            *events.lock().unwrap(),
            vec![SpaceEvent::BodyAdded(handle), SpaceEvent::BodyRemoved(handle)]
        );
    }

    #[test]
    fn test_invalid_dt_is_skipped() {
        let mut space = Space::new();
        let handle = space.add_body(Body::new().with_mass(1.0));
        space.update(0.0);
        space.update(f64::NAN);
        space.update(-1.0);
        assert_eq!(space.step_count(), 0);
        assert_eq!(space.body(handle).unwrap().velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_gravity_overwrites_force() {
        let mut space = Space::new();
        let handle = space.add_body(Body::new().with_mass(2.0));
        space
            .body_mut(handle)
            .unwrap()
            .apply_force(DVec2::new(5.0, 0.0), None);
        space.update(1.0);
        let v = space.body(handle).unwrap().velocity();
        assert_eq!(v.x, 0.0);
        assert!((v.y + 9.801).abs() < 1e-12);
    }

    #[test]
    fn test_static_body_stays_put() {
        let mut space = Space::new();
        let ground = space.add_body(
            Body::new()
                .with_motion_type(MotionType::Static)
                .with_shape(Circle::new(1.0)),
        );
        for _ in 0..10 {
            space.update(1.0 / 60.0);
        }
        assert_eq!(space.body(ground).unwrap().position(), DVec2::ZERO);
    }

    #[test]
    fn test_point_query() {
        let mut space = Space::new();
        let handle = space.add_body(
            Body::new()
                .with_position(DVec2::new(5.0, 0.0))
                .with_shape(Circle::new(1.0)),
        );
        space.add_body(Body::new().with_mass(1.0));

        let hits = space.point_query(DVec2::new(5.5, 0.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, handle);
        assert!(space.point_query(DVec2::new(0.0, 0.0)).is_empty());
    }
}
