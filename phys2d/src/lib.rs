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
//! # phys2d
//!
//! A small 2D rigid-body physics core.
//!
//! ## Features
//!
//! - **Bodies and shapes**: circles, annuli and convex polygons attached to
//!   rigid bodies, with mass and inertia derived from shape density
//! - **Convex hulls**: invalid polygon input is repaired by gift wrapping
//! - **Collision detection**: all-pairs broadphase pruned by sleep state,
//!   motion type and bounding boxes; exact circle and polygon contacts
//! - **Integration**: semi-implicit Euler with exponential damping and
//!   optional automatic sleep
//! - **Extensibility**: pluggable force providers and contact resolvers
//!
//! Contacts are detected every step but not resolved unless a
//! [`ContactResolver`] is installed.
//!
//! ## Example
//!
//! ```rust
//! use phys2d::{Body, Circle, Convex, MotionType, Space};
//! use phys2d::math::DVec2;
//!
//! let mut space = Space::new();
//! space.add_body(
//!     Body::new()
//!         .with_motion_type(MotionType::Static)
//!         .with_shape(Convex::with_extents(DVec2::new(10.0, 0.5))),
//! );
//! let ball = space.add_body(
//!     Body::new()
//!         .with_position(DVec2::new(0.0, 0.9))
//!         .with_shape(Circle::new(0.5)),
//! );
//!
//! space.update(1.0 / 60.0);
//! assert_eq!(space.contacts().len(), 1);
//! assert!(space.body(ball).unwrap().velocity().y < 0.0);
//! ```

#![warn(missing_docs)]

/// Collision detection: broadphase, narrowphase and contacts
pub mod collision;

/// Error types
pub mod error;

/// Body and space notifications
pub mod events;

/// External force providers
pub mod forces;

/// Body handles and shape ids
pub mod handle;

/// Vectors, transforms and bounding boxes
pub mod math;

/// Particles, bodies and shapes
pub mod objects;

/// Pluggable contact response
pub mod resolver;

/// The simulation world
pub mod space;

pub use collision::Contact;
pub use error::{HullError, ResolverError};
pub use events::{BodyEvent, ListenerId, SpaceEvent};
pub use forces::{AppliedForce, ForceProvider};
pub use handle::{BodyHandle, ShapeId};
pub use objects::{Body, Circle, Convex, MotionType, Particle, Shape, ShapeParams, SleepState};
pub use resolver::{ContactResolver, RESOLVER_API_VERSION};
pub use space::{SleepConfig, Space, SpaceConfig};
