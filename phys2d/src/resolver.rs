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
//! Pluggable contact response
//!
//! The engine detects contacts but does not resolve them. A
//! [`ContactResolver`] installed on a [`Space`](crate::Space) receives the
//! bodies and the step's contacts after the narrowphase and before
//! integration, and may change velocities or apply impulses.
//!
//! # Versioning
//!
//! Resolvers declare the resolver API version they were built against.
//! Majors must match; for `0.x` versions the minor must match as well,
//! otherwise the resolver's minor may not exceed the engine's.

use crate::collision::Contact;
use crate::error::ResolverError;
use crate::objects::Body;
use semver::Version;

/// Version of the resolver API
pub const RESOLVER_API_VERSION: &str = "0.1.0";

/// Contact response strategy
pub trait ContactResolver: Send {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Resolver version (MAJOR.MINOR.PATCH)
    fn version(&self) -> &str;

    /// Resolver API version this resolver targets
    fn api_version(&self) -> &str {
        RESOLVER_API_VERSION
    }

    /// Respond to the contacts of one step
    ///
    /// `Contact::body_a`/`body_b` index into `bodies`. Errors are logged by
    /// the space and the step continues.
    fn resolve(
        &mut self,
        bodies: &mut [Body],
        contacts: &[Contact],
        dt: f64,
    ) -> Result<(), ResolverError>;
}

/// Check a resolver's declared API version against [`RESOLVER_API_VERSION`]
pub fn check_compatibility(resolver: &dyn ContactResolver) -> Result<(), ResolverError> {
    if is_version_compatible(resolver.api_version(), RESOLVER_API_VERSION) {
        Ok(())
    } else {
        Err(ResolverError::IncompatibleVersion {
            name: resolver.name().to_string(),
            found: resolver.api_version().to_string(),
            expected: RESOLVER_API_VERSION.to_string(),
        })
    }
}

fn is_version_compatible(resolver_version: &str, engine_version: &str) -> bool {
    let (Ok(resolver), Ok(engine)) = (
        Version::parse(resolver_version),
        Version::parse(engine_version),
    ) else {
        return false;
    };

    if resolver.major != engine.major {
        return false;
    }
    if resolver.major == 0 {
        resolver.minor == engine.minor
    } else {
        resolver.minor <= engine.minor
    }
}

/// Reflects the normal velocity of Dynamic bodies on approaching contacts
///
/// A minimal resolver: each penetrating contact gets a normal impulse that
/// stops (or with restitution, reverses) the approach. No friction, no
/// position correction.
#[derive(Debug, Clone, Default)]
pub struct ImpulseResolver;

impl ContactResolver for ImpulseResolver {
    fn name(&self) -> &str {
        "impulse"
    }

    fn version(&self) -> &str {
        "0.1.0"
    }

    fn resolve(
        &mut self,
        bodies: &mut [Body],
        contacts: &[Contact],
        _dt: f64,
    ) -> Result<(), ResolverError> {
        for contact in contacts.iter().filter(|c| c.is_penetrating()) {
            let (a, b) = (contact.body_a, contact.body_b);
            if a == b || a >= bodies.len() || b >= bodies.len() {
                return Err(ResolverError::Failed {
                    name: self.name().to_string(),
                    reason: format!("contact references bodies {a} and {b}"),
                });
            }

            let inv_mass_sum = bodies[a].inv_mass() + bodies[b].inv_mass();
            if inv_mass_sum == 0.0 {
                continue;
            }
            let relative = bodies[b].velocity() - bodies[a].velocity();
            let approach = relative.dot(contact.normal);
            if approach >= 0.0 {
                continue;
            }

            let j = -(1.0 + contact.restitution) * approach / inv_mass_sum;
            let impulse = contact.normal * j;
            bodies[a].apply_impulse(-impulse, None);
            bodies[b].apply_impulse(impulse, None);
        }
        Ok(())
    }
}
