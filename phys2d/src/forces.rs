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
//! External force providers
//!
//! Providers are evaluated once per step, after gravity has been written
//! into each body's force accumulator. Their contributions are added on top
//! and never change a body's sleep state.

use crate::math::DVec2;
use crate::objects::Body;

/// Default upper bound on the magnitude of a combined provider force
pub const DEFAULT_MAX_FORCE_MAGNITUDE: f64 = 1e10;

/// Force and torque contributed by a provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedForce {
    /// Linear force through the body position
    pub force: DVec2,
    /// Torque about the body position
    pub torque: f64,
}

impl AppliedForce {
    /// Create a force with torque
    pub fn new(force: DVec2, torque: f64) -> Self {
        AppliedForce { force, torque }
    }

    /// A pure linear force
    pub fn linear(force: DVec2) -> Self {
        AppliedForce::new(force, 0.0)
    }

    /// No force
    pub fn zero() -> Self {
        AppliedForce::new(DVec2::ZERO, 0.0)
    }

    /// Check if all components are finite
    pub fn is_valid(&self) -> bool {
        self.force.is_finite() && self.torque.is_finite()
    }

    /// Add another contribution
    pub fn add(&mut self, other: &AppliedForce) {
        self.force += other.force;
        self.torque += other.torque;
    }

    /// Magnitude of the linear part
    pub fn magnitude(&self) -> f64 {
        self.force.length()
    }
}

/// Source of forces applied every step
///
/// Wind, buoyancy, springs to a fixed anchor and scripted thrust are all
/// providers. Return `None` for bodies the provider does not affect.
pub trait ForceProvider: Send + Sync {
    /// Compute the force for one body
    fn compute_force(&self, body: &Body) -> Option<AppliedForce>;

    /// Name used in diagnostics
    fn name(&self) -> &str;
}

/// The same force for every Dynamic body
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantForce {
    name: String,
    force: AppliedForce,
}

impl ConstantForce {
    /// Create a named constant force
    pub fn new(name: impl Into<String>, force: AppliedForce) -> Self {
        ConstantForce {
            name: name.into(),
            force,
        }
    }
}

impl ForceProvider for ConstantForce {
    fn compute_force(&self, body: &Body) -> Option<AppliedForce> {
        body.is_dynamic().then_some(self.force)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered set of force providers
///
/// Invalid (NaN or infinite) contributions are skipped and the combined
/// force is clamped to [`ForceRegistry::max_force_magnitude`], both with a
/// warning.
pub struct ForceRegistry {
    providers: Vec<Box<dyn ForceProvider>>,
    /// Upper bound on the combined linear force per body
    pub max_force_magnitude: f64,
    /// Whether to log skipped or clamped contributions
    pub warn_on_invalid: bool,
}

impl ForceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ForceRegistry {
            providers: Vec::new(),
            max_force_magnitude: DEFAULT_MAX_FORCE_MAGNITUDE,
            warn_on_invalid: true,
        }
    }

    /// Register a provider
    pub fn register_provider(&mut self, provider: Box<dyn ForceProvider>) {
        self.providers.push(provider);
    }

    /// Remove every provider
    pub fn clear(&mut self) {
        self.providers.clear();
    }

    /// Number of registered providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Combine every provider's contribution for one body
    ///
    /// Returns `None` if no provider applied.
    pub fn accumulate_for_body(&self, body: &Body) -> Option<AppliedForce> {
        let mut total = AppliedForce::zero();
        let mut has_forces = false;

        for provider in &self.providers {
            let Some(force) = provider.compute_force(body) else {
                continue;
            };
            if !force.is_valid() {
                if self.warn_on_invalid {
                    log::warn!(
                        "force provider '{}' produced an invalid force for {:?}",
                        provider.name(),
                        body.handle()
                    );
                }
                continue;
            }
            total.add(&force);
            has_forces = true;
        }

        let magnitude = total.magnitude();
        if has_forces && magnitude > self.max_force_magnitude {
            if self.warn_on_invalid {
                log::warn!(
                    "total force magnitude {:.2e} exceeds limit {:.2e} for {:?}",
                    magnitude,
                    self.max_force_magnitude,
                    body.handle()
                );
            }
            total.force *= self.max_force_magnitude / magnitude;
        }

        has_forces.then_some(total)
    }

    /// Add provider forces to every non-Static body, in reverse order
    ///
    /// Returns the number of bodies that received a force.
    pub fn apply(&self, bodies: &mut [Body]) -> usize {
        if self.providers.is_empty() {
            return 0;
        }
        let mut applied = 0;
        for body in bodies.iter_mut().rev() {
            if body.is_static() {
                continue;
            }
            if let Some(force) = self.accumulate_for_body(body) {
                body.accumulate(force);
                applied += 1;
            }
        }
        applied
    }
}

impl Default for ForceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ForceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceRegistry")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("max_force_magnitude", &self.max_force_magnitude)
            .finish()
    }
}
