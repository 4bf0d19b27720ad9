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
//! Error types for the few fallible entry points
//!
//! The simulation step itself never fails; these errors surface only from
//! explicit constructors and configuration calls.

use thiserror::Error;

/// Failure to build a convex hull from a point set
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HullError {
    /// Fewer than three points were supplied
    #[error("convex hull needs at least 3 points, got {0}")]
    TooFewPoints(usize),
    /// A point had a NaN or infinite coordinate
    #[error("point {0} is not finite")]
    NonFinitePoint(usize),
    /// The walk did not return to its start within `n` steps
    #[error("gift wrapping did not close after {0} steps")]
    DidNotClose(usize),
    /// The wrapped loop failed convexity validation (e.g. all points collinear)
    #[error("gift wrapping produced an invalid loop of {0} vertices")]
    InvalidHull(usize),
}

/// Failure reported by or about a contact resolver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolverError {
    /// The resolver targets an incompatible resolver API version
    #[error("resolver '{name}' API version {found} is incompatible with engine API version {expected}")]
    IncompatibleVersion {
        /// Resolver name
        name: String,
        /// Version the resolver declared
        found: String,
        /// Version the engine provides
        expected: String,
    },
    /// The resolver failed during a step
    #[error("resolver '{name}' failed: {reason}")]
    Failed {
        /// Resolver name
        name: String,
        /// Reason given by the resolver
        reason: String,
    },
}
