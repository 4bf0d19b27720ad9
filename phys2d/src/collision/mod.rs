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
//! Collision detection
//!
//! Detection runs in two passes each step: the [`broadphase`] prunes body
//! pairs by motion type, sleep state and bounding box, and the [`nearphase`]
//! turns the surviving shape pairs into [`Contact`]s.

pub mod broadphase;
pub mod contact;
pub mod nearphase;

pub use broadphase::{prune_pair, Broadphase, BruteForceBroadphase, Candidate};
pub use contact::Contact;
pub use nearphase::{Manifold, Nearphase, LINEAR_SLOP};
