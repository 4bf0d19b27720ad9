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
//! Object identity
//!
//! Bodies are identified by generational handles handed out by the space that
//! owns them, and shapes by ids handed out by the body that owns them. There
//! is no process-wide counter: each allocator belongs to exactly one owner.

use std::collections::HashSet;
use std::fmt;

/// Handle to a body registered in a [`Space`](crate::Space)
///
/// The generation is bumped when a slot is retired, so a handle kept after
/// `remove_body` never refers to a later body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    id: u64,
    generation: u32,
}

impl BodyHandle {
    /// Create a handle from raw parts
    pub fn new(id: u64, generation: u32) -> Self {
        BodyHandle { id, generation }
    }

    /// Get the raw id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({}, gen: {})", self.id, self.generation)
    }
}

/// Id of a shape within its owning body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u32);

impl ShapeId {
    /// Create an id from a raw value
    pub fn new(id: u32) -> Self {
        ShapeId(id)
    }

    /// Get the raw value
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({})", self.0)
    }
}

/// Monotonic generational allocator for body handles
///
/// Ids are never reused; the generation table exists so that a retired id
/// can be told apart from a live one even if raw handles are constructed by
/// hand.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next_id: u64,
    generations: Vec<u32>,
    alive: HashSet<BodyHandle>,
}

impl HandleAllocator {
    /// Create an empty allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh handle
    pub fn allocate(&mut self) -> BodyHandle {
        let id = self.next_id;
        self.next_id += 1;

        if id as usize >= self.generations.len() {
            self.generations.resize(id as usize + 1, 0);
        }

        let handle = BodyHandle::new(id, self.generations[id as usize]);
        self.alive.insert(handle);
        handle
    }

    /// Retire a handle; returns false if it was not alive
    pub fn retire(&mut self, handle: BodyHandle) -> bool {
        if !self.alive.remove(&handle) {
            return false;
        }
        let id = handle.id() as usize;
        if id < self.generations.len() {
            self.generations[id] = self.generations[id].wrapping_add(1);
        }
        true
    }

    /// Check if a handle is alive
    pub fn is_alive(&self, handle: BodyHandle) -> bool {
        self.alive.contains(&handle)
    }

    /// Number of live handles
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Whether no handles are alive
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }
}
