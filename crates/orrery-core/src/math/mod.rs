// Copyright 2025 eraflo
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

//! Math primitives used by the simulation: 3D vectors and quaternions.
//!
//! All quantities are stored as `f64`: the integrator works in wall-clock
//! seconds and accumulates small per-tick increments, so the extra precision
//! matters more than SIMD-friendliness here.

mod quaternion;
mod vector;

pub use quaternion::Quaternion;
pub use vector::Vec3;

/// Tolerance used for near-zero checks in normalization and rotation scaling.
pub const EPSILON: f64 = 1e-9;
