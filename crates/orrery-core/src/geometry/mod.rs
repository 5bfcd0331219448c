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

//! Geometric capability seam for the simulation.
//!
//! The physics tick never reasons about concrete shapes. It consumes the
//! narrow [`Solid`] interface (volume, drag coefficient, cross-section,
//! containment, overlap) and obtains solids by resolving a body's
//! [`GeometricProfile`] at the body's current location and rotation, once
//! per use. Spheres are the shipped shape.

mod profile;
mod solid;

pub use profile::{GeometricProfile, SphereProfile};
pub use solid::{Solid, Sphere};
