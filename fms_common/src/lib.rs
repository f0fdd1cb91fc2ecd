/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

//! common foundations for the flight guidance crates: angles, great circle geometry on a
//! spherical earth, unit helpers and the logging macros used throughout the workspace

pub mod angle;
pub mod geo_constants;
pub mod geo;
pub mod uom;

// used by the logging macros below
pub use tracing;

// syntactic sugar - this is just more readable in many cases
#[inline(always)] pub fn sin(x:f64) -> f64 { x.sin() }
#[inline(always)] pub fn cos(x:f64) -> f64 { x.cos() }
#[inline(always)] pub fn tan(x:f64) -> f64 { x.tan() }
#[inline(always)] pub fn asin(x:f64) -> f64 { x.asin() }
#[inline(always)] pub fn acos(x:f64) -> f64 { x.clamp(-1.0, 1.0).acos() }
#[inline(always)] pub fn atan2(y:f64,x:f64) -> f64 { y.atan2(x) }
#[inline(always)] pub fn sqrt(x:f64) -> f64 { x.sqrt() }
#[inline(always)] pub fn pow2(x:f64) -> f64 { x*x }
#[inline(always)] pub fn deg(x:f64)->f64 { x.to_degrees() }
#[inline(always)] pub fn rad(x:f64)->f64 { x.to_radians() }

/// standard gravity in m/s²
pub const G_ACCEL: f64 = 9.80665;

/*
 * we intercept logging/tracing macros here to have a central place where we can remove/replace them 
 */

#[macro_export]
macro_rules! trace {
    ( $( $id:ident = $e:expr ),* ) => { $crate::tracing::trace!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { $crate::tracing::trace!( $( $e ),* ) }
}

#[macro_export]
macro_rules! debug {
    ( $( $id:ident = $e:expr ),* ) => { $crate::tracing::debug!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { $crate::tracing::debug!( $( $e ),* ) }
}

#[macro_export]
macro_rules! info {
    ( $( $id:ident = $e:expr ),* ) => { $crate::tracing::info!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { $crate::tracing::info!( $( $e ),* ) }
}

#[macro_export]
macro_rules! warn {
    ( $( $id:ident = $e:expr ),* ) => { $crate::tracing::warn!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { $crate::tracing::warn!( $( $e ),* ) }
}

#[macro_export]
macro_rules! error {
    ( $( $id:ident = $e:expr ),* ) => { $crate::tracing::error!( $( $id = $e ),* ) };
    ( $( $e: expr ),* ) => { $crate::tracing::error!( $( $e ),* ) }
}
