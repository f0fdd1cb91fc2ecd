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

//! angle normalization and the few angle rules we need for courses, tracks and headings.
//! We stay with plain f64 degrees here since all our inputs (flight plan courses, sim tracks)
//! come in degrees and most of the consumers just compare or difference them

use std::fmt;
use serde::{Serialize,Deserialize};

#[inline]
pub fn normalize_180 (d: f64) -> f64 {
    let x = d % 360.0;
    
    if x < -180.0 { 360.0 + x }
    else if x > 180.0 { x - 360.0 }
    else { x }
}

#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    let x = d % 360.0;
    if x < 0.0 { 360.0 + x } else { x }
}

/// signed shortest difference `to - from` in degrees, within [-180..180]
#[inline]
pub fn angle_diff (from: f64, to: f64) -> f64 {
    normalize_180( to - from)
}

/// magnitude of the shortest difference between two angles, within [0..180]
#[inline]
pub fn abs_angle_diff (a: f64, b: f64) -> f64 {
    angle_diff( a, b).abs()
}

#[inline]
pub fn reciprocal (course: f64) -> f64 {
    normalize_360( course + 180.0)
}

/// direction of a turn. `Either` means no constraint was given and the shortest turn is used
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Default)]
pub enum TurnDirection {
    #[default]
    Either,
    Left,
    Right
}

impl TurnDirection {
    /// the shortest turn from `from` to `to`. Straight ahead counts as `Either`
    pub fn shortest (from: f64, to: f64) -> TurnDirection {
        let d = angle_diff( from, to);
        if d > 0.0 { TurnDirection::Right }
        else if d < 0.0 { TurnDirection::Left }
        else { TurnDirection::Either }
    }

    /// the course change in degrees when turning from `from` to `to` in this direction.
    /// Positive values are right turns
    pub fn course_change (&self, from: f64, to: f64) -> f64 {
        let d = angle_diff( from, to);
        match self {
            TurnDirection::Either => d,
            TurnDirection::Right => if d < 0.0 { d + 360.0 } else { d },
            TurnDirection::Left => if d > 0.0 { d - 360.0 } else { d },
        }
    }

    pub fn sign (&self) -> f64 {
        match self {
            TurnDirection::Left => -1.0,
            _ => 1.0
        }
    }

    pub fn opposite (&self) -> TurnDirection {
        match self {
            TurnDirection::Left => TurnDirection::Right,
            TurnDirection::Right => TurnDirection::Left,
            TurnDirection::Either => TurnDirection::Either
        }
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnDirection::Either => write!(f, "-"),
            TurnDirection::Left => write!(f, "L"),
            TurnDirection::Right => write!(f, "R"),
        }
    }
}
