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

use std::{fs, path::Path, time::Duration};
use serde::{Serialize,Deserialize};

use crate::errors::Result;

/// tuning parameters of the guidance controller, normally loaded from a RON file, e.g.
/// ```ron
/// GuidanceConfig(
///     full_rebuild_interval: (secs: 5, nanos: 0),
///     nominal_cas_kts: 250.0,
/// )
/// ```
/// Fields that are not set use their defaults
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// all tracked geometries are rebuilt regardless of version at this interval
    pub full_rebuild_interval: Duration,
    /// min time between two path vector transmissions
    pub efis_vectors_interval: Duration,
    /// the delay of the deferred path vector refresh after a geometry change
    pub efis_vectors_refresh_delay: Duration,
    /// path vectors per side and group beyond which legs are culled
    pub max_path_vectors: usize,

    /// calibrated airspeed assumed for legs ahead of the active leg
    pub nominal_cas_kts: f64,
    pub nominal_bank_angle: f64,
    pub climb_gradient_ft_per_nm: f64,
    pub descent_angle: f64,
    pub decel_distance_nm: f64,
    pub hold_leg_time_min: f64,
    pub hold_leg_time_high_min: f64, // above FL140
    /// distance to the turn point at which LNAV requests leg sequencing
    pub sequence_distance_nm: f64,
    pub constraint_tolerance_ft: f64,
}

impl Default for GuidanceConfig {
    fn default ()->Self {
        GuidanceConfig {
            full_rebuild_interval: Duration::from_millis(5000),
            efis_vectors_interval: Duration::from_millis(500),
            efis_vectors_refresh_delay: Duration::from_millis(200),
            max_path_vectors: 700,
            nominal_cas_kts: 250.0,
            nominal_bank_angle: 25.0,
            climb_gradient_ft_per_nm: 400.0,
            descent_angle: 3.0,
            decel_distance_nm: 10.0,
            hold_leg_time_min: 1.0,
            hold_leg_time_high_min: 1.5,
            sequence_distance_nm: 0.1,
            constraint_tolerance_ft: 250.0,
        }
    }
}

pub fn load_config<P: AsRef<Path>> (path: P)->Result<GuidanceConfig> {
    let contents = fs::read_to_string( path)?;
    parse_config( &contents)
}

pub fn parse_config (contents: &str)->Result<GuidanceConfig> {
    Ok( ron::from_str( contents)? )
}
