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

/// tuning parameters of the EFIS symbol generator
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct EfisSymbolsConfig {
    /// max symbols per side (640 words transport capacity / 6 words per symbol)
    pub max_symbols: usize,
    /// min time between two symbol transmissions
    pub min_transmit_interval: Duration,
    /// ppos change (in NM) that triggers a new pass
    pub ppos_change_threshold_nm: f64,
    /// true heading change (in degrees) that triggers a new pass
    pub heading_change_threshold: f64,

    /// used when the origin airport has no transition altitude
    pub default_transition_altitude_ft: f64,
    /// used when the destination airport has no transition level
    pub default_transition_level_ft: f64,

    /// min hard surface runway length for airports in the AIRPORT overlay
    pub min_runway_length: f64,
    /// number of legs before the missed approach point within which the missed approach is shown
    pub missed_approach_window: usize,

    pub suppress_course_reversals: bool, // debug
}

impl Default for EfisSymbolsConfig {
    fn default ()->Self {
        EfisSymbolsConfig {
            max_symbols: 640 / 6,
            min_transmit_interval: Duration::from_millis(200),
            ppos_change_threshold_nm: 2.0,
            heading_change_threshold: 2.0,
            default_transition_altitude_ft: 18000.0,
            default_transition_level_ft: 18000.0,
            min_runway_length: 1500.0,
            missed_approach_window: 4,
            suppress_course_reversals: false,
        }
    }
}

pub fn load_config<P: AsRef<Path>> (path: P)->Result<EfisSymbolsConfig> {
    let contents = fs::read_to_string( path)?;
    parse_config( &contents)
}

pub fn parse_config (contents: &str)->Result<EfisSymbolsConfig> {
    Ok( ron::from_str( contents)? )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget () {
        let config = EfisSymbolsConfig::default();
        assert_eq!( config.max_symbols, 106);
        assert_eq!( config.min_transmit_interval, Duration::from_millis(200));
    }

    #[test]
    fn test_partial_config () {
        let config = parse_config( "EfisSymbolsConfig( max_symbols: 20, suppress_course_reversals: true )").unwrap();
        assert_eq!( config.max_symbols, 20);
        assert!( config.suppress_course_reversals);
        assert_eq!( config.missed_approach_window, 4);
    }
}
