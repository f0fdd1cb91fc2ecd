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

//! observers that turn raw platform inputs into the parameters used by geometry and VNAV. Each of them
//! only reports a change if the observed value moved enough to matter

use uom::si::f64::{Length,Velocity};
use fms_common::{cos, rad, sqrt, angle::angle_diff, uom::{knots,to_ft,to_kts}};

use crate::{config::GuidanceConfig, platform::PerformanceInputs};

/* #region vertical profile parameters ***************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct VerticalProfileParameters {
    pub cruise_altitude_ft: Option<f64>,
    pub climb_gradient_ft_per_nm: f64,
    pub descent_angle: f64,
    pub speed_limit_altitude_ft: f64,
    pub speed_limit_kts: f64,
    pub decel_distance_nm: f64,
    pub constraint_tolerance_ft: f64,
}

impl VerticalProfileParameters {
    pub fn from_config (config: &GuidanceConfig)->Self {
        VerticalProfileParameters {
            cruise_altitude_ft: None,
            climb_gradient_ft_per_nm: config.climb_gradient_ft_per_nm,
            descent_angle: config.descent_angle,
            speed_limit_altitude_ft: 10000.0,
            speed_limit_kts: 250.0,
            decel_distance_nm: config.decel_distance_nm,
            constraint_tolerance_ft: config.constraint_tolerance_ft,
        }
    }
}

pub struct VerticalProfileParameterObserver {
    base: VerticalProfileParameters,
    last: Option<VerticalProfileParameters>,
}

impl VerticalProfileParameterObserver {
    pub fn new (config: &GuidanceConfig)->Self {
        VerticalProfileParameterObserver { base: VerticalProfileParameters::from_config( config), last: None }
    }

    pub fn current (&self)->VerticalProfileParameters { self.last.unwrap_or( self.base) }

    /// returns the new parameters if they differ from the last observed ones
    pub fn observe (&mut self, perf: &PerformanceInputs)->Option<VerticalProfileParameters> {
        let params = VerticalProfileParameters {
            cruise_altitude_ft: perf.cruise_altitude_ft,
            speed_limit_altitude_ft: perf.climb_speed_limit_altitude_ft,
            speed_limit_kts: perf.climb_speed_limit_kts,
            ..self.base
        };

        if self.last != Some(params) {
            self.last = Some(params);
            Some(params)
        } else {
            None
        }
    }
}

/* #endregion vertical profile parameters */

/* #region wind **************************************************************************************************/

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct WindVector {
    pub direction: f64, // true direction the wind is blowing from
    pub speed_kts: f64,
}

impl WindVector {
    /// positive for headwinds
    pub fn headwind_component (&self, course: f64)->f64 {
        self.speed_kts * cos( rad( angle_diff( course, self.direction)))
    }
}

/// tracks the wind. Small changes are filtered out so that they do not trigger geometry updates
pub struct WindObserver {
    wind: Option<WindVector>,
    min_direction_change: f64,
    min_speed_change: f64,
}

impl WindObserver {
    pub fn new ()->Self { WindObserver { wind: None, min_direction_change: 5.0, min_speed_change: 3.0 } }

    pub fn wind (&self)->Option<WindVector> { self.wind }

    pub fn observe (&mut self, perf: &PerformanceInputs)->Option<WindVector> {
        let (Some(direction), Some(speed_kts)) = (perf.wind_direction, perf.wind_speed_kts) else {
            self.wind = None;
            return None
        };
        let observed = WindVector { direction, speed_kts };

        let changed = match self.wind {
            None => true,
            Some(last) => angle_diff( last.direction, direction).abs() >= self.min_direction_change 
                          || (last.speed_kts - speed_kts).abs() >= self.min_speed_change
        };

        if changed {
            self.wind = Some(observed);
            Some(observed)
        } else {
            None
        }
    }
}

/* #endregion wind */

/* #region atmosphere ********************************************************************************************/

const ISA_SEA_LEVEL_TEMP_K: f64 = 288.15;
const ISA_LAPSE_RATE_K_PER_FT: f64 = 0.0019812;
const ISA_TROPOPAUSE_FT: f64 = 36089.0;
const ISA_TROPOPAUSE_TEMP_K: f64 = 216.65;

/// ISA deviation and airspeed conversions at the current altitude
#[derive(Debug,Clone,Copy,PartialEq,Default)]
pub struct AtmosphericConditions {
    isa_deviation_c: f64,
}

impl AtmosphericConditions {
    pub fn new ()->Self { AtmosphericConditions::default() }

    pub fn isa_deviation_c (&self)->f64 { self.isa_deviation_c }

    pub fn isa_temperature_k (altitude_ft: f64)->f64 {
        if altitude_ft < ISA_TROPOPAUSE_FT { ISA_SEA_LEVEL_TEMP_K - ISA_LAPSE_RATE_K_PER_FT * altitude_ft } else { ISA_TROPOPAUSE_TEMP_K }
    }

    fn pressure_ratio (altitude_ft: f64)->f64 {
        if altitude_ft < ISA_TROPOPAUSE_FT {
            (1.0 - 6.8756e-6 * altitude_ft).powf( 5.2559)
        } else {
            0.22336 * (-(altitude_ft - ISA_TROPOPAUSE_FT) / 20806.0).exp()
        }
    }

    pub fn update (&mut self, static_air_temperature_c: Option<f64>, altitude: Length) {
        if let Some(sat) = static_air_temperature_c {
            let isa_c = AtmosphericConditions::isa_temperature_k( to_ft(altitude)) - 273.15;
            self.isa_deviation_c = sat - isa_c;
        }
    }

    /// an incompressible estimate of the TAS for a given CAS, good enough for turn radius predictions
    pub fn true_airspeed (&self, cas: Velocity, altitude: Length)->Velocity {
        let h = to_ft(altitude).max(0.0);
        let t = AtmosphericConditions::isa_temperature_k(h) + self.isa_deviation_c;
        let density_ratio = AtmosphericConditions::pressure_ratio(h) * ISA_SEA_LEVEL_TEMP_K / t;
        knots( to_kts(cas) / sqrt( density_ratio))
    }
}

/* #endregion atmosphere */

#[cfg(test)]
mod tests {
    use super::*;
    use fms_common::uom::feet;

    #[test]
    fn test_headwind () {
        let w = WindVector { direction: 270.0, speed_kts: 20.0 };
        assert!( (w.headwind_component( 270.0) - 20.0).abs() < 1e-6);
        assert!( (w.headwind_component( 90.0) + 20.0).abs() < 1e-6);
        assert!( w.headwind_component( 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_wind_filter () {
        let mut obs = WindObserver::new();
        let mut perf = PerformanceInputs { wind_direction: Some(270.0), wind_speed_kts: Some(20.0), ..PerformanceInputs::default() };
        assert!( obs.observe( &perf).is_some());

        perf.wind_speed_kts = Some(21.0);
        assert!( obs.observe( &perf).is_none());

        perf.wind_direction = Some(280.0);
        assert!( obs.observe( &perf).is_some());
    }

    #[test]
    fn test_true_airspeed () {
        let atm = AtmosphericConditions::new();
        // 250 KCAS at FL100 is about 290 KTAS
        let tas = to_kts( atm.true_airspeed( knots(250.0), feet(10000.0)));
        assert!( (tas - 290.0).abs() < 5.0, "tas {}", tas);

        let sl = to_kts( atm.true_airspeed( knots(250.0), feet(0.0)));
        assert!( (sl - 250.0).abs() < 0.1);
    }

    #[test]
    fn test_parameter_changes () {
        let mut obs = VerticalProfileParameterObserver::new( &GuidanceConfig::default());
        let mut perf = PerformanceInputs::default();
        assert!( obs.observe( &perf).is_some());
        assert!( obs.observe( &perf).is_none());
        perf.cruise_altitude_ft = Some(35000.0);
        assert_eq!( obs.observe( &perf).unwrap().cruise_altitude_ft, Some(35000.0));
    }
}
