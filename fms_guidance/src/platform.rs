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

//! the boundary between the guidance pipeline and the host platform (simulator variables,
//! display unit knobs, autopilot state). The platform is read once per tick via [`PlatformInput`]
//! and derived values are written back through [`PlatformOutput`]

use std::collections::HashMap;
use serde::{Serialize,Deserialize};
use strum::{EnumIter,Display};
use uom::si::f64::{Length,Velocity};
use fms_common::{geo::GeoPoint, uom::{knots,feet}};

use crate::flight_plan::FlightPlanIndex;
use crate::efis_vectors::{PathVector,PathVectorGroup};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize,EnumIter,Display)]
pub enum EfisSide { L, R }

impl EfisSide {
    pub fn index (&self)->usize { match self { EfisSide::L => 0, EfisSide::R => 1 } }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Default,Display)]
pub enum EfisNdMode {
    RoseIls,
    RoseVor,
    RoseNav,
    #[default]
    Arc,
    Plan,
}

/// the EFIS control panel overlay selection
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Default,Display)]
pub enum EfisOption {
    #[default]
    None,
    VorDmes,
    Ndbs,
    Airports,
    Waypoints,
    Constraints,
}

/// selectable ND ranges in NM
pub const EFIS_RANGES: [f64;6] = [10.0, 20.0, 40.0, 80.0, 160.0, 320.0];

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct DisplayUnitSettings {
    pub mode: EfisNdMode,
    pub range: f64, // NM
    pub option: EfisOption,
}

impl Default for DisplayUnitSettings {
    fn default ()->Self { DisplayUnitSettings { mode: EfisNdMode::Arc, range: EFIS_RANGES[0], option: EfisOption::None } }
}

/// the element the pilot scrolls to in PLAN mode
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct SelectedWaypoint {
    pub plan_index: FlightPlanIndex,
    pub leg_index: usize,
    #[serde(default)]
    pub in_alternate: bool,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Serialize,Deserialize,Default,Display)]
pub enum FlightPhase {
    #[default]
    Preflight,
    Takeoff,
    Climb,
    Cruise,
    Descent,
    Approach,
    GoAround,
    Done,
}

/// the aircraft state sampled at the start of a tick
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct KinematicSnapshot {
    pub position: GeoPoint,
    #[serde(serialize_with="fms_common::uom::ser_velocity_as_knots", deserialize_with="fms_common::uom::de_velocity_from_knots")]
    pub true_airspeed: Velocity,
    #[serde(serialize_with="fms_common::uom::ser_velocity_as_knots", deserialize_with="fms_common::uom::de_velocity_from_knots")]
    pub ground_speed: Velocity,
    pub true_track: f64,
    pub true_heading: f64,
    #[serde(serialize_with="fms_common::uom::ser_length_as_feet", deserialize_with="fms_common::uom::de_length_from_feet")]
    pub altitude: Length,
}

impl Default for KinematicSnapshot {
    fn default ()->Self {
        KinematicSnapshot {
            position: GeoPoint::from_lat_lon( 0.0, 0.0),
            true_airspeed: knots(0.0),
            ground_speed: knots(0.0),
            true_track: 0.0,
            true_heading: 0.0,
            altitude: feet(0.0)
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize,Default)]
pub struct AutoFlightModes {
    pub lateral_managed: bool,  // NAV or a managed approach mode engaged
    pub vertical_selected: bool,  // a selected vertical mode (OP CLB, V/S ..) is engaged
}

/// performance and atmosphere inputs for the vertical profile
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct PerformanceInputs {
    pub cruise_altitude_ft: Option<f64>,
    pub climb_speed_limit_kts: f64,
    pub climb_speed_limit_altitude_ft: f64,
    pub static_air_temperature_c: Option<f64>,
    pub wind_direction: Option<f64>,  // true, direction the wind is coming from
    pub wind_speed_kts: Option<f64>,
}

impl Default for PerformanceInputs {
    fn default ()->Self {
        PerformanceInputs {
            cruise_altitude_ft: None,
            climb_speed_limit_kts: 250.0,
            climb_speed_limit_altitude_ft: 10000.0,
            static_air_temperature_c: None,
            wind_direction: None,
            wind_speed_kts: None
        }
    }
}

pub trait PlatformInput {
    fn kinematics (&self)->KinematicSnapshot;
    fn display_settings (&self, side: EfisSide)->DisplayUnitSettings;
    fn selected_waypoint (&self)->Option<SelectedWaypoint>;
    fn flight_phase (&self)->FlightPhase;
    fn auto_flight_modes (&self)->AutoFlightModes;
    fn performance (&self)->PerformanceInputs;
}

pub trait PlatformOutput {
    fn set_map_reference_point (&mut self, point: GeoPoint);
    fn set_to_waypoint_ident (&mut self, side: EfisSide, ident: &str);
    fn set_approach_message (&mut self, side: EfisSide, message: &str);
    fn set_map_partly_displayed (&mut self, side: EfisSide, partly_displayed: bool);
    fn set_data_limit_reached (&mut self, side: EfisSide, limit_reached: bool);
    fn set_path_vectors (&mut self, side: EfisSide, group: PathVectorGroup, vectors: &[PathVector]);
    /// LNAV asks the flight plan owner to sequence the given leg
    fn request_leg_sequence (&mut self, leg_index: usize);
}

/* #region simple implementations ********************************************************************************/

/// a platform that returns whatever was last set. Used by the scenario runner and tests
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
#[serde(default)]
pub struct StaticPlatform {
    pub kinematics: KinematicSnapshot,
    pub left: DisplayUnitSettings,
    pub right: DisplayUnitSettings,
    pub selected_waypoint: Option<SelectedWaypoint>,
    pub flight_phase: FlightPhase,
    pub auto_flight_modes: AutoFlightModes,
    pub performance: PerformanceInputs,
}

impl StaticPlatform {
    pub fn set_display_settings (&mut self, side: EfisSide, settings: DisplayUnitSettings) {
        match side { EfisSide::L => self.left = settings, EfisSide::R => self.right = settings }
    }

    pub fn set_mode (&mut self, side: EfisSide, mode: EfisNdMode) {
        match side { EfisSide::L => self.left.mode = mode, EfisSide::R => self.right.mode = mode }
    }

    pub fn set_range (&mut self, side: EfisSide, range: f64) {
        match side { EfisSide::L => self.left.range = range, EfisSide::R => self.right.range = range }
    }
}

impl PlatformInput for StaticPlatform {
    fn kinematics (&self)->KinematicSnapshot { self.kinematics }
    fn display_settings (&self, side: EfisSide)->DisplayUnitSettings {
        match side { EfisSide::L => self.left, EfisSide::R => self.right }
    }
    fn selected_waypoint (&self)->Option<SelectedWaypoint> { self.selected_waypoint }
    fn flight_phase (&self)->FlightPhase { self.flight_phase }
    fn auto_flight_modes (&self)->AutoFlightModes { self.auto_flight_modes }
    fn performance (&self)->PerformanceInputs { self.performance }
}

/// per side output values
#[derive(Debug,Clone,Default,PartialEq,Serialize)]
pub struct SideOutput {
    pub to_waypoint_ident: String,
    pub approach_message: String,
    pub map_partly_displayed: bool,
    pub data_limit_reached: bool,
    pub path_vectors: HashMap<PathVectorGroup,Vec<PathVector>>,
    pub vector_transmissions: usize,
}

/// a [`PlatformOutput`] that records the last written values
#[derive(Debug,Clone,Default,Serialize)]
pub struct RecordingSink {
    pub map_reference_point: Option<GeoPoint>,
    pub left: SideOutput,
    pub right: SideOutput,
    pub sequence_requests: Vec<usize>,
}

impl RecordingSink {
    pub fn side (&self, side: EfisSide)->&SideOutput {
        match side { EfisSide::L => &self.left, EfisSide::R => &self.right }
    }

    fn side_mut (&mut self, side: EfisSide)->&mut SideOutput {
        match side { EfisSide::L => &mut self.left, EfisSide::R => &mut self.right }
    }
}

impl PlatformOutput for RecordingSink {
    fn set_map_reference_point (&mut self, point: GeoPoint) { self.map_reference_point = Some(point) }
    fn set_to_waypoint_ident (&mut self, side: EfisSide, ident: &str) { self.side_mut(side).to_waypoint_ident = ident.to_string() }
    fn set_approach_message (&mut self, side: EfisSide, message: &str) { self.side_mut(side).approach_message = message.to_string() }
    fn set_map_partly_displayed (&mut self, side: EfisSide, b: bool) { self.side_mut(side).map_partly_displayed = b }
    fn set_data_limit_reached (&mut self, side: EfisSide, b: bool) { self.side_mut(side).data_limit_reached = b }

    fn set_path_vectors (&mut self, side: EfisSide, group: PathVectorGroup, vectors: &[PathVector]) {
        let so = self.side_mut(side);
        so.path_vectors.insert( group, vectors.to_vec());
        so.vector_transmissions += 1;
    }

    fn request_leg_sequence (&mut self, leg_index: usize) { self.sequence_requests.push( leg_index) }
}

/* #endregion simple implementations */
