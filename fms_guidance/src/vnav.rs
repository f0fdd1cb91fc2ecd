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

//! the vertical profile seen from the lateral guidance side. The real profile computation
//! lives elsewhere, [`DefaultVnav`] is a simple geometric climb/cruise/descent model that provides
//! the altitude predictions, profile events and mode predicates the rest of the pipeline consumes

use std::{collections::BTreeMap, time::Duration};
use serde::{Serialize,Deserialize};
use fms_common::{tan, rad, geo_constants::FEET_PER_NM, debug};

use crate::{
    errors::Result,
    flight_plan::{AltitudeConstraint, Segment},
    geometry::Geometry,
    observers::VerticalProfileParameters,
    platform::{AutoFlightModes, FlightPhase, KinematicSnapshot},
};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum ProfileEventKind {
    SpeedLimit,
    TopOfClimb,
    TopOfDescent,
    Decel,
}

impl ProfileEventKind {
    pub fn ident (&self)->&'static str {
        match self {
            ProfileEventKind::SpeedLimit => "(LIM)",
            ProfileEventKind::TopOfClimb => "(T/C)",
            ProfileEventKind::TopOfDescent => "(T/D)",
            ProfileEventKind::Decel => "(DECEL)",
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ProfileEvent {
    pub kind: ProfileEventKind,
    pub distance_from_start_nm: f64,
    pub altitude_ft: f64,
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct LegPrediction {
    pub distance_from_start_nm: f64,
    pub altitude_ft: f64,
    pub constraint_met: Option<bool>,
}

pub trait VerticalProfileDriver {
    /// incremented whenever the predictions changed
    fn version (&self)->u64;

    fn accept_multiple_leg_geometry (&mut self, geometry: &Geometry);
    fn update_parameters (&mut self, params: &VerticalProfileParameters);
    fn update (&mut self, delta: Duration, kinematics: &KinematicSnapshot, modes: &AutoFlightModes, phase: FlightPhase)->Result<()>;

    fn is_lateral_auto_control_active (&self)->bool;
    fn is_selected_vertical_mode_active (&self)->bool;
    fn flight_phase (&self)->FlightPhase;

    /// prediction at the termination of the leg with the given flight plan index
    fn leg_prediction (&self, leg_index: usize)->Option<&LegPrediction>;
    fn profile_events (&self)->&[ProfileEvent];
}

#[derive(Debug,Clone)]
struct ProfileLeg {
    distance_from_start_nm: f64,
    constraint: Option<AltitudeConstraint>,
    segment: Segment,
}

pub struct DefaultVnav {
    version: u64,
    params: VerticalProfileParameters,
    legs: BTreeMap<usize,ProfileLeg>,
    origin_elevation_ft: f64,
    destination_elevation_ft: f64,

    predictions: BTreeMap<usize,LegPrediction>,
    events: Vec<ProfileEvent>,

    modes: AutoFlightModes,
    phase: FlightPhase,
}

impl DefaultVnav {
    pub fn new (params: VerticalProfileParameters)->Self {
        DefaultVnav {
            version: 0, params, legs: BTreeMap::new(), origin_elevation_ft: 0.0, destination_elevation_ft: 0.0,
            predictions: BTreeMap::new(), events: Vec::new(),
            modes: AutoFlightModes::default(), phase: FlightPhase::Preflight
        }
    }

    fn total_distance (&self)->f64 {
        self.legs.values().last().map( |l| l.distance_from_start_nm).unwrap_or(0.0)
    }

    fn descent_gradient (&self)->f64 {
        tan( rad( self.params.descent_angle)) * FEET_PER_NM
    }

    fn predicted_altitude (&self, d: f64, cruise: f64)->f64 {
        let climb = self.origin_elevation_ft + self.params.climb_gradient_ft_per_nm * d;
        let descent = self.destination_elevation_ft + self.descent_gradient() * (self.total_distance() - d);
        cruise.min( climb).min( descent)
    }

    fn compute_profile (&mut self) {
        self.predictions.clear();
        self.events.clear();

        let total = self.total_distance();
        let Some(cruise) = self.params.cruise_altitude_ft else {
            self.version += 1;
            return
        };

        let tol = self.params.constraint_tolerance_ft;
        for (idx, leg) in self.legs.iter() {
            let altitude_ft = self.predicted_altitude( leg.distance_from_start_nm, cruise);
            let constraint_met = leg.constraint.map( |c| c.is_met_by( altitude_ft, tol));
            self.predictions.insert( *idx, LegPrediction { distance_from_start_nm: leg.distance_from_start_nm, altitude_ft, constraint_met });
        }

        let tc = (cruise - self.origin_elevation_ft).max(0.0) / self.params.climb_gradient_ft_per_nm.max(1.0);
        let td = total - (cruise - self.destination_elevation_ft).max(0.0) / self.descent_gradient().max(1.0);

        let limit_alt = self.params.speed_limit_altitude_ft;
        if limit_alt > self.origin_elevation_ft && limit_alt < cruise {
            let d = (limit_alt - self.origin_elevation_ft) / self.params.climb_gradient_ft_per_nm.max(1.0);
            if d <= tc.min(total) {
                self.events.push( ProfileEvent { kind: ProfileEventKind::SpeedLimit, distance_from_start_nm: d, altitude_ft: limit_alt });
            }
        }

        if tc <= td && td <= total { // no cruise segment means no T/C and T/D
            self.events.push( ProfileEvent { kind: ProfileEventKind::TopOfClimb, distance_from_start_nm: tc, altitude_ft: cruise });
            self.events.push( ProfileEvent { kind: ProfileEventKind::TopOfDescent, distance_from_start_nm: td.max(0.0), altitude_ft: cruise });
        }

        // decel starts ahead of the first approach leg
        let approach_start = self.legs.iter()
            .find( |(_,l)| l.segment == Segment::Approach)
            .and_then( |(idx,_)| self.legs.range(..*idx).next_back().map( |(_,l)| l.distance_from_start_nm));
        if let Some(d) = approach_start {
            let d = (d - self.params.decel_distance_nm).max(0.0);
            self.events.push( ProfileEvent { kind: ProfileEventKind::Decel, distance_from_start_nm: d, altitude_ft: self.predicted_altitude( d, cruise) });
        }

        self.events.sort_by( |a,b| a.distance_from_start_nm.total_cmp( &b.distance_from_start_nm));
        self.version += 1;
        debug!("[FMS/VNAV] profile v{}: {} predictions, {} events", self.version, self.predictions.len(), self.events.len());
    }
}

impl VerticalProfileDriver for DefaultVnav {
    fn version (&self)->u64 { self.version }

    fn accept_multiple_leg_geometry (&mut self, geometry: &Geometry) {
        self.legs.clear();
        for (idx, d) in geometry.cumulative_distances() {
            if let Some(leg) = geometry.leg( idx) {
                let def = leg.definition();
                self.legs.insert( idx, ProfileLeg { distance_from_start_nm: d, constraint: def.altitude_constraint, segment: def.segment });
            }
        }
        self.origin_elevation_ft = geometry.origin_elevation_ft();
        self.destination_elevation_ft = geometry.destination_elevation_ft().unwrap_or( self.origin_elevation_ft);
        self.compute_profile();
    }

    fn update_parameters (&mut self, params: &VerticalProfileParameters) {
        if self.params != *params {
            self.params = *params;
            self.compute_profile();
        }
    }

    fn update (&mut self, delta: Duration, kinematics: &KinematicSnapshot, modes: &AutoFlightModes, phase: FlightPhase)->Result<()> {
        // constraint states depend on the modes and the phase
        if self.modes != *modes || self.phase != phase {
            self.modes = *modes;
            self.phase = phase;
            self.version += 1;
        }
        Ok(())
    }

    fn is_lateral_auto_control_active (&self)->bool { self.modes.lateral_managed }
    fn is_selected_vertical_mode_active (&self)->bool { self.modes.vertical_selected }
    fn flight_phase (&self)->FlightPhase { self.phase }

    fn leg_prediction (&self, leg_index: usize)->Option<&LegPrediction> { self.predictions.get( &leg_index) }
    fn profile_events (&self)->&[ProfileEvent] { &self.events }
}
