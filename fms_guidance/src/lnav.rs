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

use std::time::Duration;
use fms_common::{debug, geo::GeoPoint};

use crate::{
    errors::Result,
    geometry::{Geometry, LegKind},
    platform::KinematicSnapshot,
    pseudo_waypoints::PseudoWaypoint,
};

pub struct LnavContext<'a> {
    pub geometry: Option<&'a Geometry>,
    pub active_leg_index: usize,
    pub kinematics: &'a KinematicSnapshot,
    pub pseudo_waypoints: &'a [PseudoWaypoint],
    pub delta: Duration,
}

#[derive(Debug,Clone,Default,PartialEq)]
pub struct LnavOutput {
    pub cross_track_error_nm: Option<f64>,
    pub desired_track: Option<f64>,
    pub distance_to_go_nm: Option<f64>,
    /// the active leg index if the leg should be sequenced now
    pub sequence_leg: Option<usize>,
    pub passed_pseudo_waypoints: Vec<String>,
}

pub trait LateralDriver {
    fn update (&mut self, ctx: &LnavContext)->Result<LnavOutput>;
}

/// lateral guidance along the active leg
pub struct DefaultLnav {
    sequence_distance_nm: f64,
    last_sequence_request: Option<u64>, // leg uid
}

impl DefaultLnav {
    pub fn new (sequence_distance_nm: f64)->Self {
        DefaultLnav { sequence_distance_nm, last_sequence_request: None }
    }
}

impl LateralDriver for DefaultLnav {
    fn update (&mut self, ctx: &LnavContext)->Result<LnavOutput> {
        let mut out = LnavOutput::default();
        let Some(geometry) = ctx.geometry else { return Ok(out) };
        let Some(leg) = geometry.leg( ctx.active_leg_index) else { return Ok(out) };
        let ppos = ctx.kinematics.position;

        if let LegKind::Manual{course,..} = leg.kind {
            out.desired_track = Some(course);
            return Ok(out)
        }

        let (Some(termination), Some(course)) = (leg.termination_location(), leg.outbound_course().or( leg.inbound_course())) else {
            return Ok(out)
        };

        let remaining = -ppos.along_track_nm( &termination, course);
        out.cross_track_error_nm = Some( ppos.cross_track_nm( &termination, course));
        out.desired_track = Some(course);
        out.distance_to_go_nm = Some( ppos.distance_nm( &termination));

        let anticipation = geometry.transition( ctx.active_leg_index+1).map( |t| t.turn_distance_nm()).unwrap_or(0.0);
        let has_next = geometry.leg( ctx.active_leg_index+1).is_some();
        if has_next && leg.automatic_sequencing() && remaining <= anticipation.max( self.sequence_distance_nm) {
            if self.last_sequence_request != Some( leg.uid()) {
                debug!("[FMS/LNAV] sequencing leg {} ({})", ctx.active_leg_index, leg.ident());
                self.last_sequence_request = Some( leg.uid());
                out.sequence_leg = Some( ctx.active_leg_index);
            }
        }

        for pwp in ctx.pseudo_waypoints.iter().filter( |p| !p.sequenced) {
            let passed = pwp.leg_index < ctx.active_leg_index 
                || (pwp.leg_index == ctx.active_leg_index && remaining <= pwp.distance_before_termination_nm);
            if passed {
                out.passed_pseudo_waypoints.push( pwp.ident.clone());
            }
        }

        Ok(out)
    }
}
