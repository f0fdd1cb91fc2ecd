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

//! path vectors for the navigation display. The lateral path of each displayed geometry is
//! converted into lines and arcs and transmitted per side at a limited rate

use std::{collections::HashMap, time::Duration};
use serde::{Serialize,Deserialize};
use strum::{EnumIter,IntoEnumIterator};
use fms_common::{angle::{reciprocal, normalize_360}, geo::GeoPoint, trace, debug};

use crate::{
    errors::Result,
    efis_state::EfisState,
    flight_plan::FlightPlanIndex,
    geometry::{Geometry, LegKind, TransitionKind},
    platform::{EfisSide, PlatformOutput, SelectedWaypoint},
};

/// length of the line drawn for legs with manual termination
const MANUAL_LEG_LENGTH_NM: f64 = 20.0;

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum PathVector {
    Line { start: GeoPoint, end: GeoPoint },
    Arc { start: GeoPoint, end: GeoPoint, center: GeoPoint, sweep_angle: f64 },
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,EnumIter)]
pub enum PathVectorGroup {
    Active,
    ActiveAlternate,
    Temporary,
    Secondary,
}

impl PathVectorGroup {
    /// the geometry this group is drawn from. Secondary uses the plan that is currently focused
    fn geometry_key (&self, focused: Option<&SelectedWaypoint>)->Option<u32> {
        match self {
            PathVectorGroup::Active => Some( FlightPlanIndex::Active.geometry_key(false)),
            PathVectorGroup::ActiveAlternate => Some( FlightPlanIndex::Active.geometry_key(true)),
            PathVectorGroup::Temporary => Some( FlightPlanIndex::Temporary.geometry_key(false)),
            PathVectorGroup::Secondary => focused
                .filter( |s| s.plan_index.is_secondary())
                .map( |s| s.plan_index.geometry_key( s.in_alternate))
        }
    }
}

/// generate the path vectors of a geometry, starting at leg `from_index`
pub fn generate_path_vectors (geometry: &Geometry, from_index: usize)->Vec<PathVector> {
    let mut vectors = Vec::new();

    for (idx, leg) in geometry.legs().filter( |(i,_)| *i >= from_index) {
        let trim_start = geometry.transition( idx).map( |t| t.turn_distance_nm()).unwrap_or(0.0);
        let trim_end = geometry.transition( idx+1).map( |t| t.turn_distance_nm()).unwrap_or(0.0);

        // the fixed radius turn into this leg
        let prev = idx.checked_sub(1).and_then( |i| geometry.leg(i));
        if let (Some(t), Some(prev), Some(inb)) = (geometry.transition( idx), prev, leg.inbound_course()) {
            if let (Some(corner), Some(out)) = (prev.termination_location(), prev.outbound_course()) {
                if t.kind() == TransitionKind::FixedRadius && t.turn_distance_nm() > 0.0 && idx > from_index {
                    let start = corner.destination( reciprocal(out), t.turn_distance_nm());
                    let end = corner.destination( inb, t.turn_distance_nm());
                    let center = start.destination( normalize_360( out + 90.0 * t.turn_direction().sign()), t.radius_nm());
                    vectors.push( PathVector::Arc { start, end, center, sweep_angle: t.course_change() });
                }
            }
        }

        match &leg.kind {
            LegKind::RadiusToFix{center,sweep_angle,..} => {
                if let (Some(start), Some(end)) = (leg.start(), leg.termination_location()) {
                    vectors.push( PathVector::Arc { start, end, center: *center, sweep_angle: *sweep_angle });
                }
            }

            LegKind::Hold(hold) => {
                if let Some(fix) = leg.termination_location() {
                    if let Some(start) = leg.start() {
                        if start.distance_nm( &fix) > 0.01 { vectors.push( PathVector::Line { start, end: fix }) }
                    }
                    if !hold.immediate_exit() {
                        let s = hold.turn_direction.sign();
                        let inbound = hold.inbound_course;
                        let d = 2.0 * hold.radius_nm();
                        let abeam_fix = fix.destination( normalize_360( inbound + 90.0 * s), d);
                        let outbound_end = abeam_fix.destination( reciprocal(inbound), hold.straight_nm());
                        let inbound_start = fix.destination( reciprocal(inbound), hold.straight_nm());

                        vectors.push( PathVector::Arc { start: fix, end: abeam_fix, center: fix.destination( normalize_360( inbound + 90.0 * s), hold.radius_nm()), sweep_angle: 180.0 * s });
                        vectors.push( PathVector::Line { start: abeam_fix, end: outbound_end });
                        vectors.push( PathVector::Arc { start: outbound_end, end: inbound_start, center: inbound_start.destination( normalize_360( inbound + 90.0 * s), hold.radius_nm()), sweep_angle: 180.0 * s });
                        vectors.push( PathVector::Line { start: inbound_start, end: fix });
                    }
                }
            }

            LegKind::Manual{course,..} => {
                if let Some(start) = leg.start() {
                    vectors.push( PathVector::Line { start, end: start.destination( *course, MANUAL_LEG_LENGTH_NM) });
                }
            }

            LegKind::InitialFix => {}

            _ => {
                if let (Some(start), Some(end), Some(inb), Some(out)) = (leg.start(), leg.termination_location(), leg.inbound_course(), leg.outbound_course()) {
                    let len = leg.distance_nm().unwrap_or(0.0);
                    let (trim_start, trim_end) = if trim_start + trim_end < len { (trim_start, trim_end) } else { (0.0, 0.0) };
                    let start = if trim_start > 0.0 && idx > from_index { start.destination( inb, trim_start) } else { start };
                    let end = if trim_end > 0.0 { end.destination( reciprocal(out), trim_end) } else { end };
                    vectors.push( PathVector::Line { start, end });
                }
            }
        }
    }

    vectors
}

/// rate limited path vector transmission
pub struct EfisVectors {
    interval: Duration,
    max_vectors: usize,
    since_last_transmit: Duration,
    force_pending: bool,
    transmissions: u64,
}

impl EfisVectors {
    pub fn new (interval: Duration, max_vectors: usize)->Self {
        EfisVectors { interval, max_vectors, since_last_transmit: Duration::ZERO, force_pending: true, transmissions: 0 }
    }

    /// transmit on the next update regardless of the interval
    pub fn force_update (&mut self) { self.force_pending = true }

    pub fn is_update_pending (&self)->bool { self.force_pending }

    pub fn transmissions (&self)->u64 { self.transmissions }

    /// both sides receive the same vector groups, hence `legs_culled` is set for both sides alike
    pub (crate) fn update (&mut self, delta: Duration, geometries: &HashMap<u32,Geometry>, active_leg_index: usize, focused: Option<&SelectedWaypoint>,
                           efis_states: &mut [EfisState;2], output: &mut dyn PlatformOutput)->Result<()> {
        self.since_last_transmit += delta;
        if !self.force_pending && self.since_last_transmit < self.interval {
            return Ok(())
        }
        self.force_pending = false;
        self.since_last_transmit = Duration::ZERO;
        self.transmissions += 1;

        let mut culled = false;
        let mut groups: Vec<(PathVectorGroup,Vec<PathVector>)> = Vec::new();
        for group in PathVectorGroup::iter() {
            let mut vectors = match group.geometry_key( focused).and_then( |key| geometries.get( &key)) {
                Some(geometry) => {
                    let from = if group == PathVectorGroup::Active { active_leg_index.saturating_sub(1) } else { 0 };
                    generate_path_vectors( geometry, from)
                }
                None => Vec::new()
            };
            if vectors.len() > self.max_vectors {
                debug!("[FMS/EFIS] culling {:?} path vectors ({} > {})", group, vectors.len(), self.max_vectors);
                vectors.truncate( self.max_vectors);
                culled = true;
            }
            groups.push( (group,vectors));
        }

        for side in EfisSide::iter() {
            efis_states[side.index()].legs_culled = culled;
            for (group, vectors) in &groups {
                output.set_path_vectors( side, *group, vectors);
            }
        }

        trace!("[FMS/EFIS] transmitted path vectors ({})", self.transmissions);
        Ok(())
    }
}
