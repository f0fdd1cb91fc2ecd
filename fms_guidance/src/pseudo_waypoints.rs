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

use std::collections::HashMap;
use fms_common::{geo::GeoPoint, debug, trace};

use crate::{
    errors::Result,
    geometry::Geometry,
    vnav::{VerticalProfileDriver, ProfileEventKind},
};

/// a point on the lateral path that marks a vertical profile event
#[derive(Debug,Clone,PartialEq)]
pub struct PseudoWaypoint {
    pub ident: String,
    pub kind: ProfileEventKind,
    pub leg_index: usize,
    pub distance_before_termination_nm: f64,
    pub distance_from_start_nm: f64,
    pub location: Option<GeoPoint>,
    pub sequenced: bool,
    pub display_on_nd: bool,
}

/// places the VNAV profile events on the active geometry
pub struct PseudoWaypointGenerator {
    geometry: Option<Geometry>,
    geometry_changed: bool,
    last_vnav_version: Option<u64>,
    waypoints: Vec<PseudoWaypoint>,
    version: u64,
}

impl PseudoWaypointGenerator {
    pub fn new ()->Self {
        PseudoWaypointGenerator { geometry: None, geometry_changed: false, last_vnav_version: None, waypoints: Vec::new(), version: 0 }
    }

    pub fn accept_multiple_leg_geometry (&mut self, geometry: &Geometry) {
        self.geometry = Some( geometry.clone());
        self.geometry_changed = true;
    }

    pub fn pseudo_waypoints (&self)->&[PseudoWaypoint] { &self.waypoints }

    /// incremented whenever the list or the sequencing state of one of its waypoints changed
    pub fn version (&self)->u64 { self.version }

    /// mark a pseudo waypoint as passed. Returns false if there is no such waypoint
    pub fn sequence_pseudo_waypoint (&mut self, ident: &str)->bool {
        match self.waypoints.iter_mut().find( |p| p.ident == ident) {
            Some(pwp) => {
                if !pwp.sequenced {
                    debug!("[FMS/PWP] sequenced {}", ident);
                    pwp.sequenced = true;
                    pwp.display_on_nd = false;
                    self.version += 1;
                }
                true
            }
            None => false
        }
    }

    pub fn update (&mut self, vnav: &dyn VerticalProfileDriver)->Result<()> {
        let version = vnav.version();
        if !self.geometry_changed && self.last_vnav_version == Some(version) {
            return Ok(())
        }
        self.geometry_changed = false;
        self.last_vnav_version = Some(version);

        let Some(geometry) = &self.geometry else {
            self.waypoints.clear();
            self.version += 1;
            return Ok(())
        };

        // sequencing state survives a recompute as long as the waypoint stays on the same leg
        let sequenced: HashMap<String,usize> = self.waypoints.iter()
            .filter( |p| p.sequenced)
            .map( |p| (p.ident.clone(), p.leg_index))
            .collect();

        let mut waypoints = Vec::new();
        for event in vnav.profile_events() {
            let Some((leg_index, dbt)) = geometry.locate_distance( event.distance_from_start_nm) else { continue };
            let ident = event.kind.ident().to_string();
            let location = geometry.point_before_termination( leg_index, dbt);
            let sequenced = sequenced.get( &ident) == Some( &leg_index);

            waypoints.push( PseudoWaypoint {
                ident, kind: event.kind, leg_index, distance_before_termination_nm: dbt,
                distance_from_start_nm: event.distance_from_start_nm, location, sequenced,
                display_on_nd: !sequenced && location.is_some()
            });
        }

        trace!("[FMS/PWP] {} pseudo waypoints", waypoints.len());
        self.waypoints = waypoints;
        self.version += 1;
        Ok(())
    }
}

impl Default for PseudoWaypointGenerator {
    fn default ()->Self { PseudoWaypointGenerator::new() }
}
