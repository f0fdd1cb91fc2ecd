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

//! the navigation database and radio tuning collaborators of the symbol generator

use serde::{Serialize,Deserialize};
use fms_common::geo::GeoPoint;
use crate::nd_symbol::NdSymbolTypeFlags;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum NavaidClass {
    Vor,
    VorDme,
    Vortac,
    Dme,
    Tacan,
    Ndb,
}

impl NavaidClass {
    pub fn type_flags (&self)->NdSymbolTypeFlags {
        match self {
            NavaidClass::Vor => NdSymbolTypeFlags::VOR,
            NavaidClass::VorDme | NavaidClass::Vortac => NdSymbolTypeFlags::VOR_DME,
            NavaidClass::Dme | NavaidClass::Tacan => NdSymbolTypeFlags::DME,
            NavaidClass::Ndb => NdSymbolTypeFlags::NDB,
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Default)]
pub enum RunwaySurface {
    Hard,
    Soft,
    Water,
    #[default]
    Unknown,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct RunwayInfo {
    pub length: f64,
    #[serde(default)]
    pub surface: RunwaySurface,
}

/// a database facility near the aircraft
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Facility {
    pub ident: String,
    pub database_id: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub navaid_class: Option<NavaidClass>,
    #[serde(default)]
    pub runways: Vec<RunwayInfo>, // airports only
}

impl Facility {
    pub fn navaid (ident: &str, database_id: &str, location: GeoPoint, class: NavaidClass)->Self {
        Facility { ident: ident.to_string(), database_id: database_id.to_string(), location, navaid_class: Some(class), runways: Vec::new() }
    }

    pub fn waypoint (ident: &str, database_id: &str, location: GeoPoint)->Self {
        Facility { ident: ident.to_string(), database_id: database_id.to_string(), location, navaid_class: None, runways: Vec::new() }
    }

    pub fn airport (ident: &str, database_id: &str, location: GeoPoint, runways: Vec<RunwayInfo>)->Self {
        Facility { ident: ident.to_string(), database_id: database_id.to_string(), location, navaid_class: None, runways }
    }

    pub fn has_hard_runway (&self, min_length: f64)->bool {
        self.runways.iter().any( |r| r.surface == RunwaySurface::Hard && r.length >= min_length)
    }
}

/// nearby facilities. The version changes whenever any of the lists changed
pub trait NearbyFacilities {
    fn version (&self)->u64;
    fn vhf_navaids (&self)->&[Facility];
    fn ndb_navaids (&self)->&[Facility];
    fn airports (&self)->&[Facility];
    fn waypoints (&self)->&[Facility];
}

pub trait NavaidTuner {
    fn version (&self)->u64;
    fn tuned_vors (&self)->&[Facility];
    fn tuned_ndbs (&self)->&[Facility];
}

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct StaticFacilities {
    pub version: u64,
    pub vhf_navaids: Vec<Facility>,
    pub ndb_navaids: Vec<Facility>,
    pub airports: Vec<Facility>,
    pub waypoints: Vec<Facility>,
}

impl StaticFacilities {
    /// change the facility lists and bump the version
    pub fn modify<F> (&mut self, f: F) where F: FnOnce(&mut StaticFacilities) {
        f( self);
        self.version += 1;
    }
}

impl NearbyFacilities for StaticFacilities {
    fn version (&self)->u64 { self.version }
    fn vhf_navaids (&self)->&[Facility] { &self.vhf_navaids }
    fn ndb_navaids (&self)->&[Facility] { &self.ndb_navaids }
    fn airports (&self)->&[Facility] { &self.airports }
    fn waypoints (&self)->&[Facility] { &self.waypoints }
}

#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct StaticTuner {
    pub version: u64,
    pub vors: Vec<Facility>,
    pub ndbs: Vec<Facility>,
}

impl StaticTuner {
    pub fn tune_vor (&mut self, vor: Facility) {
        self.vors.retain( |f| f.database_id != vor.database_id);
        self.vors.push( vor);
        self.version += 1;
    }

    pub fn tune_ndb (&mut self, ndb: Facility) {
        self.ndbs.retain( |f| f.database_id != ndb.database_id);
        self.ndbs.push( ndb);
        self.version += 1;
    }
}

impl NavaidTuner for StaticTuner {
    fn version (&self)->u64 { self.version }
    fn tuned_vors (&self)->&[Facility] { &self.vors }
    fn tuned_ndbs (&self)->&[Facility] { &self.ndbs }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_runway () {
        let p = GeoPoint::from_lat_lon( 47.0, 8.0);
        let grass = Facility::airport( "LSZX", "A LSZX", p, vec![ RunwayInfo { length: 2500.0, surface: RunwaySurface::Soft }]);
        let short = Facility::airport( "LSZY", "A LSZY", p, vec![ RunwayInfo { length: 1200.0, surface: RunwaySurface::Hard }]);
        let ok = Facility::airport( "LSZH", "A LSZH", p, vec![ 
            RunwayInfo { length: 1200.0, surface: RunwaySurface::Hard },
            RunwayInfo { length: 3300.0, surface: RunwaySurface::Hard }
        ]);

        assert!( !grass.has_hard_runway( 1500.0));
        assert!( !short.has_hard_runway( 1500.0));
        assert!( ok.has_hard_runway( 1500.0));
    }

    #[test]
    fn test_tuning_bumps_version () {
        let mut tuner = StaticTuner::default();
        let vor = Facility::navaid( "KLO", "V KLO", GeoPoint::from_lat_lon( 47.45, 8.55), NavaidClass::VorDme);
        tuner.tune_vor( vor.clone());
        tuner.tune_vor( vor);
        assert_eq!( tuner.tuned_vors().len(), 1);
        assert_eq!( tuner.version(), 2);
    }
}
