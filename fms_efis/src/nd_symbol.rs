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

//! the symbols we send to the navigation display

use bitflags::bitflags;
use serde::{Serialize,Deserialize};
use fms_common::geo::GeoPoint;

bitflags! {
    /// semantic type of a map symbol. A symbol can combine several of these
    #[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Default,Serialize,Deserialize)]
    pub struct NdSymbolTypeFlags: u32 {
        const VOR                    = 1 << 0;
        const VOR_DME                = 1 << 1;
        const DME                    = 1 << 2;
        const NDB                    = 1 << 3;
        const WAYPOINT               = 1 << 4;
        const AIRPORT                = 1 << 5;
        const RUNWAY                 = 1 << 6;
        const TUNED                  = 1 << 7;
        const ACTIVE_LEG_TERMINATION = 1 << 8;
        const EFIS_OPTION            = 1 << 9;
        const FLIGHT_PLAN            = 1 << 10;
        const TEMPORARY              = 1 << 11;
        const SECONDARY              = 1 << 12;
        const ALTERNATE              = 1 << 13;
        const FIX_INFO               = 1 << 14;
        const CONSTRAINT             = 1 << 15;
        const CONSTRAINT_MET         = 1 << 16;
        const CONSTRAINT_NOT_MET     = 1 << 17;
        const CONSTRAINT_UNKNOWN     = 1 << 18;
        const COURSE_REVERSAL_LEFT   = 1 << 19;
        const COURSE_REVERSAL_RIGHT  = 1 << 20;
        const PWP_DECEL              = 1 << 21;
        const PWP_TOP_OF_DESCENT     = 1 << 22;
        const PWP_TOP_OF_CLIMB       = 1 << 23;
        const PWP_SPEED_CHANGE       = 1 << 24;
        const PWP_START_OF_CLIMB     = 1 << 25;
    }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct NdSymbol {
    pub database_id: String,
    pub ident: String,
    pub location: GeoPoint,
    pub type_flags: NdSymbolTypeFlags,

    #[serde(default, skip_serializing_if="Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if="Option::is_none")]
    pub direction: Option<f64>, // true, course reversal arrow or runway bearing
    #[serde(default, skip_serializing_if="Option::is_none")]
    pub length: Option<f64>, // runway length in meters
    #[serde(default, skip_serializing_if="Option::is_none")]
    pub radials: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if="Option::is_none")]
    pub radii: Option<Vec<f64>>,
}

impl NdSymbol {
    pub fn new (database_id: impl ToString, ident: impl ToString, location: GeoPoint, type_flags: NdSymbolTypeFlags)->Self {
        NdSymbol {
            database_id: database_id.to_string(),
            ident: ident.to_string(),
            location,
            type_flags,
            constraints: None,
            direction: None,
            length: None,
            radials: None,
            radii: None,
        }
    }

    pub fn with_constraints (mut self, constraints: Vec<String>)->Self { self.constraints = Some(constraints); self }
    pub fn with_direction (mut self, direction: f64)->Self { self.direction = Some(direction); self }
    pub fn with_length (mut self, length: Option<f64>)->Self { self.length = length; self }
    pub fn with_radials (mut self, radials: Vec<f64>)->Self { self.radials = Some(radials); self }
    pub fn with_radii (mut self, radii: Vec<f64>)->Self { self.radii = Some(radii); self }

    #[inline] pub fn has_flags (&self, flags: NdSymbolTypeFlags)->bool { self.type_flags.contains( flags) }

    /// merge a later occurrence of the same symbol into self. Scalars of `other` win when present,
    /// flags are OR'ed and lists are joined (values we already have are not added again)
    pub fn merge (&mut self, other: NdSymbol) {
        self.ident = other.ident;
        self.location = other.location;
        self.type_flags |= other.type_flags;

        if other.constraints.is_some() { self.constraints = other.constraints }
        if other.direction.is_some() { self.direction = other.direction }
        if other.length.is_some() { self.length = other.length }

        join_values( &mut self.radials, other.radials);
        join_values( &mut self.radii, other.radii);
    }
}

fn join_values (list: &mut Option<Vec<f64>>, other: Option<Vec<f64>>) {
    if let Some(other) = other {
        match list {
            Some(values) => {
                for v in other {
                    if !values.contains( &v) { values.push( v) }
                }
            }
            None => *list = Some(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_lists_unique () {
        let p = GeoPoint::from_lat_lon( 47.0, 8.0);
        let mut a = NdSymbol::new( "FIXINFO-KRS", "KRS", p, NdSymbolTypeFlags::FIX_INFO).with_radials( vec![90.0, 180.0]);
        let b = NdSymbol::new( "FIXINFO-KRS", "KRS", p, NdSymbolTypeFlags::FIX_INFO).with_radials( vec![180.0, 270.0]).with_radii( vec![10.0]);
        a.merge( b);

        assert_eq!( a.radials, Some( vec![90.0, 180.0, 270.0]));
        assert_eq!( a.radii, Some( vec![10.0]));
    }

    #[test]
    fn test_merge_scalars () {
        let p = GeoPoint::from_lat_lon( 47.0, 8.0);
        let mut a = NdSymbol::new( "RW14", "RW14", p, NdSymbolTypeFlags::RUNWAY).with_direction( 137.0).with_length( Some(3300.0));
        let b = NdSymbol::new( "RW14", "RW14", p, NdSymbolTypeFlags::FLIGHT_PLAN);
        a.merge( b);

        assert_eq!( a.direction, Some(137.0));
        assert_eq!( a.length, Some(3300.0));
        assert!( a.has_flags( NdSymbolTypeFlags::RUNWAY | NdSymbolTypeFlags::FLIGHT_PLAN));
    }
}
