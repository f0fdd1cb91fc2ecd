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

//! the flight plan model as seen by the guidance pipeline. Flight plans are constructed and edited
//! by the flight plan service, which is not part of this crate. We only need read access through the
//! [`FlightPlanProvider`] trait and a version counter that tells us when a plan was changed.
//! [`FlightPlanStore`] is a simple in-memory provider that is used by the scenario runner and tests

use std::{collections::HashMap, fmt};
use serde::{Serialize,Deserialize};
use strum::{EnumIter,Display};
use fms_common::{angle::TurnDirection, geo::GeoPoint};

use crate::errors::{Result, FmsGuidanceError, op_failed, invariant_violation};

/// the fixed set of flight plan slots. Each slot can also have an alternate plan
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,PartialOrd,Ord,Serialize,Deserialize,EnumIter,Display)]
#[repr(u32)]
pub enum FlightPlanIndex {
    Active = 0,
    Temporary = 1,
    FirstSecondary = 2,
    SecondSecondary = 3,
    ThirdSecondary = 4,
}

impl FlightPlanIndex {
    /// the single integer key for a (slot,alternate) pair
    pub fn geometry_key (self, alternate: bool)->u32 {
        self as u32 + if alternate { 100 } else { 0 }
    }

    pub fn is_secondary (self)->bool {
        matches!( self, FlightPlanIndex::FirstSecondary | FlightPlanIndex::SecondSecondary | FlightPlanIndex::ThirdSecondary)
    }
}

/* #region legs ****************************************************************************************/

/// ARINC 424 path terminators we can build geometry for
#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum PathTerminator {
    IF, // initial fix
    TF, // track to fix
    CF, // course to fix
    DF, // direct to fix
    FA, // fix to altitude
    CA, // course to altitude
    VM, // heading to manual termination
    FM, // from fix to manual termination
    HM, // hold to manual termination
    HA, // hold to altitude
    HF, // hold to fix (single circuit)
    PI, // procedure turn
    RF, // constant radius arc to fix
}

impl PathTerminator {
    pub fn is_hold (&self)->bool { matches!( self, PathTerminator::HM | PathTerminator::HA | PathTerminator::HF) }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Default)]
pub enum FixKind {
    #[default]
    Waypoint,
    VhfNavaid,
    Ndb,
    Airport,
    Runway,
}

/// a database fix. The location can be missing if the fix could not be resolved
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Fix {
    pub ident: String,
    pub database_id: String,
    #[serde(default)]
    pub kind: FixKind,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum AltitudeConstraint {
    At(f64),
    AtOrAbove(f64),
    AtOrBelow(f64),
    Between{ lower: f64, upper: f64 },
}

impl AltitudeConstraint {
    /// the altitude we would display with the constraint (the upper one for windows)
    pub fn display_altitude (&self)->f64 {
        match self {
            AltitudeConstraint::At(alt) | AltitudeConstraint::AtOrAbove(alt) | AltitudeConstraint::AtOrBelow(alt) => *alt,
            AltitudeConstraint::Between{upper,..} => *upper
        }
    }

    pub fn is_met_by (&self, altitude: f64, tolerance: f64)->bool {
        match self {
            AltitudeConstraint::At(alt) => (altitude - alt).abs() <= tolerance,
            AltitudeConstraint::AtOrAbove(alt) => altitude >= alt - tolerance,
            AltitudeConstraint::AtOrBelow(alt) => altitude <= alt + tolerance,
            AltitudeConstraint::Between{lower,upper} => altitude >= lower - tolerance && altitude <= upper + tolerance
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum SpeedConstraint {
    At(f64),
    AtOrBelow(f64),
    AtOrAbove(f64),
}

impl SpeedConstraint {
    pub fn speed (&self)->f64 {
        match self { SpeedConstraint::At(s) | SpeedConstraint::AtOrBelow(s) | SpeedConstraint::AtOrAbove(s) => *s }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Default)]
pub enum ConstraintType {
    #[default]
    Unknown,
    Climb,
    Descent,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash,Serialize,Deserialize,Default,Display)]
pub enum Segment {
    Origin,
    Departure,
    #[default]
    Enroute,
    Arrival,
    Approach,
    MissedApproach,
    Destination,
}

impl Segment {
    pub fn is_terminal_area (&self)->bool { *self != Segment::Enroute }
}

#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub struct HoldDescriptor {
    pub inbound_course: f64, // true
    pub turn_direction: TurnDirection,
    #[serde(default)]
    pub leg_time_min: Option<f64>,
    #[serde(default)]
    pub leg_distance_nm: Option<f64>,
}

/// a flight plan leg. `uid` is stable across edits that do not replace the leg
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct FlightPlanLeg {
    pub uid: u64,
    pub ident: String,
    pub path_terminator: PathTerminator,
    #[serde(default)] pub fix: Option<Fix>,
    #[serde(default)] pub course: Option<f64>,        // true course, or outbound course for PI
    #[serde(default)] pub distance_nm: Option<f64>,   // PI outbound distance
    #[serde(default)] pub altitude: Option<f64>,      // CA/FA/HA termination altitude in ft
    #[serde(default)] pub turn_direction: TurnDirection,
    #[serde(default)] pub arc_center: Option<GeoPoint>,
    #[serde(default)] pub hold: Option<HoldDescriptor>,
    #[serde(default)] pub altitude_constraint: Option<AltitudeConstraint>,
    #[serde(default)] pub speed_constraint: Option<SpeedConstraint>,
    #[serde(default)] pub constraint_type: ConstraintType,
    #[serde(default)] pub segment: Segment,
    #[serde(default)] pub overfly: bool,
}

impl FlightPlanLeg {
    pub fn new (uid: u64, ident: &str, path_terminator: PathTerminator)->Self {
        FlightPlanLeg { 
            uid, ident: ident.to_string(), path_terminator, 
            fix: None, course: None, distance_nm: None, altitude: None, turn_direction: TurnDirection::Either,
            arc_center: None, hold: None, altitude_constraint: None, speed_constraint: None,
            constraint_type: ConstraintType::Unknown, segment: Segment::Enroute, overfly: false
        }
    }

    /// shortcut for the common TF leg to a waypoint
    pub fn track_to_fix (uid: u64, ident: &str, location: GeoPoint)->Self {
        FlightPlanLeg::new( uid, ident, PathTerminator::TF).with_fix( Fix {
            ident: ident.to_string(), database_id: format!("W    {ident}"), kind: FixKind::Waypoint, location: Some(location)
        })
    }

    pub fn with_fix (mut self, fix: Fix)->Self { self.fix = Some(fix); self }
    pub fn with_course (mut self, course: f64)->Self { self.course = Some(course); self }
    pub fn with_segment (mut self, segment: Segment)->Self { self.segment = segment; self }
    pub fn with_hold (mut self, hold: HoldDescriptor)->Self { self.hold = Some(hold); self }

    pub fn with_altitude_constraint (mut self, c: AltitudeConstraint, ct: ConstraintType)->Self { 
        self.altitude_constraint = Some(c); 
        self.constraint_type = ct; 
        self 
    }

    pub fn fix_location (&self)->Option<GeoPoint> {
        self.fix.as_ref().and_then( |f| f.location)
    }

    pub fn is_airport_or_runway (&self)->bool {
        self.fix.as_ref().map( |f| matches!( f.kind, FixKind::Airport | FixKind::Runway)).unwrap_or(false)
    }

    pub fn has_constraints (&self)->bool {
        self.altitude_constraint.is_some() || self.speed_constraint.is_some()
    }
}

/* #endregion legs */

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub enum PlanElement {
    Leg(FlightPlanLeg),
    Discontinuity,
}

impl PlanElement {
    pub fn as_leg (&self)->Option<&FlightPlanLeg> {
        match self { PlanElement::Leg(leg) => Some(leg), PlanElement::Discontinuity => None }
    }

    pub fn is_discontinuity (&self)->bool { matches!( self, PlanElement::Discontinuity) }
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Airport {
    pub ident: String,
    pub database_id: String,
    pub location: GeoPoint,
    #[serde(default)] pub elevation_ft: f64,
    #[serde(default)] pub transition_altitude: Option<f64>,
    #[serde(default)] pub transition_level: Option<f64>, // in ft
}

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Runway {
    pub ident: String,
    pub database_id: String,
    pub threshold: GeoPoint,
    pub bearing: f64, // true
    #[serde(default)] pub length: Option<f64>, // meters
}

/// pilot defined fix info (rings and radials around a reference fix)
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct FixInfoEntry {
    pub fix: Fix,
    #[serde(default)] pub radials: Vec<f64>, // true bearings
    #[serde(default)] pub radii: Vec<f64>,   // NM
}

pub const MAX_FIX_INFO_ENTRIES: usize = 4;

#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct FlightPlan {
    pub index: FlightPlanIndex,
    #[serde(default)] pub version: u64,
    pub elements: Vec<PlanElement>,
    #[serde(default)] pub active_leg_index: usize,
    #[serde(default)] pub origin: Option<Airport>,
    #[serde(default)] pub origin_runway: Option<Runway>,
    #[serde(default)] pub destination: Option<Airport>,
    #[serde(default)] pub destination_runway: Option<Runway>,
    #[serde(default)] pub approach: Option<String>,
    #[serde(default)] pub first_missed_approach_leg_index: Option<usize>,
    #[serde(default)] pub fix_info: Vec<FixInfoEntry>,
    #[serde(default)] pub alternate: Option<Box<FlightPlan>>,
}

impl FlightPlan {
    pub fn new (index: FlightPlanIndex, elements: Vec<PlanElement>)->Self {
        FlightPlan {
            index, version: 0, elements, active_leg_index: 0,
            origin: None, origin_runway: None, destination: None, destination_runway: None, approach: None,
            first_missed_approach_leg_index: None, fix_info: Vec::new(), alternate: None
        }
    }

    pub fn from_legs (index: FlightPlanIndex, legs: Vec<FlightPlanLeg>)->Self {
        FlightPlan::new( index, legs.into_iter().map( PlanElement::Leg).collect())
    }

    #[inline] pub fn element_count (&self)->usize { self.elements.len() }
    #[inline] pub fn element (&self, index: usize)->Option<&PlanElement> { self.elements.get(index) }
    #[inline] pub fn leg (&self, index: usize)->Option<&FlightPlanLeg> { self.elements.get(index).and_then( |e| e.as_leg()) }

    pub fn active_leg (&self)->Option<&FlightPlanLeg> { self.leg( self.active_leg_index) }

    pub fn segment_of (&self, index: usize)->Option<Segment> { self.leg(index).map( |l| l.segment) }

    /// is this a terminal area leg that directly borders an enroute leg
    pub fn is_enroute_boundary (&self, index: usize)->bool {
        let is_enroute = |i: usize| self.segment_of(i) == Some(Segment::Enroute);

        match self.segment_of(index) {
            Some(Segment::Enroute) | None => false,
            Some(_) => is_enroute( index+1) || (index > 0 && is_enroute( index-1))
        }
    }

    pub fn is_missed_approach_leg (&self, index: usize)->bool {
        self.first_missed_approach_leg_index.map( |i| index >= i).unwrap_or(false)
    }

    /// resolve the leg at `index`, falling back to the preceding element if `index` holds a discontinuity.
    /// Returns `Ok(None)` if there is no such element. Two consecutive discontinuities are a broken plan
    pub fn resolve_leg_at_or_before (&self, index: usize)->Result<Option<(usize,&FlightPlanLeg)>> {
        match self.element(index) {
            None => Ok(None),
            Some(PlanElement::Leg(leg)) => Ok(Some((index,leg))),
            Some(PlanElement::Discontinuity) => {
                if index > 0 {
                    if let Some(PlanElement::Leg(leg)) = self.element(index-1) {
                        return Ok(Some((index-1,leg)))
                    }
                }
                Err( invariant_violation!("element {} of {} plan resolves to a discontinuity", index, self.index))
            }
        }
    }
}

/// the read access to flight plans we need
pub trait FlightPlanProvider {
    fn get (&self, index: FlightPlanIndex)->Option<&FlightPlan>;

    fn has (&self, index: FlightPlanIndex)->bool { self.get(index).is_some() }

    /// the plan in a given slot, or its alternate. An alternate without legs does not count
    fn get_plan (&self, index: FlightPlanIndex, alternate: bool)->Option<&FlightPlan> {
        let plan = self.get(index)?;
        if alternate {
            plan.alternate.as_deref().filter( |a| !a.elements.is_empty())
        } else {
            Some(plan)
        }
    }
}

/// a simple in-memory flight plan provider.
/// Every mutation assigns a new version from a store wide counter. Alternate plans share the
/// version of their parent
#[derive(Debug,Default)]
pub struct FlightPlanStore {
    plans: HashMap<FlightPlanIndex,FlightPlan>,
    version_counter: u64,
}

impl FlightPlanStore {
    pub fn new ()->Self { FlightPlanStore::default() }

    fn next_version (&mut self)->u64 {
        self.version_counter += 1;
        self.version_counter
    }

    fn stamp (plan: &mut FlightPlan, version: u64) {
        plan.version = version;
        if let Some(alt) = plan.alternate.as_mut() {
            alt.version = version;
        }
    }

    pub fn insert (&mut self, mut plan: FlightPlan)->u64 {
        let version = self.next_version();
        FlightPlanStore::stamp( &mut plan, version);
        self.plans.insert( plan.index, plan);
        version
    }

    pub fn remove (&mut self, index: FlightPlanIndex)->Option<FlightPlan> {
        self.plans.remove( &index)
    }

    /// apply a mutation to the plan in `index` and bump its version
    pub fn modify<F> (&mut self, index: FlightPlanIndex, f: F)->Result<u64> where F: FnOnce(&mut FlightPlan) {
        let version = self.next_version();
        let plan = self.plans.get_mut( &index).ok_or( FmsGuidanceError::FlightPlanNotFound(index,false))?;
        f( plan);
        plan.index = index;
        FlightPlanStore::stamp( plan, version);
        Ok(version)
    }

    pub fn set_active_leg_index (&mut self, index: FlightPlanIndex, active_leg_index: usize)->Result<u64> {
        self.modify( index, |plan| plan.active_leg_index = active_leg_index)
    }

    /// move the active plan to the next leg
    pub fn sequence (&mut self)->Result<u64> {
        let plan = self.get( FlightPlanIndex::Active).ok_or( FmsGuidanceError::FlightPlanNotFound( FlightPlanIndex::Active,false))?;
        let next = plan.active_leg_index + 1;
        if next >= plan.element_count() {
            return Err( op_failed!("cannot sequence past the last leg ({})", plan.active_leg_index))
        }
        self.set_active_leg_index( FlightPlanIndex::Active, next)
    }
}

impl FlightPlanProvider for FlightPlanStore {
    fn get (&self, index: FlightPlanIndex)->Option<&FlightPlan> { self.plans.get( &index) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wpt (uid: u64, ident: &str, lat: f64)->FlightPlanLeg {
        FlightPlanLeg::track_to_fix( uid, ident, GeoPoint::from_lat_lon( lat, 8.0))
    }

    #[test]
    fn test_geometry_key () {
        assert_eq!( FlightPlanIndex::Active.geometry_key(false), 0);
        assert_eq!( FlightPlanIndex::Active.geometry_key(true), 100);
        assert_eq!( FlightPlanIndex::FirstSecondary.geometry_key(true), 102);
    }

    #[test]
    fn test_store_versions () {
        let mut store = FlightPlanStore::new();
        let v1 = store.insert( FlightPlan::from_legs( FlightPlanIndex::Active, vec![wpt(1,"A",47.0), wpt(2,"B",47.5)]));
        let v2 = store.modify( FlightPlanIndex::Active, |p| p.elements.push( PlanElement::Leg( wpt(3,"C",48.0)))).unwrap();
        assert!( v2 > v1);
        assert_eq!( store.get( FlightPlanIndex::Active).unwrap().version, v2);

        assert!( store.modify( FlightPlanIndex::Temporary, |_| {}).is_err());
        assert!( store.get_plan( FlightPlanIndex::Active, true).is_none());

        store.sequence().unwrap();
        assert_eq!( store.get( FlightPlanIndex::Active).unwrap().active_leg_index, 1);
    }

    #[test]
    fn test_resolve_leg () {
        let plan = FlightPlan::new( FlightPlanIndex::Active, vec![
            PlanElement::Leg( wpt(1,"A",47.0)),
            PlanElement::Discontinuity,
            PlanElement::Discontinuity,
            PlanElement::Leg( wpt(2,"B",47.5)),
        ]);

        assert_eq!( plan.resolve_leg_at_or_before(0).unwrap().map(|(i,_)| i), Some(0));
        assert_eq!( plan.resolve_leg_at_or_before(1).unwrap().map(|(i,_)| i), Some(0));
        assert!( plan.resolve_leg_at_or_before(2).is_err());
        assert!( plan.resolve_leg_at_or_before(7).unwrap().is_none());
    }

    #[test]
    fn test_enroute_boundary () {
        let plan = FlightPlan::from_legs( FlightPlanIndex::Active, vec![
            wpt(1,"RWY",47.0).with_segment( Segment::Departure),
            wpt(2,"SID1",47.1).with_segment( Segment::Departure),
            wpt(3,"ENR1",47.2),
            wpt(4,"STAR1",47.3).with_segment( Segment::Arrival),
            wpt(5,"STAR2",47.4).with_segment( Segment::Arrival),
        ]);

        assert!( !plan.is_enroute_boundary(0));
        assert!( plan.is_enroute_boundary(1));
        assert!( !plan.is_enroute_boundary(2));
        assert!( plan.is_enroute_boundary(3));
        assert!( !plan.is_enroute_boundary(4));
    }
}
