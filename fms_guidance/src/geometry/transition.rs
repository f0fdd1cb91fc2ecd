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

use uom::si::f64::Velocity;
use fms_common::{angle::{TurnDirection, angle_diff}, tan, rad};

use super::leg::{GeometryLeg, LegKind, turn_radius_nm, next_instance_id};

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum TransitionKind {
    FixedRadius,
    PathCapture,
    HoldEntry,
    DirectToEntry,
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Hash)]
pub enum HoldEntry {
    Direct,
    Teardrop,
    Parallel,
}

/// the hold entry for an aircraft approaching the hold fix on `approach_course`
pub fn hold_entry (approach_course: f64, inbound_course: f64, turn_direction: TurnDirection)->HoldEntry {
    let d = angle_diff( inbound_course, approach_course) * turn_direction.sign();
    if d >= -110.0 && d <= 70.0 { HoldEntry::Direct }
    else if d > 70.0 { HoldEntry::Parallel }
    else { HoldEntry::Teardrop }
}

/// the turn that joins two consecutive legs
#[derive(Debug,Clone,PartialEq)]
pub struct Transition {
    instance_id: u64,
    kind: TransitionKind,
    turn_direction: TurnDirection,
    course_change: f64,
    radius_nm: f64,
    turn_distance_nm: f64,
    hold_entry: Option<HoldEntry>,
}

impl Transition {
    pub fn new (kind: TransitionKind)->Self {
        Transition { 
            instance_id: next_instance_id(), kind, 
            turn_direction: TurnDirection::Either, course_change: 0.0, radius_nm: 0.0, turn_distance_nm: 0.0, hold_entry: None 
        }
    }

    #[inline] pub fn instance_id (&self)->u64 { self.instance_id }
    #[inline] pub fn kind (&self)->TransitionKind { self.kind }
    #[inline] pub fn turn_direction (&self)->TurnDirection { self.turn_direction }
    #[inline] pub fn course_change (&self)->f64 { self.course_change }
    #[inline] pub fn radius_nm (&self)->f64 { self.radius_nm }
    #[inline] pub fn hold_entry (&self)->Option<HoldEntry> { self.hold_entry }

    /// distance before the corner at which the turn starts (zero for transitions that overfly)
    #[inline] pub fn turn_distance_nm (&self)->f64 { self.turn_distance_nm }

    pub (crate) fn recompute (&mut self, prev_course: Option<f64>, next: &GeometryLeg, gs: Velocity, bank_angle: f64) {
        let next_course = next.inbound_course();
        self.radius_nm = turn_radius_nm( gs, bank_angle);

        let (Some(from), Some(to)) = (prev_course, next_course) else {
            self.course_change = 0.0;
            self.turn_distance_nm = 0.0;
            self.hold_entry = None;
            return
        };

        let forced = match &next.kind {
            LegKind::RadiusToFix{..} => TurnDirection::Either, // tangential join
            LegKind::Hold(_) if self.kind == TransitionKind::HoldEntry => TurnDirection::Either,
            _ => next.definition().turn_direction
        };
        self.turn_direction = if forced == TurnDirection::Either { TurnDirection::shortest( from, to) } else { forced };
        self.course_change = self.turn_direction.course_change( from, to);

        match self.kind {
            TransitionKind::FixedRadius => {
                let half = rad( self.course_change.abs() / 2.0);
                // large course changes are not anticipated beyond one radius
                self.turn_distance_nm = if self.course_change.abs() <= 135.0 { self.radius_nm * tan(half) } else { self.radius_nm };
                self.hold_entry = None;
            }
            TransitionKind::HoldEntry => {
                self.turn_distance_nm = 0.0;
                self.hold_entry = next.hold().map( |h| hold_entry( from, h.inbound_course, h.turn_direction));
            }
            TransitionKind::PathCapture | TransitionKind::DirectToEntry => {
                self.turn_distance_nm = 0.0;
                self.hold_entry = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_entries () {
        // inbound 360 right turns
        assert_eq!( hold_entry( 10.0, 360.0, TurnDirection::Right), HoldEntry::Direct);
        assert_eq!( hold_entry( 150.0, 360.0, TurnDirection::Right), HoldEntry::Parallel);
        assert_eq!( hold_entry( 220.0, 360.0, TurnDirection::Right), HoldEntry::Teardrop);
        // mirrored for left turns
        assert_eq!( hold_entry( 210.0, 360.0, TurnDirection::Left), HoldEntry::Parallel);
        assert_eq!( hold_entry( 140.0, 360.0, TurnDirection::Left), HoldEntry::Teardrop);
    }
}
