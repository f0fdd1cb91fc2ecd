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

use std::{f64::consts::PI, sync::atomic::{AtomicU64,Ordering}};
use uom::si::f64::Velocity;
use fms_common::{
    angle::{TurnDirection, reciprocal, normalize_360},
    geo::GeoPoint, uom::{to_kts,to_mps}, tan, rad, G_ACCEL,
    geo_constants::METERS_PER_NM
};

use crate::flight_plan::{FlightPlanLeg, PathTerminator, Segment, HoldDescriptor};
use super::NominalKinematics;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

pub (crate) fn next_instance_id ()->u64 {
    NEXT_INSTANCE_ID.fetch_add( 1, Ordering::Relaxed)
}

/// turn radius in NM for a coordinated turn at the given ground speed and bank angle (degrees)
pub fn turn_radius_nm (gs: Velocity, bank_angle: f64)->f64 {
    let v = to_mps(gs);
    let t = tan( rad( bank_angle.clamp( 1.0, 45.0)));
    (v * v) / (G_ACCEL * t) / METERS_PER_NM
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub enum Termination {
    Fix(GeoPoint),
    Coordinate(GeoPoint),
}

impl Termination {
    pub fn location (&self)->GeoPoint {
        match self { Termination::Fix(p) | Termination::Coordinate(p) => *p }
    }
}

#[derive(Debug,Clone,Copy,PartialEq)]
pub enum HoldExit {
    Manual,
    Altitude(f64),
    Fix,
}

/// the geometry state of a holding pattern
/// holds and procedure turns without a published direction are flown as standard (right) turns
pub fn standard_turn (direction: TurnDirection)->TurnDirection {
    match direction {
        TurnDirection::Left => TurnDirection::Left,
        TurnDirection::Right | TurnDirection::Either => TurnDirection::Right,
    }
}

#[derive(Debug,Clone,PartialEq)]
pub struct HoldLeg {
    pub exit: HoldExit,
    pub inbound_course: f64,
    pub turn_direction: TurnDirection,
    leg_time_min: Option<f64>,
    leg_distance_nm: Option<f64>,
    immediate_exit: bool,
    exit_position: Option<GeoPoint>,
    predicted_tas: Option<Velocity>,
    radius_nm: f64,
    straight_nm: f64,
}

impl HoldLeg {
    fn new (exit: HoldExit, hold: &HoldDescriptor)->Self {
        let turn_direction = standard_turn( hold.turn_direction);
        HoldLeg {
            exit, inbound_course: hold.inbound_course, turn_direction,
            leg_time_min: hold.leg_time_min, leg_distance_nm: hold.leg_distance_nm,
            immediate_exit: false, exit_position: None, predicted_tas: None,
            radius_nm: 0.0, straight_nm: 0.0
        }
    }

    /// request (or cancel) an immediate exit. The hold is then flown back to the fix and left there
    pub fn set_immediate_exit (&mut self, exit: bool, ppos: &GeoPoint, tas: Velocity) {
        self.immediate_exit = exit;
        self.exit_position = if exit { Some(*ppos) } else { None };
        self.predicted_tas = Some(tas);
    }

    pub fn set_predicted_tas (&mut self, tas: Velocity) { self.predicted_tas = Some(tas) }

    #[inline] pub fn immediate_exit (&self)->bool { self.immediate_exit }
    #[inline] pub fn predicted_tas (&self)->Option<Velocity> { self.predicted_tas }
    #[inline] pub fn radius_nm (&self)->f64 { self.radius_nm }
    #[inline] pub fn straight_nm (&self)->f64 { self.straight_nm }

    /// manual holds are only left by an immediate exit
    pub fn automatic_sequencing (&self)->bool {
        match self.exit {
            HoldExit::Manual => self.immediate_exit,
            _ => true
        }
    }

    pub fn circuit_length_nm (&self)->f64 {
        2.0 * self.straight_nm + 2.0 * PI * self.radius_nm
    }
}

#[derive(Debug,Clone,PartialEq)]
pub enum LegKind {
    InitialFix,
    Track,
    DirectToFix,
    CourseToFix { course: f64 },
    CourseToAltitude { course: f64, altitude: f64, from_fix: bool },
    Manual { course: f64, from_fix: bool },
    Hold(HoldLeg),
    ProcedureTurn { outbound_course: f64, distance_nm: f64, turn_direction: TurnDirection },
    RadiusToFix { center: GeoPoint, turn_direction: TurnDirection, radius_nm: f64, sweep_angle: f64 },
}

impl LegKind {
    fn from_definition (def: &FlightPlanLeg)->LegKind {
        use PathTerminator::*;
        let course = def.course;

        match def.path_terminator {
            IF => LegKind::InitialFix,
            TF => LegKind::Track,
            DF => LegKind::DirectToFix,
            CF => course.map( |course| LegKind::CourseToFix{course}).unwrap_or( LegKind::Track),
            CA | FA => LegKind::CourseToAltitude { 
                course: course.unwrap_or(0.0), 
                altitude: def.altitude.unwrap_or(0.0), 
                from_fix: def.path_terminator == FA
            },
            VM | FM => LegKind::Manual { course: course.unwrap_or(0.0), from_fix: def.path_terminator == FM },
            HM | HA | HF => {
                let exit = match def.path_terminator {
                    HM => HoldExit::Manual,
                    HA => HoldExit::Altitude( def.altitude.unwrap_or(0.0)),
                    _ => HoldExit::Fix
                };
                let descriptor = def.hold.unwrap_or( HoldDescriptor { 
                    inbound_course: course.unwrap_or(0.0), 
                    turn_direction: def.turn_direction, 
                    leg_time_min: None, 
                    leg_distance_nm: None 
                });
                LegKind::Hold( HoldLeg::new( exit, &descriptor))
            }
            PathTerminator::PI => LegKind::ProcedureTurn {
                outbound_course: course.unwrap_or(0.0),
                distance_nm: def.distance_nm.unwrap_or(10.0),
                turn_direction: def.turn_direction
            },
            RF => match def.arc_center {
                Some(center) => LegKind::RadiusToFix { center, turn_direction: def.turn_direction, radius_nm: 0.0, sweep_angle: 0.0 },
                None => LegKind::Track
            }
        }
    }
}

/// what a leg needs to know about its surroundings when it is recomputed
pub (crate) struct LegRecomputeContext<'a> {
    pub from: Option<GeoPoint>,
    pub tas: Velocity,
    pub gs: Velocity,
    pub ppos: GeoPoint,
    pub is_active: bool,
    pub start_altitude_ft: f64,
    pub nominal: &'a NominalKinematics,
}

/// the geometry of a single flight plan leg
#[derive(Debug,Clone)]
pub struct GeometryLeg {
    instance_id: u64,
    definition: FlightPlanLeg,
    pub kind: LegKind,

    start: Option<GeoPoint>,
    termination: Option<Termination>,
    inbound_course: Option<f64>,
    outbound_course: Option<f64>,
    distance_nm: Option<f64>,
}

impl GeometryLeg {
    pub fn from_definition (definition: &FlightPlanLeg)->Self {
        GeometryLeg {
            instance_id: next_instance_id(),
            definition: definition.clone(),
            kind: LegKind::from_definition( definition),
            start: None,
            termination: None,
            inbound_course: None,
            outbound_course: None,
            distance_nm: None
        }
    }

    #[inline] pub fn instance_id (&self)->u64 { self.instance_id }
    #[inline] pub fn uid (&self)->u64 { self.definition.uid }
    #[inline] pub fn ident (&self)->&str { &self.definition.ident }
    #[inline] pub fn definition (&self)->&FlightPlanLeg { &self.definition }
    #[inline] pub fn segment (&self)->Segment { self.definition.segment }
    #[inline] pub fn start (&self)->Option<GeoPoint> { self.start }
    #[inline] pub fn termination (&self)->Option<Termination> { self.termination }
    #[inline] pub fn termination_location (&self)->Option<GeoPoint> { self.termination.map( |t| t.location()) }
    #[inline] pub fn inbound_course (&self)->Option<f64> { self.inbound_course }
    #[inline] pub fn outbound_course (&self)->Option<f64> { self.outbound_course }
    #[inline] pub fn distance_nm (&self)->Option<f64> { self.distance_nm }

    pub fn hold (&self)->Option<&HoldLeg> {
        if let LegKind::Hold(h) = &self.kind { Some(h) } else { None }
    }

    pub fn hold_mut (&mut self)->Option<&mut HoldLeg> {
        if let LegKind::Hold(h) = &mut self.kind { Some(h) } else { None }
    }

    pub fn is_manual_hold (&self)->bool {
        self.hold().map( |h| h.exit == HoldExit::Manual).unwrap_or(false)
    }

    pub fn automatic_sequencing (&self)->bool {
        match &self.kind {
            LegKind::Hold(h) => h.automatic_sequencing(),
            LegKind::Manual{..} => false,
            _ => true
        }
    }

    /// the turn direction used for course reversal symbols
    pub fn course_reversal (&self)->Option<TurnDirection> {
        match &self.kind {
            LegKind::Hold(h) => Some(h.turn_direction),
            LegKind::ProcedureTurn{turn_direction,..} => Some( standard_turn( *turn_direction)),
            _ => None
        }
    }

    fn set_path (&mut self, start: Option<GeoPoint>, termination: Option<Termination>, inbound: Option<f64>, outbound: Option<f64>, distance: Option<f64>) {
        self.start = start;
        self.termination = termination;
        self.inbound_course = inbound;
        self.outbound_course = outbound;
        self.distance_nm = distance;
    }

    /// recompute start, termination, courses and length. Missing data leaves the respective values unset
    pub (crate) fn recompute (&mut self, ctx: &LegRecomputeContext) {
        let fix = self.definition.fix_location();
        let from = ctx.from;

        match &mut self.kind {
            LegKind::InitialFix => {
                self.set_path( fix, fix.map( Termination::Fix), None, self.definition.course, Some(0.0));
            }

            LegKind::Track | LegKind::DirectToFix => {
                match (from, fix) {
                    (Some(from), Some(to)) => {
                        let inbound = from.initial_bearing( &to);
                        let outbound = if from == to { inbound } else { reciprocal( to.initial_bearing( &from)) };
                        self.set_path( Some(from), Some(Termination::Fix(to)), Some(inbound), Some(outbound), Some( from.distance_nm( &to)));
                    }
                    (None, Some(to)) => self.set_path( None, Some(Termination::Fix(to)), None, None, None),
                    _ => self.set_path( from, None, None, None, None)
                }
            }

            LegKind::CourseToFix{course} => {
                let course = *course;
                let distance = match (from, fix) { (Some(from), Some(to)) => Some( from.distance_nm( &to)), _ => None };
                self.set_path( from, fix.map( Termination::Fix), Some(course), Some(course), distance);
            }

            LegKind::CourseToAltitude{course,altitude,from_fix} => {
                let course = *course;
                let start = if *from_fix { fix.or(from) } else { from };
                let climb = (*altitude - ctx.start_altitude_ft).max(0.0);
                let distance = climb / ctx.nominal.climb_gradient_ft_per_nm.max(1.0);
                let termination = start.map( |p| Termination::Coordinate( p.destination( course, distance)));
                self.set_path( start, termination, Some(course), Some(course), start.map( |_| distance));
            }

            LegKind::Manual{course,from_fix} => {
                let course = *course;
                let start = if *from_fix { fix.or(from) } else { from };
                self.set_path( start, None, Some(course), Some(course), None);
            }

            LegKind::Hold(hold) => {
                let tas = hold.predicted_tas.unwrap_or( ctx.tas);
                hold.radius_nm = turn_radius_nm( tas, ctx.nominal.bank_angle);
                hold.straight_nm = match (hold.leg_distance_nm, hold.leg_time_min) {
                    (Some(d), _) => d,
                    (None, Some(t)) => t * to_kts(ctx.gs) / 60.0,
                    (None, None) => ctx.nominal.hold_leg_time_min( ctx.start_altitude_ft) * to_kts(ctx.gs) / 60.0
                };

                let inbound = hold.inbound_course;
                let entry_from = if hold.immediate_exit { hold.exit_position.or(from) } else { from };
                let to_fix = match (entry_from, fix) { (Some(p), Some(f)) => p.distance_nm( &f), _ => 0.0 };
                let distance = if hold.immediate_exit || fix.is_none() { to_fix } else { to_fix + hold.circuit_length_nm() };

                let start = entry_from;
                self.set_path( start, fix.map( Termination::Fix), Some(inbound), Some(inbound), fix.map( |_| distance));
            }

            LegKind::ProcedureTurn{outbound_course,distance_nm,turn_direction} => {
                let (course, d) = (*outbound_course, *distance_nm);
                let radius = turn_radius_nm( ctx.gs, ctx.nominal.bank_angle);
                let start = fix.or(from);
                let termination = start.map( |p| Termination::Coordinate( p.destination( course, d)));
                let length = 2.0 * d + PI * radius;
                self.set_path( start, termination, Some(course), Some( reciprocal(course)), start.map( |_| length));
            }

            LegKind::RadiusToFix{center,turn_direction,radius_nm,sweep_angle} => {
                let center = *center;
                if let (Some(from), Some(to)) = (from, fix) {
                    let r0 = center.initial_bearing( &from);
                    let r1 = center.initial_bearing( &to);
                    let dir = if *turn_direction == TurnDirection::Either { TurnDirection::shortest( r0, r1) } else { *turn_direction };
                    let sweep = dir.course_change( r0, r1);
                    let sign = if sweep < 0.0 { -1.0 } else { 1.0 };

                    *radius_nm = center.distance_nm( &to);
                    *sweep_angle = sweep;
                    let length = rad( sweep.abs()) * *radius_nm;
                    let inbound = normalize_360( r0 + 90.0 * sign);
                    let outbound = normalize_360( r1 + 90.0 * sign);
                    self.set_path( Some(from), Some(Termination::Fix(to)), Some(inbound), Some(outbound), Some(length));
                } else {
                    self.set_path( from, fix.map( Termination::Fix), None, None, None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fms_common::uom::knots;

    fn nominal ()->NominalKinematics { NominalKinematics::default() }

    fn ctx<'a> (from: Option<GeoPoint>, nominal: &'a NominalKinematics)->LegRecomputeContext<'a> {
        LegRecomputeContext { 
            from, tas: knots(240.0), gs: knots(240.0), ppos: GeoPoint::from_lat_lon( 47.0, 8.0), 
            is_active: false, start_altitude_ft: 1000.0, nominal 
        }
    }

    #[test]
    fn test_unconstrained_hold_turns_right () {
        let mut def = FlightPlanLeg::track_to_fix( 1, "HLD", GeoPoint::from_lat_lon( 47.5, 8.0));
        def.path_terminator = PathTerminator::HM;
        def.hold = Some( HoldDescriptor { inbound_course: 90.0, turn_direction: TurnDirection::Either, leg_time_min: Some(1.0), leg_distance_nm: None });
        let leg = GeometryLeg::from_definition( &def);
        assert_eq!( leg.course_reversal(), Some( TurnDirection::Right));

        def.hold = Some( HoldDescriptor { inbound_course: 90.0, turn_direction: TurnDirection::Left, leg_time_min: Some(1.0), leg_distance_nm: None });
        assert_eq!( GeometryLeg::from_definition( &def).course_reversal(), Some( TurnDirection::Left));

        let mut def = FlightPlanLeg::track_to_fix( 2, "PT", GeoPoint::from_lat_lon( 47.5, 8.0)).with_course( 270.0);
        def.path_terminator = PathTerminator::PI;
        assert_eq!( GeometryLeg::from_definition( &def).course_reversal(), Some( TurnDirection::Right));
    }

    #[test]
    fn test_turn_radius () {
        // 240kts at 25° bank is about 1.9NM
        let r = turn_radius_nm( knots(240.0), 25.0);
        assert!( (r - 1.9).abs() < 0.2, "radius {}", r);
    }

    #[test]
    fn test_track_leg () {
        let nominal = nominal();
        let def = FlightPlanLeg::track_to_fix( 1, "B", GeoPoint::from_lat_lon( 48.0, 8.0));
        let mut leg = GeometryLeg::from_definition( &def);
        leg.recompute( &ctx( Some( GeoPoint::from_lat_lon( 47.0, 8.0)), &nominal));

        assert!( (leg.distance_nm().unwrap() - 60.0).abs() < 0.5);
        assert!( leg.inbound_course().unwrap().abs() < 0.01);
        assert!( matches!( leg.termination(), Some(Termination::Fix(_))));

        // no predecessor: termination is still known
        leg.recompute( &ctx( None, &nominal));
        assert!( leg.distance_nm().is_none());
        assert!( leg.termination().is_some());
    }

    #[test]
    fn test_unresolved_fix () {
        let nominal = nominal();
        let def = FlightPlanLeg::new( 7, "NOWHERE", PathTerminator::TF);
        let mut leg = GeometryLeg::from_definition( &def);
        leg.recompute( &ctx( Some( GeoPoint::from_lat_lon( 47.0, 8.0)), &nominal));
        assert!( leg.termination().is_none());
    }

    #[test]
    fn test_hold_immediate_exit () {
        let nominal = nominal();
        let fix = GeoPoint::from_lat_lon( 47.0, 8.0);
        let def = FlightPlanLeg::track_to_fix( 3, "HLD", fix);
        let def = FlightPlanLeg { path_terminator: PathTerminator::HM, ..def }.with_hold( HoldDescriptor {
            inbound_course: 90.0, turn_direction: TurnDirection::Right, leg_time_min: Some(1.0), leg_distance_nm: None
        });
        let mut leg = GeometryLeg::from_definition( &def);
        let from = GeoPoint::from_lat_lon( 47.0, 7.8);

        leg.recompute( &ctx( Some(from), &nominal));
        let holding_distance = leg.distance_nm().unwrap();
        assert!( !leg.automatic_sequencing());
        assert!( leg.is_manual_hold());

        leg.hold_mut().unwrap().set_immediate_exit( true, &from, knots(220.0));
        leg.recompute( &ctx( Some(from), &nominal));
        assert!( leg.automatic_sequencing());
        assert!( leg.distance_nm().unwrap() < holding_distance);
        assert!( (leg.distance_nm().unwrap() - from.distance_nm( &fix)).abs() < 0.01);
    }
}
