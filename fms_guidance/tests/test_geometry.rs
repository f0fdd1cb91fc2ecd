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

use fms_common::{geo::GeoPoint, angle::TurnDirection, uom::knots};
use fms_guidance::{
    GuidanceConfig,
    flight_plan::{FlightPlan, FlightPlanIndex, FlightPlanLeg, PlanElement, PathTerminator, Fix, FixKind, HoldDescriptor},
    geometry::{Geometry, GeometryFactory, NominalKinematics, RecomputeParameters, LegKind, TransitionKind},
};

fn leg (uid: u64, ident: &str, lat: f64, lon: f64)->FlightPlanLeg {
    FlightPlanLeg::track_to_fix( uid, ident, GeoPoint::from_lat_lon( lat, lon))
}

fn route (index: FlightPlanIndex)->FlightPlan {
    let mut origin = leg( 1, "ORIG", 47.0, 8.0);
    origin.path_terminator = PathTerminator::IF;

    let mut plan = FlightPlan::from_legs( index, vec![
        origin,
        leg( 2, "WPT1", 47.2, 8.0),
        leg( 3, "WPT2", 47.4, 8.2),
        leg( 4, "WPT3", 47.6, 8.2),
        leg( 5, "WPT4", 47.8, 8.0),
    ]);
    plan.active_leg_index = 1;
    plan
}

fn params (active_leg_index: usize)->RecomputeParameters {
    RecomputeParameters {
        tas: knots(250.0), gs: knots(250.0),
        ppos: GeoPoint::from_lat_lon( 47.1, 8.0), true_track: 0.0,
        active_leg_index, active_transition_index: active_leg_index,
        nominal_tas: knots(280.0), wind: None
    }
}

fn factory ()->GeometryFactory { GeometryFactory::new( NominalKinematics::default()) }

fn instance_ids (g: &Geometry)->Vec<(usize,u64)> {
    g.legs().map( |(i,l)| (i, l.instance_id())).collect()
}

#[test]
fn test_create_and_recompute () {
    let plan = route( FlightPlanIndex::Active);
    let mut g = factory().create_from_flight_plan( &plan, true);
    g.recompute_with_parameters( &params(1));

    assert_eq!( g.leg_count(), 5);
    assert!( g.transition(0).is_none()); // nothing leads into the IF
    assert_eq!( g.transition(2).unwrap().kind(), TransitionKind::FixedRadius);

    let d1 = g.leg(1).unwrap().distance_nm().unwrap();
    assert!( (d1 - 12.0).abs() < 0.1, "d1 = {}", d1);

    // WPT1 -> WPT2 turns right, anticipated by a fixed radius turn
    let t = g.transition(2).unwrap();
    assert_eq!( t.turn_direction(), TurnDirection::Right);
    assert!( t.turn_distance_nm() > 0.0);

    let total = g.total_distance_nm();
    let cumulative = g.cumulative_distances();
    assert_eq!( cumulative.len(), 5);
    assert!( (cumulative.last().unwrap().1 - total).abs() < 1e-9);
    println!("total path length: {:.1}NM", total);
}

#[test]
fn test_discontinuity_breaks_transitions () {
    let mut plan = route( FlightPlanIndex::Active);
    plan.elements.insert( 3, PlanElement::Discontinuity);
    let mut g = factory().create_from_flight_plan( &plan, true);
    g.recompute_with_parameters( &params(1));

    assert_eq!( g.leg_count(), 5);
    assert!( g.leg(3).is_none());
    assert!( g.transition(4).is_none());

    // the leg after the discontinuity knows where it ends but not where it starts
    let after = g.leg(4).unwrap();
    assert!( after.termination().is_some());
    assert!( after.start().is_none());
    assert!( after.distance_nm().is_none());
}

#[test]
fn test_unresolved_termination_does_not_stop_recompute () {
    let mut plan = route( FlightPlanIndex::Active);
    if let PlanElement::Leg(l) = &mut plan.elements[2] {
        l.fix = Some( Fix { ident: "WPT2".into(), database_id: "W    WPT2".into(), kind: FixKind::Waypoint, location: None });
    }
    let mut g = factory().create_from_flight_plan( &plan, true);
    g.recompute_with_parameters( &params(1));

    assert!( g.leg(2).unwrap().termination().is_none());
    assert!( g.leg(3).unwrap().termination().is_some());
    assert!( g.leg(4).unwrap().distance_nm().is_some());
}

#[test]
fn test_reconcile_preserves_instances () {
    let f = factory();
    let mut plan = route( FlightPlanIndex::Active);
    let mut g = f.create_from_flight_plan( &plan, true);
    let before = instance_ids( &g);
    let t3 = g.transition(3).unwrap().instance_id();

    // unchanged plan
    let stats = f.update_from_flight_plan( &mut g, &plan, true);
    assert_eq!( stats.kept, 5);
    assert_eq!( stats.rebuilt, 0);
    assert_eq!( instance_ids( &g), before);

    // move WPT4, only that leg and its incoming transition change
    if let PlanElement::Leg(l) = &mut plan.elements[4] {
        l.fix.as_mut().unwrap().location = Some( GeoPoint::from_lat_lon( 47.9, 8.1));
    }
    let stats = f.update_from_flight_plan( &mut g, &plan, true);
    assert_eq!( stats.kept, 4);
    assert_eq!( stats.rebuilt, 1);
    assert_eq!( g.leg(1).unwrap().instance_id(), before[1].1);
    assert_ne!( g.leg(4).unwrap().instance_id(), before[4].1);
    assert_eq!( g.transition(3).unwrap().instance_id(), t3);

    // delete WPT2, WPT3 and WPT4 shift down and keep their instances
    let wpt3_id = g.leg(3).unwrap().instance_id();
    plan.elements.remove(2);
    let stats = f.update_from_flight_plan( &mut g, &plan, true);
    assert_eq!( stats.removed, 1);
    assert_eq!( g.leg_count(), 4);
    assert_eq!( g.leg(2).unwrap().ident(), "WPT3");
    assert_eq!( g.leg(2).unwrap().instance_id(), wpt3_id);
    // WPT3 has a new predecessor
    assert_ne!( g.transition(2).unwrap().instance_id(), t3);
}

#[test]
fn test_secondary_transitions () {
    let mut plan = route( FlightPlanIndex::FirstSecondary);
    let mut hold = leg( 6, "WPT4", 47.8, 8.0);
    hold.path_terminator = PathTerminator::HM;
    hold = hold.with_hold( HoldDescriptor { inbound_course: 0.0, turn_direction: TurnDirection::Right, leg_time_min: None, leg_distance_nm: None });
    plan.elements.push( PlanElement::Leg(hold));

    let secondary = factory().create_from_flight_plan( &plan, false);
    assert!( secondary.transitions().all( |(_,t)| t.kind() == TransitionKind::FixedRadius));

    let primary = factory().create_from_flight_plan( &plan, true);
    assert_eq!( primary.transition(5).unwrap().kind(), TransitionKind::HoldEntry);
}

#[test]
fn test_direct_to_entry () {
    let mut plan = route( FlightPlanIndex::Active);
    if let PlanElement::Leg(l) = &mut plan.elements[2] {
        l.path_terminator = PathTerminator::DF;
    }
    plan.active_leg_index = 2;

    let mut g = factory().create_from_flight_plan( &plan, true);
    assert_eq!( g.transition(2).unwrap().kind(), TransitionKind::DirectToEntry);

    // direct to legs start at the aircraft position
    let p = params(2);
    g.recompute_with_parameters( &p);
    let df = g.leg(2).unwrap();
    assert_eq!( df.start(), Some(p.ppos));
    assert!( matches!( df.kind, LegKind::DirectToFix));
}

#[test]
fn test_point_before_termination () {
    let plan = route( FlightPlanIndex::Active);
    let mut g = factory().create_from_flight_plan( &plan, true);
    g.recompute_with_parameters( &params(1));

    // WPT1 leg runs north along 8°E
    let p = g.point_before_termination( 1, 6.0).unwrap();
    assert!( (p.latitude() - 47.1).abs() < 0.01, "{}", p);
    assert!( (p.longitude() - 8.0).abs() < 0.01);

    // walking back from WPT2 into the WPT1 leg
    let d2 = g.leg(2).unwrap().distance_nm().unwrap();
    let q = g.point_before_termination( 2, d2 + 6.0).unwrap();
    assert!( q.distance_nm( &p) < 0.1);

    let (idx, dbt) = g.locate_distance( 6.0).unwrap();
    assert_eq!( idx, 1);
    assert!( (dbt - 6.0).abs() < 0.1);
}

#[test]
fn test_hold_radius_follows_predicted_tas () {
    let mut plan = route( FlightPlanIndex::Active);
    let mut hold = leg( 6, "WPT4", 47.8, 8.0);
    hold.path_terminator = PathTerminator::HM;
    plan.elements.push( PlanElement::Leg( hold.with_hold( HoldDescriptor { 
        inbound_course: 180.0, turn_direction: TurnDirection::Left, leg_time_min: Some(1.0), leg_distance_nm: None 
    })));

    let mut g = factory().create_from_flight_plan( &plan, true);
    g.recompute_with_parameters( &params(1));
    let r_nominal = g.leg(5).unwrap().hold().unwrap().radius_nm();

    g.leg_mut(5).unwrap().hold_mut().unwrap().set_predicted_tas( knots(180.0));
    g.recompute_with_parameters( &params(1));
    let r_slow = g.leg(5).unwrap().hold().unwrap().radius_nm();

    assert!( r_slow < r_nominal);
    assert_eq!( g.leg(5).unwrap().course_reversal(), Some(TurnDirection::Left));
}

#[test]
fn test_default_config_file () {
    let config = fms_guidance::load_config( "configs/guidance.ron").unwrap();
    assert_eq!( config, GuidanceConfig::default());
}
