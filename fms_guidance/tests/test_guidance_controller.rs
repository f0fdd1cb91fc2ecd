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
use fms_common::{geo::GeoPoint, angle::TurnDirection, uom::{knots,feet}};
use fms_guidance::{
    GuidanceController, GuidanceConfig,
    flight_plan::{FlightPlan, FlightPlanIndex, FlightPlanLeg, FlightPlanProvider, FlightPlanStore, PlanElement, PathTerminator, HoldDescriptor, Airport},
    platform::{StaticPlatform, RecordingSink, EfisSide, EfisNdMode, KinematicSnapshot, SelectedWaypoint},
    efis_vectors::PathVectorGroup,
    vnav::{ProfileEventKind, DefaultVnav, VerticalProfileDriver},
    lnav::{LateralDriver, LnavContext, LnavOutput},
    observers::VerticalProfileParameterObserver,
    FmsGuidanceError,
};

const TICK: Duration = Duration::from_millis(100);

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
    plan.approach = Some("ILS14".into());
    plan
}

fn platform ()->StaticPlatform {
    let mut platform = StaticPlatform::default();
    platform.kinematics = KinematicSnapshot {
        position: GeoPoint::from_lat_lon( 47.1, 8.0),
        true_airspeed: knots(250.0),
        ground_speed: knots(250.0),
        true_track: 0.0,
        true_heading: 0.0,
        altitude: feet(4000.0),
    };
    platform.auto_flight_modes.lateral_managed = true;
    platform
}

fn active_store ()->FlightPlanStore {
    let mut store = FlightPlanStore::new();
    store.insert( route( FlightPlanIndex::Active));
    store
}

fn leg_instance_ids (gc: &GuidanceController)->Vec<u64> {
    gc.active_geometry().unwrap().legs().map( |(_,l)| l.instance_id()).collect()
}

#[test]
fn test_unchanged_version_is_noop () {
    let mut store = active_store();
    let platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    let updates = gc.geometry_update_count();
    let ids = leg_instance_ids( &gc);
    assert_eq!( gc.last_seen_version( FlightPlanIndex::Active), Some( store.get( FlightPlanIndex::Active).unwrap().version));

    gc.update( TICK, &store, &platform, &mut sink);
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( gc.geometry_update_count(), updates);
    assert_eq!( leg_instance_ids( &gc), ids);

    // appending a leg rebuilds the geometry but keeps the unchanged leg instances
    store.modify( FlightPlanIndex::Active, |p| p.elements.push( PlanElement::Leg( leg( 6, "WPT5", 48.0, 8.0)))).unwrap();
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( gc.geometry_update_count(), updates + 1);

    let new_ids = leg_instance_ids( &gc);
    assert_eq!( new_ids.len(), 6);
    assert_eq!( &new_ids[..5], &ids[..]);
}

#[test]
fn test_periodic_full_rebuild () {
    let store = active_store();
    let platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    let updates = gc.geometry_update_count();

    for _ in 0..50 { gc.update( TICK, &store, &platform, &mut sink) }
    assert_eq!( gc.geometry_update_count(), updates + 1);
}

#[test]
fn test_geometry_eviction () {
    let mut store = active_store();
    store.insert( route( FlightPlanIndex::Temporary));
    let mut secondary = route( FlightPlanIndex::FirstSecondary);
    secondary.alternate = Some( Box::new( route( FlightPlanIndex::FirstSecondary)));
    store.insert( secondary);

    let platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    assert!( gc.has_geometry( FlightPlanIndex::Temporary, false));
    assert!( gc.has_geometry( FlightPlanIndex::FirstSecondary, false));
    assert!( gc.has_geometry( FlightPlanIndex::FirstSecondary, true));
    assert!( !gc.has_geometry( FlightPlanIndex::Active, true));
    assert_eq!( gc.geometry_count(), 4);

    store.remove( FlightPlanIndex::Temporary);
    store.modify( FlightPlanIndex::FirstSecondary, |p| p.alternate = None).unwrap();
    gc.update( TICK, &store, &platform, &mut sink);
    assert!( !gc.has_geometry( FlightPlanIndex::Temporary, false));
    assert!( !gc.has_geometry( FlightPlanIndex::FirstSecondary, true));
    assert_eq!( gc.geometry_count(), 2);
}

#[test]
fn test_to_waypoint_and_reference_point () {
    let store = active_store();
    let mut platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &FlightPlanStore::new(), &platform, &mut sink);
    assert_eq!( sink.left.to_waypoint_ident, "PPOS");
    assert_eq!( sink.map_reference_point, Some( platform.kinematics.position));

    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( sink.left.to_waypoint_ident, "WPT1");
    assert_eq!( sink.right.to_waypoint_ident, "WPT1");
    assert_eq!( sink.left.approach_message, "ILS14");

    platform.selected_waypoint = Some( SelectedWaypoint { plan_index: FlightPlanIndex::Active, leg_index: 3, in_alternate: false });
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( sink.map_reference_point, Some( GeoPoint::from_lat_lon( 47.6, 8.2)));
    assert!( gc.efis_vectors().transmissions() >= 2);
}

#[test]
fn test_reference_point_after_discontinuity () {
    let mut store = FlightPlanStore::new();
    let mut plan = route( FlightPlanIndex::Active);
    plan.elements.insert( 3, PlanElement::Discontinuity);
    store.insert( plan);

    let mut platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    platform.selected_waypoint = Some( SelectedWaypoint { plan_index: FlightPlanIndex::Active, leg_index: 3, in_alternate: false });
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( sink.map_reference_point, Some( GeoPoint::from_lat_lon( 47.4, 8.2)));
}

#[test]
fn test_mode_change_forces_vectors () {
    let store = active_store();
    let mut platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( gc.efis_vectors().transmissions(), 1);
    assert_eq!( gc.pending_efis_vector_tasks(), 1);
    assert!( !sink.left.path_vectors[&PathVectorGroup::Active].is_empty());

    platform.set_mode( EfisSide::L, EfisNdMode::Plan);
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( gc.pending_efis_vector_tasks(), 0);
    assert_eq!( gc.efis_vectors().transmissions(), 2);
    assert_eq!( gc.efis_state( EfisSide::L).mode, EfisNdMode::Plan);

    // rate limited without changes
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( gc.efis_vectors().transmissions(), 2);
}

#[test]
fn test_vector_culling () {
    let store = active_store();
    let mut platform = platform();
    let mut sink = RecordingSink::default();
    let config = GuidanceConfig { max_path_vectors: 2, ..GuidanceConfig::default() };
    let mut gc = GuidanceController::new( config);

    gc.update( TICK, &store, &platform, &mut sink);
    assert!( gc.efis_state( EfisSide::L).legs_culled);
    assert!( gc.efis_state( EfisSide::R).legs_culled);
    assert_eq!( sink.left.path_vectors[&PathVectorGroup::Active].len(), 2);
    assert_eq!( sink.right.path_vectors[&PathVectorGroup::Active], sink.left.path_vectors[&PathVectorGroup::Active]);

    // reported as partly displayed on the next tick, regardless of the side's display settings
    platform.set_mode( EfisSide::R, EfisNdMode::Plan);
    gc.update( TICK, &store, &platform, &mut sink);
    assert!( sink.left.map_partly_displayed);
    assert!( sink.right.map_partly_displayed);
    assert!( gc.efis_state( EfisSide::R).legs_culled);
}

#[test]
fn test_data_limit_flag () {
    let store = active_store();
    let platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.data_limit_flag( EfisSide::R).set( true);
    gc.update( TICK, &store, &platform, &mut sink);
    assert!( sink.right.data_limit_reached);
    assert!( sink.right.map_partly_displayed);
    assert!( !sink.left.map_partly_displayed);
}

#[test]
fn test_manual_hold_exit () {
    let mut store = FlightPlanStore::new();
    let mut plan = route( FlightPlanIndex::Active);
    if let PlanElement::Leg(l) = &mut plan.elements[3] {
        l.path_terminator = PathTerminator::HM;
        l.hold = Some( HoldDescriptor { inbound_course: 0.0, turn_direction: TurnDirection::Right, leg_time_min: Some(1.0), leg_distance_nm: None });
    }
    plan.active_leg_index = 3;
    store.insert( plan);

    let mut platform = platform();
    platform.kinematics.position = GeoPoint::from_lat_lon( 47.5, 8.2);
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    assert!( gc.is_manual_hold_active());
    assert!( !gc.is_manual_hold_next());

    let hold_leg = gc.active_geometry().unwrap().leg(3).unwrap();
    assert!( !hold_leg.automatic_sequencing());
    let holding_distance = hold_leg.distance_nm().unwrap();

    gc.set_manual_hold_immediate_exit( true).unwrap();
    let hold_leg = gc.active_geometry().unwrap().leg(3).unwrap();
    assert!( hold_leg.automatic_sequencing());
    assert!( hold_leg.distance_nm().unwrap() < holding_distance);

    // the exit survives plan edits that do not touch the hold
    store.modify( FlightPlanIndex::Active, |p| p.elements.push( PlanElement::Leg( leg( 6, "WPT5", 48.0, 8.0)))).unwrap();
    gc.update( TICK, &store, &platform, &mut sink);
    assert!( gc.active_geometry().unwrap().leg(3).unwrap().automatic_sequencing());
}

#[test]
fn test_leg_sequencing_request () {
    let store = active_store();
    let mut platform = platform();
    platform.kinematics.position = GeoPoint::from_lat_lon( 47.2, 8.0); // at WPT1
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( sink.sequence_requests, vec![1]);
}

#[test]
fn test_pseudo_waypoints () {
    let mut store = FlightPlanStore::new();
    let mut plan = route( FlightPlanIndex::Active);
    plan.origin = Some( Airport {
        ident: "ORIG".into(), database_id: "A    ORIG".into(), location: GeoPoint::from_lat_lon( 47.0, 8.0),
        elevation_ft: 0.0, transition_altitude: Some(5000.0), transition_level: None
    });
    store.insert( plan);

    let mut platform = platform();
    platform.performance.cruise_altitude_ft = Some(5000.0);
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);

    let vnav = gc.vnav();
    assert!( vnav.is_lateral_auto_control_active());
    assert!( (vnav.leg_prediction(1).unwrap().altitude_ft - 4800.0).abs() < 50.0);

    let tc = gc.pseudo_waypoints().iter().find( |p| p.kind == ProfileEventKind::TopOfClimb).unwrap();
    assert_eq!( tc.ident, "(T/C)");
    assert_eq!( tc.leg_index, 2);
    let location = tc.location.unwrap();
    assert!( location.latitude() > 47.2 && location.latitude() < 47.4, "{}", location);

    assert!( gc.sequence_pseudo_waypoint( "(T/C)"));
    assert!( !gc.sequence_pseudo_waypoint( "(XYZ)"));
    assert!( gc.pseudo_waypoints().iter().find( |p| p.kind == ProfileEventKind::TopOfClimb).unwrap().sequenced);
}

#[test]
fn test_alternate_follows_parent_edit () {
    let mut store = FlightPlanStore::new();
    let mut plan = route( FlightPlanIndex::Active);
    plan.alternate = Some( Box::new( route( FlightPlanIndex::Active)));
    store.insert( plan);

    let platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    let alternate = gc.geometry( FlightPlanIndex::Active, true).unwrap();
    assert_eq!( alternate.termination_location(4), Some( GeoPoint::from_lat_lon( 47.8, 8.0)));

    // the edit only touches the alternate, which carries the version of its parent
    store.modify( FlightPlanIndex::Active, |p| {
        if let Some(alt) = p.alternate.as_mut() {
            alt.elements[4] = PlanElement::Leg( leg( 5, "WPT4", 49.0, 9.0));
        }
    }).unwrap();
    gc.update( TICK, &store, &platform, &mut sink);

    let alternate = gc.geometry( FlightPlanIndex::Active, true).unwrap();
    assert_eq!( alternate.termination_location(4), Some( GeoPoint::from_lat_lon( 49.0, 9.0)));
    assert_eq!( gc.last_seen_version( FlightPlanIndex::Active), Some( store.get( FlightPlanIndex::Active).unwrap().version));
}

struct FailingLnav;

impl LateralDriver for FailingLnav {
    fn update (&mut self, _ctx: &LnavContext)->fms_guidance::Result<LnavOutput> {
        Err( FmsGuidanceError::OpFailedError( "no lateral solution".into()))
    }
}

#[test]
fn test_failing_stage_does_not_stop_tick () {
    let mut store = FlightPlanStore::new();
    let mut plan = route( FlightPlanIndex::Active);
    plan.origin = Some( Airport {
        ident: "ORIG".into(), database_id: "A    ORIG".into(), location: GeoPoint::from_lat_lon( 47.0, 8.0),
        elevation_ft: 0.0, transition_altitude: Some(5000.0), transition_level: None
    });
    store.insert( plan);

    let mut platform = platform();
    platform.performance.cruise_altitude_ft = Some(5000.0);
    let mut sink = RecordingSink::default();

    let config = GuidanceConfig::default();
    let vnav = DefaultVnav::new( VerticalProfileParameterObserver::new( &config).current());
    let mut gc = GuidanceController::with_drivers( config, Box::new( FailingLnav), Box::new( vnav));

    gc.update( TICK, &store, &platform, &mut sink);

    // everything after the failed LNAV stage still ran
    assert!( gc.vnav().is_lateral_auto_control_active());
    assert!( gc.pseudo_waypoints().iter().any( |p| p.kind == ProfileEventKind::TopOfClimb));
    assert_eq!( gc.efis_vectors().transmissions(), 1);
    assert!( !sink.left.path_vectors[&PathVectorGroup::Active].is_empty());
    assert_eq!( gc.last_lnav_output(), &LnavOutput::default());
    assert!( sink.sequence_requests.is_empty());
}

#[test]
fn test_mode_change_bumps_vnav_version () {
    let store = active_store();
    let mut platform = platform();
    let mut sink = RecordingSink::default();
    let mut gc = GuidanceController::new( GuidanceConfig::default());

    gc.update( TICK, &store, &platform, &mut sink);
    let version = gc.vnav().version();
    gc.update( TICK, &store, &platform, &mut sink);
    assert_eq!( gc.vnav().version(), version);

    platform.auto_flight_modes.vertical_selected = true;
    gc.update( TICK, &store, &platform, &mut sink);
    assert!( gc.vnav().version() > version);
    assert!( gc.vnav().is_selected_vertical_mode_active());
}
