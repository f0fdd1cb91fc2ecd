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

// run with "cargo test --test test_geo -- --nocapture"

use fms_common::geo::*;
use fms_common::angle::*;

fn assert_close (a: f64, b: f64, eps: f64) {
    assert!( (a - b).abs() < eps, "{} != {} (eps {})", a, b, eps);
}

#[test]
fn test_distance_and_bearing () {
    // one degree of latitude is 60NM on our spherical earth (within rounding)
    let p1 = GeoPoint::from_lat_lon( 37.0, -122.0);
    let p2 = GeoPoint::from_lat_lon( 38.0, -122.0);
    assert_close( p1.distance_nm(&p2), 60.04, 0.05);
    assert_close( p1.initial_bearing(&p2), 0.0, 1e-6);
    assert_close( p2.initial_bearing(&p1), 180.0, 1e-6);

    let p3 = GeoPoint::from_lat_lon( 0.0, 1.0);
    assert_close( GeoPoint::from_lat_lon(0.0, 0.0).initial_bearing(&p3), 90.0, 1e-6);
}

#[test]
fn test_destination () {
    let p = GeoPoint::from_lat_lon( 47.0, 8.0);
    for brg in [0.0, 45.0, 133.0, 270.0] {
        let q = p.destination( brg, 25.0);
        println!("{} -> brg {} 25NM -> {}", p, brg, q);
        assert_close( p.distance_nm(&q), 25.0, 1e-6);
        assert_close( angle_diff( brg, p.initial_bearing(&q)), 0.0, 1e-6);
    }
}

#[test]
fn test_along_cross_track () {
    let start = GeoPoint::from_lat_lon( 0.0, 0.0);
    let p = start.destination( 90.0, 10.0).destination( 0.0, 2.0); // 10NM east, then 2NM north

    // left of an eastbound course
    assert_close( p.cross_track_nm( &start, 90.0), -2.0, 0.01);
    assert_close( p.along_track_nm( &start, 90.0), 10.0, 0.01);

    // behind a westbound course
    assert!( p.along_track_nm( &start, 270.0) < 0.0);
    assert_close( p.cross_track_nm( &start, 270.0), 2.0, 0.01);
}

#[test]
fn test_relative_position () {
    let ppos = GeoPoint::from_lat_lon( 45.0, 10.0);
    let ahead = ppos.destination( 30.0, 9.0);

    let rel = RelativePosition::of( &ahead, &ppos, 30.0);
    assert_close( rel.along(), 9.0, 1e-6);
    assert_close( rel.across(), 0.0, 1e-6);

    let rel = RelativePosition::of( &ahead, &ppos, 120.0); // ahead is now to our left
    assert_close( rel.across(), -9.0, 1e-6);
}

#[test]
fn test_serde () {
    let p = GeoPoint::from_lat_lon( 37.5, -122.25);
    let s = serde_json::to_string(&p).unwrap();
    assert_eq!( s, r#"{"lat":37.5,"lon":-122.25}"#);

    let q: GeoPoint = serde_json::from_str( r#"{ "latitude": 37.5, "longitude": -122.25 }"#).unwrap();
    assert_eq!( p, q);
}
