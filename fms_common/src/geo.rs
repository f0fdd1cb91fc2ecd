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
#![allow(unused,uncommon_codepoints)]

/// great circle geometry on a spherical earth.
/// Navigation display and guidance computations only need NM-level accuracy over a few hundred NM,
/// which the spherical model provides. We store locations as `geo::Point` (x = longitude,
/// y = latitude, in degrees) so that we can hand them to `geo` algorithms without copying.

use std::fmt;
use serde::{Serialize,Deserialize};
use serde::ser::{Serializer, SerializeStruct};
use serde::de::Deserializer;
use geo::Point;
use uom::si::{f64::Length, length::nautical_mile};

use crate::{sin,cos,asin,acos,atan2,sqrt,pow2,deg,rad};
use crate::angle::{normalize_180, normalize_360, angle_diff};
use crate::geo_constants::MEAN_EARTH_RADIUS_NM;

/* #region GeoPoint ***********************************************************************************************/

/// a wrapper for geo::Point that uses geodetic degrees stored as f64
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct GeoPoint(Point);

impl GeoPoint {
    pub fn from_lat_lon (lat: f64, lon: f64) -> Self {
        GeoPoint( Point::new( normalize_180(lon), lat.clamp(-90.0, 90.0)))
    }

    #[inline] pub fn latitude (&self) -> f64 { self.0.y() }
    #[inline] pub fn longitude (&self) -> f64 { self.0.x() }

    pub fn point<'a> (&'a self) -> &'a Point { &self.0 }

    /// great circle distance in nautical miles
    pub fn distance_nm (&self, other: &GeoPoint) -> f64 {
        let φ1 = rad( self.latitude());
        let φ2 = rad( other.latitude());
        let dφ = φ2 - φ1;
        let dλ = rad( other.longitude() - self.longitude());

        let a = pow2( sin(dφ/2.0)) + cos(φ1) * cos(φ2) * pow2( sin(dλ/2.0));
        2.0 * atan2( sqrt(a), sqrt(1.0 - a)) * MEAN_EARTH_RADIUS_NM
    }

    pub fn distance (&self, other: &GeoPoint) -> Length {
        Length::new::<nautical_mile>( self.distance_nm( other))
    }

    /// initial true bearing of the great circle from self to other, in [0..360)
    pub fn initial_bearing (&self, other: &GeoPoint) -> f64 {
        let φ1 = rad( self.latitude());
        let φ2 = rad( other.latitude());
        let dλ = rad( other.longitude() - self.longitude());

        let y = sin(dλ) * cos(φ2);
        let x = cos(φ1) * sin(φ2) - sin(φ1) * cos(φ2) * cos(dλ);
        normalize_360( deg( atan2(y, x)))
    }

    /// (initial true bearing, distance in NM) from self to other
    pub fn bearing_distance_to (&self, other: &GeoPoint) -> (f64,f64) {
        (self.initial_bearing( other), self.distance_nm( other))
    }

    /// the point reached when travelling `distance_nm` along the great circle with initial true `bearing`
    pub fn destination (&self, bearing: f64, distance_nm: f64) -> GeoPoint {
        let δ = distance_nm / MEAN_EARTH_RADIUS_NM;
        let θ = rad( bearing);
        let φ1 = rad( self.latitude());
        let λ1 = rad( self.longitude());

        let φ2 = asin( sin(φ1) * cos(δ) + cos(φ1) * sin(δ) * cos(θ));
        let λ2 = λ1 + atan2( sin(θ) * sin(δ) * cos(φ1), cos(δ) - sin(φ1) * sin(φ2));

        GeoPoint::from_lat_lon( deg(φ2), deg(λ2))
    }

    /// signed cross track distance in NM of self relative to the great circle through `start` with initial
    /// true `course`. Positive values are right of the course
    pub fn cross_track_nm (&self, start: &GeoPoint, course: f64) -> f64 {
        let δ13 = start.distance_nm( self) / MEAN_EARTH_RADIUS_NM;
        let θ13 = rad( start.initial_bearing( self));
        let θ12 = rad( course);
        asin( sin(δ13) * sin(θ13 - θ12)) * MEAN_EARTH_RADIUS_NM
    }

    /// signed along track distance in NM of self on the great circle through `start` with initial true `course`.
    /// Negative values are behind `start`
    pub fn along_track_nm (&self, start: &GeoPoint, course: f64) -> f64 {
        let d13 = start.distance_nm( self);
        let δ13 = d13 / MEAN_EARTH_RADIUS_NM;
        let δxt = self.cross_track_nm( start, course) / MEAN_EARTH_RADIUS_NM;

        let dat = acos( cos(δ13) / cos(δxt)) * MEAN_EARTH_RADIUS_NM;
        if angle_diff( course, start.initial_bearing( self)).abs() > 90.0 { -dat } else { dat }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.5},{:.5}]", self.latitude(), self.longitude())
    }
}

impl From<GeoPoint> for Point {
    fn from (p: GeoPoint) -> Point { p.0 }
}

impl Serialize for GeoPoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        let mut state = serializer.serialize_struct("GeoPoint", 2)?;
        state.serialize_field("lat", &self.latitude())?;
        state.serialize_field("lon", &self.longitude())?;
        state.end()
    }
}

#[derive(Deserialize)]
struct LatLon {
    #[serde(alias="latitude")] lat: f64,
    #[serde(alias="longitude")] lon: f64
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D>(deserializer: D) -> Result<GeoPoint, D::Error> where D: Deserializer<'de> {
        let ll = LatLon::deserialize( deserializer)?;
        Ok( GeoPoint::from_lat_lon( ll.lat, ll.lon))
    }
}

/* #endregion GeoPoint */

/// decomposition of a point into along/cross offsets relative to a reference point and a reference direction
/// (e.g. the aircraft position and true heading)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct RelativePosition {
    pub bearing: f64,      // relative to the reference direction, in [-180..180]
    pub distance_nm: f64,
}

impl RelativePosition {
    pub fn of (p: &GeoPoint, reference: &GeoPoint, reference_direction: f64) -> Self {
        let (brg, distance_nm) = reference.bearing_distance_to( p);
        RelativePosition { bearing: normalize_180( brg - reference_direction), distance_nm }
    }

    /// distance ahead of the reference point (negative if behind)
    pub fn along (&self) -> f64 { self.distance_nm * cos( rad(self.bearing)) }

    /// distance to the right of the reference direction (negative if left)
    pub fn across (&self) -> f64 { self.distance_nm * sin( rad(self.bearing)) }
}
