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

use fms_common::geo::{GeoPoint, RelativePosition};
use fms_guidance::platform::EfisNdMode;

/// upper bounds of the range bands (NM). Larger ranges use the last table column
const RANGE_BANDS: [f64;5] = [10.0, 20.0, 40.0, 80.0, 160.0];

// [ahead, behind, beside] per range band
const ARC_AREAS: [[f64;3];6] = [
    [10.5, 3.5, 8.3],
    [20.5, 7.0, 16.6],
    [40.5, 14.0, 33.2],
    [80.5, 28.0, 66.4],
    [160.5, 56.0, 132.8],
    [320.5, 112.0, 265.6],
];

const ROSE_AREAS: [[f64;3];6] = [
    [7.6, 7.1, 7.1],
    [14.7, 14.2, 14.2],
    [28.9, 28.4, 28.4],
    [57.3, 56.8, 56.8],
    [114.1, 113.6, 113.6],
    [227.7, 227.2, 227.2],
];

const PLAN_AREAS: [[f64;3];6] = [
    [7.0, 7.0, 7.0],
    [14.0, 14.0, 14.0],
    [28.0, 28.0, 28.0],
    [56.0, 56.0, 56.0],
    [112.0, 112.0, 112.0],
    [224.0, 224.0, 224.0],
];

/// the region around the display reference point in which symbols are considered (all values in NM)
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct EditArea {
    pub ahead: f64,
    pub behind: f64,
    pub beside: f64,
}

impl EditArea {
    pub fn for_display (mode: EfisNdMode, range: f64)->Self {
        let band = RANGE_BANDS.iter().position( |r| range <= *r).unwrap_or( RANGE_BANDS.len());
        let table = match mode {
            EfisNdMode::Arc => &ARC_AREAS,
            EfisNdMode::Plan => &PLAN_AREAS,
            EfisNdMode::RoseIls | EfisNdMode::RoseVor | EfisNdMode::RoseNav => &ROSE_AREAS,
        };
        let [ahead, behind, beside] = table[band];
        EditArea { ahead, behind, beside }
    }

    /// is `location` inside the area around `reference`, oriented along `reference_direction` (true)
    pub fn contains (&self, reference: &GeoPoint, reference_direction: f64, location: &GeoPoint)->bool {
        let rel = RelativePosition::of( location, reference, reference_direction);
        let along = rel.along();
        along > -self.behind && along < self.ahead && rel.across().abs() < self.beside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bands () {
        assert_eq!( EditArea::for_display( EfisNdMode::Arc, 10.0), EditArea { ahead: 10.5, behind: 3.5, beside: 8.3 });
        assert_eq!( EditArea::for_display( EfisNdMode::RoseNav, 40.0), EditArea { ahead: 28.9, behind: 28.4, beside: 28.4 });
        assert_eq!( EditArea::for_display( EfisNdMode::RoseIls, 20.0), EditArea { ahead: 14.7, behind: 14.2, beside: 14.2 });
        assert_eq!( EditArea::for_display( EfisNdMode::Plan, 160.0).ahead, 112.0);
        assert_eq!( EditArea::for_display( EfisNdMode::Arc, 320.0).ahead, 320.5);
    }

    #[test]
    fn test_behind_and_beside () {
        let area = EditArea::for_display( EfisNdMode::Arc, 10.0);
        let reference = GeoPoint::from_lat_lon( 47.0, 8.0);

        assert!( area.contains( &reference, 90.0, &reference.destination( 270.0, 3.0)));
        assert!( !area.contains( &reference, 90.0, &reference.destination( 270.0, 4.0)));
        assert!( area.contains( &reference, 90.0, &reference.destination( 0.0, 8.0)));
        assert!( !area.contains( &reference, 90.0, &reference.destination( 180.0, 8.5)));
    }
}
