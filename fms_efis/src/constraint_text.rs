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

//! text lines shown next to constrained flight plan symbols

use fms_guidance::flight_plan::{AltitudeConstraint, SpeedConstraint};

/// feet below the transition altitude, flight level at or above it
pub fn format_altitude (altitude_ft: f64, transition_ft: f64, prefix: &str)->String {
    if altitude_ft >= transition_ft {
        format!("{}FL{}", prefix, (altitude_ft / 100.0).round() as i64)
    } else {
        format!("{}{}", prefix, altitude_ft.round() as i64)
    }
}

pub fn format_speed (speed_kts: f64, prefix: &str)->String {
    format!("{}{}KT", prefix, speed_kts.floor() as i64)
}

pub fn altitude_constraint_lines (constraint: &AltitudeConstraint, transition_ft: f64)->Vec<String> {
    match constraint {
        AltitudeConstraint::At(alt) => vec![ format_altitude( *alt, transition_ft, "")],
        AltitudeConstraint::AtOrAbove(alt) => vec![ format_altitude( *alt, transition_ft, "+")],
        AltitudeConstraint::AtOrBelow(alt) => vec![ format_altitude( *alt, transition_ft, "-")],
        AltitudeConstraint::Between{lower,upper} => vec![
            format_altitude( *upper, transition_ft, "-"),
            format_altitude( *lower, transition_ft, "+")
        ]
    }
}

pub fn speed_constraint_line (constraint: &SpeedConstraint)->String {
    match constraint {
        SpeedConstraint::At(s) => format_speed( *s, ""),
        SpeedConstraint::AtOrBelow(s) => format_speed( *s, "-"),
        SpeedConstraint::AtOrAbove(s) => format_speed( *s, "+"),
    }
}

/// parse a line produced by [`format_altitude`] back into feet. Speed lines give `None`
pub fn parse_altitude_text (text: &str)->Option<f64> {
    let s = text.trim().trim_start_matches( ['+','-']);
    if s.ends_with("KT") {
        None
    } else if let Some(fl) = s.strip_prefix("FL") {
        fl.parse::<i64>().ok().map( |fl| fl as f64 * 100.0)
    } else {
        s.parse::<f64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altitude_format () {
        assert_eq!( format_altitude( 5000.0, 18000.0, ""), "5000");
        assert_eq!( format_altitude( 18000.0, 18000.0, "+"), "+FL180");
        assert_eq!( format_altitude( 24040.0, 18000.0, ""), "FL240");
        assert_eq!( format_altitude( 12000.0, 10000.0, "-"), "-FL120");
    }

    #[test]
    fn test_window_lines () {
        let lines = altitude_constraint_lines( &AltitudeConstraint::Between{ lower: 6000.0, upper: 20000.0 }, 18000.0);
        assert_eq!( lines, vec!["-FL200".to_string(), "+6000".to_string()]);
    }

    #[test]
    fn test_speed_format () {
        assert_eq!( speed_constraint_line( &SpeedConstraint::AtOrBelow( 250.7)), "-250KT");
        assert_eq!( parse_altitude_text( "-250KT"), None);
    }
}
