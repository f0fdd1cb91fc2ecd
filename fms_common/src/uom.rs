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

use uom::si::{f64::{Length,Velocity}, length::{foot,nautical_mile}, velocity::{knot,meter_per_second}};
use serde::{Serialize,Deserialize,ser::Serializer,de::Deserializer};

#[inline]
pub fn feet (len: f64)-> Length { Length::new::<foot>(len) }

#[inline]
pub fn knots (v: f64)-> Velocity { Velocity::new::<knot>(v) }

#[inline]
pub fn to_nm (len: Length)-> f64 { len.get::<nautical_mile>() }

#[inline]
pub fn to_ft (len: Length)-> f64 { len.get::<foot>() }

#[inline]
pub fn to_kts (v: Velocity)-> f64 { v.get::<knot>() }

#[inline]
pub fn to_mps (v: Velocity)-> f64 { v.get::<meter_per_second>() }

//--- serialization support (our config and scenario files use plain knots/NM/feet numbers)

pub fn ser_velocity_as_knots<S: Serializer> (v: &Velocity, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_f64( v.get::<knot>())
}

pub fn de_velocity_from_knots <'a,D>(deserializer: D) -> Result<Velocity,D::Error> where D: Deserializer<'a> {
    let v: f64 = f64::deserialize(deserializer)?;
    Ok( Velocity::new::<knot>(v) )
}

pub fn ser_length_as_nm<S: Serializer> (length: &Length, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_f64( length.get::<nautical_mile>())
}

pub fn de_length_from_nm <'a,D>(deserializer: D) -> Result<Length,D::Error> where D: Deserializer<'a> {
    let v: f64 = f64::deserialize(deserializer)?;
    Ok( Length::new::<nautical_mile>(v) )
}

pub fn ser_length_as_feet<S: Serializer> (length: &Length, s: S) -> Result<S::Ok, S::Error>  {
    s.serialize_f64( length.get::<foot>())
}

pub fn de_length_from_feet <'a,D>(deserializer: D) -> Result<Length,D::Error> where D: Deserializer<'a> {
    let v: f64 = f64::deserialize(deserializer)?;
    Ok( Length::new::<foot>(v) )
}
