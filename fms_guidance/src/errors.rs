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

use thiserror::Error;
use crate::flight_plan::FlightPlanIndex;

pub type Result<T> = std::result::Result<T,FmsGuidanceError>;

#[derive(Error,Debug)]
pub enum FmsGuidanceError {

    #[error("no geometry for flight plan {0} (alternate: {1})")]
    GeometryNotFound(FlightPlanIndex,bool),

    #[error("no flight plan {0} (alternate: {1})")]
    FlightPlanNotFound(FlightPlanIndex,bool),

    #[error("no flight plan element at index {0}")]
    ElementNotFound(usize),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("config error {0}")]
    ConfigError( #[from] ron::error::SpannedError),

    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        FmsGuidanceError::OpFailedError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;

macro_rules! invariant_violation {
    ($fmt:literal $(, $arg:expr )* ) => {
        FmsGuidanceError::InvariantViolation( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use invariant_violation;
