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

use std::{rc::Rc, cell::Cell};
use crate::platform::{EfisNdMode, EfisOption, EFIS_RANGES};

/// the data-limit flag of one display side. The symbol generator is the only writer, the guidance
/// controller reads it when it derives the map-partly-displayed indication. Clones share the flag
#[derive(Debug,Clone,Default)]
pub struct DataLimitFlag(Rc<Cell<bool>>);

impl DataLimitFlag {
    pub fn new ()->Self { DataLimitFlag::default() }
    #[inline] pub fn get (&self)->bool { self.0.get() }
    #[inline] pub fn set (&self, b: bool) { self.0.set(b) }
}

/// per-side display state tracked by the guidance controller
#[derive(Debug,Clone)]
pub struct EfisState {
    pub mode: EfisNdMode,
    pub range: f64,
    pub option: EfisOption,
    pub legs_culled: bool,
    data_limit: DataLimitFlag,
}

impl Default for EfisState {
    fn default ()->Self {
        EfisState { mode: EfisNdMode::Arc, range: EFIS_RANGES[0], option: EfisOption::None, legs_culled: false, data_limit: DataLimitFlag::new() }
    }
}

impl EfisState {
    pub fn data_limit_reached (&self)->bool { self.data_limit.get() }

    /// a handle for the writer of the flag
    pub fn data_limit_flag (&self)->DataLimitFlag { self.data_limit.clone() }

    pub fn is_map_partly_displayed (&self)->bool { self.data_limit.get() || self.legs_culled }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_data_limit () {
        let state = EfisState::default();
        let flag = state.data_limit_flag();
        assert!( !state.is_map_partly_displayed());

        flag.set( true);
        assert!( state.data_limit_reached());
        assert!( state.is_map_partly_displayed());
    }
}
