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

//! recomputation of the lateral flight plan geometry and the guidance pipeline that runs on top of it.
//! The [`guidance_controller::GuidanceController`] is updated once per simulation tick with the current
//! flight plans and platform state

pub mod errors;
pub mod config;
pub mod flight_plan;
pub mod platform;
pub mod efis_state;
pub mod geometry;
pub mod task_queue;
pub mod observers;
pub mod lnav;
pub mod vnav;
pub mod pseudo_waypoints;
pub mod efis_vectors;
pub mod guidance_controller;

pub use errors::{FmsGuidanceError, Result};
pub use config::{GuidanceConfig, load_config};
pub use guidance_controller::GuidanceController;
