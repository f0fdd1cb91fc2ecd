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

//! generation of the navigation display map symbols from the guidance controller state

pub mod errors;
pub mod config;
pub mod nd_symbol;
pub mod symbol_list;
pub mod edit_area;
pub mod constraint_text;
pub mod facilities;
pub mod generator;

pub use errors::{FmsEfisError, Result};
pub use config::{EfisSymbolsConfig, load_config};
pub use nd_symbol::{NdSymbol, NdSymbolTypeFlags};
pub use generator::{EfisSymbolsGenerator, SymbolSink, SymbolSources, RecordingSymbolSink};
