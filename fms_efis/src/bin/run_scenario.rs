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

use std::{fs, path::PathBuf, time::Duration};
use anyhow::Result;
use clap::Parser;
use serde::{Serialize,Deserialize};
use tracing_subscriber::EnvFilter;
use fms_common::{uom::to_kts, info, warn};
use fms_guidance::{
    GuidanceController, GuidanceConfig,
    flight_plan::{FlightPlan, FlightPlanStore},
    platform::{StaticPlatform, RecordingSink, EfisSide},
};
use fms_efis::{
    EfisSymbolsConfig, EfisSymbolsGenerator, NdSymbol, RecordingSymbolSink, SymbolSources,
    facilities::{StaticFacilities, StaticTuner},
};

/// run a guidance and EFIS symbol scenario and print the resulting outputs as JSON
#[derive(Parser,Debug)]
#[command(version, about)]
struct Args {
    /// RON scenario file
    scenario: PathBuf,

    /// RON file with the guidance controller config
    #[arg(long)]
    guidance_config: Option<PathBuf>,

    /// RON file with the symbol generator config
    #[arg(long)]
    efis_config: Option<PathBuf>,

    /// overrides the number of ticks of the scenario
    #[arg(long)]
    ticks: Option<usize>,

    /// pretty print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Debug,Deserialize)]
struct Scenario {
    plans: Vec<FlightPlan>,
    platform: StaticPlatform,
    #[serde(default)] facilities: StaticFacilities,
    #[serde(default)] tuner: StaticTuner,
    #[serde(default="default_ticks")] ticks: usize,
    #[serde(default="default_tick")] tick: Duration,
    /// move the aircraft along its track with its ground speed
    #[serde(default)] fly: bool,
}

fn default_ticks ()->usize { 50 }
fn default_tick ()->Duration { Duration::from_millis(100) }

#[derive(Serialize)]
struct ScenarioResult<'a> {
    geometry_updates: u64,
    symbol_passes: u64,
    active_leg_index: usize,
    guidance: &'a RecordingSink,
    left_symbols: &'a [NdSymbol],
    right_symbols: &'a [NdSymbol],
}

fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .with_writer( std::io::stderr)
        .init();

    let args = Args::parse();
    let guidance_config = match &args.guidance_config {
        Some(path) => fms_guidance::load_config( path)?,
        None => GuidanceConfig::default()
    };
    let efis_config = match &args.efis_config {
        Some(path) => fms_efis::load_config( path)?,
        None => EfisSymbolsConfig::default()
    };

    let mut scenario: Scenario = ron::from_str( &fs::read_to_string( &args.scenario)?)?;
    let ticks = args.ticks.unwrap_or( scenario.ticks);

    let mut store = FlightPlanStore::new();
    for plan in scenario.plans.drain(..) { store.insert( plan); }

    let mut gc = GuidanceController::new( guidance_config);
    let mut generator = EfisSymbolsGenerator::new( efis_config, &gc);
    let mut output = RecordingSink::default();
    let mut symbols = RecordingSymbolSink::new();
    let mut platform = scenario.platform;
    let mut now = Duration::ZERO;

    info!("running {} ticks of {:?}", ticks, scenario.tick);
    for _ in 0..ticks {
        now += scenario.tick;
        gc.update( scenario.tick, &store, &platform, &mut output);

        let sources = SymbolSources { guidance: &gc, plans: &store, platform: &platform, facilities: &scenario.facilities, tuner: &scenario.tuner };
        generator.update( now, &sources, &mut symbols);

        if !output.sequence_requests.is_empty() {
            output.sequence_requests.clear();
            if let Err(e) = store.sequence() {
                warn!("leg sequencing rejected: {}", e);
            }
        }

        if scenario.fly {
            let k = &mut platform.kinematics;
            let dist_nm = to_kts( k.ground_speed) * scenario.tick.as_secs_f64() / 3600.0;
            k.position = k.position.destination( k.true_track, dist_nm);
        }
    }

    let result = ScenarioResult {
        geometry_updates: gc.geometry_update_count(),
        symbol_passes: generator.pass_count(),
        active_leg_index: gc.active_leg_index(),
        guidance: &output,
        left_symbols: symbols.symbols( EfisSide::L),
        right_symbols: symbols.symbols( EfisSide::R),
    };

    let json = if args.pretty { serde_json::to_string_pretty( &result)? } else { serde_json::to_string( &result)? };
    println!("{json}");
    Ok(())
}
