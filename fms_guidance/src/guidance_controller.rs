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

use std::{collections::HashMap, fmt, time::Duration};
use strum::IntoEnumIterator;
use uom::si::f64::Velocity;
use fms_common::{geo::GeoPoint, uom::knots, debug, info, warn, error, trace};

use crate::{
    config::GuidanceConfig,
    efis_state::{EfisState, DataLimitFlag},
    efis_vectors::EfisVectors,
    errors::{Result, FmsGuidanceError},
    flight_plan::{FlightPlanIndex, FlightPlanProvider},
    geometry::{Geometry, GeometryFactory, NominalKinematics, RecomputeParameters},
    lnav::{DefaultLnav, LateralDriver, LnavContext, LnavOutput},
    observers::{AtmosphericConditions, VerticalProfileParameterObserver, WindObserver},
    platform::{EfisSide, KinematicSnapshot, PlatformInput, PlatformOutput, SelectedWaypoint},
    pseudo_waypoints::{PseudoWaypoint, PseudoWaypointGenerator},
    task_queue::{TaskCategory, TaskQueue},
    vnav::{DefaultVnav, VerticalProfileDriver},
};

/// the (flight plan, alternate) slots we keep geometries for
pub const TRACKED_PLANS: [(FlightPlanIndex,bool);5] = [
    (FlightPlanIndex::Active, false),
    (FlightPlanIndex::Active, true),
    (FlightPlanIndex::Temporary, false),
    (FlightPlanIndex::FirstSecondary, false),
    (FlightPlanIndex::FirstSecondary, true),
];

const PPOS_IDENT: &str = "PPOS";

/// stages fail independently, a failed stage is logged and the tick continues
fn log_stage_failure<T> (stage: &str, result: Result<T>) {
    if let Err(e) = result {
        error!("[FMS/FG] Failed to {}: {}", stage, e);
    }
}

/// the per-tick orchestrator of the guidance pipeline. It owns all geometries and display side state,
/// keeps the geometries in sync with their flight plans and drives LNAV, VNAV, pseudo waypoints and
/// path vectors in a fixed order
pub struct GuidanceController {
    config: GuidanceConfig,
    factory: GeometryFactory,

    geometries: HashMap<u32,Geometry>,
    last_versions: HashMap<FlightPlanIndex,u64>,
    geometry_updates: u64,
    rebuild_timer: Duration,

    efis_states: [EfisState;2],
    focused: Option<SelectedWaypoint>,
    map_reference_point: Option<GeoPoint>,

    kinematics: KinematicSnapshot,
    active_leg_index: usize,
    nominal_tas: Velocity,

    parameter_observer: VerticalProfileParameterObserver,
    wind_observer: WindObserver,
    atmosphere: AtmosphericConditions,

    lnav: Box<dyn LateralDriver>,
    vnav: Box<dyn VerticalProfileDriver>,
    last_lnav_output: LnavOutput,
    pseudo_waypoints: PseudoWaypointGenerator,
    efis_vectors: EfisVectors,
    task_queue: TaskQueue<EfisVectors>,
}

impl GuidanceController {
    pub fn new (config: GuidanceConfig)->Self {
        let lnav = Box::new( DefaultLnav::new( config.sequence_distance_nm));
        let observer = VerticalProfileParameterObserver::new( &config);
        let vnav = Box::new( DefaultVnav::new( observer.current()));
        GuidanceController::with_drivers( config, lnav, vnav)
    }

    pub fn with_drivers (config: GuidanceConfig, lnav: Box<dyn LateralDriver>, vnav: Box<dyn VerticalProfileDriver>)->Self {
        let factory = GeometryFactory::new( NominalKinematics::from_config( &config));
        let efis_vectors = EfisVectors::new( config.efis_vectors_interval, config.max_path_vectors);

        GuidanceController {
            factory,
            geometries: HashMap::new(),
            last_versions: HashMap::new(),
            geometry_updates: 0,
            rebuild_timer: config.full_rebuild_interval, // rebuild on the first tick
            efis_states: [EfisState::default(), EfisState::default()],
            focused: None,
            map_reference_point: None,
            kinematics: KinematicSnapshot::default(),
            active_leg_index: 0,
            nominal_tas: knots( config.nominal_cas_kts),
            parameter_observer: VerticalProfileParameterObserver::new( &config),
            wind_observer: WindObserver::new(),
            atmosphere: AtmosphericConditions::new(),
            lnav,
            vnav,
            last_lnav_output: LnavOutput::default(),
            pseudo_waypoints: PseudoWaypointGenerator::new(),
            efis_vectors,
            task_queue: TaskQueue::new(),
            config,
        }
    }

    /* #region accessors **************************************************************************************/

    pub fn config (&self)->&GuidanceConfig { &self.config }

    pub fn geometry (&self, index: FlightPlanIndex, alternate: bool)->Option<&Geometry> {
        self.geometries.get( &index.geometry_key( alternate))
    }

    pub fn has_geometry (&self, index: FlightPlanIndex, alternate: bool)->bool {
        self.geometries.contains_key( &index.geometry_key( alternate))
    }

    pub fn active_geometry (&self)->Option<&Geometry> { self.geometry( FlightPlanIndex::Active, false) }

    pub fn geometry_count (&self)->usize { self.geometries.len() }

    /// number of geometry creations and reconciliations so far
    pub fn geometry_update_count (&self)->u64 { self.geometry_updates }

    pub fn last_seen_version (&self, index: FlightPlanIndex)->Option<u64> { self.last_versions.get( &index).copied() }

    pub fn efis_state (&self, side: EfisSide)->&EfisState { &self.efis_states[side.index()] }

    /// the handle through which the symbol generator reports the data limit of a side
    pub fn data_limit_flag (&self, side: EfisSide)->DataLimitFlag { self.efis_states[side.index()].data_limit_flag() }

    pub fn kinematics (&self)->&KinematicSnapshot { &self.kinematics }
    pub fn active_leg_index (&self)->usize { self.active_leg_index }
    pub fn map_reference_point (&self)->Option<GeoPoint> { self.map_reference_point }
    pub fn focused_waypoint (&self)->Option<&SelectedWaypoint> { self.focused.as_ref() }

    pub fn vnav (&self)->&dyn VerticalProfileDriver { self.vnav.as_ref() }
    pub fn last_lnav_output (&self)->&LnavOutput { &self.last_lnav_output }
    pub fn pseudo_waypoints (&self)->&[PseudoWaypoint] { self.pseudo_waypoints.pseudo_waypoints() }
    pub fn pseudo_waypoints_version (&self)->u64 { self.pseudo_waypoints.version() }
    pub fn efis_vectors (&self)->&EfisVectors { &self.efis_vectors }
    pub fn pending_efis_vector_tasks (&self)->usize { self.task_queue.pending_in_category( TaskCategory::EfisVectors) }

    /* #endregion accessors */

    /// run one tick of the pipeline
    pub fn update (&mut self, delta: Duration, plans: &dyn FlightPlanProvider, input: &dyn PlatformInput, output: &mut dyn PlatformOutput) {
        self.update_display_units( input);
        self.sample_inputs( plans, input);

        // all slots compare against the versions seen before this tick so that an alternate is
        // rebuilt together with its parent
        let seen_versions = self.last_versions.clone();
        for (index, alternate) in TRACKED_PLANS {
            let seen = seen_versions.get( &index).copied();
            log_stage_failure( "update geometry", self.update_geometry_since( plans, index, alternate, false, seen));
        }

        self.rebuild_timer += delta;
        if self.rebuild_timer >= self.config.full_rebuild_interval {
            self.rebuild_timer = Duration::ZERO;
            for (index, alternate) in TRACKED_PLANS {
                log_stage_failure( "rebuild geometry", self.try_update_flight_plan_geometry( plans, index, alternate, true));
            }

            if let Some(geometry) = self.geometries.get( &FlightPlanIndex::Active.geometry_key(false)) {
                self.vnav.accept_multiple_leg_geometry( geometry);
                self.pseudo_waypoints.accept_multiple_leg_geometry( geometry);
            }
        }

        self.update_to_waypoint( plans, output);
        self.update_map_reference_point( plans, input, output);

        for side in EfisSide::iter() {
            let state = &self.efis_states[side.index()];
            output.set_map_partly_displayed( side, state.is_map_partly_displayed());
            output.set_data_limit_reached( side, state.data_limit_reached());
        }

        log_stage_failure( "update LNAV", self.update_lnav( delta, output));
        log_stage_failure( "update VNAV", self.vnav.update( delta, &self.kinematics, &input.auto_flight_modes(), input.flight_phase()));
        log_stage_failure( "update pseudo waypoints", self.pseudo_waypoints.update( self.vnav.as_ref()));
        log_stage_failure( "update EFIS vectors", self.efis_vectors.update( delta, &self.geometries, self.active_leg_index, self.focused.as_ref(), &mut self.efis_states, output));
        self.task_queue.update( delta, &mut self.efis_vectors);
    }

    fn update_display_units (&mut self, input: &dyn PlatformInput) {
        for side in EfisSide::iter() {
            let settings = input.display_settings( side);
            let state = &mut self.efis_states[side.index()];
            let changed = state.mode != settings.mode || state.range != settings.range;

            state.mode = settings.mode;
            state.range = settings.range;
            state.option = settings.option;

            if changed {
                let n = self.task_queue.cancel_all_in_category( TaskCategory::EfisVectors);
                self.efis_vectors.force_update();
                debug!("[FMS/FG] {} display now {} {}NM, cancelled {} vector tasks", side, settings.mode, settings.range, n);
            }
        }
    }

    fn sample_inputs (&mut self, plans: &dyn FlightPlanProvider, input: &dyn PlatformInput) {
        self.kinematics = input.kinematics();
        self.active_leg_index = plans.get( FlightPlanIndex::Active).map( |p| p.active_leg_index).unwrap_or(0);

        let perf = input.performance();
        self.atmosphere.update( perf.static_air_temperature_c, self.kinematics.altitude);
        self.nominal_tas = self.atmosphere.true_airspeed( knots( self.config.nominal_cas_kts), self.kinematics.altitude);
        self.wind_observer.observe( &perf);

        if let Some(params) = self.parameter_observer.observe( &perf) {
            self.vnav.update_parameters( &params);
        }
    }

    fn recompute_parameters (&self, active_leg_index: usize)->RecomputeParameters {
        RecomputeParameters {
            tas: self.kinematics.true_airspeed,
            gs: self.kinematics.ground_speed,
            ppos: self.kinematics.position,
            true_track: self.kinematics.true_track,
            active_leg_index,
            active_transition_index: active_leg_index,
            nominal_tas: self.nominal_tas,
            wind: self.wind_observer.wind(),
        }
    }

    /// bring the geometry of a (plan,alternate) slot up to date. The geometry is dropped if the plan does
    /// not exist anymore. Without `force` nothing happens if the plan version did not change.
    /// Returns true if the geometry was (re)built
    pub fn try_update_flight_plan_geometry (&mut self, plans: &dyn FlightPlanProvider, index: FlightPlanIndex, alternate: bool, force: bool)->Result<bool> {
        let seen = self.last_versions.get( &index).copied();
        self.update_geometry_since( plans, index, alternate, force, seen)
    }

    fn update_geometry_since (&mut self, plans: &dyn FlightPlanProvider, index: FlightPlanIndex, alternate: bool, force: bool, seen: Option<u64>)->Result<bool> {
        let key = index.geometry_key( alternate);

        let Some(plan) = plans.get_plan( index, alternate) else {
            if self.geometries.remove( &key).is_some() {
                debug!("[FMS/FG] removed geometry for {} plan (alternate: {})", index, alternate);
            }
            return Ok(false)
        };

        // primary and alternate of a slot share the last seen version
        if !force && seen == Some( plan.version) {
            return Ok(false)
        }
        self.last_versions.insert( index, plan.version);

        let is_primary = !alternate && matches!( index, FlightPlanIndex::Active | FlightPlanIndex::Temporary);
        let params = self.recompute_parameters( plan.active_leg_index);

        match self.geometries.get_mut( &key) {
            Some(geometry) => {
                let stats = self.factory.update_from_flight_plan( geometry, plan, is_primary);
                geometry.recompute_with_parameters( &params);
                trace!("[FMS/FG] updated {} geometry v{}: {:?}", index, plan.version, stats);
            }
            None => {
                let mut geometry = self.factory.create_from_flight_plan( plan, is_primary);
                geometry.recompute_with_parameters( &params);
                debug!("[FMS/FG] created {} geometry (alternate: {}) with {} legs", index, alternate, geometry.leg_count());
                self.geometries.insert( key, geometry);
            }
        }
        self.geometry_updates += 1;

        // coalesce path vector refreshes after geometry changes
        self.task_queue.cancel_all_in_category( TaskCategory::EfisVectors);
        self.task_queue.enqueue( TaskCategory::EfisVectors, self.config.efis_vectors_refresh_delay, |v: &mut EfisVectors| v.force_update());

        Ok(true)
    }

    fn update_to_waypoint (&mut self, plans: &dyn FlightPlanProvider, output: &mut dyn PlatformOutput) {
        let ident = self.active_geometry()
            .and_then( |g| g.leg( self.active_leg_index))
            .map( |l| l.ident().to_string())
            .filter( |s| !s.is_empty())
            .unwrap_or_else( || PPOS_IDENT.to_string());

        let approach = plans.get( FlightPlanIndex::Active).and_then( |p| p.approach.clone()).unwrap_or_default();

        for side in EfisSide::iter() {
            output.set_to_waypoint_ident( side, &ident);
            output.set_approach_message( side, &approach);
        }
    }

    fn selected_location (&self, plans: &dyn FlightPlanProvider, selected: &SelectedWaypoint)->Option<GeoPoint> {
        let plan = plans.get_plan( selected.plan_index, selected.in_alternate)?;
        let (leg_index, _) = match plan.resolve_leg_at_or_before( selected.leg_index) {
            Ok(resolved) => resolved?,
            Err(e) => {
                warn!("[FMS/FG] cannot resolve selected waypoint: {}", e);
                return None
            }
        };
        self.geometry( selected.plan_index, selected.in_alternate)?.termination_location( leg_index)
    }

    fn update_map_reference_point (&mut self, plans: &dyn FlightPlanProvider, input: &dyn PlatformInput, output: &mut dyn PlatformOutput) {
        let selected = input.selected_waypoint();
        let point = selected.as_ref()
            .and_then( |s| self.selected_location( plans, s))
            .unwrap_or( self.kinematics.position);

        if selected != self.focused {
            self.focused = selected;
            self.efis_vectors.force_update();
        }

        self.map_reference_point = Some(point);
        output.set_map_reference_point( point);
    }

    fn update_lnav (&mut self, delta: Duration, output: &mut dyn PlatformOutput)->Result<()> {
        let ctx = LnavContext {
            geometry: self.geometries.get( &FlightPlanIndex::Active.geometry_key(false)),
            active_leg_index: self.active_leg_index,
            kinematics: &self.kinematics,
            pseudo_waypoints: self.pseudo_waypoints.pseudo_waypoints(),
            delta,
        };
        let lnav_output = self.lnav.update( &ctx)?;

        if let Some(leg_index) = lnav_output.sequence_leg {
            output.request_leg_sequence( leg_index);
        }
        for ident in &lnav_output.passed_pseudo_waypoints {
            self.sequence_pseudo_waypoint( ident);
        }

        self.last_lnav_output = lnav_output;
        Ok(())
    }

    /* #region hold and pseudo waypoint requests ***************************************************************/

    pub fn sequence_pseudo_waypoint (&mut self, ident: &str)->bool {
        self.pseudo_waypoints.sequence_pseudo_waypoint( ident)
    }

    pub fn is_manual_hold_active (&self)->bool {
        self.active_geometry().and_then( |g| g.leg( self.active_leg_index)).map( |l| l.is_manual_hold()).unwrap_or(false)
    }

    pub fn is_manual_hold_next (&self)->bool {
        self.active_geometry().and_then( |g| g.leg( self.active_leg_index+1)).map( |l| l.is_manual_hold()).unwrap_or(false)
    }

    /// set the predicted TAS of an active or upcoming hold
    pub fn set_hold_speed (&mut self, tas: Velocity) {
        let active = self.active_leg_index;
        if let Some(geometry) = self.geometries.get_mut( &FlightPlanIndex::Active.geometry_key(false)) {
            for idx in [active, active+1] {
                if let Some(hold) = geometry.leg_mut( idx).and_then( |l| l.hold_mut()) {
                    hold.set_predicted_tas( tas);
                }
            }
        }
    }

    /// request (or cancel) the immediate exit of the active manual hold
    pub fn set_manual_hold_immediate_exit (&mut self, exit: bool)->Result<()> {
        let params = self.recompute_parameters( self.active_leg_index);
        let geometry = self.geometries.get_mut( &FlightPlanIndex::Active.geometry_key(false))
            .ok_or( FmsGuidanceError::GeometryNotFound( FlightPlanIndex::Active, false))?;
        let hold = geometry.leg_mut( params.active_leg_index)
            .and_then( |l| l.hold_mut())
            .ok_or( FmsGuidanceError::ElementNotFound( params.active_leg_index))?;

        hold.set_immediate_exit( exit, &params.ppos, params.tas);
        geometry.recompute_with_parameters( &params);
        info!("[FMS/FG] manual hold immediate exit: {}", exit);
        Ok(())
    }

    /* #endregion hold and pseudo waypoint requests */
}

impl fmt::Debug for GuidanceController {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        f.debug_struct( "GuidanceController")
            .field( "geometries", &self.geometries.len())
            .field( "active_leg_index", &self.active_leg_index)
            .field( "last_versions", &self.last_versions)
            .finish()
    }
}
