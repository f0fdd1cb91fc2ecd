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

//! the EFIS symbol generator. It runs once per host frame after the guidance controller and turns the
//! current geometries, facility lists and tuned navaids into one bounded symbol list per display side

use std::time::Duration;
use strum::IntoEnumIterator;
use fms_common::{angle::{abs_angle_diff, TurnDirection}, geo::GeoPoint, trace, debug, warn, error};
use fms_guidance::{
    GuidanceController,
    efis_state::DataLimitFlag,
    flight_plan::{FlightPlan, FlightPlanIndex, FlightPlanLeg, FlightPlanProvider, ConstraintType, PathTerminator, Segment, MAX_FIX_INFO_ENTRIES},
    geometry::Geometry,
    platform::{EfisNdMode, EfisOption, EfisSide, FlightPhase, PlatformInput, SelectedWaypoint},
    vnav::ProfileEventKind,
};

use crate::{
    config::EfisSymbolsConfig,
    constraint_text::{altitude_constraint_lines, speed_constraint_line},
    edit_area::EditArea,
    errors::{FmsEfisError, Result},
    facilities::{Facility, NearbyFacilities, NavaidTuner},
    nd_symbol::{NdSymbol, NdSymbolTypeFlags},
    symbol_list::SymbolList,
};

/// the plans that contribute flight plan symbols, in the order they are added
const SYMBOL_PLANS: [(FlightPlanIndex,bool);5] = [
    (FlightPlanIndex::Active, false),
    (FlightPlanIndex::Active, true),
    (FlightPlanIndex::Temporary, false),
    (FlightPlanIndex::FirstSecondary, false),
    (FlightPlanIndex::FirstSecondary, true),
];

/// receiver of the per-side symbol lists. Each call replaces the previous list of that side
pub trait SymbolSink {
    fn symbols_updated (&mut self, side: EfisSide, symbols: &[NdSymbol]);
}

#[derive(Debug,Default)]
pub struct RecordingSymbolSink {
    symbols: [Vec<NdSymbol>;2],
    transmissions: [usize;2],
}

impl RecordingSymbolSink {
    pub fn new ()->Self { RecordingSymbolSink::default() }

    pub fn symbols (&self, side: EfisSide)->&[NdSymbol] { &self.symbols[side.index()] }
    pub fn transmissions (&self, side: EfisSide)->usize { self.transmissions[side.index()] }

    pub fn symbol (&self, side: EfisSide, database_id: &str)->Option<&NdSymbol> {
        self.symbols[side.index()].iter().find( |s| s.database_id == database_id)
    }
}

impl SymbolSink for RecordingSymbolSink {
    fn symbols_updated (&mut self, side: EfisSide, symbols: &[NdSymbol]) {
        self.symbols[side.index()] = symbols.to_vec();
        self.transmissions[side.index()] += 1;
    }
}

/// everything a symbol pass reads
pub struct SymbolSources<'a> {
    pub guidance: &'a GuidanceController,
    pub plans: &'a dyn FlightPlanProvider,
    pub platform: &'a dyn PlatformInput,
    pub facilities: &'a dyn NearbyFacilities,
    pub tuner: &'a dyn NavaidTuner,
}

/// the inputs a symbol pass depends on, sampled at the time of the last pass
#[derive(Debug,Clone,PartialEq)]
struct TrackedSignals {
    ppos: GeoPoint,
    true_heading: f64,
    facilities_version: u64,
    tuner_version: u64,
    plan_versions: Vec<Option<u64>>,
    plan_center: Option<SelectedWaypoint>,
    displays: [(EfisNdMode,f64,EfisOption);2],
    vnav_version: u64,
    pseudo_waypoints_version: u64,
}

impl TrackedSignals {
    fn sample (src: &SymbolSources)->Self {
        let kinematics = src.guidance.kinematics();
        let display = |side: EfisSide| {
            let state = src.guidance.efis_state( side);
            (state.mode, state.range, state.option)
        };

        TrackedSignals {
            ppos: kinematics.position,
            true_heading: kinematics.true_heading,
            facilities_version: src.facilities.version(),
            tuner_version: src.tuner.version(),
            plan_versions: FlightPlanIndex::iter().map( |i| src.plans.get(i).map( |p| p.version)).collect(),
            plan_center: src.platform.selected_waypoint(),
            displays: [ display( EfisSide::L), display( EfisSide::R)],
            vnav_version: src.guidance.vnav().version(),
            pseudo_waypoints_version: src.guidance.pseudo_waypoints_version(),
        }
    }

    fn differs_from (&self, last: &TrackedSignals, config: &EfisSymbolsConfig)->bool {
        self.ppos.distance_nm( &last.ppos) > config.ppos_change_threshold_nm
            || abs_angle_diff( self.true_heading, last.true_heading) > config.heading_change_threshold
            || self.facilities_version != last.facilities_version
            || self.tuner_version != last.tuner_version
            || self.plan_versions != last.plan_versions
            || self.plan_center != last.plan_center
            || self.displays != last.displays
            || self.vnav_version != last.vnav_version
            || self.pseudo_waypoints_version != last.pseudo_waypoints_version
    }
}

/// display parameters of one side during a pass
#[derive(Debug,Clone,Copy)]
pub struct SidePass {
    pub side: EfisSide,
    pub mode: EfisNdMode,
    pub range: f64,
    pub option: EfisOption,
    pub area: EditArea,
    pub reference: GeoPoint,
    pub reference_direction: f64,
}

impl SidePass {
    #[inline] pub fn contains (&self, location: &GeoPoint)->bool {
        self.area.contains( &self.reference, self.reference_direction, location)
    }
}

/// transition altitude of the climb and transition level of the descent part of a plan (in ft)
#[derive(Debug,Clone,Copy)]
struct TransitionValues {
    climb: f64,
    descent: f64,
}

pub struct EfisSymbolsGenerator {
    config: EfisSymbolsConfig,
    data_limit_flags: [DataLimitFlag;2],
    last_signals: Option<TrackedSignals>,
    last_transmission: Option<Duration>,
    pass_count: u64,
}

impl EfisSymbolsGenerator {
    /// the generator becomes the writer of the data-limit flags of `guidance`
    pub fn new (config: EfisSymbolsConfig, guidance: &GuidanceController)->Self {
        EfisSymbolsGenerator {
            config,
            data_limit_flags: [ guidance.data_limit_flag( EfisSide::L), guidance.data_limit_flag( EfisSide::R)],
            last_signals: None,
            last_transmission: None,
            pass_count: 0,
        }
    }

    pub fn config (&self)->&EfisSymbolsConfig { &self.config }
    pub fn pass_count (&self)->u64 { self.pass_count }

    /// run a symbol pass for both sides if any of the tracked inputs changed and the last transmission
    /// is at least `min_transmit_interval` ago. `now` is the time of the current tick.
    /// Returns true if symbols were sent
    pub fn update (&mut self, now: Duration, src: &SymbolSources, sink: &mut dyn SymbolSink)->bool {
        if let Some(last) = self.last_transmission {
            if now.saturating_sub( last) < self.config.min_transmit_interval {
                return false
            }
        }

        let signals = TrackedSignals::sample( src);
        if let Some(last) = &self.last_signals {
            if !signals.differs_from( last, &self.config) {
                return false
            }
        }
        self.last_signals = Some(signals);
        self.last_transmission = Some(now);
        self.pass_count += 1;

        for side in EfisSide::iter() {
            if let Err(e) = self.update_side( side, src, sink) {
                error!("[FMS/EFIS] Failed to update symbols: {}", e);
            }
        }
        true
    }

    fn update_side (&self, side: EfisSide, src: &SymbolSources, sink: &mut dyn SymbolSink)->Result<()> {
        let state = src.guidance.efis_state( side);
        let kinematics = src.guidance.kinematics();

        let (reference, reference_direction) = if state.mode == EfisNdMode::Plan {
            let center = self.plan_center( src).map_err( |e| FmsEfisError::SidePassAborted( side, e.to_string()))?;
            match center {
                Some(center) => (center, 0.0),
                None => {
                    debug!("[FMS/EFIS] no plan center for side {}", side);
                    self.data_limit_flags[side.index()].set( false);
                    sink.symbols_updated( side, &[]);
                    return Ok(())
                }
            }
        } else {
            (kinematics.position, kinematics.true_heading)
        };

        let pass = SidePass {
            side,
            mode: state.mode,
            range: state.range,
            option: state.option,
            area: EditArea::for_display( state.mode, state.range),
            reference,
            reference_direction
        };

        let mut list = SymbolList::new();
        self.add_facility_overlay( &pass, src, &mut list);
        for (index, alternate) in SYMBOL_PLANS {
            if let Some(plan) = src.plans.get_plan( index, alternate) {
                list.upsert_all( self.flight_plan_symbols( &pass, src, plan, index, alternate));
            }
        }
        self.add_pseudo_waypoints( &pass, src, &mut list);
        self.add_tuned_navaids( &pass, src, &mut list);

        let (symbols, limit_reached) = list.into_transmission_order( self.config.max_symbols);
        if limit_reached {
            warn!("[FMS/EFIS] symbol limit of {} reached on side {}", self.config.max_symbols, side);
        }
        self.data_limit_flags[side.index()].set( limit_reached);

        trace!("[FMS/EFIS] sending {} symbols to side {}", symbols.len(), side);
        sink.symbols_updated( side, &symbols);
        Ok(())
    }

    /// location of the waypoint the pilot selected on the MFD. A discontinuity resolves to the preceding leg
    fn plan_center (&self, src: &SymbolSources)->Result<Option<GeoPoint>> {
        let Some(selected) = src.platform.selected_waypoint() else { return Ok(None) };
        let Some(plan) = src.plans.get_plan( selected.plan_index, selected.in_alternate) else { return Ok(None) };
        let Some((index, leg)) = plan.resolve_leg_at_or_before( selected.leg_index)? else { return Ok(None) };

        let location = src.guidance.geometry( selected.plan_index, selected.in_alternate)
            .and_then( |g| g.termination_location( index))
            .or_else( || leg.fix_location());
        Ok(location)
    }

    /* #region facilities */

    fn add_facility_overlay (&self, pass: &SidePass, src: &SymbolSources, list: &mut SymbolList) {
        match pass.option {
            EfisOption::VorDmes => {
                for f in src.facilities.vhf_navaids() { add_facility( pass, f, vhf_flags( f), list) }
            }
            EfisOption::Ndbs => {
                for f in src.facilities.ndb_navaids() { add_facility( pass, f, NdSymbolTypeFlags::NDB, list) }
            }
            EfisOption::Airports => {
                for f in src.facilities.airports().iter().filter( |f| f.has_hard_runway( self.config.min_runway_length)) {
                    add_facility( pass, f, NdSymbolTypeFlags::AIRPORT, list)
                }
            }
            EfisOption::Waypoints => {
                for f in src.facilities.waypoints() { add_facility( pass, f, NdSymbolTypeFlags::WAYPOINT, list) }
            }
            EfisOption::None | EfisOption::Constraints => {}
        }
    }

    fn add_tuned_navaids (&self, pass: &SidePass, src: &SymbolSources, list: &mut SymbolList) {
        for ndb in src.tuner.tuned_ndbs() {
            if pass.contains( &ndb.location) {
                list.upsert( NdSymbol::new( &ndb.database_id, &ndb.ident, ndb.location, NdSymbolTypeFlags::NDB | NdSymbolTypeFlags::TUNED));
            }
        }
        for vor in src.tuner.tuned_vors() {
            if pass.contains( &vor.location) {
                list.upsert( NdSymbol::new( &vor.database_id, &vor.ident, vor.location, vhf_flags( vor) | NdSymbolTypeFlags::TUNED));
            }
        }
    }

    /* #endregion facilities */

    fn add_pseudo_waypoints (&self, pass: &SidePass, src: &SymbolSources, list: &mut SymbolList) {
        for pwp in src.guidance.pseudo_waypoints().iter().filter( |p| p.display_on_nd) {
            if let Some(location) = pwp.location {
                if pass.contains( &location) {
                    let flags = match pwp.kind {
                        ProfileEventKind::Decel => NdSymbolTypeFlags::PWP_DECEL,
                        ProfileEventKind::TopOfDescent => NdSymbolTypeFlags::PWP_TOP_OF_DESCENT,
                        ProfileEventKind::TopOfClimb => NdSymbolTypeFlags::PWP_TOP_OF_CLIMB,
                        ProfileEventKind::SpeedLimit => NdSymbolTypeFlags::PWP_SPEED_CHANGE,
                    };
                    list.upsert( NdSymbol::new( format!("PWP{}", pwp.ident), &pwp.ident, location, flags));
                }
            }
        }
    }

    /* #region flight plan */

    /// the symbols of one flight plan in insertion order. Legs are scanned from the last one down to the
    /// leg before the active leg, followed by the airports/runways and the fix info entries
    pub fn flight_plan_symbols (&self, pass: &SidePass, src: &SymbolSources, plan: &FlightPlan, slot: FlightPlanIndex, alternate: bool)->Vec<NdSymbol> {
        let mut symbols = Vec::new();
        let base = plan_flags( slot, alternate);
        let geometry = src.guidance.geometry( slot, alternate);
        let active = plan.active_leg_index;
        let from_leg = active.saturating_sub(1);
        let transition = self.transition_values( plan);
        let show_missed_approach = self.is_missed_approach_in_view( plan, slot, alternate, src);

        for i in (from_leg..plan.element_count()).rev() {
            let Some(leg) = plan.leg(i) else { continue };
            if leg.is_airport_or_runway() { continue }
            if pass.range >= 160.0 && matches!( leg.segment, Segment::Departure | Segment::Arrival) && !plan.is_enroute_boundary(i) { continue }
            if plan.is_missed_approach_leg(i) && !show_missed_approach { continue }

            let geometry_leg = geometry.and_then( |g| g.leg(i));
            let Some(location) = geometry_leg.and_then( |l| l.termination_location()).or_else( || leg.fix_location()) else {
                trace!("[FMS/EFIS] leg {} ({}) has no termination", i, leg.ident);
                continue
            };
            if !pass.contains( &location) { continue }

            let mut flags = base;
            let mut direction = None;
            let mut constraints = None;

            if i == active && !alternate {
                flags |= NdSymbolTypeFlags::ACTIVE_LEG_TERMINATION;
            }

            if let Some(turn) = geometry_leg.and_then( |l| l.course_reversal()) {
                if i != active && i != active+1 && pass.range <= 80.0 && !self.config.suppress_course_reversals {
                    flags |= if turn == TurnDirection::Left { NdSymbolTypeFlags::COURSE_REVERSAL_LEFT } else { NdSymbolTypeFlags::COURSE_REVERSAL_RIGHT };
                    direction = leg.hold.map( |h| h.inbound_course).or( leg.course);
                }
            }

            if i >= active && leg.has_constraints() {
                if slot == FlightPlanIndex::Active && !alternate {
                    flags |= self.constraint_flags( src, leg, i);
                }
                if pass.option == EfisOption::Constraints {
                    constraints = Some( constraint_lines( leg, &transition));
                }
            }

            let database_id = leg.fix.as_ref()
                .map( |f| f.database_id.clone())
                .filter( |id| !id.is_empty())
                .unwrap_or_else( || leg_symbol_id( slot, alternate, i, leg.path_terminator));

            let mut symbol = NdSymbol::new( database_id, &leg.ident, location, flags);
            symbol.direction = direction;
            if let Some(lines) = constraints {
                symbol = symbol.with_constraints( lines);
            }
            symbols.push( symbol);
        }

        self.add_airports_and_runways( pass, plan, base, &mut symbols);

        if !alternate && (slot == FlightPlanIndex::Active || slot.is_secondary()) {
            for entry in plan.fix_info.iter().take( MAX_FIX_INFO_ENTRIES) {
                if let Some(location) = entry.fix.location {
                    symbols.push( NdSymbol::new( &entry.fix.database_id, &entry.fix.ident, location, NdSymbolTypeFlags::FIX_INFO)
                        .with_radials( entry.radials.clone())
                        .with_radii( entry.radii.clone()));
                }
            }
        }

        symbols
    }

    fn add_airports_and_runways (&self, pass: &SidePass, plan: &FlightPlan, base: NdSymbolTypeFlags, symbols: &mut Vec<NdSymbol>) {
        let ends = [
            (plan.origin.as_ref(), plan.origin_runway.as_ref()),
            (plan.destination.as_ref(), plan.destination_runway.as_ref())
        ];

        for end in ends {
            let symbol = match end {
                (_, Some(rwy)) => NdSymbol::new( &rwy.database_id, &rwy.ident, rwy.threshold, base | NdSymbolTypeFlags::RUNWAY)
                    .with_direction( rwy.bearing)
                    .with_length( rwy.length),
                (Some(apt), None) => NdSymbol::new( &apt.database_id, &apt.ident, apt.location, base | NdSymbolTypeFlags::AIRPORT),
                (None, None) => continue
            };
            if pass.contains( &symbol.location) {
                symbols.push( symbol);
            }
        }
    }

    fn transition_values (&self, plan: &FlightPlan)->TransitionValues {
        TransitionValues {
            climb: plan.origin.as_ref().and_then( |a| a.transition_altitude).unwrap_or( self.config.default_transition_altitude_ft),
            descent: plan.destination.as_ref().and_then( |a| a.transition_level).unwrap_or( self.config.default_transition_level_ft),
        }
    }

    /// the missed approach is shown while we fly it or while the pilot looks at it on the MFD
    fn is_missed_approach_in_view (&self, plan: &FlightPlan, slot: FlightPlanIndex, alternate: bool, src: &SymbolSources)->bool {
        let Some(first_missed) = plan.first_missed_approach_leg_index else { return false };
        if plan.active_leg_index >= first_missed {
            return true
        }
        match src.platform.selected_waypoint() {
            Some(selected) if selected.plan_index == slot && selected.in_alternate == alternate => {
                selected.leg_index + self.config.missed_approach_window >= first_missed
            }
            _ => false
        }
    }

    fn constraint_flags (&self, src: &SymbolSources, leg: &FlightPlanLeg, index: usize)->NdSymbolTypeFlags {
        let vnav = src.guidance.vnav();
        if !vnav.is_lateral_auto_control_active() || !shows_constraint_in_phase( leg.constraint_type, vnav.flight_phase()) {
            return NdSymbolTypeFlags::empty()
        }

        let state = if vnav.is_selected_vertical_mode_active() {
            NdSymbolTypeFlags::CONSTRAINT_UNKNOWN
        } else {
            match vnav.leg_prediction( index).and_then( |p| p.constraint_met) {
                Some(true) => NdSymbolTypeFlags::CONSTRAINT_MET,
                Some(false) => NdSymbolTypeFlags::CONSTRAINT_NOT_MET,
                None => NdSymbolTypeFlags::CONSTRAINT_UNKNOWN,
            }
        };
        NdSymbolTypeFlags::CONSTRAINT | state
    }

    /* #endregion flight plan */
}

fn add_facility (pass: &SidePass, facility: &Facility, flags: NdSymbolTypeFlags, list: &mut SymbolList) {
    if pass.contains( &facility.location) {
        list.upsert( NdSymbol::new( &facility.database_id, &facility.ident, facility.location, flags | NdSymbolTypeFlags::EFIS_OPTION));
    }
}

fn vhf_flags (facility: &Facility)->NdSymbolTypeFlags {
    facility.navaid_class.map( |c| c.type_flags()).unwrap_or( NdSymbolTypeFlags::VOR)
}

fn plan_flags (slot: FlightPlanIndex, alternate: bool)->NdSymbolTypeFlags {
    let flags = match slot {
        FlightPlanIndex::Active => NdSymbolTypeFlags::FLIGHT_PLAN,
        FlightPlanIndex::Temporary => NdSymbolTypeFlags::TEMPORARY,
        _ => NdSymbolTypeFlags::SECONDARY,
    };
    if alternate { flags | NdSymbolTypeFlags::ALTERNATE } else { flags }
}

/// identifier for legs that do not terminate at a database fix
pub fn leg_symbol_id (slot: FlightPlanIndex, alternate: bool, leg_index: usize, path_terminator: PathTerminator)->String {
    format!("{}-{}-{:?}", slot.geometry_key( alternate), leg_index, path_terminator)
}

/// climb constraints up to the climb phase, descent constraints from cruise on
fn shows_constraint_in_phase (constraint_type: ConstraintType, phase: FlightPhase)->bool {
    match constraint_type {
        ConstraintType::Climb => phase <= FlightPhase::Climb,
        ConstraintType::Descent => matches!( phase, FlightPhase::Cruise | FlightPhase::Descent | FlightPhase::Approach),
        ConstraintType::Unknown => false,
    }
}

fn constraint_lines (leg: &FlightPlanLeg, transition: &TransitionValues)->Vec<String> {
    let transition_ft = if leg.constraint_type == ConstraintType::Descent { transition.descent } else { transition.climb };
    let mut lines = Vec::new();
    if let Some(alt) = &leg.altitude_constraint {
        lines.extend( altitude_constraint_lines( alt, transition_ft));
    }
    if let Some(spd) = &leg.speed_constraint {
        lines.push( speed_constraint_line( spd));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_phases () {
        assert!( shows_constraint_in_phase( ConstraintType::Climb, FlightPhase::Takeoff));
        assert!( !shows_constraint_in_phase( ConstraintType::Climb, FlightPhase::Cruise));
        assert!( shows_constraint_in_phase( ConstraintType::Descent, FlightPhase::Cruise));
        assert!( !shows_constraint_in_phase( ConstraintType::Descent, FlightPhase::Climb));
        assert!( !shows_constraint_in_phase( ConstraintType::Unknown, FlightPhase::Descent));
    }

    #[test]
    fn test_leg_symbol_ids () {
        assert_eq!( leg_symbol_id( FlightPlanIndex::Active, false, 3, PathTerminator::CA), "0-3-CA");
        assert_eq!( leg_symbol_id( FlightPlanIndex::Active, true, 3, PathTerminator::CA), "100-3-CA");
    }
}
