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

use std::collections::{HashMap,HashSet};
use fms_common::trace;

use crate::flight_plan::{FlightPlan, PlanElement};
use super::{Geometry, GeometryLeg, LegKind, NominalKinematics, Transition, TransitionKind};

/// what a reconciliation did
#[derive(Debug,Clone,Copy,Default,PartialEq,Eq)]
pub struct ReconcileStats {
    pub kept: usize,
    pub rebuilt: usize,
    pub removed: usize,
    pub transitions_kept: usize,
    pub transitions_rebuilt: usize,
}

/// creates geometries from flight plans and keeps them in sync with plan edits
#[derive(Debug,Clone)]
pub struct GeometryFactory {
    nominal: NominalKinematics,
}

impl GeometryFactory {
    pub fn new (nominal: NominalKinematics)->Self { GeometryFactory { nominal } }

    pub fn create_from_flight_plan (&self, plan: &FlightPlan, is_primary: bool)->Geometry {
        let mut geometry = Geometry::new( is_primary, self.nominal);
        self.update_from_flight_plan( &mut geometry, plan, is_primary);
        geometry
    }

    /// reconcile `geometry` with the current state of `plan`. Legs whose uid and definition did not change
    /// keep their instances, all others are rebuilt. Transitions are only regenerated if one of their
    /// legs was rebuilt, their predecessor changed or the required transition kind changed
    pub fn update_from_flight_plan (&self, geometry: &mut Geometry, plan: &FlightPlan, is_primary: bool)->ReconcileStats {
        let mut stats = ReconcileStats::default();
        let old_legs = std::mem::take( &mut geometry.legs);
        let mut old_transitions = std::mem::take( &mut geometry.transitions);

        let mut old_predecessors: HashMap<u64,Option<u64>> = HashMap::new();
        let mut old_transitions_by_uid: HashMap<u64,Transition> = HashMap::new();
        for (idx, leg) in old_legs.iter() {
            let pred = if *idx > 0 { old_legs.get( &(idx-1)).map( |l| l.uid()) } else { None };
            old_predecessors.insert( leg.uid(), pred);
            if let Some(t) = old_transitions.remove( idx) {
                old_transitions_by_uid.insert( leg.uid(), t);
            }
        }
        let mut old_by_uid: HashMap<u64,GeometryLeg> = old_legs.into_values().map( |l| (l.uid(), l)).collect();

        let mut rebuilt: HashSet<usize> = HashSet::new();
        for (idx, element) in plan.elements.iter().enumerate() {
            if let PlanElement::Leg(def) = element {
                match old_by_uid.remove( &def.uid) {
                    Some(old) if old.definition() == def => {
                        stats.kept += 1;
                        geometry.legs.insert( idx, old);
                    }
                    _ => {
                        stats.rebuilt += 1;
                        rebuilt.insert( idx);
                        geometry.legs.insert( idx, GeometryLeg::from_definition( def));
                    }
                }
            }
        }
        stats.removed = old_by_uid.len();

        let indices: Vec<usize> = geometry.legs.keys().copied().collect();
        for idx in indices {
            let Some(next) = geometry.legs.get( &idx) else { continue };
            let prev = if idx > 0 { geometry.legs.get( &(idx-1)) } else { None };

            let Some(kind) = transition_kind( prev, next, idx == plan.active_leg_index, is_primary) else { continue };

            let uid = next.uid();
            let pred_uid = prev.map( |l| l.uid());
            let unchanged = !rebuilt.contains( &idx) 
                && !(idx > 0 && rebuilt.contains( &(idx-1))) 
                && old_predecessors.get( &uid) == Some( &pred_uid);

            let transition = match old_transitions_by_uid.remove( &uid) {
                Some(t) if unchanged && t.kind() == kind => {
                    stats.transitions_kept += 1;
                    t
                }
                _ => {
                    stats.transitions_rebuilt += 1;
                    Transition::new( kind)
                }
            };
            geometry.transitions.insert( idx, transition);
        }

        geometry.origin_elevation_ft = plan.origin.as_ref().map( |a| a.elevation_ft).unwrap_or(0.0);
        geometry.destination_elevation_ft = plan.destination.as_ref().map( |a| a.elevation_ft);

        trace!("[FMS/FG] reconciled {} plan: {:?}", plan.index, stats);
        stats
    }
}

/// the transition needed to join `prev` and `next`, if any. Secondary plans only get fixed radius turns
fn transition_kind (prev: Option<&GeometryLeg>, next: &GeometryLeg, next_is_active: bool, is_primary: bool)->Option<TransitionKind> {
    if matches!( next.kind, LegKind::InitialFix) {
        return None
    }
    if is_primary && next_is_active && matches!( next.kind, LegKind::DirectToFix) {
        return Some( TransitionKind::DirectToEntry)
    }

    let prev = prev?;
    if matches!( prev.kind, LegKind::Manual{..}) { // manual terminations are never joined
        return None
    }

    if is_primary {
        if matches!( next.kind, LegKind::Hold(_)) {
            return Some( TransitionKind::HoldEntry)
        }
        if prev.definition().overfly || matches!( next.kind, LegKind::CourseToFix{..} | LegKind::CourseToAltitude{..} | LegKind::Manual{..}) {
            return Some( TransitionKind::PathCapture)
        }
    }

    Some( TransitionKind::FixedRadius)
}
