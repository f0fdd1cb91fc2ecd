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

//! lateral flight plan geometry. A [`Geometry`] holds one [`GeometryLeg`] per flight plan leg (keyed by
//! the leg's index in the plan, discontinuities leave gaps) and the [`Transition`]s that join
//! consecutive legs. Geometries are created and reconciled with their plans by the [`GeometryFactory`]
//! and recomputed with live aircraft parameters by the guidance controller

pub mod leg;
pub mod transition;
pub mod factory;

pub use leg::{GeometryLeg, LegKind, HoldLeg, HoldExit, Termination, turn_radius_nm};
pub use transition::{Transition, TransitionKind, HoldEntry};
pub use factory::{GeometryFactory, ReconcileStats};

use std::collections::BTreeMap;
use uom::si::f64::Velocity;
use fms_common::{angle::{reciprocal, normalize_360}, geo::GeoPoint, uom::knots, debug};

use crate::{config::GuidanceConfig, observers::WindVector};
use leg::LegRecomputeContext;

/// the nominal performance assumptions for geometry that is not flown with live parameters
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct NominalKinematics {
    pub bank_angle: f64,
    pub climb_gradient_ft_per_nm: f64,
    pub hold_leg_time_min: f64,
    pub hold_leg_time_high_min: f64,
}

impl NominalKinematics {
    pub fn from_config (config: &GuidanceConfig)->Self {
        NominalKinematics {
            bank_angle: config.nominal_bank_angle,
            climb_gradient_ft_per_nm: config.climb_gradient_ft_per_nm,
            hold_leg_time_min: config.hold_leg_time_min,
            hold_leg_time_high_min: config.hold_leg_time_high_min,
        }
    }

    /// standard hold leg time is 1min up to FL140 and 1.5min above
    pub fn hold_leg_time_min (&self, altitude_ft: f64)->f64 {
        if altitude_ft > 14000.0 { self.hold_leg_time_high_min } else { self.hold_leg_time_min }
    }
}

impl Default for NominalKinematics {
    fn default ()->Self { NominalKinematics::from_config( &GuidanceConfig::default()) }
}

/// the live parameters a geometry is recomputed with
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct RecomputeParameters {
    pub tas: Velocity,
    pub gs: Velocity,
    pub ppos: GeoPoint,
    pub true_track: f64,
    pub active_leg_index: usize,
    pub active_transition_index: usize,
    /// used for legs ahead of the active leg
    pub nominal_tas: Velocity,
    pub wind: Option<WindVector>,
}

#[derive(Debug,Clone)]
pub struct Geometry {
    pub (crate) legs: BTreeMap<usize,GeometryLeg>,
    /// keyed by the index of the leg the transition leads into
    pub (crate) transitions: BTreeMap<usize,Transition>,
    is_primary: bool,
    nominal: NominalKinematics,
    pub (crate) origin_elevation_ft: f64,
    pub (crate) destination_elevation_ft: Option<f64>,
}

impl Geometry {
    pub fn new (is_primary: bool, nominal: NominalKinematics)->Self {
        Geometry { 
            legs: BTreeMap::new(), transitions: BTreeMap::new(), is_primary, nominal, 
            origin_elevation_ft: 0.0, destination_elevation_ft: None 
        }
    }

    #[inline] pub fn is_primary (&self)->bool { self.is_primary }
    #[inline] pub fn is_empty (&self)->bool { self.legs.is_empty() }
    #[inline] pub fn leg_count (&self)->usize { self.legs.len() }
    #[inline] pub fn leg (&self, index: usize)->Option<&GeometryLeg> { self.legs.get( &index) }
    #[inline] pub fn leg_mut (&mut self, index: usize)->Option<&mut GeometryLeg> { self.legs.get_mut( &index) }
    #[inline] pub fn transition (&self, index: usize)->Option<&Transition> { self.transitions.get( &index) }
    #[inline] pub fn origin_elevation_ft (&self)->f64 { self.origin_elevation_ft }
    #[inline] pub fn destination_elevation_ft (&self)->Option<f64> { self.destination_elevation_ft }

    pub fn legs (&self)->impl Iterator<Item=(usize,&GeometryLeg)> {
        self.legs.iter().map( |(i,l)| (*i,l))
    }

    pub fn legs_mut (&mut self)->impl Iterator<Item=(usize,&mut GeometryLeg)> {
        self.legs.iter_mut().map( |(i,l)| (*i,l))
    }

    pub fn transitions (&self)->impl Iterator<Item=(usize,&Transition)> {
        self.transitions.iter().map( |(i,t)| (*i,t))
    }

    pub fn termination_location (&self, index: usize)->Option<GeoPoint> {
        self.legs.get( &index).and_then( |l| l.termination_location())
    }

    fn predecessor (&self, index: usize)->Option<&GeometryLeg> {
        if index > 0 { self.legs.get( &(index-1)) } else { None }
    }

    fn ground_speed (tas: Velocity, wind: Option<WindVector>, course: Option<f64>)->Velocity {
        match (wind, course) {
            (Some(wind), Some(course)) => knots( (fms_common::uom::to_kts(tas) - wind.headwind_component( course)).max( 50.0)),
            _ => tas
        }
    }

    /// recompute all legs and transitions. Legs at or behind the active leg of the primary plan use
    /// the live speeds, all others the nominal ones. A leg without a termination does not stop the
    /// walk, its successor just has no known start
    pub fn recompute_with_parameters (&mut self, p: &RecomputeParameters) {
        let indices: Vec<usize> = self.legs.keys().copied().collect();
        let mut start_altitude = self.origin_elevation_ft;

        for idx in indices {
            let prev_termination = self.predecessor( idx).and_then( |l| l.termination_location());
            let is_active = self.is_primary && idx == p.active_leg_index;
            let is_live = self.is_primary && idx <= p.active_leg_index;

            let Some(leg) = self.legs.get_mut( &idx) else { continue };

            let from = if is_active && (prev_termination.is_none() || matches!( leg.kind, LegKind::DirectToFix)) { Some(p.ppos) } else { prev_termination };
            let (tas, gs) = if is_live { 
                (p.tas, p.gs) 
            } else { 
                let course = leg.inbound_course().or( leg.definition().course);
                (p.nominal_tas, Geometry::ground_speed( p.nominal_tas, p.wind, course))
            };

            let ctx = LegRecomputeContext { from, tas, gs, ppos: p.ppos, is_active, start_altitude_ft: start_altitude, nominal: &self.nominal };
            leg.recompute( &ctx);

            if let LegKind::CourseToAltitude{altitude,..} = leg.kind {
                start_altitude = start_altitude.max( altitude);
            }
            if leg.termination().is_none() && !matches!( leg.kind, LegKind::Manual{..}) {
                debug!("[FMS/FG] no termination for leg {} ({})", idx, leg.ident());
            }
        }

        for (idx, transition) in self.transitions.iter_mut() {
            let Some(next) = self.legs.get( idx) else { continue };
            let prev = if *idx > 0 { self.legs.get( &(*idx-1)) } else { None };

            let gs = if self.is_primary && *idx <= p.active_leg_index { p.gs } else { Geometry::ground_speed( p.nominal_tas, p.wind, next.inbound_course()) };
            let prev_course = if transition.kind() == TransitionKind::DirectToEntry { Some(p.true_track) } else { prev.and_then( |l| l.outbound_course()) };

            transition.recompute( prev_course, next, gs, self.nominal.bank_angle);
        }
    }

    /// (leg index, distance from the geometry start to the leg termination) for all legs in order
    pub fn cumulative_distances (&self)->Vec<(usize,f64)> {
        let mut d = 0.0;
        self.legs.iter().map( |(i,leg)| {
            d += leg.distance_nm().unwrap_or(0.0);
            (*i, d)
        }).collect()
    }

    pub fn total_distance_nm (&self)->f64 {
        self.legs.values().map( |l| l.distance_nm().unwrap_or(0.0)).sum()
    }

    /// the leg that contains the point at `distance_nm` from the start of the geometry, and the
    /// remaining distance from that point to the leg termination
    pub fn locate_distance (&self, distance_nm: f64)->Option<(usize,f64)> {
        let mut d = 0.0;
        for (idx, leg) in self.legs.iter() {
            let len = leg.distance_nm().unwrap_or(0.0);
            if d + len >= distance_nm && leg.termination().is_some() {
                return Some( (*idx, (d + len - distance_nm).max(0.0)))
            }
            d += len;
        }
        None
    }

    /// the point `distance_nm` before the termination of leg `leg_index`, walking back into
    /// preceding legs if the distance exceeds the leg length
    pub fn point_before_termination (&self, leg_index: usize, distance_nm: f64)->Option<GeoPoint> {
        let mut remaining = distance_nm.max(0.0);
        let mut idx = leg_index;

        loop {
            let leg = self.legs.get( &idx)?;
            let termination = leg.termination_location()?;
            let len = leg.distance_nm().unwrap_or(0.0);
            let has_prev = idx > 0 && self.legs.get( &(idx-1)).and_then( |l| l.termination()).is_some();

            if remaining <= len || !has_prev {
                let d = if has_prev { remaining } else { remaining.min(len) };

                if let LegKind::RadiusToFix{center,radius_nm,sweep_angle,..} = &leg.kind {
                    if *radius_nm > 0.0 {
                        let sign = if *sweep_angle < 0.0 { -1.0 } else { 1.0 };
                        let radial = center.initial_bearing( &termination) - sign * (d / radius_nm).to_degrees();
                        return Some( center.destination( normalize_360(radial), *radius_nm))
                    }
                }

                let course = leg.outbound_course().or( leg.inbound_course())?;
                return Some( termination.destination( reciprocal(course), d))
            }

            remaining -= len;
            idx -= 1;
        }
    }
}
