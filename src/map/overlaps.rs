//! Relationships between signals and the lanes they control.
//!
//! Both tables are rebuilt from every incoming snapshot and thrown away
//! afterwards; nothing here outlives one ingestion pass.

use super::elements::{Lane, MapSnapshot, Overlap, PointENU, Signal};
use glam::DVec2;
use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

/// Separator between the element ids of a correlated pair.
pub const PAIR_SEPARATOR: &str = "_and_";

/// Overlap id -> pair key naming the lane first, then the other element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlapCorrelation(HashMap<String, String>);

impl OverlapCorrelation {
    /// Correlate overlaps that involve exactly one lane.
    pub fn from_overlaps<'a>(overlaps: impl IntoIterator<Item = &'a Overlap>) -> Self {
        let pairs = overlaps
            .into_iter()
            .filter(|overlap| overlap.object.iter().filter(|o| o.is_lane()).count() == 1)
            .map(|overlap| {
                let mut objects: Vec<_> = overlap.object.iter().collect();
                // stable: lane first, everything else keeps its order
                objects.sort_by_key(|o| !o.is_lane());
                let key = objects
                    .iter()
                    .map(|o| o.id.id.as_str())
                    .collect::<Vec<_>>()
                    .join(PAIR_SEPARATOR);
                (overlap.id.id.clone(), key)
            })
            .collect();
        Self(pairs)
    }

    pub fn pair(&self, overlap_id: &str) -> Option<&str> {
        self.0.get(overlap_id).map(String::as_str)
    }

    /// Lane id of the pair recorded for `overlap_id`.
    pub fn lane_for(&self, overlap_id: &str) -> Option<&str> {
        self.pair(overlap_id)?.split(PAIR_SEPARATOR).next()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Heading of a lane derived from the last two points of its last
/// central-curve segment. Zero when that segment has fewer than two points;
/// None when the lane has no central curve segment at all.
pub fn lane_heading(lane: &Lane) -> Option<f64> {
    let last = lane.central_curve.as_ref()?.segment.last()?;
    let points = last
        .line_segment
        .as_ref()
        .map(|s| s.point.as_slice())
        .unwrap_or(&[]);
    if points.len() < 2 {
        return Some(0.0);
    }
    let (p0, p1) = (points[points.len() - 2], points[points.len() - 1]);
    Some((p0.y - p1.y).atan2(p0.x - p1.x))
}

/// Lane id -> heading, for every lane of one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneHeadings(HashMap<String, f64>);

impl LaneHeadings {
    pub fn from_lanes<'a>(lanes: impl IntoIterator<Item = &'a Lane>) -> Self {
        Self(
            lanes
                .into_iter()
                .filter_map(|lane| lane_heading(lane).map(|h| (lane.id.id.clone(), h)))
                .collect(),
        )
    }

    pub fn get(&self, lane_id: &str) -> Option<f64> {
        self.0.get(lane_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Derived tables needed to place signals, computed from a full snapshot.
#[derive(Debug, Clone, Default)]
pub struct SignalContext {
    pub overlaps: OverlapCorrelation,
    pub lane_headings: LaneHeadings,
}

impl SignalContext {
    pub fn from_snapshot(snapshot: &MapSnapshot) -> Self {
        Self {
            overlaps: OverlapCorrelation::from_overlaps(snapshot.overlaps()),
            lane_headings: LaneHeadings::from_lanes(snapshot.lanes()),
        }
    }
}

/// World-space anchor and orientation of a signal's light model. Either
/// part may be unresolved, in which case the model is not placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPlacement {
    pub position: Option<DVec2>,
    pub heading: Option<f64>,
}

impl SignalPlacement {
    pub fn resolved(&self) -> Option<(DVec2, f64)> {
        Some((self.position?, self.heading?))
    }
}

fn mean_xy<'a>(points: impl IntoIterator<Item = &'a PointENU>) -> Option<DVec2> {
    let (sum, count) = points
        .into_iter()
        .fold((DVec2::ZERO, 0usize), |(sum, n), p| (sum + DVec2::new(p.x, p.y), n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean of the subsignal lights, else mean of the boundary polygon.
pub fn signal_position(signal: &Signal) -> Option<DVec2> {
    mean_xy(signal.subsignal.iter().filter_map(|s| s.location.as_ref())).or_else(|| {
        signal
            .boundary
            .as_ref()
            .and_then(|boundary| mean_xy(boundary.point.iter()))
    })
}

/// Heading of the lane correlated through the signal's last overlap,
/// else perpendicular to the first stop line.
pub fn signal_heading(signal: &Signal, context: &SignalContext) -> Option<f64> {
    signal
        .overlap_id
        .last()
        .and_then(|overlap| context.overlaps.lane_for(&overlap.id))
        .and_then(|lane| context.lane_headings.get(lane))
        .or_else(|| stop_line_heading(signal))
}

fn stop_line_heading(signal: &Signal) -> Option<f64> {
    let points = &signal
        .stop_line
        .first()?
        .segment
        .first()?
        .line_segment
        .as_ref()?
        .point;
    if points.len() < 2 {
        return None;
    }
    let (first, last) = (points[0], points[points.len() - 1]);
    Some(FRAC_PI_2 + (last.y - first.y).atan2(last.x - first.x))
}

pub fn place_signal(signal: &Signal, context: &SignalContext) -> SignalPlacement {
    SignalPlacement {
        position: signal_position(signal),
        heading: signal_heading(signal, context),
    }
}
