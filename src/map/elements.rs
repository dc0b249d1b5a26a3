// map/elements.rs
// Decoded map messages, keyed by element kind

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

// ============================================================================
// Element kinds and ids
// ============================================================================

/// Map element categories, in the order they are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Lane,
    Crosswalk,
    Junction,
    Signal,
    StopSign,
    Yield,
    Overlap,
}

impl ElementKind {
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Lane,
        ElementKind::Crosswalk,
        ElementKind::Junction,
        ElementKind::Signal,
        ElementKind::StopSign,
        ElementKind::Yield,
        ElementKind::Overlap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Lane => "lane",
            ElementKind::Crosswalk => "crosswalk",
            ElementKind::Junction => "junction",
            ElementKind::Signal => "signal",
            ElementKind::StopSign => "stopSign",
            ElementKind::Yield => "yield",
            ElementKind::Overlap => "overlap",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id {
    #[serde(default)]
    pub id: String,
}

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// ============================================================================
// Geometry payloads
// ============================================================================

/// Zero-valued fields are omitted by the encoder, hence the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointENU {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl PointENU {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    #[serde(default)]
    pub point: Vec<PointENU>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSegment {
    #[serde(default)]
    pub line_segment: Option<LineSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    #[serde(default)]
    pub segment: Vec<CurveSegment>,
}

impl Curve {
    /// Curve made of one line segment through `points`.
    pub fn from_points(points: Vec<PointENU>) -> Self {
        Self {
            segment: vec![CurveSegment {
                line_segment: Some(LineSegment { point: points }),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub point: Vec<PointENU>,
}

/// Painted style of a lane boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryType {
    DottedYellow,
    DottedWhite,
    SolidYellow,
    SolidWhite,
    DoubleYellow,
    Curb,
    Unknown,
}

impl BoundaryType {
    /// Unrecognized or missing names map to `Unknown`, never an error.
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some("DOTTED_YELLOW") => BoundaryType::DottedYellow,
            Some("DOTTED_WHITE") => BoundaryType::DottedWhite,
            Some("SOLID_YELLOW") => BoundaryType::SolidYellow,
            Some("SOLID_WHITE") => BoundaryType::SolidWhite,
            Some("DOUBLE_YELLOW") => BoundaryType::DoubleYellow,
            Some("CURB") => BoundaryType::Curb,
            _ => BoundaryType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneBoundary {
    #[serde(default)]
    pub curve: Option<Curve>,
    #[serde(default, rename = "type")]
    pub boundary_type: Option<String>,
}

impl LaneBoundary {
    pub fn style(&self) -> BoundaryType {
        BoundaryType::parse(self.boundary_type.as_deref())
    }
}

// ============================================================================
// Element payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    pub id: Id,
    #[serde(default)]
    pub central_curve: Option<Curve>,
    #[serde(default)]
    pub left_boundary: Option<LaneBoundary>,
    #[serde(default)]
    pub right_boundary: Option<LaneBoundary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Crosswalk {
    pub id: Id,
    #[serde(default)]
    pub polygon: Option<Polygon>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub id: Id,
    #[serde(default)]
    pub polygon: Option<Polygon>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subsignal {
    #[serde(default)]
    pub id: Id,
    #[serde(default)]
    pub location: Option<PointENU>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: Id,
    #[serde(default)]
    pub boundary: Option<Polygon>,
    #[serde(default)]
    pub subsignal: Vec<Subsignal>,
    #[serde(default)]
    pub overlap_id: Vec<Id>,
    #[serde(default)]
    pub stop_line: Vec<Curve>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSign {
    pub id: Id,
    #[serde(default)]
    pub overlap_id: Vec<Id>,
    #[serde(default)]
    pub stop_line: Vec<Curve>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldSign {
    pub id: Id,
    #[serde(default)]
    pub overlap_id: Vec<Id>,
    #[serde(default)]
    pub stop_line: Vec<Curve>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneOverlapInfo {
    #[serde(default)]
    pub start_s: f64,
    #[serde(default)]
    pub end_s: f64,
    #[serde(default)]
    pub is_merge: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectOverlapInfo {
    #[serde(default)]
    pub id: Id,
    #[serde(default)]
    pub lane_overlap_info: Option<LaneOverlapInfo>,
}

impl ObjectOverlapInfo {
    pub fn is_lane(&self) -> bool {
        self.lane_overlap_info.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    pub id: Id,
    #[serde(default)]
    pub object: Vec<ObjectOverlapInfo>,
}

/// One map element of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum MapElement {
    Lane(Lane),
    Crosswalk(Crosswalk),
    Junction(Junction),
    Signal(Signal),
    StopSign(StopSign),
    Yield(YieldSign),
    Overlap(Overlap),
}

impl MapElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            MapElement::Lane(_) => ElementKind::Lane,
            MapElement::Crosswalk(_) => ElementKind::Crosswalk,
            MapElement::Junction(_) => ElementKind::Junction,
            MapElement::Signal(_) => ElementKind::Signal,
            MapElement::StopSign(_) => ElementKind::StopSign,
            MapElement::Yield(_) => ElementKind::Yield,
            MapElement::Overlap(_) => ElementKind::Overlap,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MapElement::Lane(e) => &e.id.id,
            MapElement::Crosswalk(e) => &e.id.id,
            MapElement::Junction(e) => &e.id.id,
            MapElement::Signal(e) => &e.id.id,
            MapElement::StopSign(e) => &e.id.id,
            MapElement::Yield(e) => &e.id.id,
            MapElement::Overlap(e) => &e.id.id,
        }
    }
}

// ============================================================================
// Snapshots
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    lane: Vec<Lane>,
    #[serde(default)]
    crosswalk: Vec<Crosswalk>,
    #[serde(default)]
    junction: Vec<Junction>,
    #[serde(default)]
    signal: Vec<Signal>,
    #[serde(default)]
    stop_sign: Vec<StopSign>,
    #[serde(default, rename = "yield")]
    yield_sign: Vec<YieldSign>,
    #[serde(default)]
    overlap: Vec<Overlap>,
}

/// A batch of map elements delivered by the transport, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawSnapshot")]
pub struct MapSnapshot {
    elements: BTreeMap<ElementKind, Vec<MapElement>>,
}

impl From<RawSnapshot> for MapSnapshot {
    fn from(raw: RawSnapshot) -> Self {
        let mut snapshot = MapSnapshot::default();
        snapshot.extend(raw.lane.into_iter().map(MapElement::Lane));
        snapshot.extend(raw.crosswalk.into_iter().map(MapElement::Crosswalk));
        snapshot.extend(raw.junction.into_iter().map(MapElement::Junction));
        snapshot.extend(raw.signal.into_iter().map(MapElement::Signal));
        snapshot.extend(raw.stop_sign.into_iter().map(MapElement::StopSign));
        snapshot.extend(raw.yield_sign.into_iter().map(MapElement::Yield));
        snapshot.extend(raw.overlap.into_iter().map(MapElement::Overlap));
        snapshot
    }
}

impl MapSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: MapElement) {
        self.elements.entry(element.kind()).or_default().push(element);
    }

    pub fn get(&self, kind: ElementKind) -> &[MapElement] {
        self.elements.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds in processing order with their elements.
    pub fn iter(&self) -> impl Iterator<Item = (ElementKind, &[MapElement])> {
        self.elements.iter().map(|(kind, list)| (*kind, list.as_slice()))
    }

    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.get(ElementKind::Lane).iter().filter_map(|e| match e {
            MapElement::Lane(lane) => Some(lane),
            _ => None,
        })
    }

    pub fn overlaps(&self) -> impl Iterator<Item = &Overlap> {
        self.get(ElementKind::Overlap).iter().filter_map(|e| match e {
            MapElement::Overlap(overlap) => Some(overlap),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements whose ids are listed in `ids`, in this snapshot's order.
    pub fn select(&self, ids: &MapElementIds) -> MapSnapshot {
        let mut selected = MapSnapshot::default();
        for (kind, elements) in self.iter() {
            let wanted = ids.get(kind);
            selected.extend(
                elements
                    .iter()
                    .filter(|e| wanted.iter().any(|id| id == e.id()))
                    .cloned(),
            );
        }
        selected
    }
}

impl Extend<MapElement> for MapSnapshot {
    fn extend<I: IntoIterator<Item = MapElement>>(&mut self, iter: I) {
        for element in iter {
            self.push(element);
        }
    }
}

impl FromIterator<MapElement> for MapSnapshot {
    fn from_iter<I: IntoIterator<Item = MapElement>>(iter: I) -> Self {
        let mut snapshot = MapSnapshot::default();
        snapshot.extend(iter);
        snapshot
    }
}

// ============================================================================
// Region descriptors
// ============================================================================

/// Opaque marker of the currently visible region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionSignature(pub u64);

/// Element ids per kind, as reported for a region or requested from the
/// transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapElementIds(BTreeMap<ElementKind, Vec<String>>);

impl MapElementIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, kind: ElementKind, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(kind)
            .or_default()
            .extend(ids.into_iter().map(Into::into));
    }

    pub fn with<I, S>(mut self, kind: ElementKind, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(kind, ids);
        self
    }

    /// Ids for `kind`, empty when the kind was not reported.
    pub fn get(&self, kind: ElementKind) -> &[String] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `kind` was reported at all, even with no ids.
    pub fn reports(&self, kind: ElementKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementKind, &[String])> {
        self.0.iter().map(|(kind, ids)| (*kind, ids.as_slice()))
    }

    /// Total number of ids across all kinds.
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Hash of the reported id lists, invariant to the order ids were
    /// reported in. A kind reported with no ids hashes differently from an
    /// unreported kind.
    pub fn signature(&self) -> RegionSignature {
        let mut hasher = DefaultHasher::new();
        for (kind, ids) in &self.0 {
            let mut ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            ids.sort_unstable();
            kind.hash(&mut hasher);
            ids.hash(&mut hasher);
        }
        RegionSignature(hasher.finish())
    }
}

impl FromIterator<(ElementKind, Vec<String>)> for MapElementIds {
    fn from_iter<I: IntoIterator<Item = (ElementKind, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
