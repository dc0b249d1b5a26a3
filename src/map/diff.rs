//! Resident-set bookkeeping: what to request, what to retire, what to build.

use super::elements::{ElementKind, MapElement, MapElementIds, MapSnapshot};
use super::geometry::{builder_for, BuildContext};
use super::overlaps::SignalContext;
use crate::coordinates::CoordinateTransform;
use crate::scene::{NodeId, Scene};
use std::collections::{BTreeMap, HashSet};

/// A map element currently held by the synchronizer, with the scene nodes
/// drawn for it. `rendered` stays empty for kinds that are not drawn and
/// for elements whose geometry could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidentElement {
    pub element: MapElement,
    pub rendered: Vec<NodeId>,
}

impl ResidentElement {
    pub fn id(&self) -> &str {
        self.element.id()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidentSet {
    elements: BTreeMap<ElementKind, Vec<ResidentElement>>,
}

impl ResidentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ElementKind) -> &[ResidentElement] {
        self.elements.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, kind: ElementKind, id: &str) -> bool {
        self.get(kind).iter().any(|e| e.id() == id)
    }

    pub fn ids(&self, kind: ElementKind) -> Vec<&str> {
        self.get(kind).iter().map(ResidentElement::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementKind, &[ResidentElement])> {
        self.elements.iter().map(|(kind, list)| (*kind, list.as_slice()))
    }

    pub fn push(&mut self, resident: ResidentElement) {
        self.elements
            .entry(resident.element.kind())
            .or_default()
            .push(resident);
    }

    pub fn len(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scene nodes owned by all resident elements.
    pub fn rendered_count(&self) -> usize {
        self.elements
            .values()
            .flatten()
            .map(|e| e.rendered.len())
            .sum()
    }

    /// Take every resident element out, leaving the set empty.
    pub fn drain(&mut self) -> impl Iterator<Item = ResidentElement> {
        std::mem::take(&mut self.elements).into_values().flatten()
    }

    fn kind_mut(&mut self, kind: ElementKind) -> Option<&mut Vec<ResidentElement>> {
        self.elements.get_mut(&kind)
    }
}

/// Ids named in `visible` that are not resident, per reported kind and in
/// input order. Every reported kind appears in the result, possibly empty.
pub fn compute_diff(visible: &MapElementIds, resident: &ResidentSet) -> MapElementIds {
    visible
        .iter()
        .map(|(kind, ids)| {
            let held: HashSet<&str> = resident.ids(kind).into_iter().collect();
            let missing = ids
                .iter()
                .filter(|id| !held.contains(id.as_str()))
                .cloned()
                .collect();
            (kind, missing)
        })
        .collect()
}

/// Dispose every node drawn for `resident`.
pub fn dispose_element(resident: &ResidentElement, scene: &mut Scene) {
    for &node in &resident.rendered {
        scene.dispose(node);
    }
}

/// Drop resident elements of reported kinds that `visible` no longer lists,
/// disposing their nodes. Kinds `visible` does not report are untouched.
/// Returns the number of retired elements.
pub fn retire_stale(visible: &MapElementIds, resident: &mut ResidentSet, scene: &mut Scene) -> usize {
    let mut retired = 0;
    for (kind, ids) in visible.iter() {
        let Some(list) = resident.kind_mut(kind) else {
            continue;
        };
        let keep: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let (kept, stale): (Vec<_>, Vec<_>) = std::mem::take(list)
            .into_iter()
            .partition(|e| keep.contains(e.id()));
        *list = kept;

        for element in &stale {
            log::debug!("Retiring {} {}", kind, element.id());
            dispose_element(element, scene);
        }
        retired += stale.len();
    }
    retired
}

/// Outcome of one snapshot ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Newly resident elements, failed builds included.
    pub added: usize,
    /// Elements skipped because they were already resident.
    pub skipped: usize,
    /// Elements resident without visuals because their geometry failed.
    pub failed: usize,
    /// Scene nodes registered, children not counted.
    pub nodes: usize,
}

/// Build geometry for every element of `snapshot` that is not yet resident
/// and add it to the resident set.
pub fn ingest_snapshot(
    snapshot: &MapSnapshot,
    resident: &mut ResidentSet,
    coordinates: &dyn CoordinateTransform,
    scene: &mut Scene,
) -> IngestReport {
    let signals = SignalContext::from_snapshot(snapshot);
    let ctx = BuildContext::new(coordinates, &signals);
    let mut report = IngestReport::default();

    for (kind, elements) in snapshot.iter() {
        let mut seen: HashSet<String> = resident.ids(kind).into_iter().map(str::to_owned).collect();
        let builder = builder_for(kind);

        for element in elements {
            if !seen.insert(element.id().to_owned()) {
                log::trace!("{} {} already resident", kind, element.id());
                report.skipped += 1;
                continue;
            }

            let rendered = match builder.map(|build| build(element, &ctx)) {
                None => Vec::new(),
                Some(Ok(drawables)) => drawables.into_iter().map(|d| scene.add(d)).collect(),
                Some(Err(err)) => {
                    log::warn!("Failed to build {} {}: {}", kind, element.id(), err);
                    report.failed += 1;
                    Vec::new()
                }
            };

            report.nodes += rendered.len();
            report.added += 1;
            resident.push(ResidentElement {
                element: element.clone(),
                rendered,
            });
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::Coordinates;
    use crate::map::elements::{Crosswalk, Id, Junction, PointENU, Polygon};
    use glam::DVec2;

    fn crosswalk(id: &str) -> MapElement {
        MapElement::Crosswalk(Crosswalk {
            id: Id::new(id),
            polygon: Some(Polygon {
                point: vec![
                    PointENU::new(0.0, 0.0),
                    PointENU::new(2.0, 0.0),
                    PointENU::new(2.0, 2.0),
                ],
            }),
        })
    }

    fn junction(id: &str) -> MapElement {
        MapElement::Junction(Junction {
            id: Id::new(id),
            polygon: None,
        })
    }

    #[test]
    fn diff_lists_only_missing_ids_in_input_order() {
        let mut resident = ResidentSet::new();
        resident.push(ResidentElement {
            element: junction("j2"),
            rendered: Vec::new(),
        });
        let visible = MapElementIds::new()
            .with(ElementKind::Junction, ["j3", "j2", "j1"])
            .with(ElementKind::Lane, Vec::<String>::new());

        let diff = compute_diff(&visible, &resident);
        assert_eq!(diff.get(ElementKind::Junction), ["j3", "j1"]);
        assert!(diff.reports(ElementKind::Lane));
        assert!(diff.get(ElementKind::Lane).is_empty());
        assert!(!diff.reports(ElementKind::Signal));
    }

    #[test]
    fn ingest_skips_resident_and_duplicate_ids() {
        let coords = Coordinates::with_offset(DVec2::ZERO);
        let mut scene = Scene::new();
        let mut resident = ResidentSet::new();
        let snapshot: MapSnapshot = [crosswalk("c1"), crosswalk("c1"), junction("j1")]
            .into_iter()
            .collect();

        let first = ingest_snapshot(&snapshot, &mut resident, &coords, &mut scene);
        assert_eq!(first.added, 2);
        assert_eq!(first.skipped, 1);
        assert_eq!(first.nodes, 2);

        let again = ingest_snapshot(&snapshot, &mut resident, &coords, &mut scene);
        assert_eq!(again.added, 0);
        assert_eq!(resident.len(), 2);
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn failed_build_stays_resident_without_nodes() {
        let coords = Coordinates::new();
        let mut scene = Scene::new();
        let mut resident = ResidentSet::new();
        let snapshot: MapSnapshot = std::iter::once(crosswalk("c1")).collect();

        let report = ingest_snapshot(&snapshot, &mut resident, &coords, &mut scene);
        assert_eq!(report.failed, 1);
        assert!(resident.contains(ElementKind::Crosswalk, "c1"));
        assert!(resident.get(ElementKind::Crosswalk)[0].rendered.is_empty());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn retire_leaves_unreported_kinds_alone() {
        let coords = Coordinates::with_offset(DVec2::ZERO);
        let mut scene = Scene::new();
        let mut resident = ResidentSet::new();
        let snapshot: MapSnapshot = [crosswalk("c1"), crosswalk("c2"), junction("j1")]
            .into_iter()
            .collect();
        ingest_snapshot(&snapshot, &mut resident, &coords, &mut scene);

        let visible = MapElementIds::new().with(ElementKind::Crosswalk, ["c2"]);
        let retired = retire_stale(&visible, &mut resident, &mut scene);

        assert_eq!(retired, 1);
        assert_eq!(resident.ids(ElementKind::Crosswalk), ["c2"]);
        assert_eq!(resident.ids(ElementKind::Junction), ["j1"]);
        assert_eq!(scene.node_count(), 2);
        assert_eq!(scene.stats().meshes_disposed, 2);
        assert_eq!(scene.stats().materials_disposed, 2);
    }
}
