// map/synchronizer.rs - keeps resident map geometry in step with the visible region
use super::diff::{self, IngestReport, ResidentSet};
use super::elements::{MapElementIds, MapSnapshot, RegionSignature};
use crate::coordinates::CoordinateTransform;
use crate::scene::Scene;

/// Outbound side of the map feed.
pub trait MapTransport {
    /// Ask for the listed elements; they arrive later as a snapshot.
    fn request_map_elements(&mut self, ids: &MapElementIds);

    /// Ask for every element within `radius` meters of the vehicle.
    fn request_map_elements_by_radius(&mut self, radius: f64);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub region_changes: u64,
    pub diffs_computed: u64,
    pub requests_sent: u64,
    pub elements_built: u64,
    pub elements_failed: u64,
    pub elements_retired: u64,
}

#[derive(Debug, Default)]
pub struct MapSynchronizer {
    resident: ResidentSet,
    last_signature: Option<RegionSignature>,
    stats: SyncStats,
}

impl MapSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident(&self) -> &ResidentSet {
        &self.resident
    }

    pub fn last_signature(&self) -> Option<RegionSignature> {
        self.last_signature
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// React to a new visible region. Stale elements are retired before the
    /// missing ones are requested. Returns false when `signature` matches
    /// the last processed region and nothing was done.
    pub fn on_region_changed(
        &mut self,
        signature: RegionSignature,
        visible: &MapElementIds,
        scene: &mut Scene,
        transport: &mut dyn MapTransport,
    ) -> bool {
        if self.last_signature == Some(signature) {
            return false;
        }
        self.stats.region_changes += 1;

        let missing = diff::compute_diff(visible, &self.resident);
        self.stats.diffs_computed += 1;

        let retired = diff::retire_stale(visible, &mut self.resident, scene);
        self.stats.elements_retired += retired as u64;

        if missing.is_empty() {
            log::debug!("Region {:?}: nothing missing, {} retired", signature, retired);
        } else {
            log::debug!(
                "Region {:?}: requesting {} elements, {} retired",
                signature,
                missing.total(),
                retired
            );
            transport.request_map_elements(&missing);
            self.stats.requests_sent += 1;
        }

        self.last_signature = Some(signature);
        true
    }

    /// Build and register the elements of a delivered snapshot.
    pub fn ingest_snapshot(
        &mut self,
        snapshot: &MapSnapshot,
        coordinates: &dyn CoordinateTransform,
        scene: &mut Scene,
    ) -> IngestReport {
        let report = diff::ingest_snapshot(snapshot, &mut self.resident, coordinates, scene);
        self.stats.elements_built += (report.added - report.failed) as u64;
        self.stats.elements_failed += report.failed as u64;
        log::debug!(
            "Ingested snapshot: {} new ({} failed), {} already resident",
            report.added,
            report.failed,
            report.skipped
        );
        report
    }

    /// Editing needs the whole neighborhood rather than the visible region.
    pub fn enter_editing_mode(&mut self, radius: f64, transport: &mut dyn MapTransport) {
        log::info!("Requesting map elements within {:.0} m for editing", radius);
        transport.request_map_elements_by_radius(radius);
        self.stats.requests_sent += 1;
    }

    /// Dispose every resident element and forget the last region.
    pub fn clear(&mut self, scene: &mut Scene) {
        let mut count = 0;
        for element in self.resident.drain() {
            diff::dispose_element(&element, scene);
            count += 1;
        }
        self.last_signature = None;
        log::info!("Cleared {} resident map elements", count);
    }
}
