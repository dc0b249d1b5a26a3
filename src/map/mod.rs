//! Incremental synchronization of map geometry with the visible region.

pub mod diff;
pub mod elements;
pub mod geometry;
pub mod overlaps;
pub mod synchronizer;

pub use diff::{compute_diff, ingest_snapshot, retire_stale, IngestReport, ResidentElement, ResidentSet};
pub use elements::{
    BoundaryType, ElementKind, MapElement, MapElementIds, MapSnapshot, RegionSignature,
};
pub use geometry::{BuildContext, GeometryError};
pub use overlaps::{OverlapCorrelation, SignalContext, SignalPlacement};
pub use synchronizer::{MapSynchronizer, MapTransport, SyncStats};
