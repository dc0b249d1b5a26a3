//! Headless playback of a recorded session through both synchronizers.

use crate::coordinates::{CoordinateTransform, Coordinates};
use crate::map::{MapElementIds, MapSnapshot, MapSynchronizer, MapTransport, SyncStats};
use crate::obstacles::{ActiveCounts, Obstacle, ObstacleRenderer};
use crate::scene::{Scene, SceneStats};
use crate::settings::SceneSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read capture {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed capture: {0}")]
    Json(#[from] serde_json::Error),
}

/// A recorded session: the full map the server would serve, and the
/// sequence of region reports and obstacle frames the client saw.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    #[serde(default)]
    pub offset: Option<[f64; 2]>,
    #[serde(default)]
    pub map: MapSnapshot,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayStep {
    /// Element ids visible in this step; None keeps the previous region.
    #[serde(default)]
    pub region: Option<MapElementIds>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Overrides the configured obstacle visibility from this step on.
    #[serde(default)]
    pub show_obstacles: Option<bool>,
    #[serde(default)]
    pub enter_editing: bool,
}

impl Capture {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Explicit offset, else the first obstacle position in the capture.
    fn initial_offset(&self) -> Option<(f64, f64)> {
        self.offset.map(|[x, y]| (x, y)).or_else(|| {
            self.steps
                .iter()
                .flat_map(|step| step.obstacles.iter())
                .find_map(Obstacle::position)
        })
    }
}

/// Serves requests from the captured map. Responses are queued and
/// delivered on the next step, like a round trip to the server.
pub struct ReplayTransport<'a> {
    map: &'a MapSnapshot,
    pending: Vec<MapSnapshot>,
}

impl<'a> ReplayTransport<'a> {
    pub fn new(map: &'a MapSnapshot) -> Self {
        Self {
            map,
            pending: Vec::new(),
        }
    }

    pub fn take_pending(&mut self) -> Vec<MapSnapshot> {
        std::mem::take(&mut self.pending)
    }
}

impl MapTransport for ReplayTransport<'_> {
    fn request_map_elements(&mut self, ids: &MapElementIds) {
        self.pending.push(self.map.select(ids));
    }

    fn request_map_elements_by_radius(&mut self, radius: f64) {
        log::debug!("Serving the whole captured map for radius {:.0}", radius);
        self.pending.push(self.map.clone());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub resident_elements: usize,
    pub map_nodes: usize,
    pub obstacles: ActiveCounts,
    pub visible_nodes: usize,
    pub geometry_bytes: usize,
    pub translucent_materials: usize,
    pub sync: SyncStats,
    pub scene: SceneStats,
}

/// Play `capture` to the end and report the final state.
pub fn run(capture: &Capture, settings: &SceneSettings) -> ReplaySummary {
    let mut coordinates = Coordinates::new();
    match capture.initial_offset() {
        Some((x, y)) => coordinates.initialize(x, y),
        None => log::warn!("Capture has no offset or obstacle position; map geometry cannot be placed"),
    }

    let mut scene = Scene::new();
    let mut map = MapSynchronizer::new();
    let mut obstacles = ObstacleRenderer::new(&settings.obstacles);
    let mut transport = ReplayTransport::new(&capture.map);
    let mut show_obstacles = settings.obstacles.show;
    let mut active = ActiveCounts::default();

    for (index, step) in capture.steps.iter().enumerate() {
        for snapshot in transport.take_pending() {
            map.ingest_snapshot(&snapshot, &coordinates, &mut scene);
        }

        if step.enter_editing {
            map.enter_editing_mode(settings.editing_map_radius, &mut transport);
        }
        if let Some(region) = &step.region {
            map.on_region_changed(region.signature(), region, &mut scene, &mut transport);
        }
        if let Some(show) = step.show_obstacles {
            show_obstacles = show;
        }

        active = obstacles.update_tick(&step.obstacles, show_obstacles, &coordinates, &mut scene);
        scene.update();
        log::debug!(
            "Step {}: {} nodes, {} resident elements",
            index,
            scene.node_count(),
            map.resident().len()
        );
    }

    // deliver the responses to the last step's requests
    for snapshot in transport.take_pending() {
        map.ingest_snapshot(&snapshot, &coordinates, &mut scene);
    }
    scene.update();

    let summary = ReplaySummary {
        steps: capture.steps.len(),
        resident_elements: map.resident().len(),
        map_nodes: map.resident().rendered_count(),
        obstacles: active,
        visible_nodes: scene.visible_nodes().len(),
        geometry_bytes: scene.assets.geometry_bytes(),
        translucent_materials: scene.assets.translucent_materials(),
        sync: map.stats(),
        scene: scene.stats(),
    };

    if log::log_enabled!(log::Level::Debug) {
        scene.debug_print_nodes();
    }
    if !coordinates.is_initialized() {
        log::warn!("Replay finished without a coordinate offset");
    }
    summary
}
