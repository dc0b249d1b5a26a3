use clap::Parser;
use drive_scene::replay::{self, Capture};
use drive_scene::settings::SceneSettings;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "drive-scene",
    about = "Replay a recorded drive through the map and obstacle layers"
)]
struct Args {
    /// Recorded session (JSON)
    capture: PathBuf,
    /// Scene settings file; settings.json when omitted
    settings: Option<PathBuf>,
}

fn main() -> ExitCode {
    drive_scene::init_logging();
    let args = Args::parse();

    let settings = args
        .settings
        .map_or_else(SceneSettings::load, SceneSettings::load_from_path);

    let capture = match Capture::from_path(&args.capture) {
        Ok(capture) => capture,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "Replaying {} steps against a map of {} elements",
        capture.steps.len(),
        capture.map.len()
    );
    let summary = replay::run(&capture, &settings);

    log::info!(
        "Map: {} resident elements, {} nodes; {} requests, {} built, {} failed, {} retired",
        summary.resident_elements,
        summary.map_nodes,
        summary.sync.requests_sent,
        summary.sync.elements_built,
        summary.sync.elements_failed,
        summary.sync.elements_retired
    );
    log::info!(
        "Obstacles: {} arrows, {} boxes, {} faces active",
        summary.obstacles.arrows,
        summary.obstacles.boxes,
        summary.obstacles.faces
    );
    log::info!(
        "Scene: {} visible nodes, {} bytes of geometry, {} translucent materials",
        summary.visible_nodes,
        summary.geometry_bytes,
        summary.translucent_materials
    );
    log::info!(
        "Scene: {} nodes added, {} removed, {} meshes and {} materials disposed",
        summary.scene.nodes_added,
        summary.scene.nodes_removed,
        summary.scene.meshes_disposed,
        summary.scene.materials_disposed
    );

    ExitCode::SUCCESS
}
