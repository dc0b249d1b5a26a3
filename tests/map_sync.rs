//! End-to-end behavior of the map synchronizer against a recording transport.
//!
//! Snapshots are built from JSON fixtures shaped like decoded server
//! messages. The coordinate offset is the origin unless a test says
//! otherwise, so render space equals world space.
use drive_scene::coordinates::Coordinates;
use drive_scene::map::{ElementKind, MapElementIds, MapSnapshot, MapSynchronizer, MapTransport};
use drive_scene::scene::Scene;
use glam::{DVec2, Vec3};
use serde_json::{json, Value};
use std::f32::consts::FRAC_PI_2;

#[derive(Default)]
struct RecordingTransport {
    requests: Vec<MapElementIds>,
}

impl MapTransport for RecordingTransport {
    fn request_map_elements(&mut self, ids: &MapElementIds) {
        self.requests.push(ids.clone());
    }

    fn request_map_elements_by_radius(&mut self, _radius: f64) {}
}

fn snapshot(value: Value) -> MapSnapshot {
    serde_json::from_value(value).unwrap()
}

fn curve(points: &[(f64, f64)]) -> Value {
    let points: Vec<Value> = points.iter().map(|(x, y)| json!({ "x": x, "y": y })).collect();
    json!({ "segment": [{ "lineSegment": { "point": points } }] })
}

fn lane(id: &str, y: f64, left: &str, right: &str) -> Value {
    json!({
        "id": { "id": id },
        "centralCurve": curve(&[(0.0, y), (10.0, y)]),
        "leftBoundary": { "curve": curve(&[(0.0, y + 1.5), (10.0, y + 1.5)]), "type": left },
        "rightBoundary": { "curve": curve(&[(0.0, y - 1.5), (10.0, y - 1.5)]), "type": right }
    })
}

fn crosswalk(id: &str, x: f64) -> Value {
    json!({
        "id": { "id": id },
        "polygon": { "point": [
            { "x": x, "y": 0.0 }, { "x": x + 3.0, "y": 0.0 }, { "x": x + 3.0, "y": 6.0 }
        ] }
    })
}

fn ids(kind: ElementKind, list: &[&str]) -> MapElementIds {
    MapElementIds::new().with(kind, list.iter().copied())
}

fn origin() -> Coordinates {
    Coordinates::with_offset(DVec2::ZERO)
}

#[test]
fn diff_requests_only_missing_elements() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    let mut transport = RecordingTransport::default();

    sync.ingest_snapshot(
        &snapshot(json!({ "crosswalk": [crosswalk("a", 0.0), crosswalk("b", 10.0)] })),
        &coords,
        &mut scene,
    );

    let visible = ids(ElementKind::Crosswalk, &["c", "a", "d", "b"]);
    sync.on_region_changed(visible.signature(), &visible, &mut scene, &mut transport);

    assert_eq!(transport.requests.len(), 1);
    assert_eq!(transport.requests[0].get(ElementKind::Crosswalk), ["c", "d"]);
}

#[test]
fn retired_elements_release_every_node() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    let mut transport = RecordingTransport::default();

    sync.ingest_snapshot(
        &snapshot(json!({
            "crosswalk": [crosswalk("a", 0.0), crosswalk("b", 10.0)],
            "lane": [lane("l1", 0.0, "DOUBLE_YELLOW", "SOLID_WHITE")]
        })),
        &coords,
        &mut scene,
    );
    // two crosswalk nodes each, lane: center + right + left root + left child
    assert_eq!(scene.node_count(), 8);

    let visible = ids(ElementKind::Crosswalk, &["b"]).with(ElementKind::Lane, Vec::<String>::new());
    sync.on_region_changed(visible.signature(), &visible, &mut scene, &mut transport);

    let stats = scene.stats();
    assert_eq!(scene.node_count(), 2);
    assert_eq!(stats.nodes_removed, 6);
    assert_eq!(stats.meshes_disposed, 6);
    assert_eq!(stats.materials_disposed, 6);
    assert_eq!(scene.assets.meshes.len(), 2);
    assert_eq!(sync.resident().ids(ElementKind::Crosswalk), ["b"]);
    assert!(sync.resident().get(ElementKind::Lane).is_empty());
}

#[test]
fn ingesting_the_same_snapshot_twice_builds_once() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    let payload = snapshot(json!({ "lane": [lane("l1", 0.0, "CURB", "CURB")] }));

    sync.ingest_snapshot(&payload, &coords, &mut scene);
    let nodes = scene.node_count();
    let report = sync.ingest_snapshot(&payload, &coords, &mut scene);

    assert_eq!(report.added, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(scene.node_count(), nodes);
    assert_eq!(sync.resident().len(), 1);
}

#[test]
fn double_yellow_is_two_offset_lines() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    sync.ingest_snapshot(
        &snapshot(json!({ "lane": [lane("l1", 0.0, "DOUBLE_YELLOW", "LANE_PAINT")] })),
        &coords,
        &mut scene,
    );

    let rendered = &sync.resident().get(ElementKind::Lane)[0].rendered;
    assert_eq!(rendered.len(), 3);
    let (right, left) = (rendered[1], rendered[2]);

    // unknown type renders like the default boundary
    let right_material = scene.material(right).unwrap();
    assert_eq!(right_material.color_hex(), 0xC0C0C0);
    assert_eq!(right_material.line_width, 3.0);

    let children = scene.children(left);
    assert_eq!(children.len(), 1);
    let outer = children[0];
    assert_eq!(scene.material(left).unwrap().color_hex(), 0xDAA520);
    assert_eq!(scene.material(outer).unwrap().color_hex(), 0xDAA520);
    assert_ne!(
        scene.material(left).unwrap().line_width,
        scene.material(outer).unwrap().line_width
    );

    let (a, _) = scene.mesh(left).unwrap().segments()[0];
    let (b, _) = scene.mesh(outer).unwrap().segments()[0];
    let gap = Vec3::from(a).distance(Vec3::from(b));
    assert!(gap > 0.0);
    assert!((gap - 0.3).abs() < 1e-5);
}

#[test]
fn signal_without_resolvable_heading_still_draws_stop_line() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    sync.ingest_snapshot(
        &snapshot(json!({
            "signal": [{
                "id": { "id": "s1" },
                "subsignal": [{ "id": { "id": "0" } }],
                "overlapId": [{ "id": "missing" }],
                "stopLine": [curve(&[(0.0, 0.0), (10.0, 0.0)])]
            }]
        })),
        &coords,
        &mut scene,
    );

    let rendered = &sync.resident().get(ElementKind::Signal)[0].rendered;
    assert_eq!(rendered.len(), 1);
    let stop_line = scene.material(rendered[0]).unwrap();
    assert_eq!(stop_line.color_hex(), 0xFFFFFF);
    assert_eq!(stop_line.line_width, 5.0);
}

#[test]
fn signal_heading_follows_correlated_lane() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    sync.ingest_snapshot(
        &snapshot(json!({
            "lane": [lane("l1", 0.0, "SOLID_WHITE", "SOLID_WHITE")],
            "overlap": [{
                "id": { "id": "o1" },
                "object": [
                    { "id": { "id": "s1" }, "signalOverlapInfo": {} },
                    { "id": { "id": "l1" }, "laneOverlapInfo": { "startS": 1.0, "endS": 2.0 } }
                ]
            }],
            "signal": [{
                "id": { "id": "s1" },
                "subsignal": [{ "id": { "id": "0" }, "location": { "x": 12.0, "y": 3.0 } }],
                "overlapId": [{ "id": "o1" }],
                "stopLine": [curve(&[(10.0, -2.0), (10.0, 2.0)])]
            }]
        })),
        &coords,
        &mut scene,
    );

    let rendered = &sync.resident().get(ElementKind::Signal)[0].rendered;
    assert_eq!(rendered.len(), 2);
    let light = scene.transform(rendered[0]).unwrap();
    assert_eq!(scene.name(rendered[0]).as_deref(), Some("traffic_light"));
    assert!(light.translation.abs_diff_eq(Vec3::new(12.0, 3.0, 0.0), 1e-5));

    // lane runs +X, so its heading is pi; the model stands up around X first
    let expected = glam::Quat::from_euler(glam::EulerRot::XYZ, FRAC_PI_2, std::f32::consts::PI, 0.0);
    assert!(light.rotation.abs_diff_eq(expected, 1e-5));
}

#[test]
fn unchanged_region_is_processed_once() {
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    let mut transport = RecordingTransport::default();
    let visible = ids(ElementKind::Lane, &["l1", "l2"]);
    let reordered = ids(ElementKind::Lane, &["l2", "l1"]);
    assert_eq!(visible.signature(), reordered.signature());

    assert!(sync.on_region_changed(visible.signature(), &visible, &mut scene, &mut transport));
    assert!(!sync.on_region_changed(reordered.signature(), &reordered, &mut scene, &mut transport));

    assert_eq!(sync.stats().diffs_computed, 1);
    assert_eq!(transport.requests.len(), 1);
}

#[test]
fn malformed_lane_stays_resident_without_geometry() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    let mut transport = RecordingTransport::default();

    let report = sync.ingest_snapshot(
        &snapshot(json!({ "lane": [{ "id": { "id": "broken" } }] })),
        &coords,
        &mut scene,
    );
    assert_eq!(report.failed, 1);
    assert_eq!(scene.node_count(), 0);
    assert_eq!(sync.stats().elements_failed, 1);

    // already resident, so never requested again
    let visible = ids(ElementKind::Lane, &["broken"]);
    sync.on_region_changed(visible.signature(), &visible, &mut scene, &mut transport);
    assert!(transport.requests.is_empty());
}

#[test]
fn lane_with_empty_point_lists_is_skipped() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    let empty = json!({ "segment": [{ "lineSegment": {} }] });

    let report = sync.ingest_snapshot(
        &snapshot(json!({ "lane": [{
            "id": { "id": "hollow" },
            "centralCurve": empty,
            "leftBoundary": { "curve": empty, "type": "CURB" },
            "rightBoundary": { "curve": empty, "type": "CURB" }
        }] })),
        &coords,
        &mut scene,
    );

    assert_eq!(report.failed, 1);
    assert_eq!(scene.node_count(), 0);
    let lanes = sync.resident().get(ElementKind::Lane);
    assert_eq!(lanes.len(), 1);
    assert!(lanes[0].rendered.is_empty());
}

#[test]
fn signal_with_empty_stop_line_is_skipped() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();

    let report = sync.ingest_snapshot(
        &snapshot(json!({ "signal": [{
            "id": { "id": "s1" },
            "stopLine": [{ "segment": [{ "lineSegment": { "point": [] } }] }]
        }] })),
        &coords,
        &mut scene,
    );

    assert_eq!(report.failed, 1);
    assert_eq!(scene.node_count(), 0);
    assert_eq!(sync.resident().rendered_count(), 0);
}

#[test]
fn newly_reported_empty_kind_retires_its_elements() {
    let coords = origin();
    let mut scene = Scene::new();
    let mut sync = MapSynchronizer::new();
    let mut transport = RecordingTransport::default();

    sync.ingest_snapshot(
        &snapshot(json!({ "lane": [lane("l1", 0.0, "CURB", "CURB")] })),
        &coords,
        &mut scene,
    );

    let crosswalks_only = MapElementIds::new().with(ElementKind::Crosswalk, Vec::<String>::new());
    assert!(sync.on_region_changed(
        crosswalks_only.signature(),
        &crosswalks_only,
        &mut scene,
        &mut transport
    ));
    assert_eq!(sync.resident().get(ElementKind::Lane).len(), 1);

    let with_lanes = crosswalks_only
        .clone()
        .with(ElementKind::Lane, Vec::<String>::new());
    assert!(sync.on_region_changed(with_lanes.signature(), &with_lanes, &mut scene, &mut transport));
    assert!(sync.resident().get(ElementKind::Lane).is_empty());
    assert_eq!(scene.node_count(), 0);
}
