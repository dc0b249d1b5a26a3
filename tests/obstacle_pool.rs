//! Pool behavior of the obstacle renderer across ticks.
use drive_scene::coordinates::Coordinates;
use drive_scene::obstacles::{Obstacle, ObstacleRenderer, ObstacleType};
use drive_scene::scene::Scene;
use drive_scene::settings::ObstacleSettings;
use glam::{DVec2, Vec3};

fn vehicles(count: usize) -> Vec<Obstacle> {
    (0..count)
        .map(|i| Obstacle {
            id: Some(i.to_string()),
            position_x: Some(500.0 + i as f64 * 5.0),
            position_y: Some(300.0),
            length: Some(4.5),
            width: Some(1.8),
            height: Some(1.5),
            heading: Some(0.0),
            obstacle_type: Some(ObstacleType::Vehicle),
            ..Obstacle::default()
        })
        .collect()
}

#[test]
fn pools_only_grow_and_hide_the_tail() {
    let coords = Coordinates::with_offset(DVec2::new(500.0, 300.0));
    let mut scene = Scene::new();
    let mut renderer = ObstacleRenderer::new(&ObstacleSettings::default());

    let mut largest = 0;
    for count in [5, 2, 8, 1] {
        let used = renderer.update_tick(&vehicles(count), true, &coords, &mut scene);
        largest = largest.max(count);

        assert_eq!(used.arrows, count);
        assert_eq!(renderer.arrows().len(), largest);
        assert_eq!(renderer.arrows().visible_count(&scene), count);
        assert_eq!(renderer.boxes().len(), largest);
        assert_eq!(renderer.boxes().visible_count(&scene), count);
    }

    assert_eq!(renderer.arrows().len(), 8);
    let visible: Vec<bool> = renderer
        .arrows()
        .slots()
        .iter()
        .map(|&node| scene.is_visible(node).unwrap())
        .collect();
    assert_eq!(visible, [true, false, false, false, false, false, false, false]);

    // nothing was ever destroyed
    assert_eq!(scene.stats().nodes_removed, 0);
    assert_eq!(scene.stats().nodes_added, 16);
}

#[test]
fn slots_are_repositioned_in_place() {
    let coords = Coordinates::with_offset(DVec2::new(500.0, 300.0));
    let mut scene = Scene::new();
    let mut renderer = ObstacleRenderer::new(&ObstacleSettings::default());

    renderer.update_tick(&vehicles(2), true, &coords, &mut scene);
    let first = renderer.boxes().slots()[0];

    let mut moved = vehicles(1);
    moved[0].position_x = Some(520.0);
    renderer.update_tick(&moved, true, &coords, &mut scene);

    assert_eq!(renderer.boxes().slots()[0], first);
    let transform = scene.transform(first).unwrap();
    assert!(transform.translation.abs_diff_eq(Vec3::new(20.0, 0.0, 0.75), 1e-5));
}

#[test]
fn empty_tick_hides_previous_markers() {
    let coords = Coordinates::with_offset(DVec2::new(500.0, 300.0));
    let mut scene = Scene::new();
    let mut renderer = ObstacleRenderer::new(&ObstacleSettings::default());

    renderer.update_tick(&vehicles(3), true, &coords, &mut scene);
    renderer.update_tick(&[], true, &coords, &mut scene);

    assert_eq!(renderer.arrows().visible_count(&scene), 0);
    assert_eq!(renderer.boxes().visible_count(&scene), 0);
    assert_eq!(renderer.arrows().len(), 3);
}

#[test]
fn visibility_toggle_round_trips() {
    let coords = Coordinates::with_offset(DVec2::new(500.0, 300.0));
    let mut scene = Scene::new();
    let mut renderer = ObstacleRenderer::new(&ObstacleSettings::default());

    renderer.update_tick(&vehicles(4), false, &coords, &mut scene);
    assert!(renderer.arrows().is_empty());

    renderer.update_tick(&vehicles(4), true, &coords, &mut scene);
    assert_eq!(renderer.arrows().visible_count(&scene), 4);

    renderer.update_tick(&vehicles(4), false, &coords, &mut scene);
    assert_eq!(renderer.arrows().visible_count(&scene), 0);
    assert_eq!(renderer.arrows().len(), 4);
}
