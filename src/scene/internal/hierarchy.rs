use crate::scene::components::{Children, Parent, TransformComponent, Visible, WorldTransform};
use crate::scene::transform::Transform;
use hecs::World;

fn roots(world: &World) -> Vec<hecs::Entity> {
    world
        .query::<&TransformComponent>()
        .without::<&Parent>()
        .iter()
        .map(|(entity, _)| entity)
        .collect()
}

pub(crate) fn propagate_transforms(world: &mut World) {
    let roots = roots(world);
    log::trace!("Propagating transforms from {} root nodes", roots.len());

    let mut stack: Vec<(hecs::Entity, Transform)> = roots
        .into_iter()
        .map(|root| (root, Transform::IDENTITY))
        .collect();

    while let Some((entity, parent_world)) = stack.pop() {
        let Ok(local) = world.get::<&TransformComponent>(entity).map(|t| t.0) else {
            continue;
        };
        let world_transform = parent_world.mul_transform(&local);

        let updated = match world.get::<&mut WorldTransform>(entity) {
            Ok(mut wt) => {
                wt.0 = world_transform;
                true
            }
            Err(_) => false,
        };
        if !updated {
            if let Err(e) = world.insert_one(entity, WorldTransform(world_transform)) {
                log::error!("Failed to insert WorldTransform for {:?}: {:?}", entity, e);
                continue;
            }
        }

        if let Ok(children) = world.get::<&Children>(entity) {
            stack.extend(children.0.iter().rev().map(|&child| (child, world_transform)));
        }
    }
}

/// Every node whose own flag and all ancestors' flags are visible.
pub(crate) fn collect_visible(world: &World) -> Vec<hecs::Entity> {
    let mut visible = Vec::new();
    let mut stack = roots(world);

    while let Some(entity) = stack.pop() {
        let shown = world.get::<&Visible>(entity).map(|v| v.0).unwrap_or(true);
        if !shown {
            continue;
        }
        visible.push(entity);
        if let Ok(children) = world.get::<&Children>(entity) {
            stack.extend(children.0.iter().copied());
        }
    }

    visible
}
