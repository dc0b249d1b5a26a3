use crate::scene::components::{Name, Parent, TransformComponent, Visible};
use hecs::World;

pub(crate) fn debug_print_nodes(world: &World) {
    log::debug!("=== Scene Nodes ===");
    for (entity, (name, local, visible, parent)) in world
        .query::<(&Name, &TransformComponent, Option<&Visible>, Option<&Parent>)>()
        .iter()
    {
        log::debug!(
            "{:?} {}: T:{:?} S:{:?} visible:{} parent:{:?}",
            entity,
            name.0,
            local.0.translation,
            local.0.scale,
            visible.map(|v| v.0).unwrap_or(true),
            parent.map(|p| p.0)
        );
    }
    log::debug!("===================");
}
