//! Tracked-obstacle markers drawn on reusable node pools.

pub mod obstacle;
pub mod pool;
pub mod renderer;

pub use obstacle::{Obstacle, ObstacleType};
pub use pool::PrimitivePool;
pub use renderer::{ActiveCounts, ObstacleRenderer};
