use crate::map::elements::PointENU;
use serde::{Deserialize, Serialize};

pub const PEDESTRIAN_COLOR: u32 = 0xFFEA00;
pub const BICYCLE_COLOR: u32 = 0x0FEBFF;
pub const VEHICLE_COLOR: u32 = 0x48DC6B;
pub const VIRTUAL_COLOR: u32 = 0x800000;
pub const DEFAULT_COLOR: u32 = 0xAD21FE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObstacleType {
    Unknown,
    UnknownMovable,
    UnknownUnmovable,
    Pedestrian,
    Bicycle,
    Vehicle,
    Virtual,
    #[serde(other)]
    Other,
}

impl ObstacleType {
    pub fn color(self) -> u32 {
        match self {
            ObstacleType::Pedestrian => PEDESTRIAN_COLOR,
            ObstacleType::Bicycle => BICYCLE_COLOR,
            ObstacleType::Vehicle => VEHICLE_COLOR,
            ObstacleType::Virtual => VIRTUAL_COLOR,
            _ => DEFAULT_COLOR,
        }
    }
}

/// One perceived obstacle for a single tick, in world coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub position_x: Option<f64>,
    #[serde(default)]
    pub position_y: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default, rename = "type")]
    pub obstacle_type: Option<ObstacleType>,
    #[serde(default)]
    pub polygon_point: Vec<PointENU>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
}

impl Obstacle {
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.position_x?, self.position_y?))
    }

    pub fn color(&self) -> u32 {
        self.obstacle_type.map_or(DEFAULT_COLOR, ObstacleType::color)
    }

    /// Direction arrows are drawn for classified obstacles that can move.
    pub fn shows_arrow(&self) -> bool {
        !matches!(
            self.obstacle_type,
            None | Some(ObstacleType::UnknownUnmovable)
        )
    }

    /// Box dimensions when all three are reported.
    pub fn dimensions(&self) -> Option<(f64, f64, f64)> {
        Some((self.length?, self.width?, self.height?))
    }
}
