use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSettings {
    /// Radius in meters of the map request sent when editing starts.
    #[serde(default = "SceneSettings::default_editing_map_radius")]
    pub editing_map_radius: f64,
    #[serde(default)]
    pub obstacles: ObstacleSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            editing_map_radius: Self::default_editing_map_radius(),
            obstacles: ObstacleSettings::default(),
        }
    }
}

impl SceneSettings {
    pub fn load() -> Self {
        Self::load_from_path("settings.json")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<SceneSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded scene settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default scene settings.",
                        path, err
                    );
                    SceneSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Scene settings file {:?} not found. Using default settings.",
                    path
                );
                SceneSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default scene settings.",
                    path, err
                );
                SceneSettings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if !(self.editing_map_radius.is_finite() && self.editing_map_radius > 0.0) {
            warn!("Editing map radius must be positive. Using default value.");
            self.editing_map_radius = Self::default_editing_map_radius();
        }

        self.obstacles = self.obstacles.validate();
        self
    }

    const fn default_editing_map_radius() -> f64 {
        2000.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSettings {
    #[serde(default = "ObstacleSettings::default_show")]
    pub show: bool,
    /// Height used for obstacles that report none.
    #[serde(default = "ObstacleSettings::default_height")]
    pub default_height: f64,
    #[serde(default = "ObstacleSettings::default_line_thickness")]
    pub line_thickness: f32,
    #[serde(default)]
    pub arrow: ArrowSettings,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            show: Self::default_show(),
            default_height: Self::default_height(),
            line_thickness: Self::default_line_thickness(),
            arrow: ArrowSettings::default(),
        }
    }
}

impl ObstacleSettings {
    fn validate(mut self) -> Self {
        if !(self.default_height.is_finite() && self.default_height > 0.0) {
            warn!("Default obstacle height must be positive. Using default value.");
            self.default_height = Self::default_height();
        }

        if !(self.line_thickness.is_finite() && self.line_thickness > 0.0) {
            warn!("Obstacle line thickness must be positive. Using default value.");
            self.line_thickness = Self::default_line_thickness();
        }

        let arrow = &self.arrow;
        if !(arrow.length > 0.0 && arrow.head_length > 0.0 && arrow.head_width > 0.0)
            || arrow.head_length > arrow.length
        {
            warn!("Arrow dimensions are invalid. Using default arrow.");
            self.arrow = ArrowSettings::default();
        }

        self
    }

    const fn default_show() -> bool {
        true
    }

    const fn default_height() -> f64 {
        1.5
    }

    const fn default_line_thickness() -> f32 {
        1.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowSettings {
    pub length: f32,
    pub head_length: f32,
    pub head_width: f32,
}

impl Default for ArrowSettings {
    fn default() -> Self {
        Self {
            length: 1.5,
            head_length: 0.5,
            head_width: 0.5,
        }
    }
}
