use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub raycaster: RaycasterConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub level: LevelConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_columns")]
    pub columns: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_square_size")]
    pub square_size: f32,
}

#[derive(Debug, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_radius_ratio")]
    pub radius_ratio: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_sprint_multiplier")]
    pub sprint_multiplier: f32,
    #[serde(default = "default_turn_rate")]
    pub turn_rate: f32,
    #[serde(default = "default_start_x")]
    pub start_x: i32,
    #[serde(default = "default_start_y")]
    pub start_y: i32,
}

#[derive(Debug, Deserialize)]
pub struct RaycasterConfig {
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_ray_count")]
    pub ray_count: usize,
    #[serde(default = "default_visible_distance")]
    pub visible_distance: f32,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default)]
    pub ray_points_mode: bool,
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,
}

#[derive(Debug, Deserialize)]
pub struct LevelConfig {
    #[serde(default = "default_level_path")]
    pub path: String,
}

// Default values
fn default_columns() -> i32 { 20 }
fn default_rows() -> i32 { 20 }
fn default_square_size() -> f32 { 38.0 }
fn default_radius_ratio() -> f32 { 0.25 }
fn default_speed() -> f32 { 1.0 }
fn default_sprint_multiplier() -> f32 { 3.0 }
fn default_turn_rate() -> f32 { 1.0 }
fn default_start_x() -> i32 { 10 }
fn default_start_y() -> i32 { 10 }
fn default_fov() -> f32 { 70.0 }
fn default_ray_count() -> usize { 136 }
fn default_visible_distance() -> f32 { 20.0 }
fn default_window_title() -> String { "Portalcast - Raycasting Sandbox".to_string() }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_show_grid() -> bool { true }
fn default_level_path() -> String { "level.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            rows: default_rows(),
            square_size: default_square_size(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius_ratio: default_radius_ratio(),
            speed: default_speed(),
            sprint_multiplier: default_sprint_multiplier(),
            turn_rate: default_turn_rate(),
            start_x: default_start_x(),
            start_y: default_start_y(),
        }
    }
}

impl Default for RaycasterConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            ray_count: default_ray_count(),
            visible_distance: default_visible_distance(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            ray_points_mode: false,
            show_grid: default_show_grid(),
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            path: default_level_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            player: PlayerConfig::default(),
            raycaster: RaycasterConfig::default(),
            visual: VisualConfig::default(),
            level: LevelConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        match fs::read_to_string("config.toml") {
            Ok(contents) => {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        println!("Loaded configuration from config.toml");
                        config
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config.toml: {}", e);
                        eprintln!("Using default configuration");
                        Config::default()
                    }
                }
            }
            Err(_) => {
                println!("No config.toml found, using default configuration");
                Config::default()
            }
        }
    }
}
