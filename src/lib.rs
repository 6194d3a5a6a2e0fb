pub mod block;
pub mod config;
pub mod direction;
pub mod grid;
pub mod level;
pub mod player;
pub mod ray;
pub mod raycast;

pub use block::{Block, Mirror, Portal, PortalLink, Wall};
pub use direction::{Compass, MovementCombo};
pub use grid::CellMap;
pub use level::LevelState;
pub use player::{Player, PlayerInput};
pub use ray::{CastingRay, EdgeStepCache, HitKind, RaySegment};
pub use raycast::{RayData, Raycaster};
