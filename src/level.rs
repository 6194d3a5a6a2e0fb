use crate::block::Block;
use crate::grid::CellMap;
use crate::player::Player;
use macroquad::math::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;

/// Serializable snapshot of a level: the non-empty cells (including portal
/// links) plus the player's position and heading.
#[derive(Debug, Serialize, Deserialize)]
pub struct LevelState {
    pub columns: i32,
    pub rows: i32,
    pub square_size: f32,
    /// Only non-empty cells are stored.
    pub cells: Vec<CellEntry>,
    pub player_x: f32,
    pub player_y: f32,
    pub player_dir_x: f32,
    pub player_dir_y: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CellEntry {
    pub x: i32,
    pub y: i32,
    pub block: Block,
}

impl LevelState {
    /// Create a level snapshot from the current map and player.
    pub fn from_map_and_player(map: &CellMap, player: &Player) -> Self {
        let mut cells = Vec::new();
        for y in 0..map.rows {
            for x in 0..map.columns {
                let block = map.block_at(x, y);
                if block.blocks_movement() {
                    cells.push(CellEntry {
                        x,
                        y,
                        block: block.clone(),
                    });
                }
            }
        }

        LevelState {
            columns: map.columns,
            rows: map.rows,
            square_size: map.square_size,
            cells,
            player_x: player.position.x,
            player_y: player.position.y,
            player_dir_x: player.direction.x,
            player_dir_y: player.direction.y,
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: &str) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize level: {}", e))?;

        fs::write(path, json).map_err(|e| format!("Failed to write level file: {}", e))?;

        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let json =
            fs::read_to_string(path).map_err(|e| format!("Failed to read level file: {}", e))?;

        let level: LevelState =
            serde_json::from_str(&json).map_err(|e| format!("Failed to parse level file: {}", e))?;

        Ok(level)
    }

    /// Rebuild the cell map from the snapshot. Portal links are restored
    /// verbatim, so reciprocity is whatever was saved.
    pub fn restore_map(&self) -> CellMap {
        let mut map = CellMap::new(self.columns, self.rows, self.square_size);
        for entry in &self.cells {
            map.set_block(entry.x, entry.y, entry.block.clone());
        }
        map
    }

    /// Apply the saved player position and heading.
    pub fn restore_player(&self, player: &mut Player) {
        player.position = Vec2::new(self.player_x, self.player_y);
        player.direction = Vec2::new(self.player_dir_x, self.player_dir_y);
    }
}

/// Render the map layout as an ASCII grid, one row per line:
/// `#` wall, `M` mirror, `P` portal, `s` player cell, `.` empty.
pub fn layout_to_string(map: &CellMap, player: &Player) -> String {
    let player_cell = (
        (player.position.x / map.square_size).floor() as i32,
        (player.position.y / map.square_size).floor() as i32,
    );
    let mut result = String::new();
    for y in 0..map.rows {
        for x in 0..map.columns {
            let symbol = if (x, y) == player_cell {
                's'
            } else {
                match map.block_at(x, y) {
                    Block::Empty => '.',
                    Block::Wall(_) => '#',
                    Block::Mirror(_) => 'M',
                    Block::Portal(_) => 'P',
                }
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Mirror, Wall};
    use crate::direction::Compass;

    #[test]
    fn test_round_trip_through_json() {
        let mut map = CellMap::new(8, 8, 10.0);
        map.set_block(1, 1, Block::Wall(Wall::Normal));
        map.set_block(2, 3, Block::Mirror(Mirror::new(Compass::UP | Compass::LEFT)));
        map.link_sides((0, 0), Compass::UP, (5, 5), Compass::RIGHT);
        let player = Player::new(2.0, Vec2::new(45.0, 45.0));

        let level = LevelState::from_map_and_player(&map, &player);
        let json = serde_json::to_string(&level).expect("serialize");
        let restored: LevelState = serde_json::from_str(&json).expect("deserialize");
        let restored_map = restored.restore_map();

        assert_eq!(*restored_map.block_at(1, 1), Block::Wall(Wall::Normal));
        assert_eq!(
            *restored_map.block_at(2, 3),
            Block::Mirror(Mirror::new(Compass::UP | Compass::LEFT))
        );
        let Block::Portal(portal) = restored_map.block_at(0, 0) else {
            panic!("portal should survive the round trip");
        };
        let link = portal.link(Compass::UP).expect("link should survive");
        assert_eq!(link.cell, (5, 5));
        assert_eq!(link.side, Compass::RIGHT);
    }

    #[test]
    fn test_layout_string() {
        let mut map = CellMap::new(3, 2, 10.0);
        map.set_block(1, 0, Block::Wall(Wall::Normal));
        let player = Player::new(1.0, Vec2::new(5.0, 15.0));
        let layout = layout_to_string(&map, &player);
        assert_eq!(layout, ".#.\ns..\n");
    }
}
