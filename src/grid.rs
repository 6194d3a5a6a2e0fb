use crate::block::{Block, Portal, PortalLink, Wall};
use crate::direction::Compass;
use macroquad::math::Vec2;

/// Rotate a vector by an angle in degrees. Positive angles rotate
/// UP -> RIGHT -> DOWN -> LEFT in screen coordinates (y grows downward);
/// actor turning, ray fanning and portal rotation all share this handedness.
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Angle of a vector in degrees, normalized into [0, 360).
pub fn vec_angle(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees().rem_euclid(360.0)
}

/// Split an absolute position into the cell it is in and the fractional
/// offset within that cell, each component in [0, 1).
pub fn split_position(position: Vec2, square_size: f32) -> ((i32, i32), Vec2) {
    let scaled_x = position.x / square_size;
    let scaled_y = position.y / square_size;
    let cell_x = scaled_x.floor();
    let cell_y = scaled_y.floor();
    (
        (cell_x as i32, cell_y as i32),
        Vec2::new(scaled_x - cell_x, scaled_y - cell_y),
    )
}

/// Closest side of a cell given a fractional offset inside it.
/// Ties resolve in the order UP, DOWN, LEFT, RIGHT.
pub fn get_closest_side(frac: Vec2) -> Compass {
    let candidates = [
        (frac.y, Compass::UP),
        (1.0 - frac.y, Compass::DOWN),
        (frac.x, Compass::LEFT),
        (1.0 - frac.x, Compass::RIGHT),
    ];
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.0 < best.0 {
            best = *candidate;
        }
    }
    best.1
}

/// Which side of a cell a ray with the given heading entered through.
/// The heading must be nonzero.
pub fn get_enter_side(frac: Vec2, direction: Vec2) -> Compass {
    debug_assert!(direction != Vec2::ZERO, "enter side requires a nonzero heading");
    let closest = get_closest_side(frac);
    let angle = vec_angle(direction);
    // the angle windows correct cases where the nearest side is behind the ray
    match closest {
        Compass::UP => {
            if angle <= 180.0 {
                closest
            } else if angle <= 270.0 {
                Compass::RIGHT
            } else {
                Compass::LEFT
            }
        }
        Compass::RIGHT => {
            if (90.0..=270.0).contains(&angle) {
                closest
            } else if angle < 90.0 {
                Compass::UP
            } else {
                Compass::DOWN
            }
        }
        Compass::DOWN => {
            if angle >= 180.0 {
                closest
            } else if angle >= 90.0 {
                Compass::RIGHT
            } else {
                Compass::LEFT
            }
        }
        _ => {
            if angle <= 90.0 || angle >= 270.0 {
                closest
            } else if angle <= 180.0 {
                Compass::UP
            } else {
                Compass::DOWN
            }
        }
    }
}

/// One map cell.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub block: Block,
}

static OUT_OF_BOUNDS: Block = Block::Wall(Wall::Border);

/// Two-dimensional cell map of a level layout in squares.
#[derive(Clone, Debug)]
pub struct CellMap {
    pub columns: i32,
    pub rows: i32,
    /// Side length of one cell in world units.
    pub square_size: f32,
    cells: Vec<Cell>,
    /// Incremented on every cell change so callers can recast only when
    /// the layout actually changed.
    revision: u64,
}

impl CellMap {
    /// Create a map with all cells empty.
    pub fn new(columns: i32, rows: i32, square_size: f32) -> Self {
        CellMap {
            columns,
            rows,
            square_size,
            cells: vec![Cell::default(); (columns * rows) as usize],
            revision: 0,
        }
    }

    /// Create a map with normal walls at the given cells.
    pub fn with_walls(columns: i32, rows: i32, square_size: f32, walls: &[(i32, i32)]) -> Self {
        let mut map = Self::new(columns, rows, square_size);
        for &(x, y) in walls {
            map.set_block(x, y, Block::Wall(Wall::Normal));
        }
        map
    }

    /// Map width in world units.
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.square_size
    }

    /// Map height in world units.
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.square_size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn in_range(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.columns && y >= 0 && y < self.rows
    }

    fn cell_index(&self, x: i32, y: i32) -> usize {
        (y * self.columns + x) as usize
    }

    /// Block at the given cell. Out-of-range coordinates read as a border
    /// wall, so callers past the map edge always see something solid.
    pub fn block_at(&self, x: i32, y: i32) -> &Block {
        if !self.in_range(x, y) {
            return &OUT_OF_BOUNDS;
        }
        &self.cells[self.cell_index(x, y)].block
    }

    /// Write a cell without any link bookkeeping.
    fn set_raw(&mut self, x: i32, y: i32, block: Block) {
        if !self.in_range(x, y) {
            return;
        }
        let index = self.cell_index(x, y);
        if self.cells[index].block != block {
            self.cells[index].block = block;
            self.revision += 1;
        }
    }

    /// Replace a cell's block. Replacing a portal with anything that is not
    /// a portal first unlinks all of its reciprocal sides.
    pub fn set_block(&mut self, x: i32, y: i32, block: Block) {
        if !matches!(block, Block::Portal(_)) {
            if let Block::Portal(portal) = self.block_at(x, y) {
                let links: Vec<(Compass, PortalLink)> = Compass::CARDINALS
                    .into_iter()
                    .filter_map(|side| portal.link(side).map(|link| (side, link)))
                    .collect();
                for (side, link) in links {
                    self.unlink_sides((x, y), side, link.cell, link.side);
                }
            }
        }
        self.set_raw(x, y, block);
    }

    /// Clear all cells back to empty.
    pub fn clear(&mut self) {
        for y in 0..self.rows {
            for x in 0..self.columns {
                self.set_block(x, y, Block::Empty);
            }
        }
    }

    fn portal_at(&self, cell: (i32, i32)) -> Option<Portal> {
        match self.block_at(cell.0, cell.1) {
            Block::Portal(portal) => Some(portal.clone()),
            _ => None,
        }
    }

    /// Link two cell sides together for portal mechanics, promoting either
    /// cell to a portal if needed. Linking two sides of the same cell is
    /// allowed.
    pub fn link_sides(
        &mut self,
        first: (i32, i32),
        first_side: Compass,
        second: (i32, i32),
        second_side: Compass,
    ) {
        if first == second {
            let mut portal = self.portal_at(first).unwrap_or_default();
            portal.set_link(
                first_side,
                Some(PortalLink {
                    cell: first,
                    side: second_side,
                }),
            );
            portal.set_link(
                second_side,
                Some(PortalLink {
                    cell: first,
                    side: first_side,
                }),
            );
            self.set_block(first.0, first.1, Block::Portal(portal));
        } else {
            let mut first_portal = self.portal_at(first).unwrap_or_default();
            let mut second_portal = self.portal_at(second).unwrap_or_default();
            first_portal.set_link(
                first_side,
                Some(PortalLink {
                    cell: second,
                    side: second_side,
                }),
            );
            second_portal.set_link(
                second_side,
                Some(PortalLink {
                    cell: first,
                    side: first_side,
                }),
            );
            self.set_block(first.0, first.1, Block::Portal(first_portal));
            self.set_block(second.0, second.1, Block::Portal(second_portal));
        }
    }

    /// Unlink two previously linked cell sides. A portal left with no links
    /// demotes back to an empty cell.
    pub fn unlink_sides(
        &mut self,
        first: (i32, i32),
        first_side: Compass,
        second: (i32, i32),
        second_side: Compass,
    ) {
        if first == second {
            let Some(mut portal) = self.portal_at(first) else {
                return;
            };
            portal.set_link(first_side, None);
            portal.set_link(second_side, None);
            let block = if portal.has_links() {
                Block::Portal(portal)
            } else {
                Block::Empty
            };
            self.set_raw(first.0, first.1, block);
        } else {
            let (Some(mut first_portal), Some(mut second_portal)) =
                (self.portal_at(first), self.portal_at(second))
            else {
                return;
            };
            first_portal.set_link(first_side, None);
            second_portal.set_link(second_side, None);
            let first_block = if first_portal.has_links() {
                Block::Portal(first_portal)
            } else {
                Block::Empty
            };
            let second_block = if second_portal.has_links() {
                Block::Portal(second_portal)
            } else {
                Block::Empty
            };
            self.set_raw(first.0, first.1, first_block);
            self.set_raw(second.0, second.1, second_block);
        }
    }

    /// Teleport a position and heading through the portal whose boundary the
    /// position is at, accounting for the rotation between the linked sides.
    /// Returns the inputs unchanged when the closest side holds no link.
    pub fn portal_transform(&self, position: Vec2, direction: Vec2) -> (Vec2, Vec2) {
        let (cell, mut frac) = split_position(position, self.square_size);
        let block = self.block_at(cell.0, cell.1);
        debug_assert!(
            matches!(block, Block::Portal(_)),
            "portal transform requires a portal cell"
        );
        let Block::Portal(portal) = block else {
            return (position, direction);
        };
        let enter_side = get_closest_side(frac);
        let Some(link) = portal.link(enter_side) else {
            return (position, direction);
        };

        // base teleport out of the same face: mirror across the entry axis
        if enter_side.intersects(Compass::UP | Compass::DOWN) {
            frac.x = 1.0 - frac.x;
        }
        if enter_side.intersects(Compass::LEFT | Compass::RIGHT) {
            frac.y = 1.0 - frac.y;
        }
        let mut heading = rotate_deg(direction, 180.0);

        // rotate heading and in-cell offset by the side difference
        let rotations = link.side.difference(enter_side);
        heading = rotate_deg(heading, 90.0 * rotations as f32);
        frac = match rotations {
            0 => frac,
            1 => Vec2::new(1.0 - frac.y, frac.x),
            2 => Vec2::new(1.0 - frac.x, 1.0 - frac.y),
            _ => Vec2::new(frac.y, 1.0 - frac.x),
        };

        let position = Vec2::new(
            (link.cell.0 as f32 + frac.x) * self.square_size,
            (link.cell.1 as f32 + frac.y) * self.square_size,
        );
        (position, heading)
    }

    /// Strict interior test in world units.
    pub fn in_bounds(&self, position: Vec2) -> bool {
        position.x > 0.0
            && position.x < self.width()
            && position.y > 0.0
            && position.y < self.height()
    }
}
