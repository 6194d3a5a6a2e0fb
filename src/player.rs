use crate::block::Block;
use crate::direction::MovementCombo;
use crate::grid::{rotate_deg, CellMap};
use macroquad::math::Vec2;

/// Angle offset from the facing heading for each resolved movement combo.
/// Combos without a table entry still move, defaulting to straight ahead.
fn movement_angle(combo: MovementCombo) -> Option<f32> {
    match combo {
        MovementCombo::FORWARD => Some(0.0),
        MovementCombo::FORWARD_RIGHT => Some(45.0),
        MovementCombo::RIGHT => Some(90.0),
        MovementCombo::BACKWARD_RIGHT => Some(135.0),
        MovementCombo::BACKWARD => Some(180.0),
        MovementCombo::BACKWARD_LEFT => Some(225.0),
        MovementCombo::LEFT => Some(270.0),
        MovementCombo::FORWARD_LEFT => Some(315.0),
        _ => None,
    }
}

/// Snapshot of the movement inputs active during one tick. The resolver
/// only reads membership; whoever polls the keyboard owns the state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub sprint: bool,
}

impl PlayerInput {
    /// Combine the active movement inputs into a single combo.
    pub fn movement_combo(&self) -> MovementCombo {
        let mut combo = MovementCombo::NONE;
        if self.forward {
            combo |= MovementCombo::FORWARD;
        }
        if self.backward {
            combo |= MovementCombo::BACKWARD;
        }
        if self.left {
            combo |= MovementCombo::LEFT;
        }
        if self.right {
            combo |= MovementCombo::RIGHT;
        }
        combo
    }
}

/// Controllable viewpoint moving through the cell map with the same block
/// and portal semantics the rays use.
#[derive(Clone, Debug)]
pub struct Player {
    pub radius: f32,
    pub position: Vec2,
    /// Unit facing heading, rotated in place by turning.
    pub direction: Vec2,
    /// Base movement in world units per tick.
    pub speed: f32,
    pub sprint_multiplier: f32,
    /// Turning in degrees per tick.
    pub turn_rate: f32,
}

impl Player {
    pub fn new(radius: f32, position: Vec2) -> Self {
        Player {
            radius,
            position,
            direction: Vec2::new(0.0, -1.0),
            speed: 1.0,
            sprint_multiplier: 3.0,
            turn_rate: 1.0,
        }
    }

    /// Advance one tick: turn, move, and clamp into the map interior.
    pub fn update(&mut self, input: &PlayerInput, map: &CellMap) {
        if input.turn_left {
            self.direction = rotate_deg(self.direction, -self.turn_rate);
        } else if input.turn_right {
            self.direction = rotate_deg(self.direction, self.turn_rate);
        }

        let combo = input.movement_combo().resolved();
        if !combo.is_empty() {
            self.step(combo, input.sprint, map);
        }

        // always keep the body inside the map, inset by its radius
        self.position.x = self.position.x.clamp(self.radius, map.width() - self.radius);
        self.position.y = self.position.y.clamp(self.radius, map.height() - self.radius);
    }

    fn cell_of(&self, position: Vec2, map: &CellMap) -> (i32, i32) {
        (
            (position.x / map.square_size).floor() as i32,
            (position.y / map.square_size).floor() as i32,
        )
    }

    fn step(&mut self, combo: MovementCombo, sprint: bool, map: &CellMap) {
        let multiplier = if sprint { self.sprint_multiplier } else { 1.0 };
        let angle = movement_angle(combo).unwrap_or(0.0);
        let displacement = rotate_deg(self.direction, angle) * self.speed * multiplier;
        let new_position = self.position + displacement;

        let current_cell = self.cell_of(self.position, map);
        let new_cell = self.cell_of(new_position, map);

        let entering_portal = matches!(map.block_at(new_cell.0, new_cell.1), Block::Portal(_));
        let leaving_empty = !map.block_at(current_cell.0, current_cell.1).blocks_movement();

        if entering_portal && leaving_empty {
            // walking straight from open space into a portal teleports; the
            // position is re-derived every tick, so no exit nudge is needed
            let (position, direction) = map.portal_transform(new_position, self.direction);
            self.position = position;
            self.direction = direction;
        } else {
            // commit each axis independently so diagonals slide along walls
            let x_cell = self.cell_of(Vec2::new(new_position.x, self.position.y), map);
            if !map.block_at(x_cell.0, x_cell.1).blocks_movement() {
                self.position.x = new_position.x;
            }
            let y_cell = self.cell_of(Vec2::new(self.position.x, new_position.y), map);
            if !map.block_at(y_cell.0, y_cell.1).blocks_movement() {
                self.position.y = new_position.y;
            }
        }
    }
}
