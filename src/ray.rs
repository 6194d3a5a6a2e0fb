use crate::block::{Block, Wall};
use crate::direction::Compass;
use crate::grid::{get_enter_side, split_position, CellMap};
use macroquad::math::Vec2;
use std::collections::HashMap;

/// Distance a ray is pushed out of a portal exit along its new heading so
/// the next iteration does not re-trigger the same boundary.
pub const PORTAL_EXIT_NUDGE: f32 = 0.05;

/// Added to backward edge steps so floating-point rounding at a cell
/// boundary cannot leave the ray stuck on it.
const CROSSING_EPSILON: f32 = 0.001;

const EDGE_CACHE_CAPACITY: usize = 500;

/// Starting from a fractional offset inside a unit cell, the distance to the
/// nearest cell boundary along the heading, in cell-fraction units.
/// An axis with a zero heading component never limits the step; the heading
/// itself must be nonzero.
pub fn step_to_edge(frac: Vec2, direction: Vec2) -> f32 {
    debug_assert!(direction != Vec2::ZERO, "step to edge requires a nonzero heading");
    let mut step_x = f32::INFINITY;
    let mut step_y = f32::INFINITY;

    if direction.x > 0.0 {
        step_x = (1.0 - frac.x) / direction.x;
    } else if direction.x < 0.0 {
        step_x = frac.x / -direction.x + CROSSING_EPSILON;
    }
    if direction.y > 0.0 {
        step_y = (1.0 - frac.y) / direction.y;
    } else if direction.y < 0.0 {
        step_y = frac.y / -direction.y + CROSSING_EPSILON;
    }
    step_x.min(step_y)
}

/// Bounded memo over `step_to_edge`. Rays revisit the same (offset, heading)
/// pairs constantly within a fan, so a small exact-key cache pays for
/// itself; when full it is dropped wholesale and rebuilt.
#[derive(Debug, Default)]
pub struct EdgeStepCache {
    entries: HashMap<[u32; 4], f32>,
}

impl EdgeStepCache {
    pub fn new() -> Self {
        EdgeStepCache {
            entries: HashMap::with_capacity(EDGE_CACHE_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn step_to_edge(&mut self, frac: Vec2, direction: Vec2) -> f32 {
        let key = [
            frac.x.to_bits(),
            frac.y.to_bits(),
            direction.x.to_bits(),
            direction.y.to_bits(),
        ];
        if let Some(&step) = self.entries.get(&key) {
            return step;
        }
        let step = step_to_edge(frac, direction);
        if self.entries.len() >= EDGE_CACHE_CAPACITY {
            self.entries.clear();
        }
        self.entries.insert(key, step);
        step
    }
}

/// What a ray segment ended on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Wall(Wall),
    Mirror,
    Portal,
    /// The ray ran out of visible distance in open space.
    Exhausted,
}

/// One straight-line portion of a ray's path between two events.
#[derive(Clone, Copy, Debug)]
pub struct RaySegment {
    pub start: Vec2,
    pub end: Vec2,
    /// Length in cell units.
    pub distance: f32,
    pub hit: HitKind,
}

/// Loop control for the marching state machine.
enum Flow {
    /// Terminal: a finished segment has been recorded.
    Stop,
    /// Re-enter the loop without stepping (after a teleport).
    Restart,
    /// Proceed to the edge step.
    Advance,
}

/// A single marching ray. Owns its heading outright; reflection and
/// teleportation mutate it in place, so rays never share one.
pub struct CastingRay<'a> {
    pub direction: Vec2,
    pub visible_distance: f32,

    /// Cumulative distance marched, in cell units.
    pub total_distance: f32,
    /// Distance accumulated in the segment being built.
    pub segment_distance: f32,
    pub segments: Vec<RaySegment>,
    /// Raw sample point at every iteration and event, for debug rendering.
    pub points: Vec<Vec2>,

    pub start_position: Vec2,
    pub end_position: Vec2,

    map: &'a CellMap,
}

impl<'a> CastingRay<'a> {
    pub fn new(origin: Vec2, direction: Vec2, visible_distance: f32, map: &'a CellMap) -> Self {
        CastingRay {
            direction,
            visible_distance,
            total_distance: 0.0,
            segment_distance: 0.0,
            segments: Vec::new(),
            points: Vec::new(),
            start_position: origin,
            end_position: origin,
            map,
        }
    }

    /// March the ray to termination, accumulating segments and points.
    pub fn cast(&mut self, cache: &mut EdgeStepCache) {
        loop {
            self.points.push(self.end_position);
            let (cell, frac) = split_position(self.end_position, self.map.square_size);
            let enter_side = get_enter_side(frac, self.direction);

            match self.handle_block(cell, enter_side) {
                Flow::Stop => break,
                Flow::Restart => continue,
                Flow::Advance => {}
            }

            if matches!(self.take_step(frac, cache), Flow::Stop) {
                break;
            }
        }
    }

    /// Dispatch on the block at the ray's current cell.
    fn handle_block(&mut self, cell: (i32, i32), enter_side: Compass) -> Flow {
        let map = self.map;
        match map.block_at(cell.0, cell.1) {
            Block::Empty => Flow::Advance,

            Block::Wall(kind) => {
                let kind = *kind;
                self.finish_segment(HitKind::Wall(kind));
                Flow::Stop
            }

            Block::Mirror(mirror) => {
                if !mirror.reflects(enter_side) {
                    // unmirrored face, plain wall
                    self.finish_segment(HitKind::Wall(Wall::Normal));
                    return Flow::Stop;
                }
                self.finish_segment(HitKind::Mirror);
                self.start_position = self.end_position;
                self.segment_distance = 0.0;
                self.reflect(cell, enter_side);
                Flow::Advance
            }

            Block::Portal(portal) => {
                if !portal.is_linked(enter_side) {
                    // unlinked face, plain wall
                    self.finish_segment(HitKind::Wall(Wall::Normal));
                    return Flow::Stop;
                }
                self.finish_segment(HitKind::Portal);
                self.segment_distance = 0.0;
                let (position, direction) =
                    map.portal_transform(self.end_position, self.direction);
                self.direction = direction;
                // nudge out of the exit boundary
                self.start_position = position + self.direction * PORTAL_EXIT_NUDGE;
                self.end_position = self.start_position;
                Flow::Restart
            }
        }
    }

    /// Reflect the heading against a mirror face. Which axis flips depends
    /// on whether the neighbor cell beyond the entered face is occupied: an
    /// occupied neighbor means the face is an exposed corner piece, an open
    /// neighbor a flat mounted mirror.
    fn reflect(&mut self, cell: (i32, i32), enter_side: Compass) {
        let (dx, dy) = enter_side.offset();
        let neighbor = self.map.block_at(cell.0 + dx, cell.1 + dy);
        let horizontal_entry = enter_side.intersects(Compass::LEFT | Compass::RIGHT);
        if neighbor.blocks_movement() {
            if horizontal_entry {
                self.direction.y = -self.direction.y;
            } else {
                self.direction.x = -self.direction.x;
            }
        } else if horizontal_entry {
            self.direction.x = -self.direction.x;
        } else {
            self.direction.y = -self.direction.y;
        }
    }

    /// Advance to the next cell edge, terminating on the distance budget or
    /// the map boundary.
    fn take_step(&mut self, frac: Vec2, cache: &mut EdgeStepCache) -> Flow {
        let step = cache.step_to_edge(frac, self.direction);
        let new_position = self.end_position + self.position_step(step);
        let new_total = self.total_distance + step;

        if new_total > self.visible_distance || !self.map.in_bounds(new_position) {
            let (adjusted, hit) = if new_total > self.visible_distance {
                // land exactly on the distance budget
                (self.visible_distance - self.total_distance, HitKind::Exhausted)
            } else {
                // shrink until the end position is back inside the map
                let mut adjusted = step;
                loop {
                    adjusted *= 0.99;
                    if self
                        .map
                        .in_bounds(self.end_position + self.position_step(adjusted))
                    {
                        break;
                    }
                }
                (adjusted, HitKind::Wall(Wall::Border))
            };
            self.end_position += self.position_step(adjusted);
            self.total_distance += adjusted;
            self.segment_distance += adjusted;
            self.finish_segment(hit);
            return Flow::Stop;
        }

        self.end_position = new_position;
        self.total_distance = new_total;
        self.segment_distance += step;
        Flow::Advance
    }

    /// World-unit offset of a step of the given cell-unit length.
    fn position_step(&self, distance: f32) -> Vec2 {
        self.direction * distance * self.map.square_size
    }

    fn finish_segment(&mut self, hit: HitKind) {
        self.segments.push(RaySegment {
            start: self.start_position,
            end: self.end_position,
            distance: self.segment_distance,
            hit,
        });
        self.points.push(self.end_position);
    }
}
