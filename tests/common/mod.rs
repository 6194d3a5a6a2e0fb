use macroquad::math::Vec2;
use portalcast::{Block, CastingRay, CellMap, EdgeStepCache, Wall};

/// Parse an ASCII layout into a map: `#` is a normal wall, `s` marks the
/// start cell, `.` or space is empty. Returns the map and the world
/// position at the center of the start cell.
#[allow(dead_code)]
pub fn parse_layout(text: &str, square_size: f32) -> (CellMap, Vec2) {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let rows = lines.len() as i32;
    let columns = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0) as i32;
    let mut map = CellMap::new(columns, rows, square_size);
    let mut start = Vec2::new(square_size / 2.0, square_size / 2.0);
    for (y, line) in lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            match ch {
                '#' => map.set_block(x as i32, y as i32, Block::Wall(Wall::Normal)),
                's' => {
                    start = Vec2::new(
                        (x as f32 + 0.5) * square_size,
                        (y as f32 + 0.5) * square_size,
                    );
                }
                _ => {}
            }
        }
    }
    (map, start)
}

/// Cast a single ray with a fresh edge-step cache.
#[allow(dead_code)]
pub fn cast_ray<'a>(
    map: &'a CellMap,
    origin: Vec2,
    direction: Vec2,
    visible_distance: f32,
) -> CastingRay<'a> {
    let mut cache = EdgeStepCache::new();
    let mut ray = CastingRay::new(origin, direction, visible_distance, map);
    ray.cast(&mut cache);
    ray
}

#[allow(dead_code)]
pub fn approx(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() < tolerance
}

#[allow(dead_code)]
pub fn approx_vec(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    (a - b).length() < tolerance
}
