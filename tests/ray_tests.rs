mod common;

use common::{approx, approx_vec, cast_ray, parse_layout};
use macroquad::math::Vec2;
use portalcast::{
    Block, CellMap, Compass, EdgeStepCache, HitKind, Mirror, Raycaster, Wall,
};

const SQUARE: f32 = 10.0;

fn open_map() -> CellMap {
    CellMap::new(10, 10, SQUARE)
}

#[test]
fn test_straight_shot_hits_normal_wall() {
    let (map, _) = parse_layout(
        "..........\n\
         ..........\n\
         ..........\n\
         ..........\n\
         ..........\n\
         .....#....\n\
         ..........\n\
         ..........\n\
         ..........\n\
         ..........",
        SQUARE,
    );
    // fire from the left edge of cell (2, 5) straight at the wall in (5, 5)
    let ray = cast_ray(&map, Vec2::new(20.0, 55.0), Vec2::new(1.0, 0.0), 8.0);

    assert_eq!(ray.segments.len(), 1);
    assert_eq!(ray.segments[0].hit, HitKind::Wall(Wall::Normal));
    assert!(approx(ray.total_distance, 3.0, 1e-4));
    assert!(approx_vec(ray.end_position, Vec2::new(50.0, 55.0), 1e-3));
}

#[test]
fn test_exhausted_ray_lands_exactly_on_budget() {
    let map = open_map();
    let ray = cast_ray(&map, Vec2::new(20.0, 55.0), Vec2::new(1.0, 0.0), 5.0);

    assert_eq!(ray.segments.len(), 1);
    assert_eq!(ray.segments[0].hit, HitKind::Exhausted);
    // exhaustion is the only way to use the full budget
    assert!(approx(ray.total_distance, 5.0, 1e-4));
    assert!(approx(ray.segments[0].distance, 5.0, 1e-4));
}

#[test]
fn test_ray_stops_just_inside_border() {
    let map = open_map();
    let ray = cast_ray(&map, Vec2::new(20.0, 55.0), Vec2::new(1.0, 0.0), 50.0);

    let last = ray.segments.last().unwrap();
    assert_eq!(last.hit, HitKind::Wall(Wall::Border));
    assert!(map.in_bounds(ray.end_position));
    assert!(ray.end_position.x > 99.0);
    assert!(ray.total_distance < 50.0);
}

#[test]
fn test_flat_mirror_flips_matching_axis() {
    let mut map = open_map();
    map.set_block(2, 0, Block::Mirror(Mirror::new(Compass::DOWN)));

    // straight up into the mirror's reflective bottom face; the cell below
    // the mirror is open, so the heading's vertical component flips
    let ray = cast_ray(&map, Vec2::new(25.0, 55.0), Vec2::new(0.0, -1.0), 30.0);

    assert!(ray.segments.len() >= 2);
    assert_eq!(ray.segments[0].hit, HitKind::Mirror);
    assert_eq!(ray.segments.last().unwrap().hit, HitKind::Wall(Wall::Border));
    assert!(approx(ray.direction.x, 0.0, 1e-5));
    assert!(approx(ray.direction.y, 1.0, 1e-5));
    // reflection keeps the heading a unit vector
    assert!(approx(ray.direction.length(), 1.0, 1e-5));
}

#[test]
fn test_corner_mirror_flips_orthogonal_axis() {
    let mut map = open_map();
    map.set_block(5, 5, Block::Mirror(Mirror::new(Compass::UP)));
    map.set_block(5, 4, Block::Wall(Wall::Normal));

    // the ray meets the mirror's top face while the cell behind that face
    // is occupied, so the exposed-corner rule flips the other axis
    let ray = cast_ray(
        &map,
        Vec2::new(52.0, 50.5),
        Vec2::new(0.6, 0.8),
        2.0,
    );

    assert_eq!(ray.segments[0].hit, HitKind::Mirror);
    assert!(approx(ray.direction.x, -0.6, 1e-5));
    assert!(approx(ray.direction.y, 0.8, 1e-5));
    assert!(approx(ray.direction.length(), 1.0, 1e-5));
}

#[test]
fn test_unreflective_mirror_side_acts_as_wall() {
    let mut map = open_map();
    map.set_block(5, 5, Block::Mirror(Mirror::new(Compass::UP)));

    // approach from the left; the mirror's left side is not reflective
    let ray = cast_ray(&map, Vec2::new(25.0, 55.0), Vec2::new(1.0, 0.0), 10.0);

    assert_eq!(ray.segments.len(), 1);
    assert_eq!(ray.segments[0].hit, HitKind::Wall(Wall::Normal));
    assert!(approx_vec(ray.end_position, Vec2::new(50.0, 55.0), 1e-3));
}

#[test]
fn test_linked_portal_teleports_ray() {
    let mut map = open_map();
    map.link_sides((5, 5), Compass::LEFT, (7, 7), Compass::RIGHT);

    let ray = cast_ray(&map, Vec2::new(25.0, 55.0), Vec2::new(1.0, 0.0), 20.0);

    assert!(ray.segments.len() >= 2);
    assert_eq!(ray.segments[0].hit, HitKind::Portal);
    assert!(approx_vec(ray.segments[0].end, Vec2::new(50.0, 55.0), 1e-3));
    // the ray re-emerges from the paired side, nudged off the shared edge
    let resumed = ray.segments[1].start;
    assert!(approx_vec(resumed, Vec2::new(80.05, 75.0), 1e-2));
    assert!(resumed.x > 80.0);
    // teleporting costs no travel distance
    let marched: f32 = ray.segments.iter().map(|s| s.distance).sum();
    assert!(approx(marched, ray.total_distance, 1e-3));
}

#[test]
fn test_unlinked_portal_side_acts_as_wall() {
    let mut map = open_map();
    map.link_sides((5, 5), Compass::UP, (7, 7), Compass::UP);

    // enter through the left face, which carries no link
    let ray = cast_ray(&map, Vec2::new(25.0, 55.0), Vec2::new(1.0, 0.0), 20.0);

    assert_eq!(ray.segments.len(), 1);
    assert_eq!(ray.segments[0].hit, HitKind::Wall(Wall::Normal));
    assert!(approx_vec(ray.end_position, Vec2::new(50.0, 55.0), 1e-3));
}

#[test]
fn test_portal_transform_round_trips() {
    let mut map = open_map();
    map.link_sides((2, 2), Compass::LEFT, (7, 7), Compass::RIGHT);

    let origin = Vec2::new(20.1, 25.3);
    let heading = Vec2::new(1.0, 0.0);
    let (through, out_heading) = map.portal_transform(origin, heading);
    // walking back in through the paired side lands at the entry point
    let (back, back_heading) = map.portal_transform(through, -out_heading);

    assert!(approx_vec(back, origin, 1e-3));
    assert!(approx_vec(back_heading, -heading, 1e-4));
}

#[test]
fn test_segments_stay_contiguous_across_events() {
    let mut map = open_map();
    map.set_block(2, 0, Block::Mirror(Mirror::new(Compass::DOWN)));
    let ray = cast_ray(&map, Vec2::new(25.0, 55.0), Vec2::new(0.0, -1.0), 30.0);

    assert!(ray.segments.len() >= 2);
    for pair in ray.segments.windows(2) {
        assert!(approx_vec(pair[0].end, pair[1].start, 1e-3));
    }
}

#[test]
fn test_fan_respects_distance_budget() {
    let (map, start) = parse_layout(
        "##########\n\
         #........#\n\
         #..#.....#\n\
         #......#.#\n\
         #...s....#\n\
         #.#......#\n\
         #.....#..#\n\
         #........#\n\
         ##########",
        SQUARE,
    );
    let visible = 6.0;
    let mut caster = Raycaster::new(70.0, 31);
    caster.cast_rays(&map, start, 0.0, visible);

    assert_eq!(caster.ray_data.len(), 31);
    for (_, data) in &caster.ray_data {
        assert!(data.total_distance <= visible + 1e-3);
        let last = data.segments.last().unwrap();
        if last.hit == HitKind::Exhausted {
            assert!(approx(data.total_distance, visible, 1e-3));
        }
    }
}

#[test]
fn test_cache_survives_repeated_casts() {
    let map = open_map();
    let mut cache = EdgeStepCache::new();
    for _ in 0..3 {
        let mut ray = portalcast::CastingRay::new(
            Vec2::new(20.0, 55.0),
            Vec2::new(1.0, 0.0),
            5.0,
            &map,
        );
        ray.cast(&mut cache);
        assert!(approx(ray.total_distance, 5.0, 1e-4));
    }
    assert!(!cache.is_empty());
    assert!(cache.len() <= 500);
}
