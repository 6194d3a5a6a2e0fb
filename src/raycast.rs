use crate::grid::{rotate_deg, CellMap};
use crate::ray::{CastingRay, EdgeStepCache, RaySegment};
use macroquad::math::Vec2;

/// Completed result of a single ray.
#[derive(Clone, Debug)]
pub struct RayData {
    pub total_distance: f32,
    pub segments: Vec<RaySegment>,
    pub points: Vec<Vec2>,
}

/// Fans a spread of rays across a field of view and collects their results.
pub struct Raycaster {
    /// Field of view in degrees.
    pub fov: f32,
    pub ray_count: usize,
    /// Results of the last `cast_rays` call, keyed by cast angle in degrees
    /// and ordered across the fan. Rebuilt from scratch every cast; entries
    /// never survive an invocation.
    pub ray_data: Vec<(f32, RayData)>,
    edge_cache: EdgeStepCache,
}

impl Raycaster {
    pub fn new(fov: f32, ray_count: usize) -> Self {
        Raycaster {
            fov,
            ray_count,
            ray_data: Vec::new(),
            edge_cache: EdgeStepCache::new(),
        }
    }

    /// Evenly spaced cast angles centered on `center`, normalized into
    /// [0, 360). A single ray degenerates to a nominal 1 degree interval,
    /// which leaves just the center angle.
    fn distribute_angles(&self, center: f32) -> Vec<f32> {
        let interval = if self.ray_count > 1 {
            self.fov / (self.ray_count - 1) as f32
        } else {
            1.0
        };
        let median = (self.ray_count - 1) as f32 * interval / 2.0;
        (0..self.ray_count)
            .map(|i| (i as f32 * interval + center - median).rem_euclid(360.0))
            .collect()
    }

    /// Cast the full fan from `origin` around a center angle. Each ray runs
    /// to completion before the next starts.
    pub fn cast_rays(
        &mut self,
        map: &CellMap,
        origin: Vec2,
        center_angle: f32,
        visible_distance: f32,
    ) {
        let angles = self.distribute_angles(center_angle);
        self.ray_data.clear();
        for angle in angles {
            let direction = rotate_deg(Vec2::new(1.0, 0.0), angle);
            let data = Self::cast_ray(map, origin, direction, visible_distance, &mut self.edge_cache);
            self.ray_data.push((angle, data));
        }
    }

    fn cast_ray(
        map: &CellMap,
        origin: Vec2,
        direction: Vec2,
        visible_distance: f32,
        cache: &mut EdgeStepCache,
    ) -> RayData {
        let mut ray = CastingRay::new(origin, direction, visible_distance, map);
        ray.cast(cache);
        RayData {
            total_distance: ray.total_distance,
            segments: ray.segments,
            points: ray.points,
        }
    }
}
