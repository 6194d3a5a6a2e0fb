use arboard::Clipboard;
use macroquad::prelude::*;

use portalcast::config::Config;
use portalcast::grid::{get_closest_side, split_position, vec_angle};
use portalcast::level::{layout_to_string, LevelState};
use portalcast::{Block, CellMap, Compass, HitKind, Mirror, Player, PlayerInput, Raycaster, Wall};

/// Gamemode toggles for the sandbox.
#[derive(PartialEq)]
enum Mode {
    Play,
    Map,
}

/// Raycasting sandbox: walk around in play mode, edit the level in map mode.
struct Sandbox {
    config: Config,
    map: CellMap,
    player: Player,
    raycaster: Raycaster,
    visible_distance: f32,

    mode: Mode,
    /// Cells already touched during the current mouse drag.
    edited_cells: Vec<(i32, i32)>,
    mouse_down: bool,
    /// First half of a portal link being placed.
    first_portal: Option<((i32, i32), Compass)>,
}

impl Sandbox {
    fn new(config: Config) -> Self {
        let map = CellMap::new(
            config.grid.columns,
            config.grid.rows,
            config.grid.square_size,
        );
        let start = Vec2::new(
            (config.player.start_x as f32 + 0.5) * map.square_size,
            (config.player.start_y as f32 + 0.5) * map.square_size,
        );
        let mut player = Player::new(config.player.radius_ratio * map.square_size, start);
        player.speed = config.player.speed;
        player.sprint_multiplier = config.player.sprint_multiplier;
        player.turn_rate = config.player.turn_rate;

        let raycaster = Raycaster::new(config.raycaster.fov, config.raycaster.ray_count);
        // no ray can be longer than the map diagonal
        let diagonal = 2f32.sqrt() * config.grid.columns.max(config.grid.rows) as f32;
        let visible_distance = config.raycaster.visible_distance.min(diagonal);

        Sandbox {
            config,
            map,
            player,
            raycaster,
            visible_distance,
            mode: Mode::Play,
            edited_cells: Vec::new(),
            mouse_down: false,
            first_portal: None,
        }
    }

    fn collect_input(&self) -> PlayerInput {
        PlayerInput {
            forward: is_key_down(KeyCode::W),
            backward: is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::D),
            turn_left: is_key_down(KeyCode::Left),
            turn_right: is_key_down(KeyCode::Right),
            sprint: is_key_down(KeyCode::LeftShift),
        }
    }

    /// Side length of one cell on screen in the map view.
    fn cell_px(&self) -> f32 {
        let columns = self.map.columns.max(self.map.rows) as f32;
        screen_width().min(screen_height()) / columns
    }

    fn handle_keys(&mut self) {
        if is_key_pressed(KeyCode::Space) {
            self.mode = if self.mode == Mode::Play {
                Mode::Map
            } else {
                Mode::Play
            };
        }
        if is_key_pressed(KeyCode::C) && self.mode == Mode::Map {
            self.copy_layout_to_clipboard();
        }
        if is_key_pressed(KeyCode::R) {
            self.player.direction = -self.player.direction;
        }
        if is_key_pressed(KeyCode::Backspace) && self.mode == Mode::Map {
            self.map.clear();
        }
        if is_key_pressed(KeyCode::F5) {
            let level = LevelState::from_map_and_player(&self.map, &self.player);
            match level.save_to_file(&self.config.level.path) {
                Ok(()) => println!("Level saved to {}", self.config.level.path),
                Err(e) => eprintln!("{}", e),
            }
        }
        if is_key_pressed(KeyCode::F9) {
            match LevelState::load_from_file(&self.config.level.path) {
                Ok(level) => {
                    self.map = level.restore_map();
                    level.restore_player(&mut self.player);
                    println!("Level loaded from {}", self.config.level.path);
                }
                Err(e) => eprintln!("{}", e),
            }
        }
    }

    /// Handle map-mode mouse editing: paint walls, toggle mirror sides,
    /// link portal sides, erase.
    fn handle_mouse(&mut self) {
        if is_mouse_button_pressed(MouseButton::Left) || is_mouse_button_pressed(MouseButton::Right)
        {
            self.mouse_down = true;
        }
        if is_mouse_button_released(MouseButton::Left)
            || is_mouse_button_released(MouseButton::Right)
        {
            self.mouse_down = false;
            self.edited_cells.clear();
        }
        if !self.mouse_down {
            return;
        }

        let (mouse_x, mouse_y) = mouse_position();
        let scale = self.map.square_size / self.cell_px();
        let world = Vec2::new(mouse_x * scale, mouse_y * scale);
        let (cell, frac) = split_position(world, self.map.square_size);
        let closest_side = get_closest_side(frac);

        if cell.0 < 0 || cell.0 >= self.map.columns || cell.1 < 0 || cell.1 >= self.map.rows {
            return;
        }
        let player_cell = split_position(self.player.position, self.map.square_size).0;
        if cell == player_cell || self.edited_cells.contains(&cell) {
            return;
        }

        if is_mouse_button_down(MouseButton::Left) {
            if is_key_down(KeyCode::LeftShift) {
                self.toggle_mirror_side(cell, closest_side);
            } else if is_key_down(KeyCode::LeftControl) {
                self.place_portal_side(cell, closest_side);
            } else {
                self.map
                    .set_block(cell.0, cell.1, Block::Wall(Wall::Normal));
                self.edited_cells.push(cell);
            }
        } else if is_mouse_button_down(MouseButton::Right) {
            self.map.set_block(cell.0, cell.1, Block::Empty);
            self.edited_cells.push(cell);
        }
    }

    fn toggle_mirror_side(&mut self, cell: (i32, i32), side: Compass) {
        let mirror = match self.map.block_at(cell.0, cell.1) {
            Block::Mirror(existing) => {
                let mut mirror = *existing;
                mirror.toggle(side);
                mirror
            }
            _ => Mirror::new(Compass::ALL),
        };
        self.map.set_block(cell.0, cell.1, Block::Mirror(mirror));
        self.edited_cells.push(cell);
    }

    fn place_portal_side(&mut self, cell: (i32, i32), side: Compass) {
        match self.first_portal.take() {
            None => {
                self.first_portal = Some((cell, side));
                self.edited_cells.push(cell);
            }
            Some((first_cell, first_side)) => {
                if !(first_cell == cell && first_side == side) {
                    self.map.link_sides(first_cell, first_side, cell, side);
                    self.edited_cells.push(first_cell);
                    self.edited_cells.push(cell);
                }
            }
        }
    }

    fn copy_layout_to_clipboard(&self) {
        let layout = layout_to_string(&self.map, &self.player);
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&layout) {
                    println!("Failed to copy to clipboard: {}", e);
                } else {
                    println!("Level layout copied to clipboard!");
                    // keep clipboard alive so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                println!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn update(&mut self) {
        self.handle_keys();
        if self.mode == Mode::Map {
            self.handle_mouse();
        } else {
            let input = self.collect_input();
            self.player.update(&input, &self.map);
        }

        let facing = vec_angle(self.player.direction);
        self.raycaster.cast_rays(
            &self.map,
            self.player.position,
            facing,
            self.visible_distance,
        );
    }

    fn hit_color(hit: HitKind, brightness: f32) -> Color {
        let base = match hit {
            HitKind::Wall(Wall::Normal) => (255, 255, 255),
            HitKind::Wall(Wall::Border) => (90, 90, 140),
            HitKind::Mirror => (64, 224, 224),
            HitKind::Portal => (128, 0, 255),
            HitKind::Exhausted => (0, 0, 0),
        };
        Color::from_rgba(
            (base.0 as f32 * brightness) as u8,
            (base.1 as f32 * brightness) as u8,
            (base.2 as f32 * brightness) as u8,
            255,
        )
    }

    /// First-person strip: one screen column per ray, wall height by the
    /// ray's total distance, colored by what it ended on.
    fn draw_first_person(&self) {
        let visual = &self.config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));
        // sky and ground split
        draw_rectangle(
            0.0,
            0.0,
            screen_width(),
            screen_height() / 2.0,
            Color::from_rgba(200, 200, 200, 255),
        );
        draw_rectangle(
            0.0,
            screen_height() / 2.0,
            screen_width(),
            screen_height() / 2.0,
            Color::from_rgba(50, 50, 50, 255),
        );

        let count = self.raycaster.ray_data.len().max(1);
        let column_width = screen_width() / count as f32;
        for (i, (_, ray)) in self.raycaster.ray_data.iter().enumerate() {
            let Some(last) = ray.segments.last() else {
                continue;
            };
            if last.hit == HitKind::Exhausted {
                continue;
            }
            let distance = ray.total_distance.max(0.05);
            let height = (screen_height() / distance).min(screen_height());
            let brightness = (1.0 - distance / self.visible_distance).clamp(0.15, 1.0);
            draw_rectangle(
                i as f32 * column_width,
                (screen_height() - height) / 2.0,
                column_width,
                height,
                Self::hit_color(last.hit, brightness),
            );
        }
    }

    /// Top-down map view: cells, ray fan, player.
    fn draw_map(&self) {
        let visual = &self.config.visual;
        clear_background(Color::from_rgba(
            visual.background_r,
            visual.background_g,
            visual.background_b,
            255,
        ));
        let cell_px = self.cell_px();
        let scale = cell_px / self.map.square_size;

        for y in 0..self.map.rows {
            for x in 0..self.map.columns {
                self.draw_cell(x, y, cell_px);
            }
        }

        if visual.show_grid {
            let grid_color = Color::from_rgba(70, 70, 70, 255);
            for x in 0..=self.map.columns {
                let px = x as f32 * cell_px;
                draw_line(px, 0.0, px, self.map.rows as f32 * cell_px, 1.0, grid_color);
            }
            for y in 0..=self.map.rows {
                let py = y as f32 * cell_px;
                draw_line(0.0, py, self.map.columns as f32 * cell_px, py, 1.0, grid_color);
            }
        }

        // ray fan
        for (_, ray) in &self.raycaster.ray_data {
            if visual.ray_points_mode {
                for point in &ray.points {
                    draw_circle(point.x * scale, point.y * scale, 1.5, YELLOW);
                }
            } else {
                for segment in &ray.segments {
                    draw_line(
                        segment.start.x * scale,
                        segment.start.y * scale,
                        segment.end.x * scale,
                        segment.end.y * scale,
                        1.0,
                        Self::hit_color(segment.hit, 0.6),
                    );
                }
            }
        }

        // armed portal side marker
        if let Some((cell, side)) = self.first_portal {
            for index in side.subrect_indices() {
                self.draw_subrect(cell, index, cell_px, Color::from_rgba(255, 0, 255, 160));
            }
        }

        // player body and heading
        let center = self.player.position * scale;
        draw_circle(center.x, center.y, self.player.radius * scale, WHITE);
        let tip = center + self.player.direction * self.player.radius * scale;
        draw_line(center.x, center.y, tip.x, tip.y, 2.0, BLACK);

        let revision = format!("revision: {}", self.map.revision());
        let info = [
            "MAP MODE",
            "click: wall | shift+click: mirror side | ctrl+click: portal link",
            "right click: erase | C: copy layout | F5/F9: save/load",
            "Space: play mode | Backspace: clear | Esc: quit",
            revision.as_str(),
        ];
        for (i, line) in info.iter().enumerate() {
            draw_text(line, 10.0, 20.0 + i as f32 * 18.0, 20.0, WHITE);
        }
    }

    fn draw_cell(&self, x: i32, y: i32, cell_px: f32) {
        let px = x as f32 * cell_px;
        let py = y as f32 * cell_px;
        match self.map.block_at(x, y) {
            Block::Empty => {}
            Block::Wall(_) => draw_rectangle(px, py, cell_px, cell_px, WHITE),
            Block::Mirror(mirror) => {
                draw_rectangle_lines(px, py, cell_px, cell_px, cell_px / 8.0, WHITE);
                if !mirror.sides.is_empty() {
                    for index in mirror.sides.subrect_indices() {
                        self.draw_subrect(
                            (x, y),
                            index,
                            cell_px,
                            Color::from_rgba(64, 64, 64, 255),
                        );
                    }
                }
            }
            Block::Portal(portal) => {
                draw_rectangle(px, py, cell_px, cell_px, WHITE);
                if portal.has_links() {
                    for index in portal.subrect_indices() {
                        self.draw_subrect(
                            (x, y),
                            index,
                            cell_px,
                            Color::from_rgba(128, 0, 255, 255),
                        );
                    }
                }
            }
        }
    }

    /// Fill one square of a cell's 3x3 sub-area layout.
    fn draw_subrect(&self, cell: (i32, i32), index: usize, cell_px: f32, color: Color) {
        let sub = cell_px / 3.0;
        let offset_x = (index % 3) as f32 * sub;
        let offset_y = (index / 3) as f32 * sub;
        draw_rectangle(
            cell.0 as f32 * cell_px + offset_x,
            cell.1 as f32 * cell_px + offset_y,
            sub,
            sub,
            color,
        );
    }

    fn draw(&self) {
        match self.mode {
            Mode::Play => self.draw_first_person(),
            Mode::Map => self.draw_map(),
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Portalcast".to_string(),
        window_width: 1366,
        window_height: 768,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = Config::load();
    let mut sandbox = Sandbox::new(config);

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        sandbox.update();
        sandbox.draw();
        next_frame().await
    }
}
