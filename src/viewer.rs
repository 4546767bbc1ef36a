use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::error::Error;

use crate::config::MapConfig;
use crate::generation::{generate_map, GeneratedMap};
use crate::obstacles::{circle_hits_obstacle, filter_collidables, filter_obstacles, Bounds, Circle, Collidable};
use crate::tileset::{Tileset, TilesetCanvas};
use image::RgbaImage;

const MAX_WINDOW: u32 = 800;
const PAN_SPEED: i64 = 8;

const BACKGROUND: u32 = (5 << 16) | (5 << 8) | 15;
const OBSTACLE_OUTLINE: u32 = 0xd0_40_40;
const TREE_OUTLINE: u32 = 0xe0_c0_40;
const PROBE_FREE: u32 = 0x40_e0_60;
const PROBE_BLOCKED: u32 = 0xff_30_30;

/// A generated map with its composited raster
struct ViewerMap {
    map: GeneratedMap,
    composite: RgbaImage,
}

fn build_map(config: &MapConfig, tileset: &Tileset) -> Result<ViewerMap, Box<dyn Error>> {
    println!("Generating island with seed: {}...", config.seed);
    let mut canvas = TilesetCanvas::new(tileset.clone(), config.world_width, config.world_height);
    let map = generate_map(config, &mut canvas)?;
    let layers = canvas.into_layers().ok_or("generation finished without a surface")?;
    println!("Done! Seed {} ({}x{} tiles)", map.seeds.master, map.tiles_x(), map.tiles_y());
    Ok(ViewerMap { map, composite: layers.composite() })
}

/// Run the interactive map viewer.
/// Arrows/WASD pan, H toggles collision overlays, R regenerates, Escape exits.
pub fn run_viewer(config: MapConfig, tileset: Tileset) -> Result<(), Box<dyn Error>> {
    let mut config = config;
    let mut current = build_map(&config, &tileset)?;

    let view_w = current.composite.width().min(MAX_WINDOW) as usize;
    let view_h = current.composite.height().min(MAX_WINDOW) as usize;

    let mut window = Window::new(
        "Island Generator - Arrows: Pan, H: Collision, R: Regenerate, Esc: Exit",
        view_w,
        view_h,
        WindowOptions {
            resize: false,
            scale: minifb::Scale::X1,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    println!("Viewer started. Controls:");
    println!("  Arrows / WASD: Pan");
    println!("  H: Toggle collision overlay");
    println!("  R: Regenerate");
    println!("  Esc: Exit");

    let (mut cam_x, mut cam_y) = (0i64, 0i64);
    let mut show_collision = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            config.seed = rand::random::<i32>().unsigned_abs() as i64 + 1;
            println!("Regenerating with seed: {}", config.seed);
            current = build_map(&config, &tileset)?;
        }
        if window.is_key_pressed(Key::H, KeyRepeat::No) {
            show_collision = !show_collision;
        }

        if window.is_key_down(Key::Left) || window.is_key_down(Key::A) {
            cam_x -= PAN_SPEED;
        }
        if window.is_key_down(Key::Right) || window.is_key_down(Key::D) {
            cam_x += PAN_SPEED;
        }
        if window.is_key_down(Key::Up) || window.is_key_down(Key::W) {
            cam_y -= PAN_SPEED;
        }
        if window.is_key_down(Key::Down) || window.is_key_down(Key::S) {
            cam_y += PAN_SPEED;
        }
        cam_x = cam_x.clamp(0, (current.composite.width() as i64 - view_w as i64).max(0));
        cam_y = cam_y.clamp(0, (current.composite.height() as i64 - view_h as i64).max(0));

        let mut buffer = render_viewport(&current.composite, cam_x, cam_y, view_w, view_h);
        if show_collision {
            draw_collision_overlay(&mut buffer, &current.map, cam_x, cam_y, view_w, view_h);
        }

        window.update_with_buffer(&buffer, view_w, view_h)?;
    }

    Ok(())
}

/// Copy the window-sized region at (cam_x, cam_y) into a 0RGB buffer.
fn render_viewport(img: &RgbaImage, cam_x: i64, cam_y: i64, width: usize, height: usize) -> Vec<u32> {
    let mut buffer = vec![BACKGROUND; width * height];
    for oy in 0..height {
        for ox in 0..width {
            let (ix, iy) = (cam_x + ox as i64, cam_y + oy as i64);
            if ix < 0 || iy < 0 || ix >= img.width() as i64 || iy >= img.height() as i64 {
                continue;
            }
            let p = img.get_pixel(ix as u32, iy as u32);
            buffer[oy * width + ox] = ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32;
        }
    }
    buffer
}

/// Outline the obstacles and trees inside the viewport, and mark the probe
/// circle at the view centre red when it would collide.
fn draw_collision_overlay(buffer: &mut [u32], map: &GeneratedMap, cam_x: i64, cam_y: i64, width: usize, height: usize) {
    let ts = map.tile_size;
    let view = Bounds::from_origin(cam_x as f64, cam_y as f64, width as f64, height as f64);

    let nearby = filter_obstacles(&map.obstacles, &view, ts);
    for o in &nearby {
        outline_rect(buffer, width, height, o.x as i64 - cam_x, o.y as i64 - cam_y, ts as i64, ts as i64, OBSTACLE_OUTLINE);
    }
    for tree in filter_collidables(&map.trees, &view) {
        let b = tree.bounds();
        let size = (b.right - b.left) as i64;
        outline_rect(buffer, width, height, b.left as i64 - cam_x, b.top as i64 - cam_y, size, size, TREE_OUTLINE);
    }

    let probe = Circle {
        x: cam_x as f64 + width as f64 / 2.0,
        y: cam_y as f64 + height as f64 / 2.0,
        radius: ts as f64 / 2.0,
    };
    let color = if circle_hits_obstacle(&probe, &nearby, ts) { PROBE_BLOCKED } else { PROBE_FREE };
    let r = probe.radius as i64;
    outline_rect(buffer, width, height, width as i64 / 2 - r, height as i64 / 2 - r, 2 * r, 2 * r, color);
}

#[allow(clippy::too_many_arguments)]
fn outline_rect(buffer: &mut [u32], width: usize, height: usize, x: i64, y: i64, w: i64, h: i64, color: u32) {
    let mut plot = |px: i64, py: i64| {
        if px >= 0 && py >= 0 && (px as usize) < width && (py as usize) < height {
            buffer[py as usize * width + px as usize] = color;
        }
    };
    for dx in 0..w {
        plot(x + dx, y);
        plot(x + dx, y + h - 1);
    }
    for dy in 0..h {
        plot(x, y + dy);
        plot(x + w - 1, y + dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_viewport_crops_and_pads() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        img.put_pixel(3, 3, Rgba([0x12, 0x34, 0x56, 255]));

        let buffer = render_viewport(&img, 2, 2, 3, 3);
        assert_eq!(buffer[1 * 3 + 1], 0x12_34_56);
        // beyond the image edge
        assert_eq!(buffer[2 * 3 + 2], BACKGROUND);
    }

    #[test]
    fn test_outline_clips() {
        let mut buffer = vec![0u32; 16];
        outline_rect(&mut buffer, 4, 4, -1, -1, 3, 3, 7);
        assert_eq!(buffer[0], 0);
        assert_eq!(buffer[1], 7);
        assert_eq!(buffer[4], 7);
        assert_eq!(buffer[5], 7);
        assert_eq!(buffer[15], 0);
    }
}
