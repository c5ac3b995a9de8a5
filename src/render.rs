// src/render.rs
//! Растровый предпросмотр мира
//!
//! Собирает модель мира в одно RGBA-изображение: цвета биомов как подложка,
//! поверх — реки, дороги и поселения. Предназначено для отладки и экспорта
//! из CLI; векторный рендеринг остаётся за внешним слоем.

use crate::world::WorldModel;
use image::{ImageBuffer, Rgba};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

const RIVER_COLOR: Rgba<u8> = Rgba([70, 130, 200, 255]);
const ROAD_COLOR: Rgba<u8> = Rgba([139, 105, 60, 255]);
const TOWN_COLOR: Rgba<u8> = Rgba([180, 40, 40, 255]);

/// Радиус маркера поселения в пикселях
const TOWN_RADIUS: i32 = 2;

/// Рисует полную карту мира
#[must_use]
pub fn render_world_map(world: &WorldModel) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    let mut img = ImageBuffer::from_fn(world.biomes.width, world.biomes.height, |x, y| {
        let rgb = world.biomes.get(x, y).to_rgb();
        Rgba([rgb[0], rgb[1], rgb[2], 255])
    });

    for river in &world.rivers {
        for pair in river.windows(2) {
            draw_line_segment_mut(
                &mut img,
                (pair[0].0 as f32, pair[0].1 as f32),
                (pair[1].0 as f32, pair[1].1 as f32),
                RIVER_COLOR,
            );
        }
    }

    for road in &world.roads {
        for pair in road.path.windows(2) {
            draw_line_segment_mut(
                &mut img,
                (pair[0].x, pair[0].y),
                (pair[1].x, pair[1].y),
                ROAD_COLOR,
            );
        }
    }

    for town in &world.settlements {
        draw_filled_circle_mut(
            &mut img,
            (town.x as i32, town.y as i32),
            TOWN_RADIUS,
            TOWN_COLOR,
        );
    }

    img
}

/// Сохраняет предпросмотр карты в PNG
pub fn save_world_png(world: &WorldModel, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    render_world_map(world).save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldGenerationParams;
    use crate::world::generate_world;

    #[test]
    fn test_image_matches_world_size() {
        let params = WorldGenerationParams {
            seed: 5,
            width: 24,
            height: 16,
            ..WorldGenerationParams::default()
        };
        let world = generate_world(&params).unwrap();
        let img = render_world_map(&world);
        assert_eq!(img.dimensions(), (24, 16));
    }

    #[test]
    fn test_town_marker_painted() {
        let params = WorldGenerationParams {
            seed: 5,
            width: 32,
            height: 32,
            ..WorldGenerationParams::default()
        };
        let world = generate_world(&params).unwrap();
        let img = render_world_map(&world);
        for town in &world.settlements {
            assert_eq!(*img.get_pixel(town.x, town.y), TOWN_COLOR);
        }
    }
}
