// src/sea.rs
//! Маска моря и сглаживание береговой линии

use crate::grid::Grid;
use crate::heightmap::Heightmap;

/// Маска моря: `true` — вода
pub type SeaMask = Grid<bool>;

/// Строит маску моря: клетка — вода, если её высота строго ниже `sea_level`
#[must_use]
pub fn generate_sea_mask(heightmap: &Heightmap, sea_level: f32) -> SeaMask {
    SeaMask {
        width: heightmap.width,
        height: heightmap.height,
        data: heightmap.data.iter().map(|&h| h < sea_level).collect(),
    }
}

/// Сглаживает маску мажоритарным фильтром 3×3
///
/// Каждый проход считается целиком по маске предыдущего прохода (не на месте):
/// клетка становится водой, если в её окрестности 3×3 (обрезанной на краях,
/// без заворота) не меньше `neighbor_threshold` водяных клеток из 9.
#[must_use]
pub fn smooth_sea_mask(mask: &SeaMask, iterations: u32, neighbor_threshold: u32) -> SeaMask {
    let width = mask.width as i32;
    let height = mask.height as i32;
    let mut curr = mask.clone();

    for _ in 0..iterations {
        let mut next = curr.clone();
        for y in 0..height {
            for x in 0..width {
                let mut count = 0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let nx = x + dx;
                        let ny = y + dy;
                        if curr.in_bounds(nx, ny) && curr.get(nx as u32, ny as u32) {
                            count += 1;
                        }
                    }
                }
                next.set(x as u32, y as u32, count >= neighbor_threshold);
            }
        }
        curr = next;
    }
    curr
}
