// src/moisture.rs
//! Генерация карты влажности
//!
//! Тот же многооктавный шум, что и для высот, но без радиального затухания
//! и с независимым сидом: конвейер передаёт сюда базовый сид + 1, чтобы поля
//! высоты и влажности не коррелировали.

use crate::config::NoiseSettings;
use crate::error::{WorldGenError, check_dimensions};
use crate::grid::Grid;
use crate::heightmap::{fractal_noise_2d, make_noise, normalize_field};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Карта влажности: значения в [0, 1]
pub type MoistureMap = Grid<f32>;

/// Генерирует нормализованную карту влажности
pub fn generate_moisture_map(
    seed: u64,
    width: u32,
    height: u32,
    settings: &NoiseSettings,
) -> Result<MoistureMap, WorldGenError> {
    check_dimensions(width, height)?;

    let noise = make_noise(seed);
    let width_f = width as f32;
    let height_f = height as f32;

    let sample = |i: usize| {
        let nx = (i % width as usize) as f32 / width_f - 0.5;
        let ny = (i / width as usize) as f32 / height_f - 0.5;
        fractal_noise_2d(&noise, nx, ny, settings)
    };

    let total = (width * height) as usize;
    #[cfg(feature = "parallel")]
    let mut data: Vec<f32> = (0..total).into_par_iter().map(sample).collect();
    #[cfg(not(feature = "parallel"))]
    let mut data: Vec<f32> = (0..total).map(sample).collect();

    normalize_field(&mut data);

    Ok(MoistureMap {
        width,
        height,
        data,
    })
}
