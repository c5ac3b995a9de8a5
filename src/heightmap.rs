// src/heightmap.rs
//! Генерация карты высот
//!
//! Многооктавный когерентный шум (OpenSimplex2) с опциональным радиальным
//! затуханием от центра карты и глобальной минимакс-нормализацией в [0, 1].
//! Одинаковые (сид, настройки, размеры) всегда дают побитово идентичный результат.

use crate::config::{FalloffCurve, GradientFalloff, HeightmapSettings, NoiseSettings};
use crate::error::{WorldGenError, check_dimensions};
use crate::grid::Grid;
use fastnoise_lite::{FastNoiseLite, NoiseType};
use image::{ImageBuffer, Luma};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Карта высот: значения от 0.0 (глубокий океан) до 1.0 (высокие горы)
pub type Heightmap = Grid<f32>;

/// Настраивает источник шума под заданный сид
///
/// Фрактальность не включаем: октавы суммируются явно в `fractal_noise_2d`,
/// чтобы амплитуда, persistence и lacunarity управлялись напрямую.
pub(crate) fn make_noise(seed: u64) -> FastNoiseLite {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(seed as i32));
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(1.0));
    noise
}

/// Сумма октав шума в точке (nx, ny), координаты нормированы к [-0.5, 0.5]
pub(crate) fn fractal_noise_2d(noise: &FastNoiseLite, nx: f32, ny: f32, s: &NoiseSettings) -> f32 {
    let mut value = 0.0;
    let mut amp = s.amplitude;
    let mut freq = s.frequency;
    for _ in 0..s.octaves.max(1) {
        value += noise.get_noise_2d(nx * freq, ny * freq) * amp;
        amp *= s.persistence;
        freq *= s.lacunarity;
    }
    value
}

/// Минимакс-нормализация поля в [0, 1]
///
/// Вырожденное поле (max == min) нельзя делить на размах: вместо этого
/// вся карта становится константой 0.5.
pub(crate) fn normalize_field(data: &mut [f32]) {
    let min = data.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max = data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    if max > min {
        for v in data.iter_mut() {
            *v = (*v - min) / (max - min);
        }
    } else {
        data.fill(0.5);
    }
}

/// Генерирует нормализованную карту высот
///
/// Для каждой клетки суммируются октавы шума; при `GradientFalloff::Circular`
/// сырое значение умножается на коэффициент затухания от нормированного
/// расстояния до центра (кривая — `falloff_curve`, не бывает отрицательной).
/// Затухание применяется до нормализации.
pub fn generate_heightmap(
    seed: u64,
    width: u32,
    height: u32,
    settings: &HeightmapSettings,
) -> Result<Heightmap, WorldGenError> {
    check_dimensions(width, height)?;

    let noise = make_noise(seed);
    let width_f = width as f32;
    let height_f = height as f32;

    // Центр для радиального градиента
    let cx = width_f / 2.0;
    let cy = height_f / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();

    let sample = |i: usize| {
        let x = (i % width as usize) as f32;
        let y = (i / width as usize) as f32;
        let nx = x / width_f - 0.5;
        let ny = y / height_f - 0.5;

        let mut value = fractal_noise_2d(&noise, nx, ny, &settings.noise);

        if settings.gradient_falloff == GradientFalloff::Circular {
            let dx = x - cx;
            let dy = y - cy;
            let d = (dx * dx + dy * dy).sqrt() / max_dist;
            let falloff = match settings.falloff_curve {
                FalloffCurve::Linear => 1.0 - d,
                FalloffCurve::Smooth => 1.0 - (3.0 * d * d - 2.0 * d * d * d),
                FalloffCurve::Power => (1.0 - d) * (1.0 - d),
            };
            value *= falloff.max(0.0);
        }
        value
    };

    let total = (width * height) as usize;
    #[cfg(feature = "parallel")]
    let mut data: Vec<f32> = (0..total).into_par_iter().map(sample).collect();
    #[cfg(not(feature = "parallel"))]
    let mut data: Vec<f32> = (0..total).map(sample).collect();

    normalize_field(&mut data);

    Ok(Heightmap {
        width,
        height,
        data,
    })
}

impl Grid<f32> {
    pub fn to_grayscale_image(&self) -> Vec<u8> {
        #[cfg(feature = "parallel")]
        let iter = self.data.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = self.data.iter();
        iter.map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8).collect()
    }

    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.to_grayscale_image())
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        Ok(())
    }
}
