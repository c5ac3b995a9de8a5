// src/config.rs
//! Конфигурация генерации мира
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией карты:
//! - Настройки шума для высот и влажности
//! - Уровень моря и сглаживание береговой линии
//! - Пороги классификации биомов
//! - Параметры рек, поселений, регионов и дорог
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.
//! Любое изменение любого поля означает полный перезапуск конвейера: частичного пересчёта нет.

use crate::biome::Biome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

/// Радиальное затухание высоты от центра карты
///
/// `Circular` превращает карту в остров: шум умножается на коэффициент,
/// убывающий с нормированным расстоянием от центра.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GradientFalloff {
    #[default]
    Circular,
    None,
}

/// Кривая затухания для `GradientFalloff::Circular`
///
/// Для нормированного расстояния `d ∈ [0, 1]`:
/// - `Linear` → `1 - d`
/// - `Smooth` → `1 - (3d² - 2d³)` (smoothstep)
/// - `Power`  → `(1 - d)²`
///
/// Результат всегда ограничен снизу нулём.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FalloffCurve {
    #[default]
    Linear,
    Smooth,
    Power,
}

/// Параметры многооктавного когерентного шума
///
/// Каждая следующая октава умножает частоту на `lacunarity`
/// и амплитуду на `persistence`; вклады суммируются.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NoiseSettings {
    /// Число октав (слоёв шума), минимум 1
    #[serde(default = "default_octaves")]
    pub octaves: u32,

    /// Базовая частота шума
    #[serde(default = "default_frequency")]
    pub frequency: f32,

    /// Базовая амплитуда первой октавы
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,

    /// Множитель амплитуды на октаву (0..=1)
    #[serde(default = "default_persistence")]
    pub persistence: f32,

    /// Множитель частоты на октаву (>= 1)
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
}

fn default_octaves() -> u32 {
    4
}
fn default_frequency() -> f32 {
    1.0
}
fn default_amplitude() -> f32 {
    1.0
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 1.0,
            amplitude: 1.0,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// Настройки карты высот: шум плюс радиальное затухание
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HeightmapSettings {
    #[serde(default)]
    pub noise: NoiseSettings,

    /// Тип затухания (по умолчанию `Circular` — карта-остров)
    #[serde(default)]
    pub gradient_falloff: GradientFalloff,

    /// Кривая затухания (учитывается только при `Circular`)
    #[serde(default)]
    pub falloff_curve: FalloffCurve,
}

/// Сглаживание маски моря мажоритарным фильтром 3×3
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeaSettings {
    /// Число проходов фильтра
    #[serde(default = "default_smooth_iterations")]
    pub smooth_iterations: u32,

    /// Минимум «морских» клеток из 9 (включая саму клетку), чтобы клетка стала морем
    #[serde(default = "default_neighbor_threshold")]
    pub neighbor_threshold: u32,
}

fn default_smooth_iterations() -> u32 {
    2
}
fn default_neighbor_threshold() -> u32 {
    5
}

impl Default for SeaSettings {
    fn default() -> Self {
        Self {
            smooth_iterations: 2,
            neighbor_threshold: 5,
        }
    }
}

/// Пороги классификации биомов
///
/// Дерево решений вычисляется строго по порядку: океан, пляж, горы, тундра/снег,
/// затем ветви по влажности. Инварианты: `ocean_level < beach_level < mountain_level`,
/// `tundra_level` между пляжем и горами, `desert_moisture < grassland_moisture < forest_moisture`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BiomeThresholds {
    #[serde(default = "default_ocean_level")]
    pub ocean_level: f32,
    #[serde(default = "default_beach_level")]
    pub beach_level: f32,
    #[serde(default = "default_mountain_level")]
    pub mountain_level: f32,
    #[serde(default = "default_tundra_level")]
    pub tundra_level: f32,
    #[serde(default = "default_desert_moisture")]
    pub desert_moisture: f32,
    #[serde(default = "default_grassland_moisture")]
    pub grassland_moisture: f32,
    #[serde(default = "default_forest_moisture")]
    pub forest_moisture: f32,
}

fn default_ocean_level() -> f32 {
    0.2
}
fn default_beach_level() -> f32 {
    0.25
}
fn default_mountain_level() -> f32 {
    0.8
}
fn default_tundra_level() -> f32 {
    0.6
}
fn default_desert_moisture() -> f32 {
    0.2
}
fn default_grassland_moisture() -> f32 {
    0.4
}
fn default_forest_moisture() -> f32 {
    0.7
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            ocean_level: 0.2,
            beach_level: 0.25,
            mountain_level: 0.8,
            tundra_level: 0.6,
            desert_moisture: 0.2,
            grassland_moisture: 0.4,
            forest_moisture: 0.7,
        }
    }
}

/// Настройки выделения рек
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiverSettings {
    /// Минимальный накопленный сток, с которого клетка считается рекой
    #[serde(default = "default_flow_threshold")]
    pub flow_threshold: u32,
}

fn default_flow_threshold() -> u32 {
    20
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self { flow_threshold: 20 }
    }
}

/// Настройки размещения поселений
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementSettings {
    /// Желаемое число поселений (фактическое может быть меньше)
    #[serde(default = "default_settlement_count")]
    pub count: usize,

    /// Минимальное евклидово расстояние между поселениями
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,

    /// Веса биомов для выбора места: вес 0 исключает биом полностью.
    /// Без таблицы все пригодные клетки равновероятны.
    #[serde(default)]
    pub biome_weights: Option<HashMap<Biome, f32>>,
}

fn default_settlement_count() -> usize {
    20
}
fn default_min_distance() -> f32 {
    50.0
}

impl Default for SettlementSettings {
    fn default() -> Self {
        Self {
            count: 20,
            min_distance: 50.0,
            biome_weights: None,
        }
    }
}

/// Настройки разбиения карты на регионы
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionSettings {
    /// Метод разбиения; поддерживается только "voronoi"
    #[serde(default = "default_region_method")]
    pub method: String,
}

fn default_region_method() -> String {
    "voronoi".to_string()
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            method: "voronoi".to_string(),
        }
    }
}

/// Настройки дорожной сети
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RoadSettings {
    /// Вероятность добавить ребро сверх минимального остова (на каждое ребро независимо)
    #[serde(default = "default_extra_edge_probability")]
    pub extra_edge_probability: f32,

    /// Максимальное смещение промежуточных точек дороги по каждой оси
    #[serde(default = "default_jitter")]
    pub jitter: f32,

    /// Число отрезков интерполяции на ребро (точек будет `steps + 1`)
    #[serde(default = "default_road_steps")]
    pub steps: u32,
}

fn default_extra_edge_probability() -> f32 {
    0.1
}
fn default_jitter() -> f32 {
    1.0
}
fn default_road_steps() -> u32 {
    8
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self {
            extra_edge_probability: 0.1,
            jitter: 1.0,
            steps: 8,
        }
    }
}

/// Основные параметры генерации мира
///
/// Полная конфигурация для генерации одной карты. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGenerationParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Ширина карты в клетках (по умолчанию 500)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в клетках (по умолчанию 500)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Уровень моря: клетки ниже него — вода (по умолчанию 0.2)
    #[serde(default = "default_sea_level")]
    pub sea_level: f32,

    /// Настройки карты высот
    #[serde(default)]
    pub heightmap: HeightmapSettings,

    /// Настройки шума влажности (независимый сид: базовый + 1)
    #[serde(default)]
    pub moisture: NoiseSettings,

    /// Сглаживание береговой линии
    #[serde(default)]
    pub sea: SeaSettings,

    /// Пороги биомов; `ocean_level` при генерации заменяется на `sea_level`
    #[serde(default)]
    pub biomes: BiomeThresholds,

    /// Настройки рек
    #[serde(default)]
    pub rivers: RiverSettings,

    /// Настройки поселений
    #[serde(default)]
    pub settlements: SettlementSettings,

    /// Настройки регионов
    #[serde(default)]
    pub regions: RegionSettings,

    /// Настройки дорог
    #[serde(default)]
    pub roads: RoadSettings,
}

impl WorldGenerationParams {
    /// Загружает параметры из TOML-файла
    ///
    /// # Аргументы
    /// * `path` - путь к файлу конфигурации в формате TOML
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден или содержит недопустимый формат.
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = 123
    /// width = 500
    /// height = 500
    /// sea_level = 0.2
    /// ```
    pub fn from_toml_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let params: Self = toml::from_str(&contents)?;
        Ok(params)
    }
}

fn default_width() -> u32 {
    500
}
fn default_height() -> u32 {
    500
}
fn default_sea_level() -> f32 {
    0.2
}

impl Default for WorldGenerationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 500,
            height: 500,
            sea_level: 0.2,
            heightmap: HeightmapSettings::default(),
            moisture: NoiseSettings::default(),
            sea: SeaSettings::default(),
            biomes: BiomeThresholds::default(),
            rivers: RiverSettings::default(),
            settlements: SettlementSettings::default(),
            regions: RegionSettings::default(),
            roads: RoadSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_thresholds() {
        let thresholds = BiomeThresholds::default();
        assert_eq!(thresholds.ocean_level, 0.2);
        assert_eq!(thresholds.beach_level, 0.25);
        assert_eq!(thresholds.mountain_level, 0.8);
        assert_eq!(thresholds.tundra_level, 0.6);
        assert_eq!(thresholds.desert_moisture, 0.2);
        assert_eq!(thresholds.grassland_moisture, 0.4);
        assert_eq!(thresholds.forest_moisture, 0.7);
    }

    #[test]
    fn test_params_from_minimal_toml() {
        let params: WorldGenerationParams = toml::from_str("seed = 42").unwrap();
        assert_eq!(params.seed, 42);
        assert_eq!(params.width, 500);
        assert_eq!(params.sea_level, 0.2);
        assert_eq!(params.roads.steps, 8);
        assert_eq!(params.regions.method, "voronoi");
    }
}
