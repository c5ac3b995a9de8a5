// src/world.rs
//! Сборка мира: полный конвейер генерации
//!
//! Этапы вызываются в порядке зависимостей: высоты → море и влажность →
//! биомы → гидрология → поселения → регионы → дороги. Каждый этап — чистая
//! функция над неизменяемыми входами; результат конвейера целиком принадлежит
//! вызывающему. Любое изменение параметров означает новый полный прогон.
//!
//! Сиды этапов выводятся из базового фиксированными сдвигами, чтобы поля
//! не коррелировали: влажность +1, поселения +2, дороги +3.

use crate::biome::{BiomeMap, assign_biomes};
use crate::config::WorldGenerationParams;
use crate::error::{WorldGenError, check_dimensions};
use crate::heightmap::{Heightmap, generate_heightmap};
use crate::hydrology::{
    FlowAccumulation, FlowDirections, River, compute_flow_accumulation, compute_flow_directions,
    extract_rivers,
};
use crate::moisture::{MoistureMap, generate_moisture_map};
use crate::region::{RegionCentroid, RegionMap, compute_region_centroids, generate_region_map};
use crate::road::{Road, generate_roads};
use crate::sea::{SeaMask, generate_sea_mask, smooth_sea_mask};
use crate::settlement::{Settlement, generate_settlements};
use serde::{Deserialize, Serialize};

/// Полная модель сгенерированного мира
///
/// Все решётки имеют одинаковую форму `width × height`; после генерации
/// модель неизменяема.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldModel {
    pub heightmap: Heightmap,
    pub sea_mask: SeaMask,
    pub moisture: MoistureMap,
    pub biomes: BiomeMap,
    pub flow_directions: FlowDirections,
    pub flow_accumulation: FlowAccumulation,
    pub rivers: Vec<River>,
    pub settlements: Vec<Settlement>,
    pub region_map: RegionMap,
    pub centroids: Vec<RegionCentroid>,
    pub roads: Vec<Road>,
    /// Уровень моря, с которым считались маска и биомы
    pub sea_level: f32,
}

impl WorldModel {
    /// Сериализует модель в JSON-снимок (без потерь, см. `from_json`)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Восстанавливает модель из JSON-снимка
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Запускает весь конвейер генерации для заданных параметров
pub fn generate_world(params: &WorldGenerationParams) -> Result<WorldModel, WorldGenError> {
    check_dimensions(params.width, params.height)?;

    // 1. Высоты
    let heightmap = generate_heightmap(params.seed, params.width, params.height, &params.heightmap)?;

    // 2. Море и влажность (независимые поля)
    let raw_mask = generate_sea_mask(&heightmap, params.sea_level);
    let sea_mask = smooth_sea_mask(
        &raw_mask,
        params.sea.smooth_iterations,
        params.sea.neighbor_threshold,
    );
    let moisture = generate_moisture_map(
        params.seed.wrapping_add(1),
        params.width,
        params.height,
        &params.moisture,
    )?;

    // 3. Биомы: порог океана следует уровню моря
    let mut thresholds = params.biomes;
    thresholds.ocean_level = params.sea_level;
    let biomes = assign_biomes(&heightmap, &moisture, &thresholds)?;

    // 4. Гидрология
    let flow_directions = compute_flow_directions(&heightmap);
    let flow_accumulation = compute_flow_accumulation(&flow_directions, &heightmap)?;
    let rivers = extract_rivers(
        &flow_accumulation,
        &flow_directions,
        params.rivers.flow_threshold,
    )?;

    // 5. Поселения и регионы
    let settlements = generate_settlements(
        &heightmap,
        &biomes,
        params.sea_level,
        thresholds.mountain_level,
        &params.settlements,
        params.seed.wrapping_add(2),
    )?;
    let region_map = generate_region_map(
        params.width,
        params.height,
        &settlements,
        &params.regions.method,
    )?;
    let centroids = compute_region_centroids(&region_map);

    // 6. Дороги
    let roads = generate_roads(&settlements, &params.roads, params.seed.wrapping_add(3));

    Ok(WorldModel {
        heightmap,
        sea_mask,
        moisture,
        biomes,
        flow_directions,
        flow_accumulation,
        rivers,
        settlements,
        region_map,
        centroids,
        roads,
        sea_level: params.sea_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettlementSettings;

    fn small_params() -> WorldGenerationParams {
        WorldGenerationParams {
            seed: 123,
            width: 32,
            height: 32,
            settlements: SettlementSettings {
                count: 5,
                min_distance: 4.0,
                biome_weights: None,
            },
            ..WorldGenerationParams::default()
        }
    }

    #[test]
    fn test_pipeline_deterministic() {
        let params = small_params();
        let a = generate_world(&params).unwrap();
        let b = generate_world(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_all_grids_share_shape() {
        let world = generate_world(&small_params()).unwrap();
        assert!(world.heightmap.same_shape(&world.sea_mask));
        assert!(world.heightmap.same_shape(&world.moisture));
        assert!(world.heightmap.same_shape(&world.biomes));
        assert!(world.heightmap.same_shape(&world.flow_directions));
        assert!(world.heightmap.same_shape(&world.flow_accumulation));
        assert!(world.heightmap.same_shape(&world.region_map));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let world = generate_world(&small_params()).unwrap();
        let json = world.to_json().unwrap();
        let restored = WorldModel::from_json(&json).unwrap();
        assert_eq!(world, restored);
    }

    #[test]
    fn test_invalid_dimensions_rejected_up_front() {
        let mut params = small_params();
        params.width = 0;
        assert!(matches!(
            generate_world(&params),
            Err(WorldGenError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_unsupported_region_method_propagates() {
        let mut params = small_params();
        params.regions.method = "grid".to_string();
        assert_eq!(
            generate_world(&params).unwrap_err(),
            WorldGenError::UnsupportedMethod("grid".to_string())
        );
    }

    #[test]
    fn test_different_seed_changes_world() {
        let a = generate_world(&small_params()).unwrap();
        let mut params = small_params();
        params.seed = 321;
        let b = generate_world(&params).unwrap();
        assert_ne!(a.heightmap.data, b.heightmap.data);
    }
}
