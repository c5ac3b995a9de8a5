// src/settlement.rs
//! Размещение поселений
//!
//! Кандидаты — клетки суши не выше гор; порядок кандидатов задаёт взвешенная
//! случайная выборка без возвращения (схема Эфраимидиса–Спиракиса), после чего
//! жадный проход принимает точки с соблюдением минимальной дистанции.

use crate::biome::BiomeMap;
use crate::config::SettlementSettings;
use crate::error::WorldGenError;
use crate::heightmap::Heightmap;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Поселение: точка в координатах решётки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub x: u32,
    pub y: u32,
}

struct Candidate {
    x: u32,
    y: u32,
    key: f32,
}

/// Размещает поселения на пригодных клетках
///
/// Пригодна клетка с высотой `sea_level <= h < mountain_level`; вес биома 0
/// исключает клетку. Ключ кандидата — `u^(1/вес)` для равномерного `u ∈ [0, 1)`:
/// сортировка по убыванию ключа выводит тяжёлые клетки вперёд чаще. Жадный
/// проход принимает кандидата, только если он не ближе `min_distance` ко всем
/// уже принятым; нехватка кандидатов — не ошибка, вернётся сколько есть.
pub fn generate_settlements(
    heightmap: &Heightmap,
    biome_map: &BiomeMap,
    sea_level: f32,
    mountain_level: f32,
    settings: &SettlementSettings,
    seed: u64,
) -> Result<Vec<Settlement>, WorldGenError> {
    if !heightmap.same_shape(biome_map) {
        return Err(WorldGenError::DimensionMismatch {
            expected: (heightmap.width, heightmap.height),
            actual: (biome_map.width, biome_map.height),
        });
    }

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let mut candidates: Vec<Candidate> = Vec::new();

    for y in 0..heightmap.height {
        for x in 0..heightmap.width {
            let elev = heightmap.get(x, y);
            if elev < sea_level || elev >= mountain_level {
                continue;
            }
            let weight = match &settings.biome_weights {
                Some(weights) => weights.get(&biome_map.get(x, y)).copied().unwrap_or(1.0),
                None => 1.0,
            };
            if weight <= 0.0 {
                continue;
            }
            let u: f32 = rng.r#gen();
            candidates.push(Candidate {
                x,
                y,
                key: u.powf(1.0 / weight),
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.key
            .partial_cmp(&a.key)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let min_d2 = settings.min_distance * settings.min_distance;
    let mut accepted: Vec<Settlement> = Vec::new();

    for candidate in &candidates {
        if accepted.len() >= settings.count {
            break;
        }
        let ok = accepted.iter().all(|p| {
            let dx = p.x as f32 - candidate.x as f32;
            let dy = p.y as f32 - candidate.y as f32;
            dx * dx + dy * dy >= min_d2
        });
        if ok {
            accepted.push(Settlement {
                x: candidate.x,
                y: candidate.y,
            });
        }
    }

    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{Biome, assign_biomes};
    use crate::config::BiomeThresholds;
    use crate::moisture::MoistureMap;
    use std::collections::HashMap;

    fn flat_world(width: u32, height: u32, elevation: f32) -> (Heightmap, BiomeMap) {
        let heightmap = Heightmap::new_with(width, height, elevation);
        let moisture = MoistureMap::new_with(width, height, 0.5);
        let biomes = assign_biomes(&heightmap, &moisture, &BiomeThresholds::default()).unwrap();
        (heightmap, biomes)
    }

    #[test]
    fn test_min_distance_respected() {
        let (heightmap, biomes) = flat_world(30, 30, 0.5);
        let settings = SettlementSettings {
            count: 50,
            min_distance: 6.0,
            biome_weights: None,
        };
        let towns = generate_settlements(&heightmap, &biomes, 0.2, 0.8, &settings, 77).unwrap();
        assert!(!towns.is_empty());
        for (i, a) in towns.iter().enumerate() {
            for b in &towns[i + 1..] {
                let dx = a.x as f32 - b.x as f32;
                let dy = a.y as f32 - b.y as f32;
                assert!((dx * dx + dy * dy).sqrt() >= 6.0);
            }
        }
    }

    #[test]
    fn test_count_is_upper_bound() {
        let (heightmap, biomes) = flat_world(20, 20, 0.5);
        let settings = SettlementSettings {
            count: 5,
            min_distance: 1.0,
            biome_weights: None,
        };
        let towns = generate_settlements(&heightmap, &biomes, 0.2, 0.8, &settings, 1).unwrap();
        assert_eq!(towns.len(), 5);

        // Дистанция больше карты: поместится только одно поселение
        let sparse = SettlementSettings {
            count: 5,
            min_distance: 100.0,
            biome_weights: None,
        };
        let towns = generate_settlements(&heightmap, &biomes, 0.2, 0.8, &sparse, 1).unwrap();
        assert_eq!(towns.len(), 1);
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let (heightmap, biomes) = flat_world(25, 25, 0.5);
        let settings = SettlementSettings::default();
        let a = generate_settlements(&heightmap, &biomes, 0.2, 0.8, &settings, 42).unwrap();
        let b = generate_settlements(&heightmap, &biomes, 0.2, 0.8, &settings, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sea_and_mountains_excluded() {
        let (heightmap, biomes) = flat_world(10, 10, 0.1);
        let settings = SettlementSettings::default();
        let towns = generate_settlements(&heightmap, &biomes, 0.2, 0.8, &settings, 3).unwrap();
        assert!(towns.is_empty());

        let (high, high_biomes) = flat_world(10, 10, 0.9);
        let towns = generate_settlements(&high, &high_biomes, 0.2, 0.8, &settings, 3).unwrap();
        assert!(towns.is_empty());
    }

    #[test]
    fn test_zero_weight_biome_never_chosen() {
        // Вся карта — лес; вес 0 выключает его полностью
        let (heightmap, biomes) = flat_world(15, 15, 0.5);
        assert!(biomes.data.iter().all(|&b| b == Biome::Forest));

        let mut weights = HashMap::new();
        weights.insert(Biome::Forest, 0.0);
        let settings = SettlementSettings {
            count: 10,
            min_distance: 1.0,
            biome_weights: Some(weights),
        };
        let towns = generate_settlements(&heightmap, &biomes, 0.2, 0.8, &settings, 5).unwrap();
        assert!(towns.is_empty());
    }
}
