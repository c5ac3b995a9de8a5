// src/region.rs
//! Разбиение карты на регионы и их центроиды
//!
//! Каждая клетка приписывается ближайшему поселению по квадрату евклидова
//! расстояния (диаграмма Вороного на решётке). Сложность O(клетки × поселения):
//! для карт в сотни клеток по стороне этого достаточно, при масштабировании
//! кандидат на пространственный индекс.

use crate::error::WorldGenError;
use crate::grid::Grid;
use crate::settlement::Settlement;
use serde::{Deserialize, Serialize};

/// Карта регионов: индекс ближайшего поселения, `-1` если поселений нет
pub type RegionMap = Grid<i32>;

/// Центроид региона: среднее арифметическое координат его клеток
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionCentroid {
    pub region_id: i32,
    pub x: f32,
    pub y: f32,
}

/// Строит карту регионов по ближайшему поселению
///
/// Ничья по расстоянию разрешается в пользу меньшего индекса поселения:
/// линейный проход со строгим `<` оставляет первого найденного.
/// Единственный поддерживаемый метод — "voronoi".
pub fn generate_region_map(
    width: u32,
    height: u32,
    towns: &[Settlement],
    method: &str,
) -> Result<RegionMap, WorldGenError> {
    if method != "voronoi" {
        return Err(WorldGenError::UnsupportedMethod(method.to_string()));
    }

    let mut map = RegionMap::new_with(width, height, -1_i32);
    for y in 0..height {
        for x in 0..width {
            let mut min_d2 = i64::MAX;
            let mut min_idx = -1_i32;
            for (i, town) in towns.iter().enumerate() {
                let dx = x as i64 - town.x as i64;
                let dy = y as i64 - town.y as i64;
                let d2 = dx * dx + dy * dy;
                if d2 < min_d2 {
                    min_d2 = d2;
                    min_idx = i as i32;
                }
            }
            map.set(x, y, min_idx);
        }
    }
    Ok(map)
}

/// Считает центроиды всех регионов карты
///
/// Клетки без региона (индекс -1 при пустом списке поселений) не учитываются.
#[must_use]
pub fn compute_region_centroids(region_map: &RegionMap) -> Vec<RegionCentroid> {
    let region_count = region_map
        .data
        .iter()
        .copied()
        .max()
        .map_or(0, |max| (max + 1).max(0) as usize);

    let mut sums = vec![(0.0_f64, 0.0_f64); region_count];
    let mut counts = vec![0_u64; region_count];

    for y in 0..region_map.height {
        for x in 0..region_map.width {
            let id = region_map.get(x, y);
            if id < 0 {
                continue;
            }
            sums[id as usize].0 += f64::from(x);
            sums[id as usize].1 += f64::from(y);
            counts[id as usize] += 1;
        }
    }

    sums.iter()
        .zip(counts.iter())
        .enumerate()
        .filter(|&(_, (_, &count))| count > 0)
        .map(|(id, (&(sx, sy), &count))| RegionCentroid {
            region_id: id as i32,
            x: (sx / count as f64) as f32,
            y: (sy / count as f64) as f32,
        })
        .collect()
}
