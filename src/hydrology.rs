// src/hydrology.rs
//! Гидрология: направление стока, накопление потока, выделение рек
//!
//! Направление стока — наискорейший спуск к строго более низкому из восьми
//! соседей; накопление — топологический проход по клеткам от высоких к низким;
//! реки — нисходящие пути по клеткам с накоплением выше порога.

use crate::error::WorldGenError;
use crate::grid::Grid;
use crate::heightmap::Heightmap;
use std::collections::HashMap;

/// Направления стока: `-1` — сток (нет более низкого соседа), `0..7` — индекс соседа
pub type FlowDirections = Grid<i8>;

/// Накопленный поток: каждая клетка начинает с 1 и отдаёт накопленное вниз по стоку
pub type FlowAccumulation = Grid<u32>;

/// Река: связный нисходящий путь по клеткам решётки
pub type River = Vec<(u32, u32)>;

/// Фиксированный порядок обхода восьми соседей: N, NE, E, SE, S, SW, W, NW
pub const DIRECTIONS: [(i32, i32); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

/// Вычисляет направление стока для каждой клетки
///
/// Соседи проверяются в порядке `DIRECTIONS`; минимум ищется строгим `<`,
/// поэтому при равных высотах побеждает первый сосед по порядку обхода.
/// Между клетками равной высоты сток невозможен, так что граф стока ацикличен.
#[must_use]
pub fn compute_flow_directions(heightmap: &Heightmap) -> FlowDirections {
    let width = heightmap.width;
    let height = heightmap.height;
    let mut flow_dir = FlowDirections::new_with(width, height, -1_i8);

    for y in 0..height {
        for x in 0..width {
            let mut min_elev = heightmap.get(x, y);
            let mut min_dir = -1_i8;
            for (d, &(dx, dy)) in DIRECTIONS.iter().enumerate() {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if heightmap.in_bounds(nx, ny) {
                    let n_elev = heightmap.get(nx as u32, ny as u32);
                    if n_elev < min_elev {
                        min_elev = n_elev;
                        min_dir = d as i8;
                    }
                }
            }
            flow_dir.set(x, y, min_dir);
        }
    }
    flow_dir
}

/// Вычисляет накопление потока
///
/// Каждая клетка стартует с накоплением 1. Клетки обрабатываются по убыванию
/// высоты, так что любая клетка отдаёт своё накопление вниз раньше, чем
/// обрабатывается её приёмник.
pub fn compute_flow_accumulation(
    flow_dir: &FlowDirections,
    heightmap: &Heightmap,
) -> Result<FlowAccumulation, WorldGenError> {
    if !flow_dir.same_shape(heightmap) {
        return Err(WorldGenError::DimensionMismatch {
            expected: (flow_dir.width, flow_dir.height),
            actual: (heightmap.width, heightmap.height),
        });
    }

    let width = flow_dir.width as usize;
    let mut acc = FlowAccumulation::new_with(flow_dir.width, flow_dir.height, 1_u32);

    // Сортируем индексы от вершин к низинам
    let mut indices: Vec<usize> = (0..heightmap.data.len()).collect();
    indices.sort_by(|&a, &b| {
        heightmap.data[b]
            .partial_cmp(&heightmap.data[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &idx in &indices {
        let dir = flow_dir.data[idx];
        if dir < 0 {
            continue;
        }
        let x = (idx % width) as i32;
        let y = (idx / width) as i32;
        let (dx, dy) = DIRECTIONS[dir as usize];
        let nx = x + dx;
        let ny = y + dy;
        if flow_dir.in_bounds(nx, ny) {
            let nidx = (ny as usize) * width + nx as usize;
            acc.data[nidx] += acc.data[idx];
        }
    }
    Ok(acc)
}

/// Выделяет реки как ломаные по клеткам с накоплением не ниже порога
///
/// От каждой непосещённой пороговой клетки путь идёт вниз по стоку до стока,
/// границы карты или уже посещённой клетки (она дописывается, если ещё не
/// входила ни в одну реку). Пути из одной клетки отбрасываются; пересекающиеся
/// реки сливаются в одну.
pub fn extract_rivers(
    flow_acc: &FlowAccumulation,
    flow_dir: &FlowDirections,
    threshold: u32,
) -> Result<Vec<River>, WorldGenError> {
    if !flow_acc.same_shape(flow_dir) {
        return Err(WorldGenError::DimensionMismatch {
            expected: (flow_acc.width, flow_acc.height),
            actual: (flow_dir.width, flow_dir.height),
        });
    }

    let width = flow_acc.width;
    let height = flow_acc.height;
    let mut visited = Grid::new_with(width, height, false);
    let mut rivers: Vec<River> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if flow_acc.get(x, y) < threshold || visited.get(x, y) {
                continue;
            }

            let mut polyline: River = Vec::new();
            let mut cx = x as i32;
            let mut cy = y as i32;

            while visited.in_bounds(cx, cy)
                && flow_dir.get(cx as u32, cy as u32) >= 0
                && !visited.get(cx as u32, cy as u32)
            {
                polyline.push((cx as u32, cy as u32));
                visited.set(cx as u32, cy as u32, true);
                let (dx, dy) = DIRECTIONS[flow_dir.get(cx as u32, cy as u32) as usize];
                cx += dx;
                cy += dy;
            }

            // Замыкающая клетка (сток или место слияния), если ещё свободна
            if visited.in_bounds(cx, cy) && !visited.get(cx as u32, cy as u32) {
                polyline.push((cx as u32, cy as u32));
                visited.set(cx as u32, cy as u32, true);
            }

            if polyline.len() > 1 {
                rivers.push(polyline);
            }
        }
    }

    Ok(merge_overlapping(rivers))
}

/// Сливает пересекающиеся реки за один проход по клеткам
///
/// Владелец каждой клетки отслеживается в хеш-карте; река, задевшая чужие
/// клетки, поглощает всех затронутых владельцев. Результат совпадает с
/// повторным попарным слиянием: точки объединяются без дубликатов.
fn merge_overlapping(rivers: Vec<River>) -> Vec<River> {
    let mut owner: HashMap<(u32, u32), usize> = HashMap::new();
    let mut pools: Vec<Option<River>> = Vec::with_capacity(rivers.len());

    for river in rivers {
        let mut ids: Vec<usize> = river.iter().filter_map(|c| owner.get(c).copied()).collect();
        ids.sort_unstable();
        ids.dedup();

        let target = match ids.first() {
            Some(&id) => id,
            None => {
                pools.push(Some(Vec::new()));
                pools.len() - 1
            }
        };

        // Поглощаем остальных пересёкшихся владельцев
        for &id in ids.iter().skip(1) {
            if let Some(absorbed) = pools[id].take() {
                for &cell in &absorbed {
                    owner.insert(cell, target);
                }
                if let Some(pool) = pools[target].as_mut() {
                    pool.extend(absorbed);
                }
            }
        }

        // Дописываем собственные клетки реки, ещё не учтённые в целевой
        for &cell in &river {
            if owner.get(&cell) != Some(&target) {
                owner.insert(cell, target);
                if let Some(pool) = pools[target].as_mut() {
                    pool.push(cell);
                }
            }
        }
    }

    pools.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slope_2x2() -> Heightmap {
        Heightmap {
            width: 2,
            height: 2,
            data: vec![2.0, 1.0, 1.0, 0.0],
        }
    }

    #[test]
    fn test_flow_direction_tie_break() {
        // Порядок обхода N,NE,E,SE,S,SW,W,NW и строгое `<`:
        // у (0,0) соседи E и S одинаково ниже, но SE ниже всех
        let dirs = compute_flow_directions(&slope_2x2());
        assert_eq!(dirs.get(0, 0), 3); // SE
        assert_eq!(dirs.get(1, 0), 4); // S
        assert_eq!(dirs.get(0, 1), 2); // E
        assert_eq!(dirs.get(1, 1), -1); // сток
    }

    #[test]
    fn test_accumulation_collects_at_sink() {
        let heightmap = slope_2x2();
        let dirs = compute_flow_directions(&heightmap);
        let acc = compute_flow_accumulation(&dirs, &heightmap).unwrap();
        assert_eq!(acc.get(1, 1), 4);
        assert_eq!(acc.get(0, 0), 1);
    }

    #[test]
    fn test_accumulation_conserved_at_sinks() {
        // Каждая единица стока доходит ровно до одного стока
        let heightmap = Heightmap {
            width: 4,
            height: 3,
            data: vec![
                0.9, 0.8, 0.7, 0.6, //
                0.5, 0.4, 0.3, 0.2, //
                0.6, 0.5, 0.4, 0.1,
            ],
        };
        let dirs = compute_flow_directions(&heightmap);
        let acc = compute_flow_accumulation(&dirs, &heightmap).unwrap();

        let sink_total: u32 = dirs
            .data
            .iter()
            .zip(acc.data.iter())
            .filter(|&(&d, _)| d < 0)
            .map(|(_, &a)| a)
            .sum();
        assert_eq!(sink_total, 12);
    }

    #[test]
    fn test_river_above_threshold() {
        let heightmap = slope_2x2();
        let dirs = compute_flow_directions(&heightmap);
        let acc = compute_flow_accumulation(&dirs, &heightmap).unwrap();

        let rivers = extract_rivers(&acc, &dirs, 1).unwrap();
        assert_eq!(rivers, vec![vec![(0, 0), (1, 1)]]);
    }

    #[test]
    fn test_threshold_above_all_flow() {
        let heightmap = slope_2x2();
        let dirs = compute_flow_directions(&heightmap);
        let acc = compute_flow_accumulation(&dirs, &heightmap).unwrap();

        let rivers = extract_rivers(&acc, &dirs, 5).unwrap();
        assert!(rivers.is_empty());
    }

    #[test]
    fn test_overlapping_polylines_merge() {
        let merged = merge_overlapping(vec![
            vec![(0, 0), (1, 1), (2, 2)],
            vec![(5, 5), (6, 6)],
            vec![(9, 9), (1, 1)],
        ]);
        assert_eq!(merged.len(), 2);
        // Первая и третья делят клетку (1,1) и становятся одной рекой
        let with_shared = merged.iter().find(|r| r.contains(&(0, 0))).unwrap();
        assert!(with_shared.contains(&(9, 9)));
        assert_eq!(with_shared.len(), 4);
    }

    #[test]
    fn test_mismatched_grids_rejected() {
        let heightmap = slope_2x2();
        let dirs = compute_flow_directions(&heightmap);
        let other = Heightmap::new_with(3, 3, 0.0);
        assert!(compute_flow_accumulation(&dirs, &other).is_err());
    }
}
