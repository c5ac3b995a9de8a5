// src/road.rs
//! Дорожная сеть между поселениями
//!
//! Полный граф поселений с евклидовыми весами, минимальный остов по Крускалу
//! (union-find из petgraph), независимые добавочные рёбра с заданной
//! вероятностью. Каждое принятое ребро разворачивается в ломаную с дрожанием
//! промежуточных точек — эффект нарисованной от руки дороги.

use crate::config::RoadSettings;
use crate::grid::Point;
use crate::settlement::Settlement;
use petgraph::unionfind::UnionFind;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Дорога: ломаная между двумя поселениями
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub path: Vec<Point>,
}

struct Edge {
    a: usize,
    b: usize,
    d: f32,
}

/// Строит дорожную сеть
///
/// Рёбра остова выбираются по возрастанию веса; при равных весах побеждает
/// ребро, построенное раньше (стабильная сортировка). Каждое не вошедшее в
/// остов ребро добавляется с вероятностью `extra_edge_probability` независимой
/// монеткой. Меньше двух поселений — дорог нет.
#[must_use]
pub fn generate_roads(towns: &[Settlement], settings: &RoadSettings, seed: u64) -> Vec<Road> {
    let n = towns.len();
    if n < 2 {
        return Vec::new();
    }

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);

    let mut edges: Vec<Edge> = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = towns[i].x as f32 - towns[j].x as f32;
            let dy = towns[i].y as f32 - towns[j].y as f32;
            edges.push(Edge {
                a: i,
                b: j,
                d: (dx * dx + dy * dy).sqrt(),
            });
        }
    }

    // Крускал: рёбра по возрастанию веса, union-find для компонент
    let mut sorted: Vec<&Edge> = edges.iter().collect();
    sorted.sort_by(|e1, e2| e1.d.partial_cmp(&e2.d).unwrap_or(std::cmp::Ordering::Equal));

    let mut uf: UnionFind<usize> = UnionFind::new(n);
    let mut mst: Vec<&Edge> = Vec::with_capacity(n - 1);
    for edge in sorted {
        if uf.union(edge.a, edge.b) {
            mst.push(edge);
            if mst.len() == n - 1 {
                break;
            }
        }
    }

    // Добавочные рёбра: независимая монетка на каждое ребро вне остова
    let mst_set: HashSet<(usize, usize)> = mst.iter().map(|e| (e.a, e.b)).collect();
    let mut extra: Vec<&Edge> = Vec::new();
    for edge in &edges {
        if mst_set.contains(&(edge.a, edge.b)) {
            continue;
        }
        if rng.r#gen::<f32>() < settings.extra_edge_probability {
            extra.push(edge);
        }
    }

    mst.into_iter()
        .chain(extra)
        .map(|edge| Road {
            path: subdivide_and_jitter(
                &towns[edge.a],
                &towns[edge.b],
                settings.jitter,
                settings.steps,
                &mut rng,
            ),
        })
        .collect()
}

/// Делит отрезок на `steps` частей и смещает внутренние точки
///
/// Концы остаются ровно в поселениях; каждая внутренняя точка получает
/// равномерное смещение в `[-jitter, +jitter]` по обеим осям.
fn subdivide_and_jitter(
    a: &Settlement,
    b: &Settlement,
    jitter: f32,
    steps: u32,
    rng: &mut rand_chacha::ChaCha8Rng,
) -> Vec<Point> {
    let steps = steps.max(1);
    let mut path = Vec::with_capacity(steps as usize + 1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let mut x = a.x as f32 * (1.0 - t) + b.x as f32 * t;
        let mut y = a.y as f32 * (1.0 - t) + b.y as f32 * t;
        if i != 0 && i != steps && jitter > 0.0 {
            x += (rng.r#gen::<f32>() * 2.0 - 1.0) * jitter;
            y += (rng.r#gen::<f32>() * 2.0 - 1.0) * jitter;
        }
        path.push(Point { x, y });
    }
    path
}
