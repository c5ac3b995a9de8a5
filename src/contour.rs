// src/contour.rs
//! Изолинии по скалярному полю (marching squares)
//!
//! Общая утилита для двух потребителей: изолинии высот по карте высот и
//! береговая линия по маске моря, приведённой к полю {0, 1}. Каждая ячейка
//! 2×2 классифицируется 4-битным кодом углов; таблица из 16 случаев даёт
//! 0, 1 или 2 отрезка, концы которых интерполируются вдоль рёбер ячейки.

use crate::grid::{Grid, Point};
use crate::heightmap::Heightmap;
use crate::sea::SeaMask;
use serde::{Deserialize, Serialize};

/// Отрезок изолинии в непрерывных координатах решётки
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

/// Извлекает отрезки изолинии уровня `level` из скалярного поля
///
/// Угол считается «выше», если его значение `>= level`. Код ячейки собирается
/// из углов (x,y), (x+1,y), (x+1,y+1), (x,y+1) битами 1, 2, 4, 8; коды 0 и 15
/// отрезков не дают. Точка пересечения ребра интерполируется линейно по
/// положению уровня между значениями углов.
#[must_use]
pub fn extract_segments(field: &Grid<f32>, level: f32) -> Vec<Segment> {
    let mut segments = Vec::new();
    if field.width < 2 || field.height < 2 {
        return segments;
    }

    for y in 0..field.height - 1 {
        for x in 0..field.width - 1 {
            let a = field.get(x, y);
            let b = field.get(x + 1, y);
            let c = field.get(x + 1, y + 1);
            let d = field.get(x, y + 1);

            let code = usize::from(a >= level)
                | usize::from(b >= level) << 1
                | usize::from(c >= level) << 2
                | usize::from(d >= level) << 3;

            let xf = x as f32;
            let yf = y as f32;
            // Пересечения рёбер ячейки; вычисляются лениво по таблице случаев
            let top = || Point {
                x: xf + (level - a) / (b - a),
                y: yf,
            };
            let right = || Point {
                x: xf + 1.0,
                y: yf + (level - b) / (c - b),
            };
            let bottom = || Point {
                x: xf + 1.0 - (level - c) / (d - c),
                y: yf + 1.0,
            };
            let left = || Point {
                x: xf,
                y: yf + 1.0 - (level - d) / (a - d),
            };

            match code {
                1 | 14 => segments.push(Segment { a: top(), b: left() }),
                2 | 13 => segments.push(Segment {
                    a: top(),
                    b: right(),
                }),
                3 | 12 => segments.push(Segment {
                    a: right(),
                    b: left(),
                }),
                4 | 11 => segments.push(Segment {
                    a: right(),
                    b: bottom(),
                }),
                6 | 9 => segments.push(Segment {
                    a: top(),
                    b: bottom(),
                }),
                7 | 8 => segments.push(Segment {
                    a: bottom(),
                    b: left(),
                }),
                5 | 10 => {
                    // Седловые случаи: два отрезка на ячейку
                    segments.push(Segment {
                        a: top(),
                        b: right(),
                    });
                    segments.push(Segment {
                        a: bottom(),
                        b: left(),
                    });
                }
                _ => {} // 0 и 15: ячейка целиком ниже или выше уровня
            }
        }
    }
    segments
}

/// Береговая линия: изолиния уровня 0.5 по маске моря, приведённой к {0, 1}
#[must_use]
pub fn coastline_segments(mask: &SeaMask) -> Vec<Segment> {
    let field = Grid {
        width: mask.width,
        height: mask.height,
        data: mask
            .data
            .iter()
            .map(|&sea| if sea { 1.0 } else { 0.0 })
            .collect(),
    };
    extract_segments(&field, 0.5)
}

/// Изолинии высот с фиксированным шагом по диапазону [0, 1]
///
/// Возвращает пары (уровень, отрезки) для уровней `interval`, `2·interval`, …
/// строго внутри диапазона.
#[must_use]
pub fn elevation_contours(heightmap: &Heightmap, interval: f32) -> Vec<(f32, Vec<Segment>)> {
    let mut bands = Vec::new();
    if interval <= 0.0 {
        return bands;
    }
    for i in 1.. {
        let level = interval * i as f32;
        if level >= 1.0 {
            break;
        }
        bands.push((level, extract_segments(heightmap, level)));
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_field_has_no_contour() {
        let low = Grid::new_with(4, 4, 0.1_f32);
        let high = Grid::new_with(4, 4, 0.9_f32);
        assert!(extract_segments(&low, 0.5).is_empty());
        assert!(extract_segments(&high, 0.5).is_empty());
    }

    #[test]
    fn test_vertical_split_gives_vertical_segment() {
        let field = Grid {
            width: 2,
            height: 2,
            data: vec![0.0, 1.0, 0.0, 1.0],
        };
        let segments = extract_segments(&field, 0.5);
        assert_eq!(segments.len(), 1);
        let s = segments[0];
        assert_eq!(s.a.x, 0.5);
        assert_eq!(s.b.x, 0.5);
        assert_eq!(s.a.y, 0.0);
        assert_eq!(s.b.y, 1.0);
    }

    #[test]
    fn test_interpolation_follows_level() {
        // Уровень 0.25 между углами 0 и 1 пересекает ребро на четверти
        let field = Grid {
            width: 2,
            height: 2,
            data: vec![0.0, 1.0, 0.0, 1.0],
        };
        let segments = extract_segments(&field, 0.25);
        assert_eq!(segments.len(), 1);
        assert!((segments[0].a.x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_single_high_corner() {
        let field = Grid {
            width: 2,
            height: 2,
            data: vec![1.0, 0.0, 0.0, 0.0],
        };
        let segments = extract_segments(&field, 0.5);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_saddle_emits_two_segments() {
        // Противоположные углы выше уровня: диагональное седло
        let field = Grid {
            width: 2,
            height: 2,
            data: vec![1.0, 0.0, 0.0, 1.0],
        };
        let segments = extract_segments(&field, 0.5);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_coastline_from_mask() {
        let mask = SeaMask {
            width: 2,
            height: 2,
            data: vec![true, false, false, false],
        };
        let segments = coastline_segments(&mask);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_contour_band_levels() {
        let field = Grid {
            width: 3,
            height: 3,
            data: vec![0.0, 0.2, 0.4, 0.3, 0.5, 0.7, 0.6, 0.8, 1.0],
        };
        let bands = elevation_contours(&field, 0.25);
        let levels: Vec<f32> = bands.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, vec![0.25, 0.5, 0.75]);
        assert!(bands.iter().all(|(_, segments)| !segments.is_empty()));
    }
}
