// src/grid.rs
//! Общая решётка для всех послойных карт мира
//!
//! Каждый этап генерации (высоты, море, влажность, биомы, сток, регионы)
//! работает с прямоугольной решёткой одинаковой формы. Данные хранятся
//! плоским вектором в порядке строк: индекс `y * width + x`.

use serde::{Deserialize, Serialize};

/// Точка в непрерывных координатах карты (дороги, изолинии, центроиды)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Прямоугольная решётка `width × height` с плоским хранением по строкам
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    pub width: u32,
    pub height: u32,
    pub data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Создаёт решётку, заполненную одним значением
    pub fn new_with(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; (width * height) as usize],
        }
    }
}

impl<T> Grid<T> {
    #[inline]
    pub fn idx(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let i = self.idx(x, y);
        self.data[i] = value;
    }

    /// Совпадает ли форма с другой решёткой (размеры, не содержимое)
    #[must_use]
    pub fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T: Copy> Grid<T> {
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        self.data[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_addressing() {
        let mut grid = Grid::new_with(3, 2, 0_i32);
        grid.set(2, 1, 7);
        assert_eq!(grid.get(2, 1), 7);
        assert_eq!(grid.data[5], 7);
    }

    #[test]
    fn test_in_bounds() {
        let grid = Grid::new_with(4, 3, 0.0_f32);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(3, 2));
        assert!(!grid.in_bounds(4, 0));
        assert!(!grid.in_bounds(0, 3));
        assert!(!grid.in_bounds(-1, 1));
    }
}
