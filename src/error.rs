// src/error.rs
//! Ошибки генерации мира
//!
//! Фатальные ошибки конвейера. Восстановимые ситуации (вырожденное поле шума,
//! нехватка кандидатов под поселения, меньше двух поселений для дорог)
//! ошибками не являются и обрабатываются на месте.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldGenError {
    /// Нулевые или отрицательные размеры карты
    InvalidDimension { width: u32, height: u32 },
    /// Неизвестный метод разбиения на регионы (поддерживается только "voronoi")
    UnsupportedMethod(String),
    /// Решётки разных этапов не совпадают по форме
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl fmt::Display for WorldGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldGenError::InvalidDimension { width, height } => {
                write!(f, "invalid map dimensions: {width}x{height}")
            }
            WorldGenError::UnsupportedMethod(method) => {
                write!(f, "unsupported region method: {method}")
            }
            WorldGenError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "grid dimension mismatch: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
        }
    }
}

impl std::error::Error for WorldGenError {}

/// Проверка размеров перед началом генерации
pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<(), WorldGenError> {
    if width == 0 || height == 0 {
        return Err(WorldGenError::InvalidDimension { width, height });
    }
    Ok(())
}
