// src/biome.rs
use crate::config::BiomeThresholds;
use crate::error::WorldGenError;
use crate::grid::Grid;
use crate::heightmap::Heightmap;
use crate::moisture::MoistureMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Beach,
    Desert,
    Grassland,
    Forest,
    Rainforest,
    Tundra,
    Snow,
    Mountain,
}

impl Biome {
    /// Отображаемое имя биома
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Beach => "Beach",
            Biome::Desert => "Desert",
            Biome::Grassland => "Grassland",
            Biome::Forest => "Forest",
            Biome::Rainforest => "Rainforest",
            Biome::Tundra => "Tundra",
            Biome::Snow => "Snow",
            Biome::Mountain => "Mountain",
        }
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            Biome::Ocean => [0, 64, 128],
            Biome::Beach => [230, 210, 160],
            Biome::Desert => [200, 180, 120],
            Biome::Grassland => [150, 200, 100],
            Biome::Forest => [60, 120, 60],
            Biome::Rainforest => [30, 100, 30],
            Biome::Tundra => [200, 220, 180],
            Biome::Snow => [240, 240, 250],
            Biome::Mountain => [150, 150, 150],
        }
    }
}

/// Карта биомов
pub type BiomeMap = Grid<Biome>;

/// Классифицирует биом одной клетки по высоте и влажности
///
/// Ветви проверяются строго по порядку: океан, пляж, горы, тундра/снег,
/// затем влажностные биомы. Горы перекрывают любую влажность.
#[must_use]
pub fn classify_cell(elevation: f32, moisture: f32, t: &BiomeThresholds) -> Biome {
    if elevation < t.ocean_level {
        Biome::Ocean
    } else if elevation < t.beach_level {
        Biome::Beach
    } else if elevation >= t.mountain_level {
        Biome::Mountain
    } else if elevation >= t.tundra_level {
        if moisture < 0.5 { Biome::Tundra } else { Biome::Snow }
    } else if moisture < t.desert_moisture {
        Biome::Desert
    } else if moisture < t.grassland_moisture {
        Biome::Grassland
    } else if moisture < t.forest_moisture {
        Biome::Forest
    } else {
        Biome::Rainforest
    }
}

/// Назначает биомы всем клеткам по высоте и влажности
pub fn assign_biomes(
    heightmap: &Heightmap,
    moisture: &MoistureMap,
    thresholds: &BiomeThresholds,
) -> Result<BiomeMap, WorldGenError> {
    if !heightmap.same_shape(moisture) {
        return Err(WorldGenError::DimensionMismatch {
            expected: (heightmap.width, heightmap.height),
            actual: (moisture.width, moisture.height),
        });
    }

    let data = heightmap
        .data
        .iter()
        .zip(moisture.data.iter())
        .map(|(&elevation, &moist)| classify_cell(elevation, moist, thresholds))
        .collect();

    Ok(BiomeMap {
        width: heightmap.width,
        height: heightmap.height,
        data,
    })
}

impl Grid<Biome> {
    pub fn to_rgba_image(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|&b| {
                let rgb = b.to_rgb();
                [rgb[0], rgb[1], rgb[2], 255] // RGBA
            })
            .collect()
    }

    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let img: image::ImageBuffer<image::Rgba<u8>, Vec<u8>> =
            image::ImageBuffer::from_raw(self.width, self.height, self.to_rgba_image())
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        Ok(())
    }
}
