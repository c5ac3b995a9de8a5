use clap::Parser;
use mapforge::render::save_world_png;
use mapforge::{WorldGenerationParams, generate_world};
use std::path::PathBuf;

/// Генератор фэнтезийных карт
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: PathBuf,

    /// Каталог для результатов (по умолчанию: текущий)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("🔍 Загрузка конфигурации...");
    let params = WorldGenerationParams::from_toml_file(cli.config.to_str().unwrap())?;

    println!(
        "Генерация мира (размер: {}×{}, сид: {})...",
        params.width, params.height, params.seed
    );
    let world = generate_world(&params)?;
    println!(
        "Поселений: {}, рек: {}, дорог: {}",
        world.settlements.len(),
        world.rivers.len(),
        world.roads.len()
    );

    std::fs::create_dir_all(&cli.output)?;

    let height_path = cli.output.join("height.png");
    world.heightmap.save_as_png(height_path.to_str().unwrap())?;

    let biomes_path = cli.output.join("biomes.png");
    world.biomes.save_as_png(biomes_path.to_str().unwrap())?;

    let map_path = cli.output.join("map.png");
    save_world_png(&world, map_path.to_str().unwrap())?;

    let snapshot_path = cli.output.join("world.json");
    std::fs::write(&snapshot_path, world.to_json()?)?;

    println!("\nГотово! Карта сохранена в {:?}", cli.output);
    Ok(())
}
