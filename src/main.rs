use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use terrastead_core::init_logging;
use terrastead_data::ContentTables;
use terrastead_lib::model::config::AppConfig;
use terrastead_lib::model::preview::render_ascii;
use terrastead_lib::{Map, MapOrigin};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World config file (missing file means defaults)
    #[arg(short, long, default_value = "terrastead.toml")]
    config: PathBuf,

    /// Content tables (.toml or .json); built-in tables when omitted
    #[arg(long)]
    content: Option<PathBuf>,

    /// Map name, overriding the config
    #[arg(short, long)]
    name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load or generate the map and print a summary
    Info {
        #[arg(long)]
        json: bool,
    },
    /// Generate a fresh map, replacing any save
    Generate {
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print an ASCII window of the map
    Preview {
        #[arg(short, long, default_value_t = 256)]
        x: i32,
        #[arg(short, long, default_value_t = 256)]
        y: i32,
        #[arg(short, long, default_value_t = 20)]
        radius: i32,
    },
    /// Run creature updates for a number of ticks, then save
    Simulate {
        #[arg(short, long, default_value_t = 100)]
        ticks: u64,
    },
}

#[derive(Serialize)]
struct Summary<'a> {
    name: &'a str,
    origin: MapOrigin,
    save_dir: &'a Path,
    creatures: usize,
    objects: usize,
}

fn load_content(path: Option<&Path>) -> Result<ContentTables> {
    let Some(path) = path else {
        return Ok(ContentTables::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading content tables {}", path.display()))?;
    let tables = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ContentTables::from_json(&text)?,
        _ => ContentTables::from_toml(&text)?,
    };
    Ok(tables)
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(name) = args.name {
        config.map.name = name;
    }
    let content = load_content(args.content.as_deref())?;
    content.validate()?;
    let content = Arc::new(content);

    match args.command {
        Command::Info { json } => {
            let map = Map::new(config, content)?;
            let summary = Summary {
                name: map.name(),
                origin: map.origin(),
                save_dir: map.save_dir(),
                creatures: map.creatures().len(),
                objects: map.grid().cells().iter().filter(|c| c.has_object()).count(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Map:       {}", summary.name);
                println!("Origin:    {:?}", summary.origin);
                println!("Save dir:  {}", summary.save_dir.display());
                println!("Creatures: {}", summary.creatures);
                println!("Objects:   {}", summary.objects);
            }
        }
        Command::Generate { seed } => {
            let seed = seed
                .or(config.map.seed)
                .unwrap_or_else(terrastead_lib::model::map::clock_seed);
            let map = Map::generate(config, content, seed)?;
            map.save()?;
            println!("Generated '{}' with seed {seed}", map.name());
        }
        Command::Preview { x, y, radius } => {
            let map = Map::new(config, content)?;
            print!("{}", render_ascii(&map, x, y, radius));
        }
        Command::Simulate { ticks } => {
            let mut map = Map::new(config, content)?;
            for _ in 0..ticks {
                map.update();
            }
            map.save()?;
            println!(
                "Simulated {ticks} ticks, {} creatures remain",
                map.creatures().len()
            );
        }
    }

    Ok(())
}
