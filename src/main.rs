#![forbid(unsafe_code)]

mod cli;
mod config;
mod coords;

use std::error::Error;
use std::process::ExitCode;
use std::time::Instant;

use anvilmap_blocks::BlockPalette;
use anvilmap_render::{RenderOptions, create_world_map, write_tiles};
use clap::Parser;

use crate::cli::Cli;
use crate::config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn log_modes(opts: &RenderOptions) {
    if opts.rotation.quarter_turns() > 0 {
        log::info!("Rotating {} degrees clockwise", opts.rotation.quarter_turns() as u32 * 90);
    }
    if opts.tiny {
        log::info!("Rendering in tiny mode");
        return;
    }
    log::info!(
        "Rendering in {} mode",
        if opts.isometric { "isometric" } else { "orthographic" }
    );
    if opts.night {
        log::info!("Night mode is on");
    } else if opts.isometric && opts.shadows {
        log::info!("Daytime shadows are on");
    }
    if opts.biomes {
        log::info!("Biomes are on");
    }
    log::info!("Rendering {:?} dimension", opts.dimension);
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let config = cli.apply_to(config);
    let opts = cli.render_options(&config)?;
    log_modes(&opts);

    let palette = if opts.tiny {
        BlockPalette::default()
    } else {
        let res = &config.resources;
        BlockPalette::load(
            &res.textures,
            opts.isometric.then_some(res.shapes.as_path()),
            opts.biomes.then_some(res.biomes.as_path()),
        )?
    };

    let img = create_world_map(&cli.world, &palette, &opts)?;

    if let Some(path) = cli.output() {
        log::info!("Saving image to {}...", path.display());
        let start = Instant::now();
        img.save(&path)?;
        log::info!("Total save time: {:.2?}", start.elapsed());
    }
    if let Some(dir) = &cli.tiles {
        log::info!("Slicing image into {}...", dir.display());
        let start = Instant::now();
        let levels = write_tiles(&img, dir, config.output.tile_size)?;
        log::info!("Wrote {} zoom levels in {:.2?}", levels, start.elapsed());
    }
    Ok(())
}
