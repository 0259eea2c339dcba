use anyhow::Context;
use chess_board::assets::Assets;
use chess_board::config::Config;
use chess_board::frame_loop::FrameLoop;
use clap::Parser;
use log::{error, info};
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    if let Err(e) = run(&config) {
        error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

fn run(config: &Config) -> anyhow::Result<()> {
    let assets = Assets::load(&config.assets)
        .with_context(|| format!("loading assets from {}", config.assets.display()))?;
    let engine = config.engine().context("reading the starting position")?;

    let event_loop = EventLoop::new().context("creating the event loop")?;
    let mut frame_loop = FrameLoop::new(engine, assets, config.window_size());

    info!("Starting chess board");
    event_loop.run_app(&mut frame_loop)?;
    frame_loop.into_result()?;

    Ok(())
}
