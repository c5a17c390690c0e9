//! pathviz: interactive A* visualizer for the terminal.

use std::fs::File;

use log::{LevelFilter, info, warn};
use pathviz::{Visualizer, VisualizerConfig};
use pathviz_crossterm::CrosstermDriver;
use pathviz_ui::{App, AppConfig};

const LOG_FILE: &str = "pathviz.log";

/// Log to a file in the temp dir; the terminal belongs to the UI.
/// `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let path = std::env::temp_dir().join(LOG_FILE);
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(&path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    if builder.try_init().is_err() {
        warn!("logger already initialised");
    }
    info!("pathviz: logging to {}", path.display());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let config = VisualizerConfig::default();
    let (width, height) = (config.screen_width(), config.screen_height());
    let model = Visualizer::new(config);
    let driver = CrosstermDriver::new();
    let mut app = App::new(AppConfig {
        model,
        driver,
        width,
        height,
    });
    app.run()?;
    info!("pathviz: bye");
    Ok(())
}
