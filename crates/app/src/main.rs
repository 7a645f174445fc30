use bevy::log::LogPlugin;
use bevy::prelude::*;

use landscape::ascii_map::build_overview_map;
use landscape::chunks::{ChunkCoord, ChunkRenderer, ChunkRendererPlugin};
use landscape::config::WorldConfig;
use landscape::grid::TileGrid;
use landscape::landscaping::{LandscapingTools, RebuildTerrainEvent, TerrainRebuild};
use landscape::LandscapePlugin;

mod console_mode;

/// Path to a JSON `WorldConfig`; missing fields use defaults.
const CONFIG_ENV: &str = "ZOO_LANDSCAPE_CONFIG";
/// Seed for the demo terrain.
const SEED_ENV: &str = "ZOO_LANDSCAPE_SEED";

fn main() {
    let config = load_config();

    if std::env::args().any(|arg| arg == "--console") {
        console_mode::run_console_mode(config);
        return;
    }

    let seed = std::env::var(SEED_ENV)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let mut app = build_app(config);
    app.world_mut()
        .send_event(RebuildTerrainEvent(TerrainRebuild::Generated { seed }));
    for _ in 0..3 {
        app.update();
    }

    let draws = app.world().resource::<ChunkDrawLog>();
    info!(
        "Drew {} terrain and {} overlay chunks",
        draws.terrain_draws, draws.overlay_draws
    );
    println!("{}", build_overview_map(app.world().resource::<TileGrid>(), 10));
}

/// Headless app with the landscaping tool open and a logging chunk renderer.
pub(crate) fn build_app(config: WorldConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin {
            filter: "info,landscape=debug".to_string(),
            ..default()
        })
        .insert_resource(config)
        .init_resource::<ChunkDrawLog>()
        .add_plugins((LandscapePlugin, ChunkRendererPlugin::<ChunkDrawLog>::default()));
    app.world_mut()
        .resource_mut::<LandscapingTools>()
        .landscaping_enabled = true;
    app.update();
    app
}

fn load_config() -> WorldConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return WorldConfig::default();
    };
    match WorldConfig::from_json_file(&path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Ignoring config {path}: {err}");
            WorldConfig::default()
        }
    }
}

/// Stand-in renderer: counts chunk redraws instead of building meshes.
#[derive(Resource, Default)]
struct ChunkDrawLog {
    terrain_draws: usize,
    overlay_draws: usize,
}

impl ChunkRenderer for ChunkDrawLog {
    fn draw_tiles(&mut self, chunk: ChunkCoord, _grid: &TileGrid, overlay: bool) {
        if overlay {
            self.overlay_draws += 1;
        } else {
            self.terrain_draws += 1;
        }
        trace!("Redraw chunk ({}, {}) overlay={overlay}", chunk.x, chunk.z);
    }
}
