use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tessel_atlas::PatternAtlas;
use tessel_stream::{TileBuffer, TileStreamer};
use tessel_world::{GenParams, load_params_from_path};

mod preview;
mod watchers;

const DEFAULT_CONFIG: &str = "assets/worldgen.toml";

#[derive(Parser, Debug)]
#[command(name = "tessel", about = "Stream a generated tile world to the terminal")]
struct Args {
    /// Worldgen config (TOML). Falls back to assets/worldgen.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the world seed
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i32>,
    /// Viewport width in cells
    #[arg(long)]
    width: Option<u32>,
    /// Viewport height in cells
    #[arg(long)]
    height: Option<u32>,
    /// Frames to stream before exiting (or before waiting on --watch)
    #[arg(long, default_value_t = 4)]
    frames: u32,
    /// Scroll applied after every frame, as DX,DY
    #[arg(long, value_parser = parse_scroll, default_value = "1,0", allow_hyphen_values = true)]
    scroll: (i32, i32),
    /// Only show floor, grass and rocks
    #[arg(long)]
    debug_view: bool,
    /// Reload and restream when the config file changes
    #[arg(long)]
    watch: bool,
}

fn parse_scroll(s: &str) -> Result<(i32, i32), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
    let dx = dx.trim().parse::<i32>().map_err(|e| format!("bad DX: {e}"))?;
    let dy = dy.trim().parse::<i32>().map_err(|e| format!("bad DY: {e}"))?;
    Ok((dx, dy))
}

impl Args {
    fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(p) => Some(p.clone()),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG);
                p.exists().then_some(p)
            }
        }
    }

    fn load_params(&self) -> Result<GenParams, Box<dyn Error>> {
        let mut params = match self.config_path() {
            Some(path) => {
                log::info!("loading worldgen config {}", path.display());
                load_params_from_path(&path)?
            }
            None => GenParams::default(),
        };
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(w) = self.width {
            params.view_width = w.max(1);
        }
        if let Some(h) = self.height {
            params.view_height = h.max(1);
        }
        params.debug_view |= self.debug_view;
        Ok(params)
    }
}

struct Preview {
    streamer: TileStreamer<PatternAtlas>,
    bottom: TileBuffer,
    top: TileBuffer,
    frame: u64,
}

impl Preview {
    fn new(params: GenParams) -> Self {
        let atlas = PatternAtlas::new(params.atlas_capacity, params.tiles_per_row);
        let streamer = TileStreamer::new(params, atlas);
        let (bottom, top) = streamer.make_buffers();
        Self {
            streamer,
            bottom,
            top,
            frame: 0,
        }
    }

    fn reload(&mut self, params: GenParams) {
        let (bottom, top) = (
            TileBuffer::new(params.buffer_records()),
            TileBuffer::new(params.buffer_records()),
        );
        self.bottom = bottom;
        self.top = top;
        self.streamer.reload(params);
    }

    fn step(&mut self) -> Result<(), Box<dyn Error>> {
        self.frame += 1;
        self.streamer.update_meta();
        let changed = self.streamer.update_vis(&mut self.bottom, &mut self.top)?;
        let budget = self.streamer.world().params().bake_per_frame;
        let baked = self.streamer.world_mut().tiles_mut().atlas_mut().bake(budget);

        let view = self.streamer.viewport();
        println!("{}", preview::render(self.streamer.world_mut(), view));
        let s = self.streamer.stats();
        let w = self.streamer.world().stats();
        let tiles = self.streamer.world().tiles();
        println!(
            "frame={} offset=({}, {}) changed={} records={} cells={} baked={} known={} made={} meta={} hits={} misses={}",
            self.frame,
            view.x,
            view.y,
            changed,
            self.bottom.len(),
            s.cells,
            baked,
            tiles.known(),
            tiles.made_count(),
            w.meta.entries,
            w.meta.hits,
            w.meta.misses
        );
        Ok(())
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut preview = Preview::new(args.load_params()?);
    let (dx, dy) = args.scroll;

    let reloads = match (args.watch, args.config_path()) {
        (true, Some(path)) => Some(watchers::spawn_config_watcher(&path)),
        (true, None) => {
            log::warn!("--watch without a config file; nothing to watch");
            None
        }
        _ => None,
    };

    for _ in 0..args.frames {
        preview.step()?;
        preview.streamer.scroll_by(dx, dy);
    }

    let Some(rx) = reloads else {
        return Ok(());
    };
    // Block on config changes; each one restreams the current window.
    for () in rx.iter() {
        // Editors often emit several events per save.
        for () in rx.try_iter() {}
        match args.load_params() {
            Ok(params) => {
                preview.reload(params);
                preview.step()?;
            }
            Err(e) => log::warn!("worldgen config reload failed: {}", e),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    run(&args)
}
