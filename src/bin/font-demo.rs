use anyhow::{anyhow, bail};
use clap::Parser;
use pixfont::config::storage::JsonStorageAdapter;
use pixfont::config::{config, config_store_write};
use pixfont::fonts::{load_font, ConvertOptions};
use pixfont::render::{FontCycle, MonoFramebuffer, TextRenderer};
use pixfont::shared::types::Point;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[clap(name = "font-demo", version = "0.1.0", about = "Renders text with one or more bitmap fonts")]
struct Cli {
    /// Fonts to show (.pxf or .bdf)
    #[clap(required = true)]
    fonts: Vec<PathBuf>,

    /// Text to render (default: demo.text)
    #[clap(short = 't', long = "text")]
    text: Option<String>,

    /// Keep cycling through the fonts, waiting demo.interval_ms between them
    #[clap(short = 'l', long = "loop")]
    looping: bool,

    /// Json file with settings overriding the defaults
    #[clap(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short = 'd', long = "debug")]
    debug: bool,
}

fn setting_u32(key: &str) -> anyhow::Result<u32> {
    let value = config!(uint key);
    u32::try_from(value).map_err(|_| anyhow!("setting {key} = {value} is out of range"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init()?;

    if let Some(path) = &cli.config {
        config_store_write().set_storage(Box::new(JsonStorageAdapter::try_from(path.as_path())?));
    }

    let options = ConvertOptions {
        first_code: u16::try_from(config!(uint "converter.first_code"))?,
        last_code: u16::try_from(config!(uint "converter.last_code"))?,
        fill_missing: config!(bool "converter.fill_missing"),
    };
    let fonts = cli
        .fonts
        .iter()
        .map(|path| load_font(path, options))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let text = cli.text.clone().unwrap_or_else(|| config!(string "demo.text"));
    let renderer = TextRenderer::with_fallback_advance(u8::try_from(config!(uint "render.fallback_advance"))?);
    let interval = Duration::from_millis(u64::try_from(config!(uint "demo.interval_ms"))?);

    let (width, height) = (setting_u32("display.width")?, setting_u32("display.height")?);
    if width == 0 || height == 0 {
        bail!("display size {width}x{height} is empty");
    }
    let mut display = MonoFramebuffer::new(width, height);

    let Some(mut cycle) = FontCycle::new(&fonts) else {
        bail!("no fonts to show");
    };

    loop {
        let name = cli.fonts[cycle.index()].display();
        let font = cycle.current();

        display.clear(false);
        // Glyph offsets are relative to the baseline; put the first one a glyph height down
        let baseline = Point::new(0, i32::from(font.max_height()));
        renderer.draw_text(font, &text, baseline, true, &mut display);

        println!("{name} ({} of {})", cycle.index() + 1, cycle.len());
        println!("{}", display.to_ascii('#', '.'));

        if !cli.looping && cycle.index() + 1 == cycle.len() {
            break;
        }

        cycle.advance();
        if cli.looping {
            thread::sleep(interval);
        }
    }

    Ok(())
}
