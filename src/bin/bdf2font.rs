use anyhow::{anyhow, bail, Context};
use clap::Parser;
use derive_more::Display;
use pixfont::bdf::parse_bdf;
use pixfont::codec::{emit_gfx_header, emit_rust_module, sanitize_identifier, Font};
use pixfont::config::storage::JsonStorageAdapter;
use pixfont::config::{config, config_store_write};
use simple_logger::SimpleLogger;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    /// Adafruit GFX C header
    #[display("header")]
    Header,
    /// Rust module with a static `Font`
    #[display("rust")]
    Rust,
    /// Binary `.pxf` container
    #[display("binary")]
    Binary,
    /// JSON dump of the glyph table and bitmap
    #[display("json")]
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Header => "h",
            Format::Rust => "rs",
            Format::Binary => "pxf",
            Format::Json => "json",
        }
    }
}

#[derive(Debug, Parser)]
#[clap(name = "bdf2font", version = "0.1.0", about = "Converts BDF fonts into packed bitmap fonts")]
struct Cli {
    /// BDF files to convert
    #[clap(required = true)]
    inputs: Vec<PathBuf>,

    #[clap(short = 'f', long = "format", default_value_t = Format::Header)]
    format: Format,

    /// Directory to write the converted fonts to. Without it a single font is written to stdout
    #[clap(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// First character code to convert (default: converter.first_code)
    #[clap(long = "first")]
    first: Option<u16>,

    /// Last character code to convert (default: converter.last_code)
    #[clap(long = "last")]
    last: Option<u16>,

    /// Fail on codes missing from the BDF file instead of adding empty glyphs
    #[clap(long = "no-fill")]
    no_fill: bool,

    /// Json file with settings overriding the defaults
    #[clap(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short = 'd', long = "debug")]
    debug: bool,
}

fn config_code(key: &str) -> anyhow::Result<u16> {
    let value = config!(uint key);
    u16::try_from(value).map_err(|_| anyhow!("setting {key} = {value} is not a valid character code"))
}

fn render(format: Format, font: &Font<'_>, var_name: &str, display_name: &str) -> anyhow::Result<Vec<u8>> {
    let out = match format {
        Format::Header => emit_gfx_header(font, var_name, display_name)?.into_bytes(),
        Format::Rust => emit_rust_module(font, var_name)?.into_bytes(),
        Format::Binary => font.encode(),
        Format::Json => serde_json::to_vec_pretty(font)?,
    };
    Ok(out)
}

fn convert_file(path: &Path, cli: &Cli, first: u16, last: u16) -> anyhow::Result<()> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let bdf = parse_bdf(&source).with_context(|| format!("parsing {}", path.display()))?;
    let font = bdf
        .to_font(first, last, !cli.no_fill)
        .with_context(|| format!("converting {}", path.display()))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("cannot derive a font name from {}", path.display()))?;
    let data = render(cli.format, &font, stem, &bdf.name)?;

    match &cli.output {
        Some(dir) => {
            let target = dir.join(format!("{}.{}", sanitize_identifier(stem), cli.format.extension()));
            fs::write(&target, &data).with_context(|| format!("writing {}", target.display()))?;
            log::info!("{} -> {} ({} glyphs)", path.display(), target.display(), font.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }

    Ok(())
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

    if cli.output.is_none() && cli.inputs.len() > 1 {
        bail!("converting more than one font needs --output");
    }
    if let Some(dir) = &cli.output {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let first = match cli.first {
        Some(code) => code,
        None => config_code("converter.first_code")?,
    };
    let last = match cli.last {
        Some(code) => code,
        None => config_code("converter.last_code")?,
    };
    if last < first {
        bail!("empty code range 0x{first:02X}..=0x{last:02X}");
    }

    for path in &cli.inputs {
        convert_file(path, &cli, first, last)?;
    }

    Ok(())
}
