use anyhow::anyhow;
use clap::{Parser, Subcommand};
use pixfont::config::settings::Setting;
use pixfont::config::storage::JsonStorageAdapter;
use pixfont::config::{config_store, config_store_write};
use std::str::FromStr;

#[derive(Debug, Parser)]
#[clap(name = "pixfont-config", version = "0.1.0", about = "Inspects and changes pixfont settings")]
struct Cli {
    /// Json file the settings are stored in
    #[clap(short = 'p', long = "path", global = true, default_value = "pixfont.json")]
    path: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[clap(arg_required_else_help = true, about = "View a setting")]
    View {
        #[clap(required = true, short = 'k', long = "key")]
        key: String,
    },
    #[clap(about = "List all settings")]
    List,
    #[clap(arg_required_else_help = true, about = "Set a setting, values look like u:128 or b:false")]
    Set {
        #[clap(required = true, short = 'k', long = "key")]
        key: String,
        #[clap(required = true, short = 'v', long = "value")]
        value: String,
    },
    #[clap(arg_required_else_help = true, about = "Search for settings, * and ? are wildcards")]
    Search {
        #[clap(required = true, short = 'k', long = "key")]
        key: String,
    },
}

fn print_settings(keys: &[String]) {
    for key in keys {
        if let Some(value) = config_store().get(key) {
            println!("{key:40}: {value}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    config_store_write().set_storage(Box::new(JsonStorageAdapter::try_from(&args.path)?));

    match args.command {
        Commands::View { key } => {
            let (Some(info), Some(value)) = (config_store().get_info(&key), config_store().get(&key)) else {
                println!("Key not found");
                return Ok(());
            };

            println!("Key            : {key}");
            println!("Current Value  : {value}");
            println!("Default Value  : {}", info.default);
            println!("Description    : {}", info.description);
        }
        Commands::List => print_settings(&config_store().find("*")),
        Commands::Set { key, value } => {
            let setting = Setting::from_str(&value).map_err(|err| anyhow!("incorrect value '{value}': {err}"))?;
            config_store().set(&key, setting);
        }
        Commands::Search { key } => print_settings(&config_store().find(&key)),
    }

    Ok(())
}
