use aoi::{AoiCommand, AoiElement, AoiManager, BitMask, RasterDescriptor};
use clap::{Parser, Subcommand};
use cli::AoiScript;
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an AOI script (.toml or .json)
    Run {
        /// Path to the script file
        #[arg(short, long)]
        config: PathBuf,
        /// Where to save the resulting AOI document
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render the resulting selection over the raster as a PNG
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Report the selection of a saved AOI document against a raster
    Stats {
        /// AOI document saved as JSON
        #[arg(short, long)]
        aoi: PathBuf,
        #[arg(long)]
        rows: u32,
        #[arg(long)]
        columns: u32,
    },
    /// Build an AOI document from a grayscale image
    Import {
        /// Input image
        #[arg(short, long)]
        input: PathBuf,
        /// Gray level that selected pixels must exceed
        #[arg(long, default_value = "128")]
        threshold: u8,
        /// Name of the new AOI
        #[arg(long, default_value = "imported")]
        name: String,
        /// Where to save the AOI document
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the available script commands
    Commands,
    /// Print the JSON schema of AOI scripts
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { config, output, image } => {
            run_script(config, output.as_deref(), image.as_deref())?;
        }
        Commands::Stats { aoi, rows, columns } => {
            let aoi = AoiElement::from_json_file(aoi)?;
            let manager = AoiManager::new(aoi, RasterDescriptor::new(*rows, *columns));
            println!("{}", serde_json::to_string_pretty(&manager.summary())?);
        }
        Commands::Import { input, threshold, name, output } => {
            let mask = BitMask::from_image_file(input, *threshold)?;
            let mut element = AoiElement::new(name.clone());
            element.add_points(&mask);
            element.save_json(output)?;
            info!("Imported {} pixels into {:?}", mask.count(), output);
        }
        Commands::Commands => list_commands(),
        Commands::Schema => {
            let schema = schemars::schema_for!(AoiScript);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn run_script(config_path: &Path, output: Option<&Path>, image: Option<&Path>) -> Result<()> {
    let script = AoiScript::from_file(config_path)?;
    info!("Running '{}' with {} commands", script.name, script.commands.len());

    let run = script.run()?;
    let summary = run.manager.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = output {
        run.manager.aoi().save_json(path)?;
        info!("AOI saved to {:?}", path);
    }
    if let Some(path) = image {
        let raster = run.manager.raster();
        run.manager.aoi().selected_points().to_gray_image(&raster).save(path)?;
        info!("Selection rendered to {:?}", path);
    }
    Ok(())
}

fn list_commands() {
    for command in AoiCommand::iter() {
        println!("{command}: {}", command.description());
        for (name, help, required) in command.parameters_info() {
            let marker = if required { "required" } else { "optional" };
            println!("    {name} ({marker}): {help}");
        }
    }
}
