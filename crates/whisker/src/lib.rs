mod classify;

use std::{error::Error, fs::File, path::PathBuf};

use burn::{config::Config, module::Module};
use burn_wgpu::Wgpu;
use clap::{Parser, Subcommand};
use tracing::Level;
use whisker_network::model::ModelConfig;

#[derive(Parser)]
#[command(version = "0.1.0")]
#[command(about = "Convolutional scorer of RGB images against a fixed set of classes")]
struct Cli {
    #[arg(
        short,
        long,
        help = "Activate tracing and write results to the specified file after truncating or creating it"
    )]
    trace_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Print the network resolved from a configuration")]
    Describe {
        #[arg(short, long, help = "Use the network configuration at this path")]
        config: Option<PathBuf>,
    },
    #[command(about = "Score an image against the network's classes")]
    Classify(classify::ClassifyArgs),
}

fn initialize_tracing(trace_file: PathBuf) -> Result<(), Box<dyn Error>> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(File::create(trace_file)?)
        .event_format(tracing_subscriber::fmt::format().without_time().json())
        .with_thread_ids(true)
        .with_max_level(Level::TRACE)
        .finish();

    Ok(tracing::subscriber::set_global_default(subscriber)?)
}

fn load_config(config: Option<PathBuf>) -> Result<ModelConfig, Box<dyn Error>> {
    Ok(match config {
        Some(path) => ModelConfig::load(path)?,
        None => ModelConfig::new(),
    })
}

fn describe(config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let config = load_config(config)?;
    let network = config.init::<Wgpu>();

    println!("classes: {}", network.classes());
    println!("convolutional blocks: {}", config.conv_blocks);
    println!("base filters: {}", config.base_filters);
    println!("kernel length: {}", config.kernel_length);
    println!("hidden layer size: {}", config.hidden_layer_size);
    println!("dropout probability: {}", config.dropout);
    println!("minimum image length: {}", config.min_image_length());
    println!("parameters: {}", network.num_params());

    Ok(())
}

pub fn cli() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(trace_file) = cli.trace_file {
        initialize_tracing(trace_file)?;
    }

    match cli.command {
        Command::Describe { config } => describe(config),
        Command::Classify(args) => classify::run(args),
    }
}
