use std::{error::Error, path::PathBuf};

use burn::{
    module::Module,
    record::{BinFileRecorder, FullPrecisionSettings, Recorder},
    tensor::activation,
};
use burn_wgpu::Wgpu;
use clap::Args;
use tracing::instrument;

#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(help = "Score the image at this path")]
    image: PathBuf,
    #[arg(short, long, help = "Use the network configuration at this path")]
    config: Option<PathBuf>,
    #[arg(short, long, help = "Load recorded network parameters from this path")]
    parameters: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Name each class, in network output order"
    )]
    labels: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClassifyError {
    #[error("image is {width}x{height}, but the network's poolings require at least {minimum}x{minimum}")]
    ImageTooSmall {
        width: u32,
        height: u32,
        minimum: usize,
    },
    #[error("network scores {classes} classes, but {labels} labels were given")]
    MismatchedLabels { classes: usize, labels: usize },
}

#[instrument(name = "classify image", skip_all)]
pub fn run(args: ClassifyArgs) -> Result<(), Box<dyn Error>> {
    let config = crate::load_config(args.config)?;
    let image = image::open(&args.image)?.to_rgb8();

    let (width, height) = image.dimensions();
    let minimum = config.min_image_length();

    if (width as usize) < minimum || (height as usize) < minimum {
        return Err(ClassifyError::ImageTooSmall {
            width,
            height,
            minimum,
        }
        .into());
    }

    tracing::info!(image = %args.image.display(), width, height, "loaded image");

    let labels = match args.labels {
        Some(labels) if labels.len() != config.classes => {
            return Err(ClassifyError::MismatchedLabels {
                classes: config.classes,
                labels: labels.len(),
            }
            .into())
        }
        Some(labels) => labels,
        None => (0..config.classes)
            .map(|class| format!("class {class}"))
            .collect(),
    };

    let mut network = config.init::<Wgpu>();
    tracing::info!("initialized network");

    if let Some(parameters) = args.parameters {
        network =
            network.load_record(BinFileRecorder::<FullPrecisionSettings>::new().load(parameters)?);
        tracing::info!("loaded recorded parameters");
    }

    let logits = network.forward(whisker_network::images_to_tensor(&[image]));
    let scores = activation::softmax(logits, 1).into_data().value;

    for (label, score) in labels.iter().zip(scores) {
        println!("{label}: {score:.3}");
    }

    Ok(())
}
