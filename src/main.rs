use clap::{Parser, Subcommand};
use rastermill::{ImageInput, ProcessRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rastermill")]
#[command(about = "Declarative raster image processing engine")]
#[command(long_about = "\
Declarative raster image processing engine

Images go in as PNG, JPEG or WebP; a JSON request describes one operation
(filter, transform, adjust, or effect); the processed image comes back in
the requested container format.

Request examples:

  {\"operation\": \"filter\", \"filter\": \"grayscale\", \"intensity\": 1.0}
  {\"operation\": \"transform\", \"resize\": {\"width\": 800, \"keep_aspect_ratio\": true}}
  {\"operation\": \"adjust\", \"brightness\": 1.2, \"saturation\": 0.8}
  {\"operation\": \"effect\", \"effect\": \"threshold\", \"intensity\": 0.5,
   \"output_format\": \"jpeg\", \"quality\": 90}

Run 'rastermill filters' or 'rastermill effects' to list catalog names.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process one image file with a JSON request
    Process {
        /// Input image (PNG, JPEG or WebP)
        image: PathBuf,
        /// Request JSON: inline (starts with '{') or a path to a .json file
        #[arg(long)]
        request: String,
        /// Write the processed image here instead of printing the JSON result
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Process several image files with the same request, printing a batch report
    Batch {
        /// Input images, processed in argument order
        images: Vec<PathBuf>,
        /// Request JSON: inline (starts with '{') or a path to a .json file
        #[arg(long)]
        request: String,
    },
    /// Validate an image without transforming it: dimensions and size
    Inspect {
        image: PathBuf,
    },
    /// List supported filter names
    Filters,
    /// List supported effect names
    Effects,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Process {
            image,
            request,
            out,
        } => {
            let request = load_request(&request)?;
            let input = ImageInput::Binary(std::fs::read(&image)?);
            let result = rastermill::process(&input, &request);
            let success = result.success;

            match out {
                Some(path) if result.success => {
                    let bytes = result
                        .binary_data
                        .or_else(|| decode_payload(result.image_data.as_deref()))
                        .ok_or("result carried no image payload")?;
                    std::fs::write(&path, bytes)?;
                    println!("wrote {}", path.display());
                }
                _ => println!("{}", serde_json::to_string_pretty(&result)?),
            }
            if !success {
                std::process::exit(1);
            }
        }
        Command::Batch { images, request } => {
            let request = load_request(&request)?;
            // Batch mode requires string-encoded inputs, so files are read
            // and base64-encoded before submission.
            let inputs: Vec<ImageInput> = images
                .iter()
                .map(|path| {
                    std::fs::read(path)
                        .map(|bytes| ImageInput::Text(rastermill::codec::to_base64(&bytes)))
                })
                .collect::<Result<_, _>>()?;
            let batch = rastermill::process_batch(&inputs, &request)?;
            println!("{}", serde_json::to_string_pretty(&batch)?);
            if batch.failed > 0 {
                std::process::exit(1);
            }
        }
        Command::Inspect { image } => {
            let input = ImageInput::Binary(std::fs::read(&image)?);
            let report = rastermill::inspect(&input);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.valid {
                std::process::exit(1);
            }
        }
        Command::Filters => {
            println!("{}", serde_json::to_string_pretty(&rastermill::filter_names())?);
        }
        Command::Effects => {
            println!("{}", serde_json::to_string_pretty(&rastermill::effect_names())?);
        }
    }

    Ok(())
}

/// Accept a request as inline JSON or as a path to a JSON file.
fn load_request(raw: &str) -> Result<ProcessRequest, Box<dyn std::error::Error>> {
    let json = if raw.trim_start().starts_with('{') {
        raw.to_string()
    } else {
        std::fs::read_to_string(raw)?
    };
    Ok(serde_json::from_str(&json)?)
}

fn decode_payload(image_data: Option<&str>) -> Option<Vec<u8>> {
    let input = ImageInput::Text(image_data?.to_string());
    rastermill::codec::normalize(&input).ok()
}
