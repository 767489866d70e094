use argh::FromArgs;
use std::path::PathBuf;

use firemask::imgproc::threshold::{ThresholdMethod, ThresholdOptions};
use firemask::io::batch;

#[derive(FromArgs)]
/// Convert a folder of thermal rasters into binary fire masks
struct Args {
    /// path to the input folder
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output folder
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// thresholding mode: BINARY, HYST or OTSU
    #[argh(option, short = 'm', default = "String::from(\"OTSU\")")]
    mode: String,

    /// fixed threshold for BINARY mode, in raster units
    #[argh(option, default = "50.0")]
    binary_threshold: f32,

    /// low threshold for HYST mode
    #[argh(option, default = "50.0")]
    low_threshold: f32,

    /// high threshold for HYST mode
    #[argh(option, default = "150.0")]
    high_threshold: f32,

    /// treat rasters as thermal (integer degree values, no rounding)
    #[argh(switch)]
    thermal: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let opts = ThresholdOptions {
        binary_threshold: args.binary_threshold,
        low_threshold: args.low_threshold,
        high_threshold: args.high_threshold,
        thermal: args.thermal,
    };
    let method = ThresholdMethod::from_mode(&args.mode, &opts)?;

    let outcome = batch::convert_folder(&args.input, &args.output, method)?;

    log::info!(
        "converted {} images ({} skipped)",
        outcome.processed,
        outcome.skipped
    );
    if let Some(mean) = outcome.report.mean() {
        println!("Mean Optimal Threshold = {mean}");
    }

    Ok(())
}
