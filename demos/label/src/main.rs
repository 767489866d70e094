use argh::FromArgs;
use std::path::PathBuf;

use firemask::io::batch;

#[derive(FromArgs)]
/// Label a folder of thermal rasters against their binary fire masks
struct Args {
    /// path to the folder of original thermal rasters
    #[argh(option, short = 'r')]
    rasters: PathBuf,

    /// path to the folder of binary fire masks
    #[argh(option, short = 'm')]
    masks: PathBuf,

    /// path to the output folder for label maps
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// number of severity classes
    #[argh(option, short = 'n', default = "3")]
    num_classes: usize,

    /// additive tolerance for boundary matching
    #[argh(option, default = "0.3")]
    tolerance: f64,

    /// verify the written label maps afterwards
    #[argh(switch)]
    check: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let outcome = batch::label_folder(
        &args.rasters,
        &args.masks,
        &args.output,
        args.num_classes,
        args.tolerance,
    )?;

    log::info!(
        "labeled {} images ({} skipped, {} anomalous values)",
        outcome.processed,
        outcome.skipped,
        outcome.anomalies
    );

    if args.check {
        let invalid = batch::check_labels_folder(&args.output, args.num_classes)?;
        if invalid.is_empty() {
            println!("all label maps verified");
        } else {
            println!("{} label maps failed verification", invalid.len());
        }
    }

    Ok(())
}
