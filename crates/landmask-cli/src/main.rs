use std::path::PathBuf;

use argh::FromArgs;

use landmask::dataset::{self, BatchReport, DatasetConfig};

#[derive(FromArgs, Debug)]
/// Prepare a landmark dataset: resize images, split them and compute face masks.
struct Args {
    /// path to a JSON config file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// dataset root directory, overrides the config file
    #[argh(option, short = 'r')]
    root: Option<PathBuf>,

    /// hide the progress bar
    #[argh(switch, short = 'q')]
    quiet: bool,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Resize(ResizeArgs),
    ReResize(ReResizeArgs),
    Rename(RenameArgs),
    Split(SplitArgs),
    Masks(MasksArgs),
}

#[derive(FromArgs, Debug)]
/// Resize the annotated images and their labels.
#[argh(subcommand, name = "resize")]
struct ResizeArgs {
    /// output width, overrides the config file
    #[argh(option)]
    width: Option<usize>,

    /// output height, overrides the config file
    #[argh(option)]
    height: Option<usize>,
}

#[derive(FromArgs, Debug)]
/// Resize the output of `resize` again.
#[argh(subcommand, name = "re-resize")]
struct ReResizeArgs {
    /// output width, overrides the config file
    #[argh(option)]
    width: Option<usize>,

    /// output height, overrides the config file
    #[argh(option)]
    height: Option<usize>,
}

#[derive(FromArgs, Debug)]
/// Renumber the images of a directory to 0.jpg, 1.jpg, ...
#[argh(subcommand, name = "rename")]
struct RenameArgs {
    /// directory to renumber
    #[argh(option, short = 'd')]
    dir: PathBuf,
}

#[derive(FromArgs, Debug)]
/// Load the resized images and report the train/validation split.
#[argh(subcommand, name = "split")]
struct SplitArgs {}

#[derive(FromArgs, Debug)]
/// Compute the face-region mask of every annotated image.
#[argh(subcommand, name = "masks")]
struct MasksArgs {}

fn override_size(size: &mut [usize; 2], width: Option<usize>, height: Option<usize>) {
    if let Some(width) = width {
        size[0] = width;
    }
    if let Some(height) = height {
        size[1] = height;
    }
}

fn print_report(command: &str, report: &BatchReport) {
    println!("{command}: {report}");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => DatasetConfig::from_json_file(path)?,
        None => DatasetConfig::default(),
    };
    if let Some(root) = args.root {
        config.root = root;
    }
    if args.quiet {
        config.show_progress = false;
    }

    log::debug!("{config:?}");

    match args.command {
        Command::Resize(cmd) => {
            override_size(&mut config.output_size, cmd.width, cmd.height);
            print_report("resize", &dataset::resize_dataset(&config)?);
        }
        Command::ReResize(cmd) => {
            override_size(&mut config.re_resize_size, cmd.width, cmd.height);
            print_report("re-resize", &dataset::re_resize_dataset(&config)?);
        }
        Command::Rename(cmd) => {
            print_report("rename", &dataset::rename_dataset(&config, &cmd.dir)?);
        }
        Command::Split(_) => {
            let split = dataset::load_resized_dataset(&config)?;
            println!(
                "split: {} training images, {} validation images",
                split.num_train(),
                split.num_valid()
            );
        }
        Command::Masks(_) => {
            print_report("masks", &dataset::compute_masks(&config)?);
        }
    }

    Ok(())
}
