use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use funscript_frames::{
    ActionMode, DecoderBackend, FfmpegLogLevel, ProgressCallback, ProgressInfo, RunOptions,
    Settings, VideoOutcome,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

const CLI_AFTER_HELP: &str = "Examples:\n  funscript-frames clip.mp4\n  funscript-frames --remove-duplicates --width 400 --progress a.mp4 b.mp4\n  funscript-frames --bulk --output dataset videos/*.mp4\n  funscript-frames --mode extrapolate_frames --fill-percentage 50 clip.mp4\n  funscript-frames --completions zsh > _funscript-frames";

/// Command-line flags. Unset flags fall back to the configuration file, then
/// to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "funscript-frames",
    version,
    about = "Extract frames at funscript action timestamps, or extrapolate funscript tracks",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Videos to process. Each needs a `.funscript` file with the same stem.
    #[arg(required_unless_present = "completions")]
    videos: Vec<PathBuf>,

    /// Action to run (extract_frames, extrapolate_frames).
    #[arg(long)]
    mode: Option<ActionMode>,

    /// Width of written images in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Drop consecutive actions with an unchanged position.
    #[arg(long)]
    remove_duplicates: bool,

    /// Replace images that already exist.
    #[arg(long)]
    overwrite: bool,

    /// Save whole frames even for side-by-side VR videos.
    #[arg(long)]
    force_save: bool,

    /// Percentage of each frame gap filled by extrapolation (0-100).
    #[arg(long)]
    fill_percentage: Option<f64>,

    /// Decoder backend (cpu, gpu).
    #[arg(long)]
    decoder: Option<DecoderBackend>,

    /// Collect the images of all videos under `output/bulk`.
    #[arg(long)]
    bulk: bool,

    /// Number new images after the files already in each folder.
    #[arg(long)]
    append: bool,

    /// Directory `output/` is created in. Defaults to each video's folder.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the planned frame grabs without decoding or writing.
    #[arg(long)]
    dry_run: bool,

    /// Show a progress bar.
    #[arg(long)]
    progress: bool,

    /// Show debug logging output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, error, warning, info, debug).
    #[arg(long, default_value = "error")]
    ffmpeg_log_level: FfmpegLogLevel,

    /// Print a shell completion script and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

/// Layer the command-line flags over `settings`.
fn apply_flags(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(fill) = cli.fill_percentage {
        settings.fill_percentage = fill;
    }
    if let Some(decoder) = cli.decoder {
        settings.decoder = decoder;
    }
    if cli.output.is_some() {
        settings.output = cli.output.clone();
    }
    settings.remove_duplicates |= cli.remove_duplicates;
    settings.overwrite |= cli.overwrite;
    settings.force_save |= cli.force_save;
    settings.bulk |= cli.bulk;
    settings.append |= cli.append;
    settings
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}",
        )?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total);
        self.bar.set_position(info.current);
        self.bar.set_message(format!("{} saved", info.saved));
        if info.current_frame.is_none() {
            self.bar.finish_with_message(format!("{} saved", info.saved));
        }
    }
}

fn dry_run(videos: &[PathBuf], options: &RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    for video in videos {
        match options.mode {
            ActionMode::ExtractFrames => {
                let requests = funscript_frames::plan_video_frames(video, options)?;
                println!("{} {}", "plan".cyan().bold(), video.display());
                for request in &requests {
                    println!(
                        "  {:>8}ms  frame {:>7}  -> {}",
                        request.at,
                        request.frame_index,
                        request.output_path.display(),
                    );
                }
            }
            ActionMode::ExtrapolateFrames => {
                println!(
                    "{} {} -> {}",
                    "plan".cyan().bold(),
                    video.display(),
                    funscript_frames::extrapolated_track_path_for(video).display(),
                );
            }
        }
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "funscript-frames", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);
    funscript_frames::set_ffmpeg_log_level(cli.ffmpeg_log_level);

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let settings = apply_flags(settings, &cli);
    let mut options = settings.run_options()?;

    if cli.dry_run {
        return dry_run(&cli.videos, &options);
    }

    if cli.progress {
        let progress = Arc::new(TerminalProgress::new()?);
        options.extract = options.extract.clone().with_progress(progress);
    }

    let summary = funscript_frames::run(&cli.videos, &options)?;

    for (video, outcome) in &summary.videos {
        match outcome {
            VideoOutcome::Extracted(result) => println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "{}: {} image(s) saved, {} skipped",
                    video.display(),
                    result.saved,
                    result.skipped,
                )
                .green()
            ),
            VideoOutcome::Extrapolated(result) => println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "{}: {} -> {} actions, saved {}",
                    video.display(),
                    result.report.source,
                    result.report.total,
                    result.output_path.display(),
                )
                .green()
            ),
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
