// this_file: src/main.rs

//! midashi CLI: render a headline once or as a batch.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use midashi::input::{self, RequestFile, Settings};
use midashi::{ArgsDialog, ExportKind, Notice, Session, SkiaRasterizer, StyleFlags};
use midashi_core::types::BATCH_SIZE;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// midashi: headline images with a random font per character
#[derive(Parser)]
#[command(name = "midashi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the headline once and save it
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// Output file (extension added from --format when missing)
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Render the headline several times into one folder
    Batch {
        #[command(flatten)]
        request: RequestArgs,

        /// Folder to write into
        #[arg(long)]
        folder: Utf8PathBuf,

        /// Base file name; files are named <name>_<n>.<ext>
        #[arg(long, default_value = midashi::dialog::DEFAULT_BASE_NAME)]
        name: Utf8PathBuf,

        /// Number of images
        #[arg(long, default_value_t = BATCH_SIZE)]
        count: usize,
    },

    /// Validate a JSON request file and print a summary
    Validate {
        /// Request file path
        #[arg(long)]
        request: Utf8PathBuf,
    },

    /// Print version information
    Version,
}

/// Options shared by `generate` and `batch`.
#[derive(Args)]
struct RequestArgs {
    /// Headline text, 1 to 20 characters
    #[arg(short, long)]
    text: Option<String>,

    /// Font file to add to the pool (repeat for more, up to 10)
    #[arg(short, long = "font")]
    fonts: Vec<Utf8PathBuf>,

    /// Faux bold
    #[arg(long)]
    bold: bool,

    /// Faux italic (offset gray shadow)
    #[arg(long)]
    italic: bool,

    /// Underline every glyph
    #[arg(long)]
    underline: bool,

    /// Strike through every glyph
    #[arg(long)]
    strikethrough: bool,

    /// Output format: png, jpeg or pdf
    #[arg(long)]
    format: Option<ExportKind>,

    /// Seed for the font draw; omit for a fresh draw each run
    #[arg(long)]
    seed: Option<u64>,

    /// Main ink colour (#RRGGBB, #RRGGBBAA or a name)
    #[arg(long)]
    ink: Option<String>,

    /// Italic shadow colour
    #[arg(long)]
    shadow_ink: Option<String>,

    /// Load text, fonts, style and format from a JSON file; flags override it
    #[arg(long)]
    request: Option<Utf8PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl RequestArgs {
    fn overrides(&self) -> RequestFile {
        RequestFile {
            text: self.text.clone(),
            fonts: self.fonts.clone(),
            style: StyleFlags {
                bold: self.bold,
                italic: self.italic,
                underline: self.underline,
                strikethrough: self.strikethrough,
            },
            format: self.format,
            ink: self.ink.clone(),
            shadow_ink: self.shadow_ink.clone(),
            seed: self.seed,
        }
    }

    fn settings(&self) -> anyhow::Result<Settings> {
        let base = match &self.request {
            Some(path) => input::load_request_file(path)?,
            None => RequestFile::default(),
        };
        base.overlay(self.overrides()).into_settings()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { request, output } => {
            init_logging(request.verbose);
            run_generate(&request, output)?;
        }
        Commands::Batch {
            request,
            folder,
            name,
            count,
        } => {
            init_logging(request.verbose);
            run_batch(&request, folder, name, count)?;
        }
        Commands::Validate { request } => {
            init_logging(false);
            run_validate(&request)?;
        }
        Commands::Version => {
            println!("midashi {}", env!("CARGO_PKG_VERSION"));
            println!("Headline image generator (PNG, JPEG, PDF)");
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            log::debug!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn build_session(settings: &Settings, dialog: &mut ArgsDialog) -> Session<SkiaRasterizer> {
    let mut session = Session::new(SkiaRasterizer::new());
    session.set_style(settings.style);
    session.set_kind(settings.kind);
    session.set_palette(settings.palette);
    let notice = session.add_fonts(dialog);
    log::info!("{}", notice.message);
    session
}

/// Print a success notice, or turn a warning/error notice into a failing exit.
fn finish(notice: Option<Notice>) -> anyhow::Result<()> {
    match notice {
        Some(notice) if notice.is_failure() => anyhow::bail!("{notice}"),
        Some(notice) => {
            for path in &notice.saved {
                println!("{}", path.display());
            }
            log::info!("{}", notice.message.replace('\n', " "));
            Ok(())
        }
        None => {
            log::info!("Cancelled; nothing written");
            Ok(())
        }
    }
}

fn run_generate(args: &RequestArgs, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let settings = args.settings()?;
    let mut dialog = ArgsDialog::new(settings.fonts.clone())
        .with_output(output.map(Utf8PathBuf::into_std_path_buf));
    let session = build_session(&settings, &mut dialog);

    let mut rng = make_rng(settings.seed);
    finish(session.generate_once(&settings.text, &mut dialog, &mut rng))
}

fn run_batch(
    args: &RequestArgs,
    folder: Utf8PathBuf,
    name: Utf8PathBuf,
    count: usize,
) -> anyhow::Result<()> {
    if count == 0 {
        anyhow::bail!("--count must be at least 1");
    }
    if !folder.is_dir() {
        anyhow::bail!("Output folder {} does not exist", folder);
    }

    let settings = args.settings()?;
    let mut dialog = ArgsDialog::new(settings.fonts.clone())
        .with_batch(folder.into_std_path_buf(), name.into_std_path_buf());
    let session = build_session(&settings, &mut dialog);

    let mut rng = make_rng(settings.seed);
    let notice = session.generate_batch_of(&settings.text, count, &mut dialog, &mut rng);
    if let Some(saved) = notice.as_ref().map(|n| n.saved.len()) {
        if saved < count {
            log::warn!("{} of {} images could not be saved", count - saved, count);
        }
    }
    finish(notice)
}

/// Validate a request file and print summary.
fn run_validate(path: &Utf8PathBuf) -> anyhow::Result<()> {
    let settings = input::load_request_file(path)?.into_settings()?;
    let request = settings.render_request();
    request.validate()?;

    println!("✓ Valid request");
    println!("  Text: {}", settings.text);
    println!("  Fonts: {}", request.fonts.len());
    println!("  Style: {}", settings.style.label());
    println!("  Format: {}", settings.kind);
    if let Some(seed) = settings.seed {
        println!("  Seed: {}", seed);
    }
    Ok(())
}
