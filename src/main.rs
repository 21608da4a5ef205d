use cam_site::generate::{self, SiteRequest};
use cam_site::prepare::{self, PrepareRequest};
use cam_site::{config, output};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Flags shared by commands that read a camera selection.
#[derive(clap::Args, Clone)]
struct CameraArgs {
    /// Camera directory names, in display order
    #[arg(long, num_args = 1.., required = true)]
    cameras: Vec<String>,

    /// Only handle this day (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Config file (default: cam-site.toml in the output directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "cam-site")]
#[command(about = "Static archive site generator for security camera snapshots")]
#[command(long_about = "\
Static archive site generator for security camera snapshots

Cameras upload snapshots into one directory per camera, sorted by day:

  root/
  ├── front/                           # Camera directory (--cameras front)
  │   └── 2021/03/13/
  │       ├── Front_20210313090000.jpg # <Camera>_<YYYYMMDDhhmmss>.<ext>
  │       └── Front_20210313090003.mp4 # Video 3s later → merged with the image
  └── back/
      └── ...

'prepare' merges images and videos that belong together and links them into
the web root, then creates thumbnails:

  web/
  ├── images/front/2021/03/13/Front_20210313090000.{jpg,mp4}
  └── thumbnails/front/2021/03/13/Front_20210313090000.jpg

'create' renders index.html (latest snapshots + calendar) and one
YYYY-MM-DD.html archive page per day.

Run 'cam-site gen-config' to generate a documented cam-site.toml.")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print the run report as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge, publish and thumbnail camera snapshots into the web root
    Prepare {
        /// Directory holding the camera directories
        #[arg(long)]
        root: PathBuf,

        /// Output directory for images and thumbnails
        #[arg(long)]
        web_root: PathBuf,

        #[command(flatten)]
        cameras: CameraArgs,
    },
    /// Render the HTML site from a prepared web root
    Create {
        /// Site title
        #[arg(long)]
        name: String,

        /// Prepared web root; pages are written here
        #[arg(long)]
        dir: PathBuf,

        #[command(flatten)]
        cameras: CameraArgs,
    },
    /// Print a stock cam-site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Prepare {
            root,
            web_root,
            cameras,
        } => {
            let site_config = config::load_config(cameras.config.as_deref(), &web_root)?;
            init_thread_pool(&site_config.processing);
            let request = PrepareRequest {
                root,
                web_root,
                cameras: cameras.cameras,
                date: cameras.date,
            };
            let report = prepare::prepare(&request, &site_config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_prepare_output(&report);
            }
        }
        Command::Create { name, dir, cameras } => {
            let site_config = config::load_config(cameras.config.as_deref(), &dir)?;
            let request = SiteRequest {
                name,
                web_root: dir,
                cameras: cameras.cameras,
                date: cameras.date,
            };
            let report = generate::create_site(&request, &site_config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_site_output(&report);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level from `warn`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
