use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use editdesk::config::{load_app_config, AppConfig};
use editdesk::gallery::{format_file_size, stage_files};
use editdesk::session::{EditOperation, EditSession};
use editdesk::transport::HttpImageServer;
use editdesk::upload::CandidateFile;
use editdesk::view::{SessionView, TextWeatherDisplay};
use editdesk::weather::{self, city_query, HttpWeatherClient, PollTrigger, WeatherPoller};

#[derive(Debug, Parser)]
#[command(name = "editdesk", version, about = "Image editing and weather dashboard client")]
struct Cli {
    /// Base URL of the server; overrides `server_url` in config.json.
    #[arg(long, global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload an image, apply rotations, optionally reset and download.
    Edit(EditArgs),
    /// Check a multi-file selection against the gallery rules.
    Stage(StageArgs),
    /// Show current conditions and the 5-day forecast.
    Weather(WeatherArgs),
    /// List the city presets.
    Cities,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Rotation {
    Left,
    Right,
}

impl From<Rotation> for EditOperation {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Left => EditOperation::RotateLeft,
            Rotation::Right => EditOperation::RotateRight,
        }
    }
}

#[derive(Debug, Parser)]
struct EditArgs {
    file: PathBuf,
    #[arg(long = "rotate", value_enum)]
    rotations: Vec<Rotation>,
    /// Drop every edit and go back to the uploaded original.
    #[arg(long)]
    reset: bool,
    /// Skip the reset confirmation prompt.
    #[arg(long)]
    yes: bool,
    /// File or directory to save the current image to.
    #[arg(long)]
    download: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct StageArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Parser)]
struct WeatherArgs {
    #[arg(long)]
    city: Option<String>,
    /// Keep refreshing; Enter refreshes now, a city name switches city.
    #[arg(long)]
    watch: bool,
}

fn main() -> Result<()> {
    editdesk::logging::init();
    let cli = Cli::parse();
    let mut config = load_app_config();
    if let Some(server) = cli.server {
        config.server_url = Some(server);
    }

    match cli.command {
        Command::Edit(args) => run_edit(&config, args),
        Command::Stage(args) => run_stage(&config, args),
        Command::Weather(args) => run_weather(&config, args),
        Command::Cities => {
            for (name, query) in weather::CITY_PRESETS {
                println!("{name}\t{query}");
            }
            Ok(())
        }
    }
}

fn print_session(session: &EditSession) {
    if let Some(view) = SessionView::project(session.state()) {
        println!("{view}\n");
    }
}

fn run_edit(config: &AppConfig, args: EditArgs) -> Result<()> {
    let server = HttpImageServer::new(config.server_url())?;
    let file = CandidateFile::from_path(&args.file)
        .with_context(|| format!("cannot open {}", args.file.display()))?;

    let mut session = EditSession::new();
    session
        .upload(&server, &config.upload_policy(), &file)
        .with_context(|| format!("uploading {}", file.name))?;
    print_session(&session);

    for rotation in args.rotations {
        let operation = EditOperation::from(rotation);
        session
            .edit(&server, operation)
            .with_context(|| format!("applying {operation}"))?;
        print_session(&session);
    }

    if args.reset {
        let skip_prompt = args.yes;
        let outcome = session
            .reset(&server, || skip_prompt || confirm("Reset all edits?"))
            .context("resetting image")?;
        match outcome {
            Some(_) => print_session(&session),
            None => println!("Reset cancelled.\n"),
        }
    }

    if let Some(destination) = args.download {
        let (target, bytes) = session.download(&server).context("downloading image")?;
        let path = if destination.is_dir() {
            destination.join(&target.file_name)
        } else {
            destination
        };
        std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn run_stage(config: &AppConfig, args: StageArgs) -> Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(
            CandidateFile::from_path(path)
                .with_context(|| format!("cannot open {}", path.display()))?,
        );
    }

    let batch = stage_files(&config.upload_policy(), files);
    for file in batch.accepted() {
        println!("{}\t{}", file.name, format_file_size(file.size));
    }
    for warning in batch.warnings() {
        eprintln!("warning: {warning}");
    }
    match batch.upload_label() {
        Some(label) => println!("[{label}]"),
        None => println!("Nothing to upload."),
    }
    Ok(())
}

fn run_weather(config: &AppConfig, args: WeatherArgs) -> Result<()> {
    let api = HttpWeatherClient::new(config.server_url())?;
    let city = city_query(args.city.as_deref().unwrap_or(config.weather_city())).to_string();
    let display = TextWeatherDisplay::new(io::stdout(), config.day_names());

    if !args.watch {
        let mut display = display;
        weather::refresh(&api, &mut display, &city)?;
        return Ok(());
    }

    let poller = WeatherPoller::spawn(api, display, city, config.weather_refresh_interval());
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        let trigger = if line.is_empty() {
            PollTrigger::RefreshNow
        } else {
            PollTrigger::City(city_query(line).to_string())
        };
        if !poller.trigger(trigger) {
            break;
        }
    }
    poller
        .shutdown()
        .map_err(|_| anyhow::anyhow!("weather poller panicked"))?;
    Ok(())
}
