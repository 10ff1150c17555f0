use clap::{Args, Parser, Subcommand};
use onsight::io::load_gray_image;
use onsight::{
    ActionGroup, AutomationConfig, ClickOutcome, CorrelationPrimitive, EnigoPointer, Locator,
    LocatorConfig, Match, NoopPointer, Pointer, PrimitiveConfig, ScreenSource, SearchOutcome,
    SearchPhase, StaticScreen, Template, XcapScreen,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Find and click on-screen images")]
struct Cli {
    /// Enable tracing output (filter with RUST_LOG).
    #[arg(long, global = true)]
    trace: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for a template and print the outcome as JSON.
    Locate(SearchArgs),
    /// Search for a template and click its center.
    Click {
        #[command(flatten)]
        search: SearchArgs,
        /// Log the click instead of moving the pointer.
        #[arg(long)]
        dry_run: bool,
    },
    /// Run named actions from a config file in order.
    Run {
        /// Path to the JSON configuration file.
        #[arg(short, long, value_name = "FILE", default_value = "onsight.json")]
        config: PathBuf,
        /// Log clicks instead of moving the pointer.
        #[arg(long)]
        dry_run: bool,
        /// Action names, in execution order.
        #[arg(required = true)]
        actions: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Template image to look for.
    template: PathBuf,
    /// Timeout per search cycle, in seconds.
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,
    /// Number of full search cycles.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    retries: u32,
    /// Default similarity level (out-of-range values fall back to 0.8).
    #[arg(short, long)]
    similarity: Option<f32>,
    /// Search this image instead of the live screen.
    #[arg(long, value_name = "FILE")]
    screenshot: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Found,
    NotFound,
    ResourceMissing,
    Cancelled,
    ClickFailed,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    score: f32,
    level: f32,
    phase: &'static str,
}

impl From<&Match> for MatchRecord {
    fn from(value: &Match) -> Self {
        Self {
            x: value.region.x,
            y: value.region.y,
            width: value.region.width,
            height: value.region.height,
            score: value.score,
            level: value.level,
            phase: match value.phase {
                SearchPhase::Probe => "probe",
                SearchPhase::Wait => "wait",
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    found: Option<MatchRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Output {
    fn from_search(outcome: &SearchOutcome) -> Self {
        let status = match outcome {
            SearchOutcome::Found(_) => Status::Found,
            SearchOutcome::NotFound => Status::NotFound,
            SearchOutcome::ResourceMissing => Status::ResourceMissing,
            SearchOutcome::Cancelled => Status::Cancelled,
        };
        Self {
            status,
            found: outcome.found().map(MatchRecord::from),
            error: None,
        }
    }

    fn from_click(outcome: &ClickOutcome) -> Self {
        match outcome {
            ClickOutcome::Clicked(m) => Self {
                status: Status::Found,
                found: Some(m.into()),
                error: None,
            },
            ClickOutcome::NotFound => Self::from_search(&SearchOutcome::NotFound),
            ClickOutcome::ResourceMissing => Self::from_search(&SearchOutcome::ResourceMissing),
            ClickOutcome::Cancelled => Self::from_search(&SearchOutcome::Cancelled),
            ClickOutcome::Failed { at, error } => Self {
                status: Status::ClickFailed,
                found: Some(at.into()),
                error: Some(error.to_string()),
            },
        }
    }

    fn is_success(&self) -> bool {
        matches!(self.status, Status::Found)
    }
}

fn build_locator<S: ScreenSource>(
    screen: S,
    args: &SearchArgs,
) -> Result<Locator<CorrelationPrimitive<S>>, Box<dyn std::error::Error>> {
    let primitive = CorrelationPrimitive::new(screen).with_config(PrimitiveConfig::default());
    let mut locator = Locator::new(primitive, &LocatorConfig::default())?;
    if let Some(similarity) = args.similarity {
        locator.set_similarity(similarity);
    }
    Ok(locator)
}

fn search<S: ScreenSource>(
    screen: S,
    args: &SearchArgs,
    pointer: Option<&dyn Pointer>,
) -> Result<Output, Box<dyn std::error::Error>> {
    let locator = build_locator(screen, args)?;
    let template = Template::new(&args.template);
    let timeout = Duration::from_secs(args.timeout);
    let output = match pointer {
        Some(pointer) => Output::from_click(&locator.click_with_retry(
            pointer,
            &template,
            timeout,
            args.retries,
        )),
        None => Output::from_search(&locator.locate_with_retry(&template, timeout, args.retries)),
    };
    Ok(output)
}

fn search_any_screen(
    args: &SearchArgs,
    pointer: Option<&dyn Pointer>,
) -> Result<Output, Box<dyn std::error::Error>> {
    match &args.screenshot {
        Some(path) => search(StaticScreen::new(load_gray_image(path)?), args, pointer),
        None => search(XcapScreen::new(), args, pointer),
    }
}

fn run_actions(
    config_path: &Path,
    actions: &[String],
    dry_run: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let config = AutomationConfig::load(config_path)?;
    if !config.assets_dir_exists() {
        return Err(format!(
            "assets directory does not exist: {}",
            config.assets_dir.display()
        )
        .into());
    }

    let primitive = CorrelationPrimitive::new(XcapScreen::new()).with_config(config.primitive_config());
    let locator = Locator::new(primitive, &config.locator)?;
    let noop = NoopPointer;
    let real;
    let pointer: &dyn Pointer = if dry_run {
        &noop
    } else {
        real = EnigoPointer::new()?;
        &real
    };

    let group = ActionGroup::new(&locator, pointer, &config);
    match group.run_sequence(actions) {
        Ok(done) => {
            tracing::info!(steps = done.len(), "all actions completed");
            Ok(true)
        }
        Err(err) => {
            tracing::error!(%err, "sequence failed");
            eprintln!("{err}");
            Ok(false)
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("onsight=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        return Err("no command given; see --help".into());
    };

    let success = match command {
        Command::Locate(args) => {
            let output = search_any_screen(&args, None)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            output.is_success()
        }
        Command::Click { search, dry_run } => {
            let output = if dry_run {
                search_any_screen(&search, Some(&NoopPointer))?
            } else {
                let pointer = EnigoPointer::new()?;
                search_any_screen(&search, Some(&pointer))?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            output.is_success()
        }
        Command::Run {
            config,
            dry_run,
            actions,
        } => run_actions(&config, &actions, dry_run)?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
