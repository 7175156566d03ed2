use log::{error, info};
use route_animator::api::{lock_animator, AnimatorEvent, FrameDriver, RouteAnimator, RoutePlanner};
use route_animator::api::formatting::{CsvFormatter, SampleFormatter};
use route_animator::{
    AnimationConfig, Clock, ConfigurationManager, Gazetteer, OutputFormat, ProgressSample,
    SystemClock,
};
use std::sync::{mpsc, Arc, Mutex};

/// Parsed command line
#[derive(Debug, PartialEq)]
struct CliArgs {
    from: String,
    to: String,
    config_path: Option<String>,
    cycles: u32,
    format: Option<OutputFormat>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} <from> <to> [--config FILE] [--cycles N] [--format text|json|csv]",
        program
    )
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let program = args.first().map_or("route-animator", |s| s.as_str());
    let mut positional = Vec::new();
    let mut config_path = None;
    let mut cycles = 1;
    let mut format = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(iter.next().ok_or("--config needs a file path")?.clone());
            }
            "--cycles" => {
                let value = iter.next().ok_or("--cycles needs a number")?;
                cycles = value
                    .parse::<u32>()
                    .map_err(|e| format!("invalid cycle count '{}': {}", value, e))?;
            }
            "--format" => {
                let value = iter.next().ok_or("--format needs text, json or csv")?;
                format = Some(value.parse::<OutputFormat>()?);
            }
            "-h" | "--help" => return Err(usage(program)),
            _ => positional.push(arg.clone()),
        }
    }

    match <[String; 2]>::try_from(positional) {
        Ok([from, to]) => Ok(CliArgs {
            from,
            to,
            config_path,
            cycles,
            format,
        }),
        Err(_) => Err(usage(program)),
    }
}

fn load_config(path: Option<&str>) -> Result<AnimationConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ConfigurationManager::from_file(path)?.get_config().clone()),
        None => Ok(ConfigurationManager::new().get_config().clone()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            return Err("Invalid arguments".into());
        }
    };

    let config = load_config(cli.config_path.as_deref())?;
    env_logger::Builder::new()
        .filter_level(config.log_level.to_filter())
        .parse_default_env()
        .init();

    let format = cli.format.unwrap_or(config.output_format);
    let formatter = SampleFormatter::new()
        .with_format(format)
        .with_precision(config.precision);
    if format == OutputFormat::Csv {
        println!("{}", CsvFormatter::new().header());
    }

    let mut planner = RoutePlanner::from_config(Gazetteer::from_places(&config.places)?, &config);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let shared = Arc::new(Mutex::new(RouteAnimator::new(clock)));

    let (tx, rx) = mpsc::channel();
    {
        let mut animator = lock_animator(&shared);
        animator.register_sample_callback(Box::new(move |sample: &ProgressSample| {
            match formatter.render(sample) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("Failed to format sample: {}", e),
            }
        }));
        animator.register_event_callback(Box::new(move |event: &AnimatorEvent| {
            if let AnimatorEvent::Rearmed { .. } = event {
                let _ = tx.send(());
            }
        }));
        planner.submit(&cli.from, &cli.to, &mut animator)?;
    }

    let mut driver = FrameDriver::spawn(Arc::clone(&shared), config.frame_interval_ms);
    for completed in 1..=cli.cycles {
        rx.recv()?;
        info!("Traversal {} of {} completed", completed, cli.cycles);
    }

    planner.cancel(&mut lock_animator(&shared));
    driver.stop();

    let stats = lock_animator(&shared).stats();
    info!(
        "Delivered {} frames, emitted {} samples over {} epochs",
        driver.frames_delivered(),
        stats.samples_emitted,
        stats.epochs_armed
    );
    Ok(())
}
