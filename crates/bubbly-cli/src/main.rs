mod svg;

use bubbly::chart::{Algorithm, ForceOptions, RelaxationOptions};
use bubbly::{Chart, ChartConfig, Selection};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Chart(bubbly::ChartError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Chart(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<bubbly::ChartError> for CliError {
    fn from(value: bubbly::ChartError) -> Self {
        Self::Chart(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum AlgoKind {
    #[default]
    Relax,
    Force,
}

impl FromStr for AlgoKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relax" | "relaxation" => Ok(Self::Relax),
            "force" => Ok(Self::Force),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    width: f64,
    height: f64,
    margin: f64,
    min_radius: f64,
    max_radius: f64,
    seed: u64,
    algo: AlgoKind,
    top: Option<usize>,
    range: Option<(usize, usize)>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "bubbly-cli\n\
\n\
USAGE:\n\
  bubbly-cli [layout] [--pretty] [options] [<path>|-]\n\
  bubbly-cli render [--out <path>] [options] [<path>|-]\n\
\n\
OPTIONS:\n\
  --width <px> --height <px>     chart size (default 900x600)\n\
  --margin <px>                  minimum gap between bubble edges (default 5)\n\
  --min-radius <px> --max-radius <px>\n\
                                 bubble size range (default 14..42)\n\
  --algorithm relax|force        layout family (default relax)\n\
  --seed <n>                     RNG seed for the force family (default 0)\n\
  --top <n>                      keep only the n highest-volume assets\n\
  --range <k:m>                  keep volume ranks k through m (1-based)\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the payload is read from stdin.\n\
  - layout prints the settled chart as JSON to stdout.\n\
  - render prints a static SVG to stdout by default; use --out to write a file.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let config = ChartConfig::default();
    let mut args = Args {
        width: config.width,
        height: config.height,
        margin: config.margin,
        min_radius: config.min_radius,
        max_radius: config.max_radius,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--width" => args.width = next_f64(&mut it)?,
            "--height" => args.height = next_f64(&mut it)?,
            "--margin" => args.margin = next_f64(&mut it)?,
            "--min-radius" => args.min_radius = next_f64(&mut it)?,
            "--max-radius" => args.max_radius = next_f64(&mut it)?,
            "--seed" => {
                let Some(seed) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--algorithm" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.algo = kind
                    .parse::<AlgoKind>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--top" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.top = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--range" => {
                let Some(spec) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.range = Some(parse_range(spec).ok_or(CliError::Usage(usage()))?);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.top.is_some() && args.range.is_some() {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn next_f64(it: &mut std::iter::Peekable<std::iter::Skip<std::slice::Iter<'_, String>>>) -> Result<f64, CliError> {
    let Some(raw) = it.next() else {
        return Err(CliError::Usage(usage()));
    };
    let value = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !value.is_finite() {
        return Err(CliError::Usage(usage()));
    }
    Ok(value)
}

fn parse_range(spec: &str) -> Option<(usize, usize)> {
    let (start, end) = spec.split_once(':')?;
    let start = start.trim().parse::<usize>().ok()?;
    let end = end.trim().parse::<usize>().ok()?;
    Some((start, end))
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn build_chart(args: &Args) -> Chart {
    let config = ChartConfig {
        width: args.width,
        height: args.height,
        margin: args.margin,
        min_radius: args.min_radius,
        max_radius: args.max_radius,
    };

    let selection = if let Some((start, end)) = args.range {
        Selection::Range { start, end }
    } else if let Some(n) = args.top {
        Selection::Top(n)
    } else {
        Selection::All
    };

    let algorithm = match args.algo {
        AlgoKind::Relax => Algorithm::Relaxation(RelaxationOptions {
            margin: args.margin,
            ..RelaxationOptions::default()
        }),
        AlgoKind::Force => Algorithm::Force(ForceOptions {
            random_seed: args.seed,
            margin: args.margin,
            ..ForceOptions::default()
        }),
    };

    Chart::new(config)
        .with_selection(selection)
        .with_algorithm(algorithm)
}

fn run(args: Args) -> Result<(), CliError> {
    let payload = read_input(args.input.as_deref())?;
    let layout = build_chart(&args).layout_payload(&payload)?;

    match args.command {
        Command::Layout => write_json(&layout, args.pretty),
        Command::Render => write_text(&svg::render_chart(&layout), args.out.as_deref()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
