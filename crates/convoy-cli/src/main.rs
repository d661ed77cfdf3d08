use convoy::raster::{AnimationOptions, RasterOptions};
use convoy::{NetworkRecord, Rendered, SolutionRecord, VisualizeOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Model(convoy::Error),
    Pipeline(convoy::PipelineError),
    Raster(convoy::raster::RasterError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Model(err) => write!(f, "{err}"),
            CliError::Pipeline(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<convoy::Error> for CliError {
    fn from(value: convoy::Error) -> Self {
        Self::Model(value)
    }
}

impl From<convoy::PipelineError> for CliError {
    fn from(value: convoy::PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

impl From<convoy::raster::RasterError> for CliError {
    fn from(value: convoy::raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Animate,
}

#[derive(Debug, Clone, Copy, Default)]
enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    network: Option<PathBuf>,
    format: OutputFormat,
    out: Option<String>,
    scale: f32,
    seed: u64,
    fps: u32,
    inputs: Vec<PathBuf>,
}

fn usage() -> &'static str {
    "convoy-cli\n\
\n\
USAGE:\n\
  convoy-cli [render] [--network <path>] [--format svg|png] [--scale <n>] [--seed <n>] [--out <path>|-] <solution.json>...\n\
  convoy-cli animate [--network <path>] [--format svg|png] [--scale <n>] [--seed <n>] [--fps <n>] [--out <path>|-] <solution.json>...\n\
\n\
NOTES:\n\
  - Artifacts are written next to each input by default (<input>.svg or .png; animate adds <input>.gif).\n\
  - --out applies to a single input only; '-' streams the static artifact to stdout.\n\
  - animate writes the static diagram first and composes the GIF afterwards; a GIF failure keeps the static artifact.\n\
  - With --network, routes are drawn over the declared topology; without it, routes alone are laid out.\n\
  - Oversized graphs (more than 500 unique nodes) are skipped with a note, not an error.\n\
  - Unreadable or malformed solution files are reported and the batch continues.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Render,
        scale: 1.0,
        seed: convoy::DEFAULT_LAYOUT_SEED,
        fps: 2,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" if args.inputs.is_empty() => args.command = Command::Render,
            "animate" if args.inputs.is_empty() => args.command = Command::Animate,
            "--network" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.network = Some(PathBuf::from(path));
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<OutputFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--seed" => {
                let Some(seed) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--fps" => {
                let Some(fps) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.fps = fps.parse::<u32>().map_err(|_| CliError::Usage(usage()))?;
                if args.fps == 0 {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                for rest in it.by_ref() {
                    args.inputs.push(PathBuf::from(rest));
                }
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => args.inputs.push(PathBuf::from(path)),
        }
    }

    if args.inputs.is_empty() {
        return Err(CliError::Usage(usage()));
    }
    if args.out.is_some() && args.inputs.len() > 1 {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

#[derive(Debug, Default)]
struct RunSummary {
    wrote: usize,
    skipped: usize,
    failed: usize,
}

impl RunSummary {
    fn all_failed(&self) -> bool {
        self.failed > 0 && self.wrote == 0 && self.skipped == 0
    }
}

#[derive(Debug, Clone, Copy)]
enum ItemOutcome {
    Wrote,
    Skipped,
}

fn load_network(path: &Path) -> Result<NetworkRecord, CliError> {
    let text = std::fs::read_to_string(path)?;
    Ok(NetworkRecord::from_json_str(&text)?)
}

fn static_out_path(input: &Path, args: &Args) -> PathBuf {
    match &args.out {
        Some(out) => PathBuf::from(out),
        None => input.with_extension(args.format.extension()),
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if path.as_os_str() == "-" {
        use std::io::Write;
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        convoy::write_artifact(path, bytes)?;
    }
    Ok(())
}

fn process_input(
    input: &Path,
    network: Option<&NetworkRecord>,
    args: &Args,
    options: &VisualizeOptions,
    raster: &RasterOptions,
    animation: &AnimationOptions,
) -> Result<ItemOutcome, CliError> {
    let text = std::fs::read_to_string(input)?;
    let solution = SolutionRecord::from_json_str(&text)?;

    let static_out = static_out_path(input, args);
    let rendered = match args.format {
        OutputFormat::Svg => convoy::render_diagram(network, &solution, options)?
            .into_artifact()
            .map(String::into_bytes),
        OutputFormat::Png => {
            convoy::raster::render_diagram_png(network, &solution, options, raster)?
                .into_artifact()
        }
    };
    let Some(bytes) = rendered else {
        eprintln!(
            "skipping {}: more than {} unique nodes",
            input.display(),
            convoy::MAX_LAYOUT_NODES
        );
        return Ok(ItemOutcome::Skipped);
    };
    write_output(&static_out, &bytes)?;

    if matches!(args.command, Command::Animate) && solution.total_stops() > 0 {
        let gif_out = if static_out.as_os_str() == "-" {
            input.with_extension("gif")
        } else {
            static_out.with_extension("gif")
        };
        match convoy::raster::render_animation_gif(network, &solution, options, raster, animation) {
            Ok(Rendered::Artifact(bytes)) => write_output(&gif_out, &bytes)?,
            Ok(Rendered::SkippedNodeLimit { .. }) => {}
            Err(err) => eprintln!("warning: {}: animation failed: {err}", input.display()),
        }
    }
    Ok(ItemOutcome::Wrote)
}

fn run(args: Args) -> Result<RunSummary, CliError> {
    let network = match &args.network {
        Some(path) => Some(load_network(path)?),
        None => None,
    };

    let options = VisualizeOptions {
        seed: args.seed,
        ..Default::default()
    };
    let raster = RasterOptions {
        scale: args.scale,
        background: None,
    };
    let animation = AnimationOptions { fps: args.fps };

    let mut summary = RunSummary::default();
    for input in &args.inputs {
        match process_input(
            input,
            network.as_ref(),
            &args,
            &options,
            &raster,
            &animation,
        ) {
            Ok(ItemOutcome::Wrote) => summary.wrote += 1,
            Ok(ItemOutcome::Skipped) => summary.skipped += 1,
            Err(err) => {
                eprintln!("warning: {}: {err}", input.display());
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

fn main() {
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
        Ok(summary) if summary.all_failed() => std::process::exit(1),
        Ok(_) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
