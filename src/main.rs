use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use duelkit::{init_logging, AvoidancePlanner, GcodeSink, MachineProfile, StreamWriter};

/// Rewrite a G-code stream so two toolheads sharing one axis never
/// collide.
#[derive(Parser, Debug)]
#[command(name = "duelkit", version, about)]
struct Cli {
    /// Input G-code file
    input: PathBuf,

    /// Output G-code file
    #[arg(short, long)]
    output: PathBuf,

    /// Machine profile (TOML or JSON); built-in defaults otherwise
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Emit `G28 X Y` before the stream
    #[arg(long)]
    home: bool,

    /// Emit `G28 X Y` after the stream
    #[arg(long = "home-after")]
    home_after: bool,

    /// Wrap inserted maneuvers in begin/end comment lines
    #[arg(long)]
    annotate: bool,

    /// Use more-verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let profile = match &cli.profile {
        Some(path) => MachineProfile::load(path)
            .with_context(|| format!("invalid machine profile {}", path.display()))?,
        None => MachineProfile::default(),
    };

    let input = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let file = fs::File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut writer = StreamWriter::new(BufWriter::new(file));

    if cli.home {
        writer.write_line("G28 X Y")?;
    }

    let metrics = {
        let mut planner = AvoidancePlanner::new(&profile, &mut writer).with_annotations(cli.annotate);
        planner
            .play(&input)
            .with_context(|| format!("failed to rewrite {}", cli.input.display()))?;
        planner.metrics()
    };

    if cli.home_after {
        writer.write_line("G28 X Y")?;
    }
    writer.flush()?;

    info!(
        simple = metrics.simple(),
        backup = metrics.backup(),
        segmented = metrics.segmented(),
        output = %cli.output.display(),
        "rewrite complete"
    );
    Ok(())
}
