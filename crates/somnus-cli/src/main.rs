use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use plotters::prelude::*;
use somnus_lib::{
    analyze::analyze,
    config::{read_config, AnalysisConfig},
    detect::RandomScorer,
    io::{parse_signal, read_signal, SignalFormat},
    plot::{figure_from_likelihood, figure_from_signal, signal_points, Figure, Series},
    signal::SignalSeries,
};
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "somnus",
    version,
    about = "Somnus: single-lead waveform apnea screening tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    /// Delimited tabular text (CSV and friends)
    #[value(name = "delimited", alias = "csv")]
    Delimited,
    /// Line-oriented free numeric text
    #[value(name = "plain", alias = "txt")]
    Plain,
    /// Tagged hierarchical text (JSON)
    #[value(name = "structured", alias = "json")]
    Structured,
    /// Timestamp-prefixed custom export
    #[value(name = "tagged", alias = "apn")]
    Tagged,
}

impl FormatArg {
    fn to_format(self) -> SignalFormat {
        match self {
            FormatArg::Delimited => SignalFormat::Delimited,
            FormatArg::Plain => SignalFormat::Plain,
            FormatArg::Structured => SignalFormat::Structured,
            FormatArg::Tagged => SignalFormat::Tagged,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the apnea analysis over a payload read from stdin or --input
    Analyze {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Payload format; inferred from the file extension when omitted
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Detector sensitivity, clamped into [0, 1]
        #[arg(long, default_value_t = 0.5)]
        sensitivity: f64,
        /// Seed for the scoring draws; omit for a non-reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Sampling rate override (Hz)
        #[arg(long)]
        fs: Option<f64>,
        /// TOML file overriding the pipeline constants
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also emit the down-sampled raw-signal curve
        #[arg(long)]
        include_signal: bool,
    },
    /// Extract the numeric sequence only and print it as JSON
    Extract {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Render the decimated signal or the likelihood curve to a PNG
    Plot {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        fs: Option<f64>,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Plot the per-window apnea likelihood instead of the raw signal
        #[arg(long)]
        likelihood: bool,
        #[arg(long, default_value_t = 0.5)]
        sensitivity: f64,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            input,
            format,
            sensitivity,
            seed,
            fs,
            config,
            include_signal,
        } => cmd_analyze(
            input.as_deref(),
            format,
            sensitivity,
            seed,
            fs,
            config.as_deref(),
            include_signal,
        )?,
        Commands::Extract { input, format } => cmd_extract(input.as_deref(), format)?,
        Commands::Plot {
            input,
            format,
            out,
            fs,
            config,
            likelihood,
            sensitivity,
            seed,
        } => cmd_plot(
            input.as_deref(),
            format,
            &out,
            fs,
            config.as_deref(),
            likelihood,
            sensitivity,
            seed,
        )?,
    }
    Ok(())
}

fn load_analysis_config(config: Option<&Path>) -> Result<AnalysisConfig> {
    match config {
        Some(path) => read_config(path),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Read a payload from the file (format inferred from its extension unless
/// given) or from stdin, which always needs an explicit format.
fn load_samples(input: Option<&Path>, format: Option<FormatArg>) -> Result<Vec<f64>> {
    let format = format.map(FormatArg::to_format);
    match input {
        Some(path) => read_signal(path, format),
        None => {
            let format =
                format.ok_or_else(|| anyhow!("--format is required when reading stdin"))?;
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(parse_signal(&buf, format)?)
        }
    }
}

fn load_series(
    input: Option<&Path>,
    format: Option<FormatArg>,
    fs: Option<f64>,
    config: &AnalysisConfig,
) -> Result<SignalSeries> {
    let data = load_samples(input, format)?;
    Ok(SignalSeries {
        fs: fs.unwrap_or(config.sampling_rate),
        data,
    })
}

fn scorer(seed: Option<u64>) -> RandomScorer {
    match seed {
        Some(seed) => RandomScorer::with_seed(seed),
        None => RandomScorer::new(),
    }
}

fn cmd_analyze(
    input: Option<&Path>,
    format: Option<FormatArg>,
    sensitivity: f64,
    seed: Option<u64>,
    fs: Option<f64>,
    config: Option<&Path>,
    include_signal: bool,
) -> Result<()> {
    let config = load_analysis_config(config)?;
    let series = load_series(input, format, fs, &config)?;
    let mut policy = scorer(seed);
    let result = analyze(&series, sensitivity, &mut policy, &config)?;
    if include_signal {
        let payload = serde_json::json!({
            "analysis": result,
            "signal_data": signal_points(&series, config.viz_max_points),
        });
        println!("{}", serde_json::to_string(&payload)?);
    } else {
        println!("{}", serde_json::to_string(&result)?);
    }
    Ok(())
}

fn cmd_extract(input: Option<&Path>, format: Option<FormatArg>) -> Result<()> {
    let data = load_samples(input, format)?;
    println!("{}", serde_json::to_string(&data)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_plot(
    input: Option<&Path>,
    format: Option<FormatArg>,
    out: &Path,
    fs: Option<f64>,
    config: Option<&Path>,
    likelihood: bool,
    sensitivity: f64,
    seed: Option<u64>,
) -> Result<()> {
    let config = load_analysis_config(config)?;
    let series = load_series(input, format, fs, &config)?;
    let fig = if likelihood {
        let mut policy = scorer(seed);
        let result = analyze(&series, sensitivity, &mut policy, &config)?;
        figure_from_likelihood(&result.probability_data, 0x2266AA)
    } else {
        figure_from_signal("Signal", &series, config.viz_max_points, 0xFF0077)
    };
    draw_plotters_figure(out, &fig)?;
    Ok(())
}

fn draw_plotters_figure(path: &Path, fig: &Figure) -> Result<()> {
    let backend = BitMapBackend::new(path, (800, 480));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;
    let x_values: Vec<f64> = fig
        .series
        .iter()
        .flat_map(|series| match series {
            Series::Line(line) => line.points.iter().map(|p| p.time).collect::<Vec<_>>(),
        })
        .collect();
    let y_values: Vec<f64> = fig
        .series
        .iter()
        .flat_map(|series| match series {
            Series::Line(line) => line.points.iter().map(|p| p.value).collect::<Vec<_>>(),
        })
        .collect();
    let x_min = x_values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let x_max = x_values.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(1.0);
    let y_min = y_values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let y_max = y_values.iter().copied().fold(f64::NEG_INFINITY, f64::max).max(1.0);
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            fig.title.clone().unwrap_or_else(|| "Plot".into()),
            ("sans-serif", 24),
        )
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart.configure_mesh().draw()?;
    for series in &fig.series {
        match series {
            Series::Line(line) => {
                chart.draw_series(LineSeries::new(
                    line.points.iter().map(|p| (p.time, p.value)),
                    &RGBColor(
                        ((line.style.color.0 >> 16) & 0xFF) as u8,
                        ((line.style.color.0 >> 8) & 0xFF) as u8,
                        (line.style.color.0 & 0xFF) as u8,
                    ),
                ))?;
            }
        }
    }
    root.present()?;
    Ok(())
}
