//! depthify CLI — add an interpolated depth channel to a grayscale image.

use clap::{Args, Parser, Subcommand, ValueEnum};
use depthify::{
    DepthifyConfig, Extrapolation, InterpolationMethod, Normalization, SamplePoint, SampleSet,
};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const POINTS_SCHEMA_V1: &str = "depthify.points.v1";

/// Outside-hull value for `--extrapolation constant` when neither the flag
/// nor the config file supplies one.
const DEFAULT_OUTSIDE_VALUE: f64 = 255.0;

#[derive(Parser)]
#[command(name = "depthify")]
#[command(about = "Interpolate sparse depth samples into a depth channel for a grayscale image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate depth and write the composite image.
    Render(CliRenderArgs),

    /// Validate a points file and print interpolation statistics.
    Inspect(CliInspectArgs),

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliRenderArgs {
    /// Path to the input image (converted to 8-bit grayscale).
    #[arg(long)]
    image: PathBuf,

    /// Path to the points file (JSON).
    #[arg(long)]
    points: PathBuf,

    /// Path to write the [gray, depth, fill] composite image.
    #[arg(long)]
    out: PathBuf,

    /// Path to write the normalized depth channel alone.
    #[arg(long)]
    depth_map: Option<PathBuf>,

    /// Path to write a colorized depth preview with sample markers.
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Path to write the interpolation report (JSON).
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    overrides: CliConfigArgs,
}

#[derive(Debug, Clone, Args)]
struct CliInspectArgs {
    /// Path to the points file (JSON).
    #[arg(long)]
    points: PathBuf,

    /// Image width in pixels.
    #[arg(long)]
    width: u32,

    /// Image height in pixels.
    #[arg(long)]
    height: u32,

    #[command(flatten)]
    overrides: CliConfigArgs,
}

/// Flags layered over the (optional) JSON config file.
#[derive(Debug, Clone, Default, Args)]
struct CliConfigArgs {
    /// Path to a JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interpolation method for two or more samples.
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Policy for pixels outside the convex hull of the samples.
    #[arg(long, value_enum)]
    extrapolation: Option<ExtrapolationArg>,

    /// Value written outside the hull under constant extrapolation
    /// [default: 255 unless the config file sets one].
    #[arg(long)]
    outside_value: Option<f64>,

    /// Constant depth used when the points file holds no samples.
    #[arg(long)]
    empty_fallback: Option<f64>,

    /// Fixed normalization lower bound (requires --range-max).
    #[arg(long, requires = "range_max")]
    range_min: Option<f64>,

    /// Fixed normalization upper bound (requires --range-min).
    #[arg(long, requires = "range_min")]
    range_max: Option<f64>,

    /// Swap the near/far convention of the depth channel.
    #[arg(long, conflicts_with = "no_invert")]
    invert: bool,

    /// Keep the default near/far convention even if the config file inverts it.
    #[arg(long)]
    no_invert: bool,

    /// Constant written to the third output channel.
    #[arg(long)]
    fill_value: Option<u8>,

    /// Sample marker radius in the preview (0 disables markers).
    #[arg(long)]
    marker_radius: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Linear,
    Nearest,
}

impl From<MethodArg> for InterpolationMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Linear => Self::Linear,
            MethodArg::Nearest => Self::Nearest,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExtrapolationArg {
    Nearest,
    Constant,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct PointsFile {
    schema: String,
    samples: Vec<SamplePoint>,
}

fn load_points(path: &Path) -> CliResult<SampleSet> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| -> CliError { format!("Failed to read {}: {}", path.display(), e).into() })?;
    parse_points(&data)
}

fn parse_points(data: &str) -> CliResult<SampleSet> {
    let file: PointsFile = serde_json::from_str(data)?;
    if file.schema != POINTS_SCHEMA_V1 {
        return Err(format!(
            "unsupported points schema '{}' (expected '{}')",
            file.schema, POINTS_SCHEMA_V1
        )
        .into());
    }
    Ok(file.samples.into())
}

fn build_config(args: &CliConfigArgs) -> CliResult<DepthifyConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading config: {}", path.display());
            DepthifyConfig::from_json_file(path)?
        }
        None => DepthifyConfig::default(),
    };

    if let Some(method) = args.method {
        config.interpolation.method = method.into();
    }
    match args.extrapolation {
        Some(ExtrapolationArg::Nearest) => {
            config.interpolation.extrapolation = Extrapolation::Nearest;
        }
        Some(ExtrapolationArg::Constant) => {
            let value = match config.interpolation.extrapolation {
                Extrapolation::Constant { value } => value,
                Extrapolation::Nearest => DEFAULT_OUTSIDE_VALUE,
            };
            config.interpolation.extrapolation = Extrapolation::Constant { value };
        }
        None => {}
    }
    if let Some(v) = args.outside_value {
        match &mut config.interpolation.extrapolation {
            Extrapolation::Constant { value } => *value = v,
            Extrapolation::Nearest => {
                tracing::warn!("--outside-value {} ignored under nearest extrapolation", v);
            }
        }
    }
    if args.empty_fallback.is_some() {
        config.interpolation.empty_fallback = args.empty_fallback;
    }

    if let (Some(min), Some(max)) = (args.range_min, args.range_max) {
        let fixed = Normalization::Fixed { min, max };
        config.compose.normalization = fixed;
        config.preview.normalization = fixed;
    }
    if args.invert {
        config.compose.invert_depth = true;
    } else if args.no_invert {
        config.compose.invert_depth = false;
    }
    if let Some(fill) = args.fill_value {
        config.compose.fill_value = fill;
    }
    if let Some(r) = args.marker_radius {
        config.preview.marker_radius = r;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => run_render(&args),
        Commands::Inspect(args) => run_inspect(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&DepthifyConfig::default())?);
    Ok(())
}

// ── inspect ────────────────────────────────────────────────────────────

fn run_inspect(args: &CliInspectArgs) -> CliResult<()> {
    let samples = load_points(&args.points)?;
    let config = build_config(&args.overrides)?;

    let (depth, report) = depthify::interpolate_with_report(
        args.width,
        args.height,
        &samples,
        &config.interpolation,
    )?;

    println!("depthify points: {}", args.points.display());
    println!("  samples:            {}", report.n_samples);
    println!("  grid:               {}x{}", args.width, args.height);
    println!("  strategy:           {:?}", report.strategy);
    println!("  triangles:          {}", report.n_triangles);
    println!("  hull vertices:      {}", report.n_hull_vertices);
    println!("  triangulated px:    {}", report.n_triangulated_px);
    println!("  nearest px:         {}", report.n_nearest_px);
    println!("  constant px:        {}", report.n_constant_px);
    if let Some((lo, hi)) = depth.min_max() {
        println!("  depth range:        [{:.4}, {:.4}]", lo, hi);
    }

    Ok(())
}

// ── render ─────────────────────────────────────────────────────────────

fn run_render(args: &CliRenderArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());

    let img = image::open(&args.image).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", args.image.display(), e).into()
    })?;
    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    tracing::info!("Image size: {}x{}", w, h);

    let samples = load_points(&args.points)?;
    tracing::info!("Loaded {} samples from {}", samples.len(), args.points.display());
    if samples.len() < 3 {
        tracing::warn!(
            "only {} samples; the depth surface will be constant or nearest-sample",
            samples.len()
        );
    }

    let config = build_config(&args.overrides)?;
    let output = depthify::render(&gray, &samples, &config)?;

    tracing::info!(
        "Depth surface: {:?}, {} triangles, {} px triangulated, {} px nearest, {} px constant",
        output.report.strategy,
        output.report.n_triangles,
        output.report.n_triangulated_px,
        output.report.n_nearest_px,
        output.report.n_constant_px,
    );

    output.composite.save(&args.out)?;
    tracing::info!("Composite written to {}", args.out.display());

    if let Some(path) = &args.depth_map {
        let map = depthify::depth_to_gray(&output.depth, &config.compose)?;
        map.save(path)?;
        tracing::info!("Depth map written to {}", path.display());
    }

    if let Some(path) = &args.preview {
        let preview = depthify::render_preview(&output.depth, &samples, &config.preview)?;
        preview.save(path)?;
        tracing::info!("Preview written to {}", path.display());
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&output.report)?;
        std::fs::write(path, &json)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_file_parses_v1_schema() {
        let set = parse_points(
            r#"{
                "schema": "depthify.points.v1",
                "samples": [
                    { "x": 0, "y": 0, "depth": 0.0 },
                    { "x": 3, "y": 3, "depth": 1.0 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.points()[1], SamplePoint::new(3, 3, 1.0));
    }

    #[test]
    fn points_file_rejects_other_schema_and_fields() {
        assert!(parse_points(r#"{ "schema": "depthify.points.v0", "samples": [] }"#).is_err());
        assert!(parse_points(
            r#"{ "schema": "depthify.points.v1", "samples": [], "extra": 1 }"#
        )
        .is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "interpolation": { "method": "nearest" }, "compose": { "fill_value": 3 } }"#,
        )
        .unwrap();

        let args = CliConfigArgs {
            config: Some(path),
            extrapolation: Some(ExtrapolationArg::Constant),
            outside_value: Some(12.0),
            range_min: Some(0.0),
            range_max: Some(255.0),
            invert: true,
            ..Default::default()
        };
        let config = build_config(&args).unwrap();

        assert_eq!(config.interpolation.method, InterpolationMethod::Nearest);
        assert_eq!(
            config.interpolation.extrapolation,
            Extrapolation::Constant { value: 12.0 }
        );
        assert_eq!(config.compose.fill_value, 3);
        assert!(config.compose.invert_depth);
        assert_eq!(
            config.preview.normalization,
            Normalization::Fixed {
                min: 0.0,
                max: 255.0
            }
        );
    }

    #[test]
    fn outside_value_overrides_constant_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "interpolation": { "extrapolation": { "constant": { "value": 5.0 } } },
                 "compose": { "invert_depth": true } }"#,
        )
        .unwrap();
        let path = path.to_str().unwrap();

        let cli = Cli::parse_from([
            "depthify", "inspect", "--points", "p.json", "--width", "4", "--height", "4",
            "--config", path, "--outside-value", "9", "--no-invert",
        ]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        let config = build_config(&args.overrides).unwrap();
        assert_eq!(
            config.interpolation.extrapolation,
            Extrapolation::Constant { value: 9.0 }
        );
        assert!(!config.compose.invert_depth);

        // Switching to constant keeps the file's value when no flag is given.
        let cli = Cli::parse_from([
            "depthify", "inspect", "--points", "p.json", "--width", "4", "--height", "4",
            "--config", path, "--extrapolation", "constant",
        ]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        let config = build_config(&args.overrides).unwrap();
        assert_eq!(
            config.interpolation.extrapolation,
            Extrapolation::Constant { value: 5.0 }
        );
        assert!(config.compose.invert_depth);
    }

    #[test]
    fn constant_extrapolation_defaults_to_255() {
        let args = CliConfigArgs {
            extrapolation: Some(ExtrapolationArg::Constant),
            ..Default::default()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(
            config.interpolation.extrapolation,
            Extrapolation::Constant {
                value: DEFAULT_OUTSIDE_VALUE
            }
        );
    }

    #[test]
    fn invert_flags_conflict() {
        assert!(Cli::try_parse_from([
            "depthify", "inspect", "--points", "p.json", "--width", "1", "--height", "1",
            "--invert", "--no-invert",
        ])
        .is_err());
    }

    #[test]
    fn invalid_range_is_reported() {
        let args = CliConfigArgs {
            range_min: Some(5.0),
            range_max: Some(1.0),
            ..Default::default()
        };
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn render_writes_all_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("in.png");
        let points_path = dir.path().join("points.json");
        image::GrayImage::from_fn(16, 12, |x, y| image::Luma([(x * 8 + y) as u8]))
            .save(&image_path)
            .unwrap();
        std::fs::write(
            &points_path,
            r#"{ "schema": "depthify.points.v1", "samples": [
                { "x": 1, "y": 1, "depth": 10.0 },
                { "x": 14, "y": 1, "depth": 200.0 },
                { "x": 7, "y": 10, "depth": 90.0 }
            ] }"#,
        )
        .unwrap();

        let args = CliRenderArgs {
            image: image_path,
            points: points_path,
            out: dir.path().join("out.png"),
            depth_map: Some(dir.path().join("map.png")),
            preview: Some(dir.path().join("preview.png")),
            report: Some(dir.path().join("report.json")),
            overrides: CliConfigArgs::default(),
        };
        run_render(&args).unwrap();

        let out = image::open(&args.out).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (16, 12));
        assert_eq!(out.get_pixel(14, 1)[1], 255);
        assert_eq!(out.get_pixel(3, 2)[0], 3 * 8 + 2);
        assert!(args.depth_map.as_ref().unwrap().exists());
        assert!(args.preview.as_ref().unwrap().exists());
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(args.report.as_ref().unwrap()).unwrap())
                .unwrap();
        assert_eq!(report["strategy"], "linear");
    }
}
