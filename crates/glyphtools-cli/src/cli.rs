//! CLI argument definitions using Clap v4

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// glyphtools - measure, kern and group glyphs from the command line
#[derive(Parser, Debug)]
#[command(name = "glyphtools")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display version, detected format and glyph count
    #[command(alias = "i")]
    Info(InfoArgs),

    /// Print the metrics of one or more glyphs
    #[command(alias = "m")]
    Metrics(MetricsArgs),

    /// Show or assign a glyph's layout category
    Category(CategoryArgs),

    /// Compute the kern that sets two glyphs a given ink distance apart
    #[command(alias = "k")]
    Kern(KernArgs),

    /// Group glyphs into bins of similar metric values
    Bin(BinArgs),

    /// Process kerning jobs from a JSONL file, one per line
    Batch(BatchArgs),
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Font path (.ttf, .otf, .ttc or .ufo)
    pub font: Option<PathBuf>,
}

/// Arguments for the metrics command
#[derive(Parser, Debug)]
pub struct MetricsArgs {
    /// Font path (.ttf, .otf, .ttc or .ufo)
    pub font: PathBuf,

    /// Glyph names
    #[arg(required = true)]
    pub glyphs: Vec<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the category command
#[derive(Parser, Debug)]
pub struct CategoryArgs {
    /// Font path (.ttf, .otf, .ttc or .ufo)
    pub font: PathBuf,

    /// Glyph name
    pub glyph: String,

    /// New category: base, ligature, mark or component
    #[arg(long)]
    pub set: Option<String>,

    /// Mark attachment class, for marks
    #[arg(long = "mark-class", requires = "set")]
    pub mark_class: Option<u16>,

    /// Where to write the modified font (defaults to the input path)
    #[arg(short, long, requires = "set")]
    pub output: Option<PathBuf>,
}

/// Arguments for the kern command
#[derive(Parser, Debug)]
pub struct KernArgs {
    /// Font path (.ttf, .otf, .ttc or .ufo)
    pub font: PathBuf,

    /// Left glyph name
    pub left: String,

    /// Right glyph name
    pub right: String,

    /// Target ink-to-ink distance in font units
    #[arg(short, long, allow_negative_numbers = true)]
    pub distance: f64,

    /// Largest tuck as a fraction of the left width (0 = whole width)
    #[arg(long = "max-tuck", default_value_t = glyphtools_core::kern::DEFAULT_MAX_TUCK)]
    pub max_tuck: f64,

    /// Left glyph offset as x,y
    #[arg(long = "offset-left", value_parser = parse_offset, allow_hyphen_values = true)]
    pub offset_left: Option<(f64, f64)>,

    /// Extra right glyph offset as x,y
    #[arg(long = "offset-right", value_parser = parse_offset, allow_hyphen_values = true)]
    pub offset_right: Option<(f64, f64)>,

    /// Also report the measured distance and why the search stopped
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for the bin command
#[derive(Parser, Debug)]
pub struct BinArgs {
    /// Font path (.ttf, .otf, .ttc or .ufo)
    pub font: PathBuf,

    /// Glyph names (every glyph in the font if omitted)
    pub glyphs: Vec<String>,

    /// Metric to bin by: width, lsb, rsb, xMin, xMax, yMin, yMax, rise
    #[arg(short, long)]
    pub metric: String,

    /// Number of bins
    #[arg(short, long, default_value = "5")]
    pub bins: usize,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// Font path (.ttf, .otf, .ttc or .ufo)
    pub font: PathBuf,

    /// Input JSONL file (stdin if omitted)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Number of parallel worker threads (0 = auto)
    #[arg(long = "jobs", default_value = "0")]
    pub jobs: usize,
}

/// Parse an `x,y` pair.
pub fn parse_offset(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok((coord(x)?, coord(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("10,-5"), Ok((10.0, -5.0)));
        assert_eq!(parse_offset(" 1.5 , 2 "), Ok((1.5, 2.0)));
        assert!(parse_offset("10").is_err());
        assert!(parse_offset("a,b").is_err());
    }

    #[test]
    fn test_kern_args() {
        let cli = Cli::parse_from([
            "glyphtools",
            "kern",
            "font.ufo",
            "V",
            "A",
            "--distance",
            "-10",
            "--offset-right",
            "0,-20",
        ]);
        let Commands::Kern(args) = cli.command else {
            panic!("expected kern");
        };
        assert_eq!(args.distance, -10.0);
        assert_eq!(args.max_tuck, 0.4);
        assert_eq!(args.offset_right, Some((0.0, -20.0)));
        assert_eq!(args.offset_left, None);
    }
}
