//! CLI entry point for the survey analysis toolkit.

use anyhow::{Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use survey_insights::loader::load_csv;
use survey_insights::stats::describe;
use survey_insights::{
    AnalysisConfig, CATALOG, CrossTab, CrossTabEngine, DisplayMode, Field, ReportGenerator,
    SurveyFilter, SurveyReport,
};
use tracing::{debug, info, warn};

/// CLI-compatible cross-tab display mode enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDisplayMode {
    /// Raw counts
    Frequency,
    /// Percent of the row total
    RowPct,
    /// Percent of the column total
    ColPct,
    /// Counts with share of the grand total
    ChiSquare,
    /// Counts with share of the grand total
    EffectSize,
}

impl From<CliDisplayMode> for DisplayMode {
    fn from(cli: CliDisplayMode) -> Self {
        match cli {
            CliDisplayMode::Frequency => DisplayMode::Frequency,
            CliDisplayMode::RowPct => DisplayMode::RowPercent,
            CliDisplayMode::ColPct => DisplayMode::ColumnPercent,
            CliDisplayMode::ChiSquare => DisplayMode::ChiSquare,
            CliDisplayMode::EffectSize => DisplayMode::EffectSize,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Brand-perception survey statistics",
    long_about = "Statistical analysis of a toy-brand parent survey.\n\n\
                  EXAMPLES:\n  \
                  # Full report as JSON\n  \
                  survey-insights -i survey.csv --json\n\n  \
                  # Cross-tab with column percentages\n  \
                  survey-insights -i survey.csv --row age_group --col nps_category --mode col-pct\n\n  \
                  # Only mothers of young children\n  \
                  survey-insights -i survey.csv --filters mothers.json -r\n\n  \
                  # Available cross-tab variables\n  \
                  survey-insights --list-variables"
)]
struct Args {
    /// Path to the survey CSV file
    #[arg(short, long, required_unless_present = "list_variables")]
    input: Option<String>,

    /// Output directory for reports and cross-tab CSVs
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// JSON file with a respondent filter
    ///
    /// Example: {"genders": [2], "has_children_2_7": "yes", "nps_range": [3, 5]}
    #[arg(short, long)]
    filters: Option<String>,

    /// Cross-tab row variable key
    #[arg(long, requires = "col")]
    row: Option<String>,

    /// Cross-tab column variable key
    #[arg(long, requires = "row")]
    col: Option<String>,

    /// How cross-tab cells are rendered
    #[arg(long, value_enum, default_value = "row-pct")]
    mode: CliDisplayMode,

    /// Write the cross-tab as CSV to the output directory
    #[arg(long, requires = "row")]
    export_csv: bool,

    /// Print descriptive statistics for one survey column
    #[arg(long, conflicts_with = "row")]
    describe: Option<String>,

    /// List the cross-tab variable catalog and exit
    #[arg(long)]
    list_variables: bool,

    /// Significance level for reported tests
    #[arg(long, default_value = "0.05")]
    alpha: f64,

    /// Expected count under which a chi-square cell counts as sparse
    #[arg(long, default_value = "5")]
    min_expected: f64,

    /// Reference value for the competitor-rating t-tests
    #[arg(long, default_value = "50")]
    reference: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only the JSON document is written.
    #[arg(long)]
    json: bool,

    /// Write the full JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is disabled so stdout only holds JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if args.list_variables {
        print_catalog();
        return Ok(());
    }

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("--input is required"))?;
    if !Path::new(input).exists() {
        bail!("Input file not found: {}", input);
    }

    let config = AnalysisConfig::builder()
        .significance_level(args.alpha)
        .min_expected_count(args.min_expected)
        .t_test_reference(args.reference)
        .display_mode(args.mode.into())
        .build()?;

    let records = load_csv(input)?;
    let filter = load_filter(args.filters.as_deref())?;
    let subset = filter.apply(&records);
    if subset.is_empty() {
        bail!(
            "No respondents left after filtering ({} loaded)",
            records.len()
        );
    }
    if !filter.is_unconstrained() {
        info!("Filter kept {} of {} respondents", subset.len(), records.len());
    }

    if let (Some(row), Some(col)) = (&args.row, &args.col) {
        let engine = CrossTabEngine::new(config);
        let tab = engine.run_by_key(&subset, row, col, args.mode.into())?;
        return handle_crosstab_output(&tab, &args);
    }

    if let Some(name) = &args.describe {
        let field = Field::parse(name)?;
        let values: Vec<f64> = subset.iter().filter_map(|r| r.get(field)).collect();
        let stats = describe(&values);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("{} (n = {})", field, stats.n);
            println!("  Mean:     {:.3}", stats.mean);
            println!("  Median:   {:.3}", stats.median);
            println!("  Mode:     {:.3}", stats.mode);
            println!("  Std Dev:  {:.3}", stats.std_dev);
            println!("  Skewness: {:.3}", stats.skewness);
            println!("  Range:    {:.1} - {:.1}", stats.min, stats.max);
            println!("  IQR:      {:.1} - {:.1}", stats.q1, stats.q3);
        }
        return Ok(());
    }

    let generator = ReportGenerator::new(PathBuf::from(&args.output), config);
    let report = generator.build_report(&subset, Some(input), Some(&filter))?;
    handle_report_output(&generator, &report, &args)
}

/// Read a filter from a JSON file, or accept everyone.
fn load_filter(path: Option<&str>) -> Result<SurveyFilter> {
    let Some(path) = path else {
        return Ok(SurveyFilter::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read filter file {}: {}", path, e))?;
    let filter: SurveyFilter = serde_json::from_str(&text)
        .map_err(|e| anyhow!("Invalid filter file {}: {}", path, e))?;
    debug!("Filter loaded from {}: {:?}", path, filter);
    Ok(filter)
}

fn print_catalog() {
    println!("{:<36} {:<12} {:<8} Label", "Key", "Kind", "Levels");
    println!("{}", "-".repeat(90));
    for variable in CATALOG {
        println!(
            "{:<36} {:<12} {:<8} {}",
            variable.key,
            if variable.is_ordinal() {
                "ordinal"
            } else {
                "categorical"
            },
            variable.domain.len(),
            variable.label
        );
    }
}

/// Handle cross-tab output based on CLI flags.
///
/// - Default: print the table, the summary and the statistics block
/// - `--json`: print the cross-tab as JSON only
/// - `--export-csv`: also write the CSV export
fn handle_crosstab_output(tab: &CrossTab, args: &Args) -> Result<()> {
    if args.export_csv {
        let path = tab.write_csv(Path::new(&args.output))?;
        info!("Cross-tab written to: {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(tab)?);
        return Ok(());
    }

    if tab.excluded > 0 {
        warn!(
            "{} respondent(s) excluded for missing or out-of-range answers",
            tab.excluded
        );
    }

    let width = tab
        .col_labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(10)
        + 2;
    let first = tab
        .row_labels
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(tab.row_label.chars().count()))
        .max()
        .unwrap_or(0)
        + 2;

    println!();
    println!("{} x {}", tab.row_label, tab.col_label);
    println!("{}", "=".repeat(first + width * (tab.col_labels.len() + 1)));
    print!("{:<first$}", tab.row_label);
    for label in &tab.col_labels {
        print!("{:>width$}", label);
    }
    println!("{:>width$}", "Total");
    println!("{}", "-".repeat(first + width * (tab.col_labels.len() + 1)));

    for (i, label) in tab.row_labels.iter().enumerate() {
        print!("{:<first$}", label);
        for j in 0..tab.col_labels.len() {
            print!("{:>width$}", tab.cell_display(i, j));
        }
        println!("{:>width$}", tab.row_totals[i]);
    }
    print!("{:<first$}", "Total");
    for total in &tab.col_totals {
        print!("{:>width$}", total);
    }
    println!("{:>width$}", tab.grand_total);
    println!();

    println!("{}", tab.summary);
    println!();
    print!("{}", tab.stats_text());

    Ok(())
}

/// Handle report output based on CLI flags.
///
/// - Default: print a human-readable digest
/// - `--json`: print the report as JSON only
/// - `--emit-report`: also write the report to a file
fn handle_report_output(
    generator: &ReportGenerator,
    report: &SurveyReport,
    args: &Args,
) -> Result<()> {
    if args.emit_report {
        let stem = extract_file_stem(args.input.as_deref().unwrap_or("survey"));
        let path = generator.write_report_to_file(report, &stem)?;
        info!("Report written to: {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    print_human_readable_summary(report, args.reference);
    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("survey")
        .to_string()
}

fn print_human_readable_summary(report: &SurveyReport, reference: f64) {
    println!();
    println!("{}", "=".repeat(80));
    println!("SURVEY SUMMARY");
    println!("{}", "=".repeat(80));
    println!();

    if let Some(input) = &report.input_file {
        println!("Input:       {}", input);
    }
    println!("Respondents: {}", report.respondents);
    if report.filter.is_some() {
        println!("Filter:      active");
    }
    println!();

    let nps = &report.nps;
    println!("Net Promoter Score: {:.1} ({})", nps.score, nps.label);
    println!(
        "  Promoters {:.1}%  Passives {:.1}%  Detractors {:.1}%",
        nps.promoters, nps.passives, nps.detractors
    );
    println!();

    let idx = &report.index_means;
    println!("Composite Indices (0-100):");
    println!("  Nostalgia Intensity:  {:.1}", idx.nostalgia_intensity);
    println!("  Brand Trust:          {:.1}", idx.brand_trust);
    println!("  Purchase Intent:      {:.1}", idx.purchase_intent);
    println!("  Modernization:        {:.1}", idx.modernization_score);
    println!("  Competitive Strength: {:.1}", idx.competitive_strength);
    println!("  Digital Adoption:     {:.1}", idx.digital_adoption);
    println!("  Active parents:       {:.1}%", idx.active_parent_share);
    println!();

    println!("Scale Reliability:");
    for scale in &report.scale_reliability {
        println!(
            "  {:<28} alpha = {:.3}  {}",
            scale.scale, scale.alpha, scale.interpretation
        );
    }
    println!();

    for ranking in [
        &report.childhood_brand_ranking,
        &report.future_attribute_ranking,
    ] {
        println!(
            "{} (W = {:.3}, {}):",
            ranking.question, ranking.kendall.w, ranking.interpretation
        );
        let mut items: Vec<_> = ranking.items.iter().collect();
        items.sort_by(|a, b| a.mean_rank.total_cmp(&b.mean_rank));
        for item in items {
            println!(
                "  {:<36} mean rank {:.2}  {}",
                item.label, item.mean_rank, item.consensus
            );
        }
        println!();
    }

    println!("Little Tikes vs Competitors (reference {:.0}):", reference);
    for rating in &report.competitor_ratings {
        println!(
            "  {:<36} {:>5.1}  t = {:>6.2}, p = {:.2}  {}",
            rating.attribute, rating.mean, rating.t_test.t, rating.t_test.p_value, rating.verdict
        );
    }
    println!();
    println!("{}", "=".repeat(80));
}
