use log::{info, warn};

use snafu::{prelude::*, Snafu};
use supply_insight::narrative;
use supply_insight::responder::{Responder, ResponseRule};
use supply_insight::scorecard;
use supply_insight::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::config_reader::*;
use crate::dashboard::io_common::{detect_format, resolve_path, simplify_file_name};

pub mod cache;
pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no usable worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening csv file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading csv line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not read a numeric field"))]
    ParsingJsonNumber {},
    #[snafu(display(""))]
    MissingParentDir {},
    #[snafu(display("Unsupported input format {format}"))]
    UnsupportedFormat { format: String },
    #[snafu(display("Unknown column {column} in dataset {dataset}"))]
    UnknownColumn { column: String, dataset: String },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;

/// Outcome of loading one dataset file. A missing or unreadable file
/// degrades the dataset to a notice instead of failing the report.
enum DatasetState {
    Loaded(Arc<Table>),
    Unavailable { reason: String },
}

fn load_dataset(root: &Path, source: &DatasetSource) -> DatasetState {
    let path = resolve_path(root, &source.file_path);
    let format = match detect_format(&source.format, &path) {
        Ok(format) => format,
        Err(e) => {
            warn!("dataset {}: {}", source.name, e);
            return DatasetState::Unavailable {
                reason: e.to_string(),
            };
        }
    };
    if !path.exists() {
        warn!("dataset {}: file {:?} not found", source.name, path);
        return DatasetState::Unavailable {
            reason: format!("file not found: {}", path.display()),
        };
    }
    match cache::load_table(&path, format, &source.excel_worksheet_name) {
        Ok(table) => DatasetState::Loaded(table),
        Err(e) => {
            warn!("dataset {}: failed to load {:?}: {}", source.name, path, e);
            DatasetState::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

fn group_to_json(g: &GroupStat) -> JSValue {
    let flag = match g.flag {
        AnomalyFlag::High => json!("high"),
        AnomalyFlag::Low => json!("low"),
        AnomalyFlag::None => JSValue::Null,
    };
    // Totals and z-scores are rendered with fixed precision so that
    // reference comparisons are byte-stable.
    json!({
        "key": g.key,
        "total": format!("{:.2}", g.sum),
        "zScore": format!("{:.3}", g.z_score),
        "flag": flag
    })
}

fn groups_to_json(groups: &[&GroupStat]) -> Vec<JSValue> {
    groups.iter().map(|g| group_to_json(g)).collect()
}

fn aggregation_to_json(
    name: &str,
    dimension: &str,
    measure: &str,
    agg: &Aggregation,
    top_n: usize,
) -> JSValue {
    if agg.is_empty() {
        return json!({
            "name": name,
            "status": "noData",
            "notice": "no numeric data to display"
        });
    }
    let all: Vec<&GroupStat> = agg.groups.iter().collect();
    json!({
        "name": name,
        "status": "ok",
        "dimension": dimension,
        "measure": measure,
        "rowsUsed": agg.rows_used,
        "rowsDropped": agg.rows_dropped,
        "groups": groups_to_json(&all),
        "top": groups_to_json(&agg.top(top_n)),
        "bottom": groups_to_json(&agg.bottom(top_n)),
        "anomalies": groups_to_json(&agg.anomalies()),
        "narrative": narrative::summarize(name, dimension, measure, agg)
    })
}

fn unavailable_to_json(name: &str, reason: &str) -> JSValue {
    json!({
        "name": name,
        "status": "unavailable",
        "notice": format!("dataset not available: {}", reason)
    })
}

fn scorecard_to_json(card: &scorecard::Scorecard) -> JSValue {
    json!({
        "leakageIndex": format!("{:.2}", card.leakage_index),
        "ghostLossCrore": format!("{:.2}", card.ghost_loss_crore),
        "qualityScore": format!("{:.2}", card.quality_score),
        "fpsHealthScore": format!("{:.2}", card.fps_health_score),
        "dbtFraudRisk": format!("{:.2}", card.dbt_fraud_risk),
        "projectedSavingsCrore": format!("{:.2}", card.projected_savings_crore)
    })
}

fn aggregate_dataset(
    table: &Table,
    dataset: &str,
    dimension: &str,
    measure: &str,
    options: &AggregationOptions,
) -> DashResult<Aggregation> {
    aggregate(table, dimension, measure, options).map_err(|e| match e {
        InsightError::UnknownColumn { column } => DashError::UnknownColumn {
            column,
            dataset: dataset.to_string(),
        },
    })
}

pub fn run(args: &Args) -> DashResult<()> {
    if let Some(question) = &args.ask {
        return run_ask(question, &args.config);
    }
    if let Some(config_path) = &args.config {
        return run_report(config_path, args);
    }
    if args.input.is_some() {
        return run_quick(args);
    }
    whatever!("one of --config, --input or --ask must be provided")
}

fn run_ask(question: &str, config_path: &Option<String>) -> DashResult<()> {
    let responder = match config_path {
        Some(path) => {
            let config = read_config(path)?;
            let custom: Vec<ResponseRule> = config
                .responses
                .unwrap_or_default()
                .iter()
                .map(|r| ResponseRule {
                    keywords: r.keywords.clone(),
                    response: r.response.clone(),
                })
                .collect();
            Responder::with_rules(custom)
        }
        None => Responder::with_default_rules(),
    };
    println!("{}", responder.reply(question));
    Ok(())
}

pub fn run_report(config_path: &str, args: &Args) -> DashResult<()> {
    let config = read_config(config_path)?;
    info!("config: {:?}", config);

    let root = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    let top_n = config.report_settings.top_groups()?;
    let options = AggregationOptions {
        anomaly_threshold: config.report_settings.anomaly_threshold()?,
    };

    let mut datasets_js: Vec<JSValue> = Vec::new();
    for source in &config.datasets {
        let block = match load_dataset(root, source) {
            DatasetState::Unavailable { reason } => unavailable_to_json(&source.name, &reason),
            DatasetState::Loaded(table) => {
                let agg = aggregate_dataset(
                    &table,
                    &source.name,
                    &source.dimension_column,
                    &source.measure_column,
                    &options,
                )?;
                aggregation_to_json(
                    &source.name,
                    &source.dimension_column,
                    &source.measure_column,
                    &agg,
                    top_n,
                )
            }
        };
        datasets_js.push(block);
    }

    let mut summary = JSMap::new();
    summary.insert(
        "config".to_string(),
        json!({
            "report": config.report_settings.report_name,
            "generatedFor": config.report_settings.generated_for
        }),
    );
    summary.insert("datasets".to_string(), JSValue::Array(datasets_js));
    if let Some(section) = &config.scorecard {
        let card = scorecard::evaluate(&section.inputs()?, &section.params());
        summary.insert("scorecard".to_string(), scorecard_to_json(&card));
    }

    emit_summary(
        &JSValue::Object(summary),
        args,
        &config.report_settings.output_path,
    )
}

fn run_quick(args: &Args) -> DashResult<()> {
    let input = match &args.input {
        Some(p) => p.clone(),
        None => whatever!("--input is required"),
    };
    let dimension = match &args.dimension {
        Some(d) => d.clone(),
        None => whatever!("--dimension is required with --input"),
    };
    let measure = match &args.measure {
        Some(m) => m.clone(),
        None => whatever!("--measure is required with --input"),
    };

    let path = PathBuf::from(&input);
    let format = detect_format(&args.input_type, &path)?;
    let table = cache::load_table(&path, format, &args.excel_worksheet_name)?;
    let label = simplify_file_name(&input);

    let agg = aggregate_dataset(
        &table,
        &label,
        &dimension,
        &measure,
        &AggregationOptions::DEFAULT,
    )?;
    let summary = json!({
        "datasets": [
            aggregation_to_json(&label, &dimension, &measure, &agg, DEFAULT_TOP_GROUPS)
        ]
    });
    emit_summary(&summary, args, &None)
}

fn emit_summary(
    summary: &JSValue,
    args: &Args,
    config_out: &Option<String>,
) -> DashResult<()> {
    let pretty = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    let out = args.out.clone().or_else(|| config_out.clone());
    match out.as_deref() {
        None | Some("stdout") => println!("{}", pretty),
        Some(path) => {
            fs::write(path, &pretty).context(WritingSummarySnafu { path })?;
            info!("summary written to {:?}", path);
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        let reference = read_summary(reference_path.clone())?;
        let pretty_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
        if pretty_ref != pretty {
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
            whatever!("Difference detected between computed summary and reference summary")
        }
    }
    Ok(())
}
