use crate::dashboard::*;

use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;

use supply_insight::scorecard::{GrainQuality, ScorecardInputs, ScorecardParams};

pub const DEFAULT_TOP_GROUPS: usize = 5;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(rename = "reportName")]
    pub report_name: String,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "generatedFor")]
    pub generated_for: Option<String>,
    // Accepted as a JSON number or a string holding one.
    #[serde(rename = "topGroups")]
    _top_groups: Option<JSValue>,
    #[serde(rename = "anomalyThreshold")]
    _anomaly_threshold: Option<JSValue>,
}

impl ReportSettings {
    pub fn top_groups(&self) -> DashResult<usize> {
        if self._top_groups.is_none() {
            return Ok(DEFAULT_TOP_GROUPS);
        }
        read_js_int(&self._top_groups)
    }

    pub fn anomaly_threshold(&self) -> DashResult<f64> {
        if self._anomaly_threshold.is_none() {
            return Ok(AggregationOptions::DEFAULT.anomaly_threshold);
        }
        read_js_float(&self._anomaly_threshold)
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSource {
    pub name: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// csv or xlsx; derived from the file extension when absent.
    pub format: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "dimensionColumn")]
    pub dimension_column: String,
    #[serde(rename = "measureColumn")]
    pub measure_column: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardSection {
    #[serde(rename = "routeDeviationPct")]
    pub route_deviation_pct: f64,
    #[serde(rename = "ghostBeneficiaryPct")]
    pub ghost_beneficiary_pct: f64,
    #[serde(rename = "grainQuality")]
    pub grain_quality: String,
    #[serde(rename = "fpsUptimePct")]
    pub fps_uptime_pct: f64,
    #[serde(rename = "unusualDbtTransactions")]
    pub unusual_dbt_transactions: f64,
    #[serde(rename = "leakageMultiplier")]
    pub leakage_multiplier: Option<f64>,
    #[serde(rename = "ghostCleanupRate")]
    pub ghost_cleanup_rate: Option<f64>,
}

impl ScorecardSection {
    pub fn inputs(&self) -> DashResult<ScorecardInputs> {
        let grain_quality = match self.grain_quality.to_lowercase().as_str() {
            "good" => GrainQuality::Good,
            "adulterated" => GrainQuality::Adulterated,
            x => whatever!("unknown grain quality {:?}", x),
        };
        Ok(ScorecardInputs {
            route_deviation_pct: self.route_deviation_pct,
            ghost_beneficiary_pct: self.ghost_beneficiary_pct,
            grain_quality,
            fps_uptime_pct: self.fps_uptime_pct,
            unusual_dbt_transactions: self.unusual_dbt_transactions,
        })
    }

    pub fn params(&self) -> ScorecardParams {
        let mut params = ScorecardParams::DEFAULT;
        if let Some(x) = self.leakage_multiplier {
            params.leakage_multiplier = x;
        }
        if let Some(x) = self.ghost_cleanup_rate {
            params.ghost_cleanup_rate = x;
        }
        params
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRuleConfig {
    pub keywords: Vec<String>,
    pub response: String,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(rename = "reportSettings")]
    pub report_settings: ReportSettings,
    pub datasets: Vec<DatasetSource>,
    pub scorecard: Option<ScorecardSection>,
    pub responses: Option<Vec<ResponseRuleConfig>>,
}

pub fn read_config(path: &str) -> DashResult<DashConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> DashResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

fn read_js_float(x: &Option<JSValue>) -> DashResult<f64> {
    match x {
        Some(JSValue::Number(n)) => n.as_f64().context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s.parse::<f64>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}
