//! Simulated health indices for the monitoring dashboard.
//!
//! Each index is a one-line arithmetic formula over operator-supplied
//! gauges. The multipliers are parameters with the historically used values
//! as defaults, not hard-coded policy.

/// Lab assessment of the grain stock.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum GrainQuality {
    Good,
    Adulterated,
}

/// Operator-chosen gauge positions.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ScorecardInputs {
    /// Truck route deviation, percent.
    pub route_deviation_pct: f64,
    /// Estimated ghost beneficiaries, percent of the card base.
    pub ghost_beneficiary_pct: f64,
    pub grain_quality: GrainQuality,
    /// Fair-price-shop uptime, percent.
    pub fps_uptime_pct: f64,
    /// Count of unusual direct-benefit-transfer transactions.
    pub unusual_dbt_transactions: f64,
}

/// Multipliers behind the indices.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ScorecardParams {
    pub leakage_multiplier: f64,
    /// Loss in crore per percentage point of ghost beneficiaries.
    pub ghost_loss_per_point: f64,
    pub quality_score_good: f64,
    pub quality_score_adulterated: f64,
    pub dbt_divisor: f64,
    /// Share of the ghost-beneficiary loss recoverable by a card cleanup.
    pub ghost_cleanup_rate: f64,
}

impl ScorecardParams {
    pub const DEFAULT: ScorecardParams = ScorecardParams {
        leakage_multiplier: 1.8,
        ghost_loss_per_point: 3.0,
        quality_score_good: 95.0,
        quality_score_adulterated: 62.0,
        dbt_divisor: 5.0,
        ghost_cleanup_rate: 0.70,
    };
}

/// The computed indices.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Scorecard {
    pub leakage_index: f64,
    pub ghost_loss_crore: f64,
    pub quality_score: f64,
    pub fps_health_score: f64,
    pub dbt_fraud_risk: f64,
    pub projected_savings_crore: f64,
}

/// Evaluates every index from the gauge positions. Pure arithmetic, no
/// validation beyond what the types enforce.
pub fn evaluate(inputs: &ScorecardInputs, params: &ScorecardParams) -> Scorecard {
    let ghost_loss_crore = inputs.ghost_beneficiary_pct * params.ghost_loss_per_point;
    Scorecard {
        leakage_index: inputs.route_deviation_pct * params.leakage_multiplier,
        ghost_loss_crore,
        quality_score: match inputs.grain_quality {
            GrainQuality::Good => params.quality_score_good,
            GrainQuality::Adulterated => params.quality_score_adulterated,
        },
        fps_health_score: inputs.fps_uptime_pct,
        dbt_fraud_risk: inputs.unusual_dbt_transactions / params.dbt_divisor,
        projected_savings_crore: ghost_loss_crore * params.ghost_cleanup_rate,
    }
}
