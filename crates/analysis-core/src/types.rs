use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Reporting cadence of a financial statement row.
///
/// Vendors label periods inconsistently ("quarterly", "Q", "FY", "annual"),
/// so the label is normalized once when the row is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum PeriodCadence {
    Quarterly,
    Annual,
    Ttm,
    Unknown,
}

impl PeriodCadence {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "quarterly" | "quarter" | "q" | "q1" | "q2" | "q3" | "q4" => PeriodCadence::Quarterly,
            "annual" | "annually" | "yearly" | "year" | "fy" => PeriodCadence::Annual,
            "ttm" | "trailing" => PeriodCadence::Ttm,
            _ => PeriodCadence::Unknown,
        }
    }

    /// Number of periods that make up one year at this cadence.
    pub fn periods_per_year(&self) -> Option<usize> {
        match self {
            PeriodCadence::Quarterly => Some(4),
            PeriodCadence::Annual => Some(1),
            PeriodCadence::Ttm | PeriodCadence::Unknown => None,
        }
    }
}

impl From<String> for PeriodCadence {
    fn from(label: String) -> Self {
        PeriodCadence::parse(&label)
    }
}

/// Income statement for a single reporting period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeStatement {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub report_period: Option<NaiveDate>,
    #[serde(default)]
    pub period: Option<PeriodCadence>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub cost_of_revenue: Option<f64>,
    #[serde(default)]
    pub gross_profit: Option<f64>,
    #[serde(default)]
    pub operating_income: Option<f64>,
    #[serde(default)]
    pub interest_expense: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub earnings_per_share: Option<f64>,
}

impl IncomeStatement {
    /// Gross margin as a fraction of revenue. Falls back to
    /// `revenue - cost_of_revenue` when gross profit is not reported.
    pub fn gross_margin(&self) -> Option<f64> {
        let revenue = finite(self.revenue).filter(|r| *r > 0.0)?;
        let gross_profit = finite(self.gross_profit).or_else(|| {
            finite(self.cost_of_revenue).map(|cost| revenue - cost)
        })?;
        Some(gross_profit / revenue)
    }

    pub fn operating_margin(&self) -> Option<f64> {
        let revenue = finite(self.revenue).filter(|r| *r > 0.0)?;
        finite(self.operating_income).map(|op| op / revenue)
    }

    pub fn net_margin(&self) -> Option<f64> {
        let revenue = finite(self.revenue).filter(|r| *r > 0.0)?;
        finite(self.net_income).map(|ni| ni / revenue)
    }
}

/// Balance sheet snapshot at the end of a reporting period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub report_period: Option<NaiveDate>,
    #[serde(default)]
    pub period: Option<PeriodCadence>,
    #[serde(default)]
    pub total_assets: Option<f64>,
    #[serde(default)]
    pub total_liabilities: Option<f64>,
    #[serde(default)]
    pub current_assets: Option<f64>,
    #[serde(default)]
    pub current_liabilities: Option<f64>,
    #[serde(default)]
    pub inventory: Option<f64>,
    #[serde(default)]
    pub cash_and_equivalents: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
    #[serde(default)]
    pub shareholders_equity: Option<f64>,
}

/// Cash flow statement for a single reporting period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashFlowStatement {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub report_period: Option<NaiveDate>,
    #[serde(default)]
    pub period: Option<PeriodCadence>,
    #[serde(default)]
    pub net_cash_flow_from_operations: Option<f64>,
    #[serde(default)]
    pub capital_expenditure: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
}

/// Latest-period snapshot of derived ratios.
///
/// Margins, returns and growth rates are fractions (0.12 = 12%).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialMetrics {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub price_to_earnings_ratio: Option<f64>,
    #[serde(default)]
    pub price_to_book_ratio: Option<f64>,
    #[serde(default)]
    pub price_to_sales_ratio: Option<f64>,
    #[serde(default)]
    pub enterprise_value_to_ebitda_ratio: Option<f64>,
    #[serde(default)]
    pub peg_ratio: Option<f64>,
    #[serde(default)]
    pub gross_margin: Option<f64>,
    #[serde(default)]
    pub operating_margin: Option<f64>,
    #[serde(default)]
    pub net_margin: Option<f64>,
    #[serde(default)]
    pub return_on_equity: Option<f64>,
    #[serde(default)]
    pub return_on_assets: Option<f64>,
    #[serde(default)]
    pub return_on_invested_capital: Option<f64>,
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    #[serde(default)]
    pub earnings_growth: Option<f64>,
    #[serde(default)]
    pub earnings_per_share_growth: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
    #[serde(default)]
    pub debt_to_assets: Option<f64>,
    #[serde(default)]
    pub interest_coverage: Option<f64>,
    #[serde(default)]
    pub current_ratio: Option<f64>,
    #[serde(default)]
    pub quick_ratio: Option<f64>,
}

/// Daily OHLCV row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    pub close: f64,
    #[serde(default)]
    pub adjusted_close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl PriceBar {
    /// Adjusted close when present, otherwise the raw close.
    /// Returns None for non-finite or non-positive prices.
    pub fn effective_close(&self) -> Option<f64> {
        let positive = |p: Option<f64>| finite(p).filter(|p| *p > 0.0);
        positive(self.adjusted_close).or_else(|| positive(Some(self.close)))
    }
}

/// Kind of analyst action, assigned when the row is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AnalystAction {
    Initiated,
    Upgraded,
    Downgraded,
    Reiterated,
    TargetRaised,
    TargetLowered,
    Other,
}

impl AnalystAction {
    /// Map a vendor's free-text action label to an action kind.
    pub fn classify(label: &str) -> Self {
        let a = label.trim().to_lowercase();
        if a.contains("downgrade") {
            AnalystAction::Downgraded
        } else if a.contains("upgrade") {
            AnalystAction::Upgraded
        } else if a.contains("initiat") {
            AnalystAction::Initiated
        } else if a.contains("lower") {
            AnalystAction::TargetLowered
        } else if a.contains("raise") {
            AnalystAction::TargetRaised
        } else if a.contains("reiterat") || a.contains("maintain") {
            AnalystAction::Reiterated
        } else {
            AnalystAction::Other
        }
    }

    /// +1 for bullish actions, -1 for bearish actions, 0 otherwise.
    pub fn sentiment(&self) -> i32 {
        match self {
            AnalystAction::Upgraded | AnalystAction::Initiated | AnalystAction::TargetRaised => 1,
            AnalystAction::Downgraded | AnalystAction::TargetLowered => -1,
            AnalystAction::Reiterated | AnalystAction::Other => 0,
        }
    }
}

impl From<String> for AnalystAction {
    fn from(label: String) -> Self {
        AnalystAction::classify(&label)
    }
}

/// Individual analyst rating event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystRating {
    pub action: AnalystAction,
    #[serde(default)]
    pub firm: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub price_target: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Expected ratios and margins for an industry sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorMedians {
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    pub ps_ratio: f64,
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,
    pub roe: f64,
    pub debt_to_equity: f64,
    pub revenue_growth: f64,
}

impl SectorMedians {
    fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("pe_ratio", self.pe_ratio),
            ("pb_ratio", self.pb_ratio),
            ("ps_ratio", self.ps_ratio),
            ("gross_margin", self.gross_margin),
            ("operating_margin", self.operating_margin),
            ("net_margin", self.net_margin),
            ("roe", self.roe),
            ("debt_to_equity", self.debt_to_equity),
            ("revenue_growth", self.revenue_growth),
        ]
    }

    /// Every benchmark is used as a divisor, so each must be finite and positive.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (field, value) in self.fields() {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::InvalidBenchmark {
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// One of the five scored axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Value,
    Growth,
    Quality,
    Momentum,
    Safety,
}

impl Dimension {
    /// Aggregation order
    pub const ALL: [Dimension; 5] = [
        Dimension::Value,
        Dimension::Growth,
        Dimension::Quality,
        Dimension::Momentum,
        Dimension::Safety,
    ];

    /// Fixed aggregation weight. The five weights sum to 1.0.
    pub fn weight(&self) -> f64 {
        match self {
            Dimension::Value => 0.20,
            Dimension::Growth => 0.25,
            Dimension::Quality => 0.25,
            Dimension::Momentum => 0.15,
            Dimension::Safety => 0.15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Value => "Value",
            Dimension::Growth => "Growth",
            Dimension::Quality => "Quality",
            Dimension::Momentum => "Momentum",
            Dimension::Safety => "Safety",
        }
    }
}

/// Audit trail entry for a single metric's effect on a dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub name: String,
    pub value: f64,
    pub benchmark: Option<f64>,
    pub contribution: f64, // -5.0 to 5.0
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub score: u8, // 1 to 10
    pub weight: f64,
    pub data_points: u32,
    pub max_data_points: u32,
    pub confidence: f64, // 0.0 to 1.0
    pub explanation: String,
    pub factors: Vec<ScoreFactor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub has_income_statements: bool,
    pub has_balance_sheets: bool,
    pub has_cash_flow_statements: bool,
    pub has_metrics: bool,
    pub has_price_data: bool,
    pub has_analyst_ratings: bool,
    pub quarters_of_data: usize,
}

/// Composite 1-10 rating for a ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicianScore {
    pub ticker: String,
    pub overall_score: u8,
    pub overall_confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub value: DimensionScore,
    pub growth: DimensionScore,
    pub quality: DimensionScore,
    pub momentum: DimensionScore,
    pub safety: DimensionScore,
    pub summary: String,
    pub data_quality: DataQuality,
}

impl LicianScore {
    /// Dimension scores in aggregation order
    pub fn dimensions(&self) -> [&DimensionScore; 5] {
        [&self.value, &self.growth, &self.quality, &self.momentum, &self.safety]
    }

    /// Human-readable band for the overall score
    pub fn rating_label(&self) -> &'static str {
        match self.overall_score {
            9..=10 => "Excellent",
            7..=8 => "Good",
            5..=6 => "Average",
            3..=4 => "Below Average",
            _ => "Poor",
        }
    }
}

/// Borrowed view of everything the engine scores for one ticker.
/// Every list is most-recent-first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringInput<'a> {
    pub income_statements: &'a [IncomeStatement],
    pub balance_sheets: &'a [BalanceSheet],
    pub cash_flow_statements: &'a [CashFlowStatement],
    pub metrics: Option<&'a FinancialMetrics>,
    pub prices: &'a [PriceBar],
    pub analyst_ratings: &'a [AnalystRating],
}

/// Owned scoring request, as read from a JSON bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub ticker: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub income_statements: Vec<IncomeStatement>,
    #[serde(default)]
    pub balance_sheets: Vec<BalanceSheet>,
    #[serde(default)]
    pub cash_flow_statements: Vec<CashFlowStatement>,
    #[serde(default)]
    pub metrics: Option<FinancialMetrics>,
    #[serde(default)]
    pub prices: Vec<PriceBar>,
    #[serde(default)]
    pub analyst_ratings: Vec<AnalystRating>,
}

impl ScoreRequest {
    pub fn as_input(&self) -> ScoringInput<'_> {
        ScoringInput {
            income_statements: &self.income_statements,
            balance_sheets: &self.balance_sheets,
            cash_flow_statements: &self.cash_flow_statements,
            metrics: self.metrics.as_ref(),
            prices: &self.prices,
            analyst_ratings: &self.analyst_ratings,
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.ticker.trim().is_empty() {
            return Err(AnalysisError::InvalidData("ticker must be non-empty".to_string()));
        }
        Ok(())
    }
}

/// Treat NaN and infinities the same as a missing value.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
