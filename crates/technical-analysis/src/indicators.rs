use analysis_core::PriceBar;
use statrs::statistics::Statistics;

/// Trading days per year, used to annualize daily volatility
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Effective closes (adjusted when available), most-recent-first.
/// Rows without a usable price are dropped.
pub fn effective_closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().filter_map(|b| b.effective_close()).collect()
}

/// Simple Moving Average over the most recent `period` values.
///
/// `data` is most-recent-first, so this is the trailing average ending at
/// the latest price, not a rolling series.
pub fn trailing_sma(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    Some(data[..period].iter().sum::<f64>() / period as f64)
}

/// Simple daily returns from most-recent-first bars.
///
/// Looks at up to `max_returns` adjacent pairs starting from the latest bar;
/// a pair where either price is unusable is skipped rather than counted.
pub fn daily_returns(bars: &[PriceBar], max_returns: usize) -> Vec<f64> {
    bars.windows(2)
        .take(max_returns)
        .filter_map(|w| {
            let today = w[0].effective_close()?;
            let yesterday = w[1].effective_close()?;
            Some((today - yesterday) / yesterday)
        })
        .collect()
}

/// Annualized volatility: population standard deviation of daily returns
/// scaled by sqrt(252).
pub fn annualized_volatility(returns: &[f64]) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let sd = returns.population_std_dev();
    if sd.is_finite() {
        Some(sd * TRADING_DAYS_PER_YEAR.sqrt())
    } else {
        None
    }
}

/// Percent distance of `price` above `reference` (negative when below).
pub fn pct_above(price: f64, reference: f64) -> Option<f64> {
    if reference > 0.0 && price.is_finite() {
        Some((price / reference - 1.0) * 100.0)
    } else {
        None
    }
}
