#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::PriceBar;
    use approx::assert_relative_eq;

    fn bar(close: f64) -> PriceBar {
        PriceBar {
            date: None,
            open: None,
            high: None,
            low: None,
            close,
            adjusted_close: None,
            volume: Some(1_000_000.0),
        }
    }

    // Most-recent-first bars from a list of closes
    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        closes.iter().map(|&c| bar(c)).collect()
    }

    #[test]
    fn test_trailing_sma_uses_most_recent_values() {
        let data = vec![5.0, 4.0, 3.0, 2.0, 1.0];
        assert_relative_eq!(trailing_sma(&data, 3).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(trailing_sma(&data, 5).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trailing_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        assert!(trailing_sma(&data, 3).is_none());
        assert!(trailing_sma(&data, 0).is_none());
    }

    #[test]
    fn test_effective_closes_prefer_adjusted() {
        let mut rows = bars(&[10.0, 9.0, f64::NAN]);
        rows[1].adjusted_close = Some(8.5);
        assert_eq!(effective_closes(&rows), vec![10.0, 8.5]);
    }

    #[test]
    fn test_daily_returns_direction() {
        // Latest close 110 after 100: +10%
        let returns = daily_returns(&bars(&[110.0, 100.0, 100.0]), 60);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_daily_returns_window_and_gaps() {
        let mut rows = bars(&[101.0, 100.0, 99.0, 98.0, 97.0]);
        rows[2].close = 0.0;
        // Pairs (0,1) valid, (1,2) and (2,3) skipped, (3,4) outside window of 3
        let returns = daily_returns(&rows, 3);
        assert_eq!(returns.len(), 1);
    }

    #[test]
    fn test_annualized_volatility_constant_returns() {
        let returns = vec![0.01; 30];
        assert_relative_eq!(annualized_volatility(&returns).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_annualized_volatility_alternating_returns() {
        // Population std dev of +/-1% is exactly 1%
        let returns: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        let vol = annualized_volatility(&returns).unwrap();
        assert_relative_eq!(vol, 0.01 * 252f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_annualized_volatility_empty() {
        assert!(annualized_volatility(&[]).is_none());
    }

    #[test]
    fn test_pct_above() {
        assert_relative_eq!(pct_above(110.0, 100.0).unwrap(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(pct_above(90.0, 100.0).unwrap(), -10.0, epsilon = 1e-9);
        assert!(pct_above(90.0, 0.0).is_none());
    }
}
