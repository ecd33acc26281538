use analysis_core::SectorMedians;

/// Benchmarks used when a sector is unknown or unmatched
pub const DEFAULT_MEDIANS: SectorMedians = SectorMedians {
    pe_ratio: 20.0,
    pb_ratio: 3.0,
    ps_ratio: 2.5,
    gross_margin: 0.40,
    operating_margin: 0.15,
    net_margin: 0.10,
    roe: 0.15,
    debt_to_equity: 1.0,
    revenue_growth: 0.08,
};

/// Sector name -> expected ratios and margins
pub const SECTOR_MEDIANS: [(&str, SectorMedians); 11] = [
    (
        "Technology",
        SectorMedians {
            pe_ratio: 28.0,
            pb_ratio: 6.0,
            ps_ratio: 5.0,
            gross_margin: 0.55,
            operating_margin: 0.20,
            net_margin: 0.15,
            roe: 0.18,
            debt_to_equity: 0.5,
            revenue_growth: 0.12,
        },
    ),
    (
        "Healthcare",
        SectorMedians {
            pe_ratio: 24.0,
            pb_ratio: 4.0,
            ps_ratio: 4.0,
            gross_margin: 0.55,
            operating_margin: 0.15,
            net_margin: 0.10,
            roe: 0.14,
            debt_to_equity: 0.6,
            revenue_growth: 0.08,
        },
    ),
    (
        "Financial Services",
        SectorMedians {
            pe_ratio: 13.0,
            pb_ratio: 1.4,
            ps_ratio: 3.0,
            gross_margin: 0.60,
            operating_margin: 0.30,
            net_margin: 0.20,
            roe: 0.11,
            debt_to_equity: 2.0,
            revenue_growth: 0.06,
        },
    ),
    (
        "Consumer Cyclical",
        SectorMedians {
            pe_ratio: 20.0,
            pb_ratio: 3.5,
            ps_ratio: 1.2,
            gross_margin: 0.35,
            operating_margin: 0.10,
            net_margin: 0.06,
            roe: 0.16,
            debt_to_equity: 1.0,
            revenue_growth: 0.07,
        },
    ),
    (
        "Consumer Defensive",
        SectorMedians {
            pe_ratio: 22.0,
            pb_ratio: 4.0,
            ps_ratio: 1.5,
            gross_margin: 0.35,
            operating_margin: 0.10,
            net_margin: 0.07,
            roe: 0.18,
            debt_to_equity: 0.9,
            revenue_growth: 0.04,
        },
    ),
    (
        "Industrials",
        SectorMedians {
            pe_ratio: 21.0,
            pb_ratio: 4.0,
            ps_ratio: 2.0,
            gross_margin: 0.30,
            operating_margin: 0.12,
            net_margin: 0.08,
            roe: 0.16,
            debt_to_equity: 0.9,
            revenue_growth: 0.06,
        },
    ),
    (
        "Energy",
        SectorMedians {
            pe_ratio: 12.0,
            pb_ratio: 1.8,
            ps_ratio: 1.2,
            gross_margin: 0.35,
            operating_margin: 0.15,
            net_margin: 0.09,
            roe: 0.14,
            debt_to_equity: 0.5,
            revenue_growth: 0.05,
        },
    ),
    (
        "Utilities",
        SectorMedians {
            pe_ratio: 18.0,
            pb_ratio: 1.8,
            ps_ratio: 2.5,
            gross_margin: 0.40,
            operating_margin: 0.20,
            net_margin: 0.11,
            roe: 0.09,
            debt_to_equity: 1.4,
            revenue_growth: 0.04,
        },
    ),
    (
        "Real Estate",
        SectorMedians {
            pe_ratio: 35.0,
            pb_ratio: 2.0,
            ps_ratio: 6.0,
            gross_margin: 0.60,
            operating_margin: 0.30,
            net_margin: 0.20,
            roe: 0.07,
            debt_to_equity: 1.1,
            revenue_growth: 0.05,
        },
    ),
    (
        "Basic Materials",
        SectorMedians {
            pe_ratio: 16.0,
            pb_ratio: 2.2,
            ps_ratio: 1.5,
            gross_margin: 0.28,
            operating_margin: 0.12,
            net_margin: 0.08,
            roe: 0.12,
            debt_to_equity: 0.6,
            revenue_growth: 0.05,
        },
    ),
    (
        "Communication Services",
        SectorMedians {
            pe_ratio: 20.0,
            pb_ratio: 3.0,
            ps_ratio: 2.5,
            gross_margin: 0.50,
            operating_margin: 0.18,
            net_margin: 0.12,
            roe: 0.13,
            debt_to_equity: 0.9,
            revenue_growth: 0.07,
        },
    ),
];

/// Find the benchmark row for a sector name.
///
/// Matching is case-insensitive: an exact name wins, otherwise the first
/// key that contains the name (or is contained in it) is used.
pub fn lookup_sector(sector: &str) -> Option<(&'static str, SectorMedians)> {
    let needle = sector.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    SECTOR_MEDIANS
        .iter()
        .find(|(name, _)| name.to_lowercase() == needle)
        .or_else(|| {
            SECTOR_MEDIANS.iter().find(|(name, _)| {
                let key = name.to_lowercase();
                key.contains(&needle) || needle.contains(&key)
            })
        })
        .copied()
}

/// Benchmarks for a sector, falling back to [`DEFAULT_MEDIANS`].
pub fn sector_medians(sector: &str) -> SectorMedians {
    lookup_sector(sector)
        .map(|(_, medians)| medians)
        .unwrap_or(DEFAULT_MEDIANS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_benchmarks_are_valid() {
        assert!(DEFAULT_MEDIANS.validate().is_ok());
        for (name, medians) in SECTOR_MEDIANS.iter() {
            assert!(medians.validate().is_ok(), "{} has an invalid benchmark", name);
        }
    }

    #[test]
    fn test_exact_and_case_insensitive_lookup() {
        assert_eq!(lookup_sector("Energy").unwrap().0, "Energy");
        assert_eq!(lookup_sector("real estate").unwrap().0, "Real Estate");
        assert_eq!(sector_medians("UTILITIES").pe_ratio, 18.0);
    }

    #[test]
    fn test_substring_lookup() {
        assert_eq!(lookup_sector("Tech").unwrap().0, "Technology");
        assert_eq!(lookup_sector("Financial").unwrap().0, "Financial Services");
        assert_eq!(lookup_sector("Healthcare Providers").unwrap().0, "Healthcare");
    }

    #[test]
    fn test_unknown_sector_falls_back_to_default() {
        assert!(lookup_sector("Crypto Mining").is_none());
        assert_eq!(sector_medians("Crypto Mining"), DEFAULT_MEDIANS);
        assert_eq!(sector_medians(""), DEFAULT_MEDIANS);
    }
}
