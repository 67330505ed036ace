//! Installation price list and battery storage options

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Sizes closer than this are treated as the same catalog size (kW).
/// Multiples of the 0.45 kW step are not exact in binary floating point.
pub const SIZE_TOLERANCE_KW: f64 = 1e-9;

/// One priced installation package
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallationRow {
    pub size_kw: f64,
    pub cost: f64,
    pub battery_kwh: f64,
}

impl InstallationRow {
    fn is_finite(&self) -> bool {
        self.size_kw.is_finite() && self.cost.is_finite() && self.battery_kwh.is_finite()
    }
}

/// Result of a catalog lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogMatch {
    pub row: InstallationRow,
    /// The requested size exceeded every row and the largest package was used
    pub clamped: bool,
}

/// Price list ordered by ascending installation size
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationCatalog {
    rows: Vec<InstallationRow>,
}

impl InstallationCatalog {
    /// Build a catalog, rejecting empty or unsorted price lists
    pub fn new(rows: Vec<InstallationRow>) -> Result<Self, LoadError> {
        if rows.is_empty() {
            return Err(LoadError::EmptyCatalog);
        }
        if let Some(idx) = rows.iter().position(|row| !row.is_finite()) {
            return Err(LoadError::NonFiniteCatalogRow { row: idx });
        }
        for (idx, pair) in rows.windows(2).enumerate() {
            if pair[1].size_kw <= pair[0].size_kw {
                return Err(LoadError::UnsortedCatalog {
                    row: idx + 1,
                    size_kw: pair[1].size_kw,
                });
            }
        }
        Ok(Self { rows })
    }

    /// Price list of the published calculator
    pub fn default_pricing() -> Self {
        let priced = [
            (2.7, 42_990.0, 5.8),
            (3.15, 45_980.0, 9.2),
            (3.6, 47_980.0, 9.2),
            (4.05, 49_980.0, 9.2),
            (4.5, 52_230.0, 9.2),
            (4.95, 54_480.0, 9.2),
            (5.4, 56_730.0, 9.2),
            (5.85, 58_980.0, 9.2),
            (6.3, 59_980.0, 9.2),
            (6.75, 60_980.0, 9.2),
            (7.2, 61_980.0, 9.2),
            (7.65, 62_980.0, 9.2),
            (8.1, 63_980.0, 9.2),
            (8.55, 64_980.0, 9.2),
            (9.0, 65_980.0, 9.2),
            (9.45, 66_480.0, 9.2),
            (9.9, 66_980.0, 9.2),
        ];

        Self {
            rows: priced
                .iter()
                .map(|&(size_kw, cost, battery_kwh)| InstallationRow { size_kw, cost, battery_kwh })
                .collect(),
        }
    }

    /// First package at least as large as `size_kw`, else the largest package
    pub fn lookup(&self, size_kw: f64) -> CatalogMatch {
        if let Some(row) = self
            .rows
            .iter()
            .find(|row| row.size_kw >= size_kw - SIZE_TOLERANCE_KW)
        {
            return CatalogMatch { row: *row, clamped: false };
        }

        let largest = self.largest();
        debug!(
            "requested {:.3} kW exceeds catalog, using largest package {:.3} kW",
            size_kw, largest.size_kw
        );
        CatalogMatch { row: largest, clamped: true }
    }

    pub fn largest(&self) -> InstallationRow {
        // Non-empty by construction
        self.rows[self.rows.len() - 1]
    }

    pub fn rows(&self) -> &[InstallationRow] {
        &self.rows
    }
}

/// A battery product and the installation size it pairs with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageOption {
    pub storage_kwh: f64,
    pub pv_match_kw: f64,
}

/// Battery products available as a recommendation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StorageOptions {
    options: Vec<StorageOption>,
}

impl StorageOptions {
    pub fn new(options: Vec<StorageOption>) -> Self {
        Self { options }
    }

    /// Storage products of the published calculator (not sorted)
    pub fn default_pricing() -> Self {
        let products = [
            (6.1, 4.066666667),
            (9.2, 6.133333333),
            (12.2, 8.133333333),
            (18.4, 12.26666667),
            (24.4, 16.26666667),
            (11.5, 7.666666667),
            (17.3, 11.53333333),
            (23.0, 15.33333333),
            (34.6, 23.06666667),
            (46.1, 30.73333333),
        ];

        Self {
            options: products
                .iter()
                .map(|&(storage_kwh, pv_match_kw)| StorageOption { storage_kwh, pv_match_kw })
                .collect(),
        }
    }

    /// Product whose matching PV size is nearest to `pv_kw`; the first of equally near products wins
    pub fn nearest(&self, pv_kw: f64) -> Option<StorageOption> {
        let mut options = self.options.iter();
        let mut best = *options.next()?;
        let mut best_distance = (best.pv_match_kw - pv_kw).abs();

        for candidate in options {
            let distance = (candidate.pv_match_kw - pv_kw).abs();
            if distance < best_distance {
                best = *candidate;
                best_distance = distance;
            }
        }
        Some(best)
    }

    pub fn options(&self) -> &[StorageOption] {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_first_row_at_least_requested() {
        let catalog = InstallationCatalog::default_pricing();
        let found = catalog.lookup(4.6);
        assert_eq!(found.row.size_kw, 4.95);
        assert_eq!(found.row.cost, 54_480.0);
        assert!(!found.clamped);
    }

    #[test]
    fn test_lookup_exact_match_despite_float_drift() {
        let catalog = InstallationCatalog::default_pricing();
        // 13 * 0.45 is 5.8500000000000005 in binary floating point
        let drifted = 13.0 * 0.45;
        assert!(drifted > 5.85);
        let found = catalog.lookup(drifted);
        assert_eq!(found.row.size_kw, 5.85);
        assert_eq!(found.row.cost, 58_980.0);
    }

    #[test]
    fn test_lookup_clamps_to_largest() {
        let catalog = InstallationCatalog::default_pricing();
        let found = catalog.lookup(25.0);
        assert!(found.clamped);
        assert_eq!(found.row, catalog.largest());
        assert_eq!(found.row.cost, 66_980.0);
        assert_eq!(found.row.battery_kwh, 9.2);
    }

    #[test]
    fn test_unsorted_catalog_rejected() {
        let rows = vec![
            InstallationRow { size_kw: 3.0, cost: 1.0, battery_kwh: 1.0 },
            InstallationRow { size_kw: 2.0, cost: 1.0, battery_kwh: 1.0 },
        ];
        assert!(matches!(
            InstallationCatalog::new(rows),
            Err(LoadError::UnsortedCatalog { row: 1, .. })
        ));
        assert!(matches!(InstallationCatalog::new(Vec::new()), Err(LoadError::EmptyCatalog)));
    }

    #[test]
    fn test_non_finite_catalog_rejected() {
        let row = |size_kw: f64, cost: f64| InstallationRow { size_kw, cost, battery_kwh: 9.2 };

        for bad in [f64::NAN, f64::INFINITY] {
            let rows = vec![row(2.7, 42_990.0), row(bad, 45_980.0), row(3.6, 47_980.0)];
            assert!(matches!(
                InstallationCatalog::new(rows),
                Err(LoadError::NonFiniteCatalogRow { row: 1 })
            ));
        }

        let rows = vec![row(2.7, 42_990.0), row(3.15, f64::NAN)];
        assert!(matches!(
            InstallationCatalog::new(rows),
            Err(LoadError::NonFiniteCatalogRow { row: 1 })
        ));
    }

    #[test]
    fn test_nearest_storage() {
        let storage = StorageOptions::default_pricing();
        assert_eq!(storage.nearest(4.5).unwrap().storage_kwh, 6.1);
        assert_eq!(storage.nearest(5.4).unwrap().storage_kwh, 9.2);
        assert_eq!(storage.nearest(7.5).unwrap().storage_kwh, 11.5);
        assert_eq!(storage.nearest(100.0).unwrap().storage_kwh, 46.1);
        assert!(StorageOptions::default().nearest(4.5).is_none());
    }
}
