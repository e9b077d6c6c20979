//! In-memory exposure tables as delivered by a data source.

use std::collections::BTreeMap;

use crate::adm::AdmLevel;

/// One daily flood-exposure row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureRow {
    /// Region identifier.
    pub pcode: String,
    /// Administrative level of the region.
    pub adm_level: u8,
    /// Observation date as text (`YYYY-MM-DD`, optionally with a time part).
    pub valid_date: String,
    /// Daily flood-extent statistic (`sum` column).
    pub value: f64,
}

impl ExposureRow {
    /// Creates a new row.
    pub fn new(
        pcode: impl Into<String>,
        adm_level: u8,
        valid_date: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            pcode: pcode.into(),
            adm_level,
            valid_date: valid_date.into(),
            value,
        }
    }
}

/// All exposure rows of one country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExposureTable {
    rows: Vec<ExposureRow>,
}

impl ExposureTable {
    /// Wraps a list of rows.
    pub fn new(rows: Vec<ExposureRow>) -> Self {
        Self { rows }
    }

    /// Returns all rows in input order.
    pub fn rows(&self) -> &[ExposureRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a table with only the rows of the given level.
    pub fn filter_adm_level(&self, level: AdmLevel) -> ExposureTable {
        ExposureTable {
            rows: self
                .rows
                .iter()
                .filter(|r| r.adm_level == level.get())
                .cloned()
                .collect(),
        }
    }

    /// Groups rows by region, keeping input order inside each region.
    pub fn regions(&self) -> BTreeMap<&str, Vec<&ExposureRow>> {
        let mut out: BTreeMap<&str, Vec<&ExposureRow>> = BTreeMap::new();
        for row in &self.rows {
            out.entry(row.pcode.as_str()).or_default().push(row);
        }
        out
    }
}

impl FromIterator<ExposureRow> for ExposureTable {
    fn from_iter<I: IntoIterator<Item = ExposureRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ExposureTable {
        ExposureTable::new(vec![
            ExposureRow::new("NG002", 1, "2020-01-02", 2.0),
            ExposureRow::new("NG", 0, "2020-01-01", 9.0),
            ExposureRow::new("NG001", 1, "2020-01-01", 0.0),
            ExposureRow::new("NG002", 1, "2020-01-01", 1.0),
        ])
    }

    #[test]
    fn filter_keeps_one_level() {
        let adm1 = table().filter_adm_level(AdmLevel::Region);
        assert_eq!(adm1.len(), 3);
        assert!(adm1.rows().iter().all(|r| r.adm_level == 1));
        assert!(table().filter_adm_level(AdmLevel::District).is_empty());
    }

    #[test]
    fn regions_sorted_and_stable() {
        let t = table().filter_adm_level(AdmLevel::Region);
        let regions = t.regions();
        let keys: Vec<&str> = regions.keys().copied().collect();
        assert_eq!(keys, vec!["NG001", "NG002"]);
        let dates: Vec<&str> = regions["NG002"]
            .iter()
            .map(|r| r.valid_date.as_str())
            .collect();
        assert_eq!(dates, vec!["2020-01-02", "2020-01-01"]);
    }
}
