//! In-memory registry of the active series
//!
//! The store keeps series in display order (the order they were added). It
//! holds no transformation logic; pipeline stages read from it and callers
//! write their results back.

use crate::error::{Result, SeriesError};
use crate::model::{DataPoint, Series, SeriesId};

/// Registry of series keyed by id, in display order
#[derive(Debug, Default, Clone)]
pub struct SeriesStore {
    series: Vec<Series>,
    issued_ids: u64,
}

impl SeriesStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &SeriesId) -> Option<usize> {
        self.series.iter().position(|s| s.id() == id)
    }

    /// Get a series by id
    pub fn get(&self, id: &SeriesId) -> Option<&Series> {
        self.position(id).map(|idx| &self.series[idx])
    }

    /// Whether a series with this id is registered
    pub fn contains(&self, id: &SeriesId) -> bool {
        self.position(id).is_some()
    }

    /// Insert a series, or replace the one with the same id in place.
    ///
    /// The ordering invariant is re-checked; a series that violates it is
    /// rejected and the store is left untouched.
    pub fn upsert(&mut self, series: Series) -> Result<()> {
        series.check_order()?;

        match self.position(series.id()) {
            Some(idx) => self.series[idx] = series,
            None => self.series.push(series),
        }
        Ok(())
    }

    /// Remove a series, returning it if it was registered
    pub fn remove(&mut self, id: &SeriesId) -> Option<Series> {
        self.position(id).map(|idx| self.series.remove(idx))
    }

    /// All series in display order
    pub fn list(&self) -> &[Series] {
        &self.series
    }

    /// Visible series in display order
    pub fn visible(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| s.visible)
    }

    /// Toggle the visibility of a series
    pub fn set_visible(&mut self, id: &SeriesId, visible: bool) -> Result<()> {
        let idx = self
            .position(id)
            .ok_or_else(|| SeriesError::UnknownSeries(id.to_string()))?;
        self.series[idx].visible = visible;
        Ok(())
    }

    /// Replace the points of a registered series
    pub fn replace_points(&mut self, id: &SeriesId, points: Vec<DataPoint>) -> Result<()> {
        let idx = self
            .position(id)
            .ok_or_else(|| SeriesError::UnknownSeries(id.to_string()))?;
        self.series[idx].replace_points(points)
    }

    /// Number of registered series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Issue a fresh `<prefix>-<n>` identifier not used by any registered series.
    ///
    /// Issued numbers are never reused, even after removal.
    pub fn next_id(&mut self, prefix: &str) -> SeriesId {
        loop {
            self.issued_ids += 1;
            let id = SeriesId::new(format!("{}-{}", prefix, self.issued_ids));
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(id: &str) -> Series {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        Series::new(id, id.to_uppercase(), vec![DataPoint::new(date, 1.0)]).unwrap()
    }

    #[test]
    fn test_upsert_get_remove() {
        let mut store = SeriesStore::new();
        store.upsert(series("a")).unwrap();
        store.upsert(series("b")).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"a".into()).unwrap().name, "A");

        let removed = store.remove(&"a".into()).unwrap();
        assert_eq!(removed.id().as_str(), "a");
        assert!(store.get(&"a".into()).is_none());
        assert!(store.remove(&"a".into()).is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = SeriesStore::new();
        store.upsert(series("a")).unwrap();
        store.upsert(series("b")).unwrap();

        let mut replacement = series("a");
        replacement.name = "Renamed".to_string();
        store.upsert(replacement).unwrap();

        let names: Vec<_> = store.list().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Renamed", "B"]);
    }

    #[test]
    fn test_visibility() {
        let mut store = SeriesStore::new();
        store.upsert(series("a")).unwrap();
        store.upsert(series("b")).unwrap();
        store.set_visible(&"a".into(), false).unwrap();

        let visible: Vec<_> = store.visible().map(|s| s.id().as_str()).collect();
        assert_eq!(visible, vec!["b"]);
        assert!(matches!(
            store.set_visible(&"zzz".into(), true),
            Err(SeriesError::UnknownSeries(_))
        ));
    }

    #[test]
    fn test_next_id_skips_taken_ids() {
        let mut store = SeriesStore::new();
        store.upsert(series("formula-1")).unwrap();

        assert_eq!(store.next_id("formula").as_str(), "formula-2");
        assert_eq!(store.next_id("formula").as_str(), "formula-3");
    }
}
