//! The session a user builds a chart in
//!
//! A [`Workspace`] owns the series store and the display settings. Every
//! operation either completes or leaves the store exactly as it was.

use crate::error::{LensError, Result};
use serde::Serialize;
use series_data::fetch::into_points;
use series_data::{
    aggregate, merge_for_chart, write_csv, CalculationType, ChartRow, DataPoint, EngineConfig,
    FetchError, RawPoint, RequestSequence, RequestToken, Series, SeriesId, SeriesStore, Timeframe,
    YAxis,
};
use series_formula::validator::validate_with_depth;
use series_formula::{evaluate_bound, Formula, FormulaError, VariableBinding};
use std::collections::BTreeMap;
use std::io::Write;

/// Result of applying a refetch response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "outcome")]
pub enum RefetchOutcome {
    /// The response was the latest one; `updated` series got new points and
    /// every dataset was re-bucketed to the new timeframe
    Applied { updated: usize },
    /// A newer refetch was issued after this one; nothing changed
    Stale,
}

/// Points delivered by a refetch, per series
pub type RefetchResponse = std::result::Result<Vec<(SeriesId, Vec<DataPoint>)>, FetchError>;

/// Store, settings and request bookkeeping for one charting session
#[derive(Debug)]
pub struct Workspace {
    config: EngineConfig,
    store: SeriesStore,
    /// Points of each dataset as delivered, before aggregation
    datasets: BTreeMap<SeriesId, Vec<DataPoint>>,
    timeframe: Timeframe,
    calculation: CalculationType,
    normalize_overlays: bool,
    requests: RequestSequence,
    pending_timeframe: Option<(RequestToken, Timeframe)>,
    colors_assigned: usize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Workspace {
    /// Create an empty workspace with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            timeframe: config.general.timeframe,
            calculation: config.general.calculation,
            normalize_overlays: config.general.normalize_overlays,
            config,
            store: SeriesStore::new(),
            datasets: BTreeMap::new(),
            requests: RequestSequence::new(),
            pending_timeframe: None,
            colors_assigned: 0,
        }
    }

    /// Create a workspace from `./macro_lens.toml`, or defaults
    pub fn load_default() -> Self {
        Self::new(EngineConfig::load_default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn calculation_type(&self) -> CalculationType {
        self.calculation
    }

    pub fn set_calculation_type(&mut self, calculation: CalculationType) {
        self.calculation = calculation;
    }

    pub fn normalize_overlays(&self) -> bool {
        self.normalize_overlays
    }

    pub fn set_normalize_overlays(&mut self, normalize: bool) {
        self.normalize_overlays = normalize;
    }

    /// Get a series by id
    pub fn series(&self, id: &SeriesId) -> Option<&Series> {
        self.store.get(id)
    }

    /// All series in display order
    pub fn list(&self) -> &[Series] {
        self.store.list()
    }

    fn next_style(&mut self) -> (String, YAxis) {
        let color = self.config.display.color_for(self.colors_assigned);
        self.colors_assigned += 1;
        let axis = if self.store.is_empty() {
            YAxis::Left
        } else {
            YAxis::Right
        };
        (color, axis)
    }

    /// Add a dataset, aggregated to the current timeframe
    pub fn add_series(&mut self, name: &str, points: Vec<DataPoint>) -> Result<SeriesId> {
        let validated = Series::new(name, name, points)?;

        let id = self.store.next_id("series");
        let (color, axis) = self.next_style();
        let series = Series::new(id.clone(), name, validated.points().to_vec())?;
        let series = aggregate(&series, self.timeframe)
            .with_color(color)
            .with_y_axis(axis);

        log::info!(
            "Added series '{}' ({}) with {} points",
            name,
            id,
            series.len()
        );
        self.store.upsert(series)?;
        self.datasets.insert(id.clone(), validated.points().to_vec());
        Ok(id)
    }

    /// Add a dataset from a fetch collaborator's response
    pub fn add_fetched(
        &mut self,
        name: &str,
        response: std::result::Result<Vec<RawPoint>, FetchError>,
    ) -> Result<SeriesId> {
        let raw = response.map_err(|e| {
            log::warn!("Fetch for '{}' failed: {}", name, e);
            LensError::from(e)
        })?;
        let points = into_points(&raw)?;
        self.add_series(name, points)
    }

    /// Remove a series. Formulas derived from it keep their values.
    pub fn remove_series(&mut self, id: &SeriesId) -> Result<Series> {
        let removed = self
            .store
            .remove(id)
            .ok_or_else(|| series_data::SeriesError::UnknownSeries(id.to_string()))?;
        self.datasets.remove(id);
        log::info!("Removed series '{}' ({})", removed.name, id);
        Ok(removed)
    }

    pub fn set_visible(&mut self, id: &SeriesId, visible: bool) -> Result<()> {
        Ok(self.store.set_visible(id, visible)?)
    }

    /// Start a timeframe change. Only the most recently issued token can be
    /// applied.
    pub fn begin_refetch(&mut self, timeframe: Timeframe) -> RequestToken {
        let token = self.requests.issue();
        self.pending_timeframe = Some((token, timeframe));
        log::debug!("Issued refetch {} for {}", token.sequence(), timeframe);
        token
    }

    /// Apply the response of a refetch.
    ///
    /// Stale responses are discarded. A failed fetch, or a response that
    /// cannot be applied in full, leaves the store untouched. Formula series
    /// are never refetched. Every other series is re-bucketed to the new
    /// timeframe, from the response if it carries the series and from its
    /// last delivered points otherwise.
    pub fn apply_refetch(
        &mut self,
        token: RequestToken,
        response: RefetchResponse,
    ) -> Result<RefetchOutcome> {
        if !self.requests.is_latest(token) {
            log::debug!("Discarding stale refetch {}", token.sequence());
            return Ok(RefetchOutcome::Stale);
        }

        let timeframe = match self.pending_timeframe {
            Some((pending, timeframe)) if pending == token => timeframe,
            _ => self.timeframe,
        };

        let updates = response.map_err(|e| {
            log::warn!("Refetch {} failed: {}", token.sequence(), e);
            LensError::from(e)
        })?;

        let mut datasets = self.datasets.clone();
        let mut updated = 0;
        for (id, points) in updates {
            let Some(current) = self.store.get(&id) else {
                log::debug!("Refetch {} returned unknown series '{}'", token.sequence(), id);
                continue;
            };
            if current.source_formula.is_some() {
                continue;
            }

            let mut refreshed = current.clone();
            refreshed.replace_points(points)?;
            datasets.insert(id, refreshed.points().to_vec());
            updated += 1;
        }

        let mut replacements = Vec::new();
        for series in self.store.list() {
            if series.source_formula.is_some() {
                continue;
            }
            let Some(points) = datasets.get(series.id()) else {
                continue;
            };
            let mut refreshed = series.clone();
            refreshed.replace_points(points.clone())?;
            replacements.push(aggregate(&refreshed, timeframe));
        }

        for series in replacements {
            self.store.upsert(series)?;
        }
        self.datasets = datasets;
        self.timeframe = timeframe;
        self.pending_timeframe = None;

        log::info!("Applied refetch {} ({}, {} series)", token.sequence(), timeframe, updated);
        Ok(RefetchOutcome::Applied { updated })
    }

    /// Create a series from a formula over the visible series.
    ///
    /// Visible series are bound to `A`, `B`, ... in display order. The binding
    /// is captured now; later changes to the store do not affect the result.
    pub fn create_formula(&mut self, expression: &str) -> Result<SeriesId> {
        let max_depth = self.config.formula.max_depth;
        let ids: Vec<SeriesId> = self.store.visible().map(|s| s.id().clone()).collect();

        let binding = match VariableBinding::positional(ids) {
            Ok(binding) => binding,
            Err(e) => {
                // Report reference errors against zero active series first
                validate_with_depth(expression, 0, max_depth)?;
                return Err(e.into());
            }
        };
        let formula = Formula::with_max_depth(expression, binding, max_depth)?;

        let store = &self.store;
        let points = evaluate_bound(&formula, |id| store.get(id), &self.config.formula)?;
        if points.is_empty() {
            return Err(FormulaError::EmptyBinding.into());
        }

        let validated = Series::new(expression, expression, points)?;

        let id = self.store.next_id(&self.config.formula.id_prefix);
        let (color, axis) = self.next_style();
        let series = Series::new(id.clone(), expression, validated.points().to_vec())?
            .with_color(color)
            .with_y_axis(axis)
            .with_source_formula(expression);

        log::info!("Created formula series {} = {}", id, expression);
        self.store.upsert(series)?;
        Ok(id)
    }

    fn visible_split(&self) -> Option<(&Series, Vec<&Series>)> {
        let mut visible = self.store.visible();
        let primary = visible.next()?;
        Some((primary, visible.collect()))
    }

    /// Rows for the chart renderer; the first visible series is the primary
    pub fn chart_rows(&self) -> Vec<ChartRow> {
        match self.visible_split() {
            Some((primary, secondaries)) => merge_for_chart(
                primary,
                &secondaries,
                self.calculation,
                self.normalize_overlays,
            ),
            None => Vec::new(),
        }
    }

    /// Export the visible series as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<()> {
        let (primary, secondaries) = self.visible_split().ok_or(LensError::NoVisibleSeries)?;
        write_csv(writer, primary, &secondaries, self.calculation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn points(values: &[f64]) -> Vec<DataPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                DataPoint::new(NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap(), *v)
            })
            .collect()
    }

    #[test]
    fn test_styles_are_assigned() {
        let mut workspace = Workspace::default();
        let a = workspace.add_series("GDP", points(&[1.0, 2.0])).unwrap();
        let b = workspace.add_series("CPI", points(&[3.0, 4.0])).unwrap();

        let palette = &workspace.config().display.palette;
        assert_eq!(workspace.series(&a).unwrap().y_axis, YAxis::Left);
        assert_eq!(workspace.series(&b).unwrap().y_axis, YAxis::Right);
        assert_eq!(workspace.series(&a).unwrap().color, palette[0]);
        assert_eq!(workspace.series(&b).unwrap().color, palette[1]);
    }

    #[test]
    fn test_invalid_series_leaves_store_untouched() {
        let mut workspace = Workspace::default();
        let mut duplicated = points(&[1.0, 2.0]);
        duplicated.push(duplicated[0]);

        assert!(workspace.add_series("Bad", duplicated).is_err());
        assert!(workspace.list().is_empty());

        // The rejected add consumed neither an id nor a colour
        let id = workspace.add_series("Good", points(&[1.0, 2.0])).unwrap();
        assert_eq!(id.as_str(), "series-1");
        let palette = &workspace.config().display.palette;
        assert_eq!(workspace.series(&id).unwrap().color, palette[0]);
    }

    #[test]
    fn test_formula_without_series() {
        let mut workspace = Workspace::default();
        assert!(matches!(
            workspace.create_formula("A + 1"),
            Err(LensError::Formula(FormulaError::UnknownVariableReference { .. }))
        ));
        assert!(matches!(
            workspace.create_formula("1 + 1"),
            Err(LensError::Formula(FormulaError::EmptyBinding))
        ));
    }

    #[test]
    fn test_export_requires_visible_series() {
        let workspace = Workspace::default();
        assert!(matches!(
            workspace.export_csv(Vec::new()),
            Err(LensError::NoVisibleSeries)
        ));
        assert!(workspace.chart_rows().is_empty());
    }
}
