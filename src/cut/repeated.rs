//! Repeated cuts at regular spacing, gathered into one cut-lines group.

use crate::cut::bands::partition_within_operation;
use crate::cut::direction::Direction;
use crate::cut::settings::CutSettings;
use crate::cut::single::{CutResult, Cutter, abort, validate_length, validate_solid};
use crate::document::EntityId;
use crate::errors::CutError;
use crate::float_types::Real;
use crate::traits::GeometryKernel;
use crate::units::Length;
use std::fmt;
use tracing::{debug, info, warn};

/// Parameters of a repeated cut.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedCutParams {
    /// Distance between consecutive cuts; its unit is the unit of every reported altitude.
    pub spacing: Length,

    /// Number of cuts, ignored when `cut_whole_solid` is set.
    pub count: usize,

    pub direction: Direction,

    /// Hide the cross-section edges and their group.
    pub hide_lines: bool,

    /// Derive the count from the solid height: `floor(height / spacing)`.
    pub cut_whole_solid: bool,

    /// Replace the solid by one group per band between cuts.
    pub partition_bands: bool,
}

impl Default for RepeatedCutParams {
    fn default() -> Self {
        Self {
            spacing: Length::meters(1.0),
            count: 1,
            direction: Direction::BaseToTop,
            hide_lines: false,
            cut_whole_solid: false,
            partition_bands: false,
        }
    }
}

impl RepeatedCutParams {
    /// Set spacing.
    #[must_use]
    pub const fn with_spacing(mut self, spacing: Length) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set number of cuts.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub const fn with_hide_lines(mut self, hide: bool) -> Self {
        self.hide_lines = hide;
        self
    }

    #[must_use]
    pub const fn with_cut_whole_solid(mut self, whole: bool) -> Self {
        self.cut_whole_solid = whole;
        self
    }

    #[must_use]
    pub const fn with_partition_bands(mut self, partition: bool) -> Self {
        self.partition_bands = partition;
        self
    }
}

/// Lifecycle of a [`RepeatedCut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutState {
    #[default]
    Idle,
    Running,
    Committed,
    Aborted,
}

impl fmt::Display for CutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reported before each cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutProgress {
    /// 1-based position of this cut.
    pub index: usize,
    pub count: usize,
    pub altitude: Length,
}

/// Outcome of a committed repeated cut.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RepeatedCutReport {
    /// One result per performed cut, in cutting order.
    pub cuts: Vec<CutResult>,
    /// Planned altitudes on the base of the solid that were not cut.
    pub skipped: Vec<Length>,
    /// The cut-lines group, absent when no edge survived.
    pub group: Option<EntityId>,
    /// Cross-section edges that survived every later cut.
    pub edges: Vec<EntityId>,
    /// Band groups replacing the solid, when partitioning was requested.
    pub bands: Vec<EntityId>,
}

/// Number of cuts that fit in `height` at `spacing`, never counting a leftover band.
pub fn whole_solid_count(height: Real, spacing: Real) -> usize {
    if spacing.is_nan() || spacing <= 0.0 || !height.is_finite() || height <= 0.0 {
        return 0;
    }
    // absorbs ratios like 9.999999 that mean 10
    (height / spacing + 1e-9).floor() as usize
}

/// Altitudes, in the spacing's unit, a repeated cut visits in order.
///
/// A requested `count` is capped one past what fits in `height`, so a plan
/// never holds more than one altitude beyond the solid.
///
/// ```
/// use altcut::{Direction, altitude_plan};
///
/// let plan = altitude_plan(10.0, 2.0, 5, Direction::BaseToTop, false);
/// assert_eq!(plan, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
///
/// let capped = altitude_plan(10.0, 2.0, usize::MAX, Direction::BaseToTop, false);
/// assert_eq!(capped.len(), 6);
/// ```
pub fn altitude_plan(
    height: Real,
    spacing: Real,
    count: usize,
    direction: Direction,
    cut_whole_solid: bool,
) -> Vec<Real> {
    let fits = whole_solid_count(height, spacing);
    let count = if cut_whole_solid {
        fits
    } else {
        count.min(fits.saturating_add(1))
    };
    let (start, step) = direction.start_and_step(height, spacing);
    (0..count).map(|i| start + step * i as Real).collect()
}

/// Cut `solid` repeatedly with default settings.
///
/// The whole sequence is one document operation: if any cut fails the solid is
/// restored exactly and the error is returned.
#[allow(clippy::too_many_arguments)]
pub fn cut_repeatedly<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    solid: EntityId,
    spacing: Length,
    count: usize,
    direction: Direction,
    hide_lines: bool,
    cut_whole_solid: bool,
) -> Result<RepeatedCutReport, CutError> {
    let params = RepeatedCutParams::default()
        .with_spacing(spacing)
        .with_count(count)
        .with_direction(direction)
        .with_hide_lines(hide_lines)
        .with_cut_whole_solid(cut_whole_solid);
    RepeatedCut::new(params).run(kernel, solid)
}

/// A repeated cut: `Idle → Running → {Committed, Aborted}`.
pub struct RepeatedCut<'a> {
    params: RepeatedCutParams,
    cutter: Cutter,
    state: CutState,
    progress: Option<Box<dyn FnMut(&CutProgress) + 'a>>,
}

impl fmt::Debug for RepeatedCut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeatedCut")
            .field("params", &self.params)
            .field("settings", self.cutter.settings())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> RepeatedCut<'a> {
    pub fn new(params: RepeatedCutParams) -> Self {
        Self {
            params,
            cutter: Cutter::default(),
            state: CutState::Idle,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: CutSettings) -> Self {
        self.cutter = Cutter::new(settings);
        self
    }

    /// Call `callback` at every cut boundary.
    #[must_use]
    pub fn on_progress(mut self, callback: impl FnMut(&CutProgress) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn params(&self) -> &RepeatedCutParams {
        &self.params
    }

    pub fn state(&self) -> CutState {
        self.state
    }

    /// Run every cut on `solid` as one atomic operation.
    pub fn run<K: GeometryKernel + ?Sized>(
        &mut self,
        kernel: &mut K,
        solid: EntityId,
    ) -> Result<RepeatedCutReport, CutError> {
        if self.state != CutState::Idle {
            return Err(CutError::InvalidArgument(format!(
                "repeated cut already ran (state {})",
                self.state
            )));
        }
        validate_solid(kernel, solid)?;
        validate_length(self.params.spacing, "spacing")?;
        if self.params.spacing.value <= 0.0 {
            return Err(CutError::InvalidArgument(format!(
                "spacing must be positive, got {}",
                self.params.spacing
            )));
        }

        self.state = CutState::Running;
        let operation = self.cutter.settings().operation_name.clone();
        if let Err(e) = kernel.start_operation(&operation) {
            self.state = CutState::Aborted;
            return Err(e.into());
        }
        info!(
            %solid,
            spacing = %self.params.spacing,
            count = self.params.count,
            direction = %self.params.direction,
            "repeated cut by altitude"
        );

        let outcome = self
            .execute(kernel, solid)
            .and_then(|report| kernel.commit_operation().map(|()| report).map_err(CutError::from));
        match outcome {
            Ok(report) => {
                self.state = CutState::Committed;
                info!(
                    %solid,
                    cuts = report.cuts.len(),
                    edges = report.edges.len(),
                    skipped = report.skipped.len(),
                    "repeated cut committed"
                );
                Ok(report)
            },
            Err(e) => {
                self.state = CutState::Aborted;
                Err(abort(kernel, &operation, e))
            },
        }
    }

    fn execute<K: GeometryKernel + ?Sized>(
        &mut self,
        kernel: &mut K,
        solid: EntityId,
    ) -> Result<RepeatedCutReport, CutError> {
        let RepeatedCutParams {
            spacing,
            count,
            direction,
            hide_lines,
            cut_whole_solid,
            partition_bands,
        } = self.params.clone();
        let unit = spacing.unit;
        let settings = self.cutter.settings().clone();

        let height = Length::from_native(kernel.bounds(solid)?.height(), unit).value;
        let slack = settings.altitude_tolerance.in_unit(unit).value;
        let plan = altitude_plan(height, spacing.value, count, direction, cut_whole_solid);

        let mut report = RepeatedCutReport::default();
        let mut planned = Vec::with_capacity(plan.len());
        for value in plan {
            let altitude = Length::new(value, unit);
            if value > slack && value <= height + slack {
                planned.push(altitude);
            } else if cut_whole_solid && value.abs() <= slack {
                // the last step of a top-to-base whole-solid plan is the base itself
                warn!(%altitude, "planned cut lies on the base, skipping");
                report.skipped.push(altitude);
            } else {
                return Err(CutError::GeometryOperationFailed(format!(
                    "planned cut at {altitude} lies outside the solid ({})",
                    Length::new(height, unit)
                )));
            }
        }

        let total = planned.len();
        let mut collected = Vec::new();
        for (i, altitude) in planned.into_iter().enumerate() {
            if let Some(callback) = self.progress.as_mut() {
                callback(&CutProgress {
                    index: i + 1,
                    count: total,
                    altitude,
                });
            }
            let result = self.cutter.cut_within_operation(kernel, solid, altitude)?;
            debug!(
                index = i + 1,
                altitude = %result.altitude,
                edges = result.edges.len(),
                "cut"
            );
            collected.extend(result.edges.iter().copied());
            report.cuts.push(result);
        }

        let surviving: Vec<EntityId> = collected
            .into_iter()
            .filter(|&edge| kernel.is_valid(edge))
            .collect();

        if !surviving.is_empty() {
            let parent = kernel.parent(solid)?;
            let transform = kernel.transformation(solid)?;
            let group = kernel.add_group(parent, &surviving)?;
            kernel.transform_entity(group, &transform)?;
            kernel.set_name(
                group,
                &format!("{} ({spacing}, {direction})", settings.cut_lines_name),
            )?;
            for &edge in &surviving {
                kernel.set_hidden(edge, hide_lines)?;
            }
            kernel.set_hidden(group, hide_lines)?;
            report.group = Some(group);
        }
        report.edges = surviving;

        if partition_bands && !report.cuts.is_empty() {
            let levels: Vec<Real> = report.cuts.iter().map(|c| c.altitude.to_native()).collect();
            report.bands = partition_within_operation(kernel, solid, &levels, &settings)?;
        }

        Ok(report)
    }
}
