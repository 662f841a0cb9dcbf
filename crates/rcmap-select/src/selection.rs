//! The selection aggregate: selectable/selected sets and the running centroid.
//!
//! The aggregate owns both sets and keeps `selected ⊆ selectable` inside every
//! call. The centroid is maintained incrementally: selecting adds the entity's
//! position to a running sum, deselecting subtracts it, and the average is
//! the sum divided by the selection size. [`select_all`] recomputes the sum
//! from scratch and is the exact resynchronization point.
//!
//! Every pivot change is applied to [`SelectionAggregate::pivot`] and queued
//! as a [`PivotSignal`] for the gizmo layer, which collects them with
//! [`drain_signals`].
//!
//! [`select_all`]: SelectionAggregate::select_all
//! [`drain_signals`]: SelectionAggregate::drain_signals

use std::collections::HashSet;
use std::hash::Hash;

use glam::{Quat, Vec3};
use tracing::{debug, trace, warn};

use crate::pivot::{Pivot, PivotSignal};
use crate::placements::Placements;
use crate::tool::{GroupTransform, Tool};

/// Selection state for a set of entities identified by `Id`.
#[derive(Debug, Clone)]
pub struct SelectionAggregate<Id> {
    selectable: HashSet<Id>,
    selected: HashSet<Id>,
    position_sum: Vec3,
    average: Vec3,
    tool: Tool,
    pivot: Pivot,
    signals: Vec<PivotSignal>,
}

impl<Id: Copy + Eq + Hash> Default for SelectionAggregate<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + Eq + Hash> SelectionAggregate<Id> {
    pub fn new() -> Self {
        Self::with_tool(Tool::default())
    }

    pub fn with_tool(tool: Tool) -> Self {
        Self {
            selectable: HashSet::new(),
            selected: HashSet::new(),
            position_sum: Vec3::ZERO,
            average: Vec3::ZERO,
            tool,
            pivot: Pivot::default(),
            signals: Vec::new(),
        }
    }

    // -- read-only views ----------------------------------------------------

    pub fn selectable(&self) -> &HashSet<Id> {
        &self.selectable
    }

    pub fn selected(&self) -> &HashSet<Id> {
        &self.selected
    }

    pub fn is_selectable(&self, id: Id) -> bool {
        self.selectable.contains(&id)
    }

    pub fn is_selected(&self, id: Id) -> bool {
        self.selected.contains(&id)
    }

    /// Number of selected entities.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The centroid of the selection, or `None` when nothing is selected.
    pub fn average(&self) -> Option<Vec3> {
        (!self.selected.is_empty()).then_some(self.average)
    }

    pub fn position_sum(&self) -> Vec3 {
        self.position_sum
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn pivot(&self) -> &Pivot {
        &self.pivot
    }

    /// Take every pivot signal queued since the last call, oldest first.
    pub fn drain_signals(&mut self) -> Vec<PivotSignal> {
        std::mem::take(&mut self.signals)
    }

    // -- membership ---------------------------------------------------------

    /// Make `id` selectable. Returns `false` if it already was.
    pub fn add_selectable(&mut self, id: Id) -> bool {
        self.selectable.insert(id)
    }

    /// Remove `id` from the selectable universe, deselecting it first.
    /// Returns `false` if it was not selectable.
    pub fn remove_selectable<P>(&mut self, id: Id, placements: &P) -> bool
    where
        P: Placements<Id> + ?Sized,
    {
        self.deselect(id, placements);
        self.selectable.remove(&id)
    }

    /// Select `id`.
    ///
    /// No-op (returning `false`) if it is already selected, not selectable,
    /// or has no position in `placements`.
    pub fn select<P>(&mut self, id: Id, placements: &P) -> bool
    where
        P: Placements<Id> + ?Sized,
    {
        if self.selected.contains(&id) || !self.selectable.contains(&id) {
            return false;
        }
        let Some(position) = placements.position(id) else {
            warn!("selectable entity has no placement; not selecting it");
            return false;
        };

        self.selected.insert(id);
        self.position_sum += position;
        self.average = self.position_sum / self.selected.len() as f32;
        self.emit(PivotSignal::SetPosition(self.average));
        self.emit(PivotSignal::Show);
        self.reset_pivot_rotation(placements);
        true
    }

    /// Deselect `id`. Returns `false` if it was not selected.
    ///
    /// The pivot is hidden when the selection becomes empty.
    pub fn deselect<P>(&mut self, id: Id, placements: &P) -> bool
    where
        P: Placements<Id> + ?Sized,
    {
        if !self.selected.remove(&id) {
            return false;
        }

        if self.selected.is_empty() {
            self.clear_average();
        } else {
            match placements.position(id) {
                Some(position) => self.position_sum -= position,
                None => self.recompute_sum(placements),
            }
            self.average = self.position_sum / self.selected.len() as f32;
            self.emit(PivotSignal::SetPosition(self.average));
        }
        self.reset_pivot_rotation(placements);
        true
    }

    /// Select every selectable entity, recomputing the centroid exactly.
    pub fn select_all<P>(&mut self, placements: &P)
    where
        P: Placements<Id> + ?Sized,
    {
        if self.selectable.is_empty() {
            return;
        }
        self.selected = self
            .selectable
            .iter()
            .copied()
            .filter(|&id| placements.position(id).is_some())
            .collect();
        if self.selected.is_empty() {
            self.clear_average();
            return;
        }

        self.recompute_sum(placements);
        self.average = self.position_sum / self.selected.len() as f32;
        self.emit(PivotSignal::SetPosition(self.average));
        self.emit(PivotSignal::Show);
        self.reset_pivot_rotation(placements);
    }

    /// Clear the selection. No-op when nothing is selected.
    pub fn deselect_all(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        self.selected.clear();
        self.clear_average();
        self.emit(PivotSignal::SetRotation(Quat::IDENTITY));
    }

    /// Toggle every selectable entity.
    pub fn invert<P>(&mut self, placements: &P)
    where
        P: Placements<Id> + ?Sized,
    {
        let universe: Vec<Id> = self.selectable.iter().copied().collect();
        for id in universe {
            if !self.deselect(id, placements) {
                self.select(id, placements);
            }
        }
    }

    /// Detach every selected entity from the selectable universe and return
    /// them, leaving the selection empty.
    pub fn remove_selected(&mut self) -> HashSet<Id> {
        if self.selected.len() == self.selectable.len() {
            self.selectable.clear();
        } else {
            for id in &self.selected {
                self.selectable.remove(id);
            }
        }
        let removed = std::mem::take(&mut self.selected);
        if !removed.is_empty() {
            self.clear_average();
        }
        debug!(removed = removed.len(), remaining = self.selectable.len(), "removed selection");
        removed
    }

    /// Forget both sets and hide the pivot.
    pub fn reset(&mut self) {
        self.selected.clear();
        self.selectable.clear();
        self.clear_average();
    }

    /// Switch tools, re-deriving the pivot orientation.
    pub fn set_tool<P>(&mut self, tool: Tool, placements: &P)
    where
        P: Placements<Id> + ?Sized,
    {
        self.tool = tool;
        self.reset_pivot_rotation(placements);
    }

    // -- group transforms ---------------------------------------------------

    /// Apply one frame of gizmo drag to every selected entity.
    ///
    /// Every entity sees the same pivot. Translation moves the centroid with
    /// the selection; rotation and scale are about the centroid and leave it
    /// in place.
    pub fn apply_group_transform<P>(&mut self, transform: GroupTransform, placements: &mut P)
    where
        P: Placements<Id> + ?Sized,
    {
        if self.selected.is_empty() {
            return;
        }
        let pivot = self.average;

        match transform {
            GroupTransform::Translate(delta) => {
                for &id in &self.selected {
                    if let Some(position) = placements.position(id) {
                        placements.set_position(id, position + delta);
                    }
                }
                self.position_sum += delta * self.selected.len() as f32;
                self.average += delta;
                self.emit(PivotSignal::SetPosition(self.average));
            }
            GroupTransform::Rotate { axis, angle } => {
                let Some(axis) = axis.try_normalize() else {
                    return;
                };
                let turn = Quat::from_axis_angle(axis, angle);
                for &id in &self.selected {
                    if let Some(position) = placements.position(id) {
                        placements.set_position(id, pivot + turn * (position - pivot));
                    }
                    if let Some(rotation) = placements.rotation(id) {
                        placements.set_rotation(id, turn * rotation);
                    }
                }
                self.reset_pivot_rotation(&*placements);
            }
            GroupTransform::Scale(factor) => {
                for &id in &self.selected {
                    if let Some(position) = placements.position(id) {
                        placements.set_position(id, pivot + (position - pivot) * factor);
                    }
                    if let Some(scale) = placements.scale(id) {
                        placements.set_scale(id, scale * factor);
                    }
                }
            }
        }
    }

    // -- internals ----------------------------------------------------------

    fn emit(&mut self, signal: PivotSignal) {
        trace!(?signal, "pivot signal");
        self.pivot.apply(signal);
        self.signals.push(signal);
    }

    fn recompute_sum<P>(&mut self, placements: &P)
    where
        P: Placements<Id> + ?Sized,
    {
        self.position_sum = self
            .selected
            .iter()
            .filter_map(|&id| placements.position(id))
            .sum();
    }

    fn clear_average(&mut self) {
        self.position_sum = Vec3::ZERO;
        self.average = Vec3::ZERO;
        self.emit(PivotSignal::Hide);
    }

    /// A lone selection under Rotate or Scale lends its orientation to the
    /// pivot; anything else resets it.
    fn reset_pivot_rotation<P>(&mut self, placements: &P)
    where
        P: Placements<Id> + ?Sized,
    {
        let rotation = match (self.tool.orients_pivot(), self.selected.len()) {
            (true, 1) => self
                .selected
                .iter()
                .next()
                .and_then(|&id| placements.rotation(id))
                .unwrap_or(Quat::IDENTITY),
            _ => Quat::IDENTITY,
        };
        self.emit(PivotSignal::SetRotation(rotation));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
