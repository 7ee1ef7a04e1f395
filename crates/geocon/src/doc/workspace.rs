//! Caller-owned per-mode state: one document and one view per geometry mode.

use serde::{Deserialize, Serialize};

use super::construction::ConstructionDoc;
use super::types::GeometryMode;
use crate::view::ViewState;

/// One `T` per `GeometryMode`, addressed by the closed enum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeMap<T> {
    pub euclidean: T,
    pub inversive_euclidean: T,
    pub spherical: T,
    pub poincare_disk: T,
    pub half_plane: T,
}

impl<T> ModeMap<T> {
    pub fn from_fn(mut f: impl FnMut(GeometryMode) -> T) -> Self {
        Self {
            euclidean: f(GeometryMode::Euclidean),
            inversive_euclidean: f(GeometryMode::InversiveEuclidean),
            spherical: f(GeometryMode::Spherical),
            poincare_disk: f(GeometryMode::PoincareDisk),
            half_plane: f(GeometryMode::HalfPlane),
        }
    }

    pub fn get(&self, mode: GeometryMode) -> &T {
        match mode {
            GeometryMode::Euclidean => &self.euclidean,
            GeometryMode::InversiveEuclidean => &self.inversive_euclidean,
            GeometryMode::Spherical => &self.spherical,
            GeometryMode::PoincareDisk => &self.poincare_disk,
            GeometryMode::HalfPlane => &self.half_plane,
        }
    }

    pub fn get_mut(&mut self, mode: GeometryMode) -> &mut T {
        match mode {
            GeometryMode::Euclidean => &mut self.euclidean,
            GeometryMode::InversiveEuclidean => &mut self.inversive_euclidean,
            GeometryMode::Spherical => &mut self.spherical,
            GeometryMode::PoincareDisk => &mut self.poincare_disk,
            GeometryMode::HalfPlane => &mut self.half_plane,
        }
    }
}

/// A full session: documents and views for all modes plus the active one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub docs: ModeMap<ConstructionDoc>,
    pub views: ModeMap<ViewState>,
    pub active: GeometryMode,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(GeometryMode::Euclidean)
    }
}

impl Workspace {
    pub fn new(active: GeometryMode) -> Self {
        Self {
            docs: ModeMap::from_fn(ConstructionDoc::new),
            views: ModeMap::from_fn(|_| ViewState::default()),
            active,
        }
    }

    pub fn active_doc(&self) -> &ConstructionDoc {
        self.docs.get(self.active)
    }

    pub fn active_doc_mut(&mut self) -> &mut ConstructionDoc {
        self.docs.get_mut(self.active)
    }

    pub fn active_view(&self) -> &ViewState {
        self.views.get(self.active)
    }

    /// Replace one mode's document with a fresh one; its view is kept.
    pub fn clear(&mut self, mode: GeometryMode) {
        *self.docs.get_mut(mode) = ConstructionDoc::new(mode);
    }
}
