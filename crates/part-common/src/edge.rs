//! Edge-type selection for Freestyle line rendering.
//!
//! Each edge class is toggled independently with three states: left unset
//! (the class keeps its default), explicitly enabled, or explicitly disabled.
//! The resolved selection is passed to the renderer as a comma-separated token
//! list, or the literal `none` when every class is disabled.

use serde::Deserialize;
use std::fmt;

/// Token sent to the renderer when no edge class is selected.
pub const NO_EDGES_TOKEN: &str = "none";

/// Three-state flag for a single edge class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<bool>")]
pub enum Toggle {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl Toggle {
    /// Resolve the flag against the class default.
    pub fn resolve(self, default: bool) -> bool {
        match self {
            Toggle::Unset => default,
            Toggle::Enabled => true,
            Toggle::Disabled => false,
        }
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Toggle::Unset,
            Some(true) => Toggle::Enabled,
            Some(false) => Toggle::Disabled,
        }
    }
}

/// Geometric edge classes understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    Silhouette,
    Crease,
    Border,
    Contour,
    ExternalContour,
    EdgeMark,
    MaterialBoundary,
}

impl EdgeType {
    /// All edge classes in the order the renderer expects them.
    pub const ALL: [EdgeType; 7] = [
        EdgeType::Silhouette,
        EdgeType::Crease,
        EdgeType::Border,
        EdgeType::Contour,
        EdgeType::ExternalContour,
        EdgeType::EdgeMark,
        EdgeType::MaterialBoundary,
    ];

    /// Renderer token for this class.
    pub fn token(self) -> &'static str {
        match self {
            EdgeType::Silhouette => "silhouette",
            EdgeType::Crease => "crease",
            EdgeType::Border => "border",
            EdgeType::Contour => "contour",
            EdgeType::ExternalContour => "external_contour",
            EdgeType::EdgeMark => "edge_mark",
            EdgeType::MaterialBoundary => "material_boundary",
        }
    }

    /// Whether the class is drawn when the request leaves it unset.
    pub fn enabled_by_default(self) -> bool {
        matches!(
            self,
            EdgeType::Silhouette | EdgeType::Crease | EdgeType::Border
        )
    }
}

/// Raw per-class toggles as they arrive in a request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeTypeFlags {
    pub silhouette: Toggle,
    pub crease: Toggle,
    pub border: Toggle,
    pub contour: Toggle,
    #[serde(alias = "external_contour")]
    pub external_contour: Toggle,
    #[serde(alias = "edge_mark")]
    pub edge_mark: Toggle,
    #[serde(alias = "material_boundary")]
    pub material_boundary: Toggle,
}

impl EdgeTypeFlags {
    /// Toggle for a given edge class.
    pub fn get(&self, edge: EdgeType) -> Toggle {
        match edge {
            EdgeType::Silhouette => self.silhouette,
            EdgeType::Crease => self.crease,
            EdgeType::Border => self.border,
            EdgeType::Contour => self.contour,
            EdgeType::ExternalContour => self.external_contour,
            EdgeType::EdgeMark => self.edge_mark,
            EdgeType::MaterialBoundary => self.material_boundary,
        }
    }
}

/// Resolved set of edge classes, kept in renderer order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSelection(Vec<EdgeType>);

impl EdgeSelection {
    /// Resolve every toggle against its class default.
    pub fn resolve(flags: &EdgeTypeFlags) -> Self {
        Self(
            EdgeType::ALL
                .into_iter()
                .filter(|edge| flags.get(*edge).resolve(edge.enabled_by_default()))
                .collect(),
        )
    }

    pub fn contains(&self, edge: EdgeType) -> bool {
        self.0.contains(&edge)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renderer argument for this selection. Never empty.
    pub fn token(&self) -> String {
        if self.0.is_empty() {
            return NO_EDGES_TOKEN.to_string();
        }
        self.0
            .iter()
            .map(|edge| edge.token())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for EdgeSelection {
    fn default() -> Self {
        Self::resolve(&EdgeTypeFlags::default())
    }
}

impl fmt::Display for EdgeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}
