/*!
# Boundary Analyzer

Finds the three row positions a streaming field parser treats specially:
the first visible column, the last visible column and the last column
present on a data line at all (anything but a footer).

Line edges are judged against the last data column instead, since a
trailing header row never shows up on a data line.
*/

use crate::{
    context::CompilationContext,
    types::{ColumnSpec, Role},
};
use serde::Serialize;
use tracing::debug;

/// Positions into the per-row column list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Boundaries {
    pub first_visible: Option<usize>,
    pub last_visible: Option<usize>,
    pub last_overall: Option<usize>,

    /// Last column that is neither header nor footer
    pub last_data: Option<usize>,
}

impl Boundaries {
    pub fn of(rows: &[ColumnSpec]) -> Self {
        Self {
            first_visible: rows.iter().position(|c| c.role == Role::Visible),
            last_visible: rows.iter().rposition(|c| c.role == Role::Visible),
            last_overall: rows.iter().rposition(|c| c.role != Role::Footer),
            last_data: rows.iter().rposition(|c| !c.role.is_section()),
        }
    }

    /// Hidden columns trail the last visible one on every data line
    pub fn has_hidden_suffix(&self) -> bool {
        match (self.last_visible, self.last_data) {
            (Some(visible), Some(data)) => data > visible,
            (None, Some(_)) => true,
            _ => false,
        }
    }

    /// How the field at `position` ends on a data line
    pub fn edge_at(&self, position: usize) -> FieldEdge {
        if Some(position) != self.last_data {
            if Some(position) == self.last_visible {
                return FieldEdge::FinalVisibleBeforeHidden;
            }
            return FieldEdge::Interior;
        }

        if Some(position) == self.last_visible {
            FieldEdge::FinalNoHiddenSuffix
        } else {
            FieldEdge::FinalHidden
        }
    }
}

/// Field-termination behavior an emitted parser chooses per column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldEdge {
    /// Terminated by the field delimiter
    Interior,

    /// Last field on the line and visible: consume to end of line
    FinalNoHiddenSuffix,

    /// Last visible field, with hidden fields still following on the line
    FinalVisibleBeforeHidden,

    /// Last field on the line and hidden
    FinalHidden,
}

/// Compute boundaries over the context's per-row columns and flag each row.
pub fn analyze_boundaries(ctx: &mut CompilationContext) -> Boundaries {
    let boundaries = Boundaries::of(ctx.rows());
    apply(&boundaries, ctx.rows_mut());

    debug!(
        first_visible = ?boundaries.first_visible,
        last_visible = ?boundaries.last_visible,
        last_overall = ?boundaries.last_overall,
        last_data = ?boundaries.last_data,
        "Boundaries"
    );

    boundaries
}

/// Overwrite every row's boundary flags from `boundaries`.
pub fn apply(boundaries: &Boundaries, rows: &mut [ColumnSpec]) {
    for (position, column) in rows.iter_mut().enumerate() {
        column.boundary.first_visible = boundaries.first_visible == Some(position);
        column.boundary.last_visible = boundaries.last_visible == Some(position);
        column.boundary.last_overall = boundaries.last_overall == Some(position);
    }
}
