//! Line editing
//!
//! A line edit has two halves. `begin_*` applies the new quantity to the displayed line at once
//! and hands back a [`PendingEdit`]; `settle` later confirms it with the server's answer or
//! puts the previous quantity back.

use bazaar::{
    cart::CartLine,
    ids::LineId,
    quantity::{AppliedBound, BoundsViolation},
};
use thiserror::Error;

use crate::carts::CartActionError;

/// Why an edit was refused before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditRejected {
    #[error("line {0} is not in the cart")]
    UnknownLine(LineId),

    #[error("line {0} is already being updated")]
    InFlight(LineId),

    #[error("the quantity is already {0}")]
    Unchanged(u32),

    /// The typed quantity was clamped to a bound the line already sits at.
    #[error("{0}; the quantity is unchanged")]
    AtBound(AppliedBound),

    #[error(transparent)]
    Bounds(#[from] BoundsViolation),
}

/// Failure of a quantity edit.
#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Rejected(#[from] EditRejected),

    /// The server refused the write; the line shows `quantity` again.
    #[error("quantity reverted to {quantity}: {source}")]
    Reverted {
        quantity: u32,
        #[source]
        source: CartActionError,
    },
}

/// An edit applied to the display and awaiting the server's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pending edit leaves its line marked as updating until it is settled"]
pub struct PendingEdit {
    pub(crate) line: LineId,
    pub(crate) previous: u32,
    pub(crate) requested: u32,
    pub(crate) applied: Option<AppliedBound>,
    pub(crate) epoch: u64,
}

impl PendingEdit {
    /// Line being edited.
    pub fn line(&self) -> LineId {
        self.line
    }

    /// Quantity sent to the server.
    pub fn requested(&self) -> u32 {
        self.requested
    }

    /// Quantity to restore if the write fails.
    pub fn previous(&self) -> u32 {
        self.previous
    }

    /// Bound the requested quantity was clamped to, if any.
    pub fn applied(&self) -> Option<AppliedBound> {
        self.applied
    }
}

/// How a settled edit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The server stored `quantity`.
    Confirmed {
        quantity: u32,
        applied: Option<AppliedBound>,
    },

    /// The view was reloaded or unmounted since the edit began; nothing was changed.
    Stale,
}

/// One line as shown in the cart view.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEditor {
    confirmed: CartLine,
    displayed: u32,
    updating: bool,
}

impl LineEditor {
    pub(crate) fn new(line: CartLine) -> Self {
        Self {
            displayed: line.quantity,
            confirmed: line,
            updating: false,
        }
    }

    pub fn id(&self) -> LineId {
        self.confirmed.id
    }

    /// Line as last confirmed by the server.
    pub fn line(&self) -> &CartLine {
        &self.confirmed
    }

    /// Quantity currently shown, which may be ahead of the server.
    pub fn displayed_quantity(&self) -> u32 {
        self.displayed
    }

    pub fn confirmed_quantity(&self) -> u32 {
        self.confirmed.quantity
    }

    /// Whether a write for this line is in flight. Its controls are disabled meanwhile.
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn can_increment(&self) -> bool {
        !self.updating && self.confirmed.bounds().increment(self.displayed).is_ok()
    }

    pub fn can_decrement(&self) -> bool {
        !self.updating && self.confirmed.bounds().decrement(self.displayed).is_ok()
    }

    /// The line as displayed, for totals.
    pub fn displayed_line(&self) -> CartLine {
        self.confirmed.with_quantity(self.displayed)
    }

    pub(crate) fn begin(
        &mut self,
        requested: u32,
        applied: Option<AppliedBound>,
        epoch: u64,
    ) -> Result<PendingEdit, EditRejected> {
        if self.updating {
            return Err(EditRejected::InFlight(self.id()));
        }

        if requested == self.displayed {
            return Err(applied.map_or(
                EditRejected::Unchanged(requested),
                EditRejected::AtBound,
            ));
        }

        let pending = PendingEdit {
            line: self.id(),
            previous: self.displayed,
            requested,
            applied,
            epoch,
        };

        self.displayed = requested;
        self.updating = true;

        Ok(pending)
    }

    pub(crate) fn confirm(&mut self, line: CartLine) -> u32 {
        self.displayed = line.quantity;
        self.confirmed = line;
        self.updating = false;

        self.displayed
    }

    pub(crate) fn revert(&mut self, previous: u32) {
        self.displayed = previous;
        self.updating = false;
    }
}
