//! Carts

mod errors;
pub mod line;
mod state;
pub mod view;

pub use errors::CartActionError;
pub use line::{EditError, EditRejected, LineEditor, PendingEdit, Settled};
pub use state::CartState;
pub use view::{CartView, Removal, ViewPhase};
