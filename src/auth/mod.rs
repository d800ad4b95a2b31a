// Authorization layer: token resolution against the live account row, plus
// the static role -> capability table
pub mod gate;
pub mod permissions;

pub use gate::{AuthGate, GateError, ResolvedAccount, SESSION_COOKIE};
pub use permissions::{Action, PermissionTable};
