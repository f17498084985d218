//! Mode handler guards.
//!
//! Each guard borrows the session for the duration of a mode and sends the
//! exit sequence when it goes out of scope. The explicit `exit()` methods
//! surface exit errors; the `Drop` fallback only logs them, so an error path
//! through a mode still makes the attempt to leave the board ready.

mod read;
mod relay;
mod type_stream;

pub use read::ReadMode;
pub use relay::RelayMode;
pub use type_stream::TypeMode;
