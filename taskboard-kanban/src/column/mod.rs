//! Column commands

mod add;
mod mv;

pub use add::AddColumn;
pub use mv::MoveColumn;
