pub mod cell;
pub mod notebook;
pub mod text;

pub use cell::*;
pub use notebook::*;
pub use text::*;
