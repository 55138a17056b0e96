pub mod clear_install_output;
pub mod flatten_outputs;
pub mod preamble;
pub mod renumber;

pub use clear_install_output::*;
pub use flatten_outputs::*;
pub use preamble::*;
pub use renumber::*;
