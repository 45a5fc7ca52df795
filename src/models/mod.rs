pub mod analysis;
pub mod chunk;
pub mod rubric;

pub use analysis::*;
pub use chunk::*;
pub use rubric::*;
