pub mod stage0_chunk;
pub mod stage1_analyze;
pub mod stage2_merge;
pub mod stage3_rubric;
pub mod stage_speakers;

pub use stage0_chunk::*;
pub use stage1_analyze::*;
pub use stage2_merge::*;
pub use stage3_rubric::*;
pub use stage_speakers::*;
