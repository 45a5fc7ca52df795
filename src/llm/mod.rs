pub mod client;
pub mod parse;
pub mod prompts;
pub mod speaker_prompt;

#[cfg(test)]
pub(crate) mod fake;

pub use client::*;
pub use parse::*;
pub use prompts::*;
pub use speaker_prompt::*;
