pub mod bootstrap;
pub mod prompt_views;

pub use prompt_views::{expand_prompt, expand_prompts, rating_stats};
