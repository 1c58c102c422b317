mod cache;
mod suggest;

pub use cache::{run_cache_clear, run_cache_list};
pub use suggest::run_suggest;
