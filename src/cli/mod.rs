mod args;
mod paths;

pub use args::{CacheAction, Cli, Commands, SuggestArgs};
pub use paths::{current_folder_name, resolve_cache_dir};
