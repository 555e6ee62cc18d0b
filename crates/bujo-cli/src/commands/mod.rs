pub mod add;
pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod delete;
pub mod done;
pub mod edit;
pub mod export;
pub mod list;
pub mod scan;
pub mod stats_cmd;
