pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod job;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod report;
pub mod util;
