pub mod agent;
pub mod analyzer;
pub mod config;
pub mod constitution;
pub mod deploy;
pub mod error;
pub mod frontmatter;
pub mod git;
pub mod hook;
pub mod io;
pub mod library;
pub mod mcp;
pub mod paths;
pub mod ranking;
pub mod selection;
pub mod settings;
pub mod skill;
pub mod team;
pub mod template;
pub mod types;
pub mod workspace;

pub use error::{Result, TeamforgeError};
