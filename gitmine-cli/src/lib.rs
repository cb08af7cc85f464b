//! # Gitmine CLI Library
//!
//! Command definitions, report rendering and paging for the `gitmine`
//! command-line tool.

pub mod cli;
pub mod pager;
pub mod report;
