//! Miscellaneous utility functions for faro.
//!
//! This module holds the [helpers] submodule, which provides commonly used utilities such as:
//! - Recursive copying
//! - Shortening the home directory path to "~"
//! - Size, timestamp and width formatting for the listing
//!
//! All of these utilities are used throughout faro for convenience and code clarity.

pub mod cli;
pub mod helpers;

pub use helpers::{
    copy_recursive, format_entry_size, format_mtime, shorten_home_path, truncate_to_width,
};
