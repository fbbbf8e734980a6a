//! YouTube Data API source implementation.

mod client;

pub use client::{YouTubeConfig, YouTubeSource};
