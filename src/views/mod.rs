//! Server-rendered markup, built with `maud`.

pub mod dashboard;
pub mod layout;
pub mod map;
pub mod map_page;
pub mod pages;
pub mod stat_card;
pub mod trend_chart;

pub use layout::{page, PageShell};
