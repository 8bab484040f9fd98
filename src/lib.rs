//! Travel Buddy: COVID-19 case, death, vaccination and travel-advisory dashboard.
//!
//! Tables are loaded once into a [`data::DatasetStore`]; a selection (country and
//! region) is turned into chart data and a choropleth configuration by
//! [`projector::project`]. The HTTP server, the `watch` event loop and the one-shot
//! CLI report are three renderers over the same projection.

pub mod cli;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod logging;
pub mod projector;
pub mod server;
