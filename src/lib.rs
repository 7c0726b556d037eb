//! Job listings explorer: load a listings export once, filter it by country,
//! job type, rate, remote keyword, date range and free text, and chart monthly
//! postings and mean hourly rate.
//!
//! The data layer (`data`) is independent of egui; `state`, `ui` and `app`
//! build the desktop dashboard on top of it.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
