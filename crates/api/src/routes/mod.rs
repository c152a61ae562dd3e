//! Route Handlers

pub mod predict;
