//! Consolidates a folder of SpecWin Pro `.ISD` emission spectra, one per LED
//! drive current, into a wavelength-aligned table, a chosen subset of
//! currents, and the outputs built from them.

pub mod config;
pub mod data;
pub mod export;
pub mod pipeline;
