//! Mezcla Core - signal types and DSP primitives for the mixing engine
//!
//! This crate provides the foundational pieces shared by the analysis and
//! mixing crates:
//!
//! - [`Signal`] - owned mono sample buffer with its sample rate
//! - [`FadeCurve`] - crossfade ramp shapes
//! - [`Biquad`] / [`FilterType`] - second-order IIR filters with RBJ
//!   cookbook coefficients, including zero-phase application
//! - Math helpers: [`rms`], [`peak`]
//!
//! Everything here is pure computation: no I/O, no FFT, no allocation
//! beyond the buffers the caller asked for.

pub mod biquad;
pub mod fade;
pub mod math;
pub mod signal;

pub use biquad::{Biquad, FilterSpec, FilterType, filtfilt};
pub use fade::FadeCurve;
pub use math::{peak, rms};
pub use signal::Signal;
