//! Entropy estimation sections
//!
//! Each section computes one step of the crack-time estimate.

mod charset;
mod crack_time;

pub use charset::detect_charset;
pub use crack_time::crack_time_display;
