// src/controller.rs

//! # Cascade Controller Module
//!
//! This module provides the two stages of the stabilization cascade: the
//! attitude controller, which turns orientation error into angular-rate
//! setpoints, and the rate controller, which turns rate error into per-axis
//! thrust adjustments.
//!
//! Both stages speak the controller body frame. Commands and measurements
//! arrive in the device frame and are adapted through
//! [`crate::frame::device_to_body`] at the controller boundary; the swap is
//! never spelled out at individual call sites.

pub mod attitude;
pub use attitude::*;
pub mod rate;
pub use rate::*;
