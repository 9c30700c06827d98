//! Application core: the control loop and its boundary, zero I/O.
//!
//! The loop orchestrates touch arbitration, LED feedback, connectivity
//! supervision, event dispatch and status presentation.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod main_loop;
pub mod ports;
