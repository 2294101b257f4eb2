//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters. All tests run on the host with no real LEDs or
//! serial port required.

mod console_tests;
mod dispatch_tests;
mod mock_hw;
mod resource_tests;
