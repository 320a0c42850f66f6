//! Unit test harness for dividing-head.
//!
//! This module organizes configuration tests that exercise the public API
//! only.

mod config_parsing;
mod config_validation;
