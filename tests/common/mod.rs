//! Common test utilities for charney.
//!
//! This module provides shared utilities for the end-to-end tests.

pub mod assertions;
pub mod image_utils;
pub mod test_data;
