//! I/O utilities for file handling
//!
//! This module provides byte order strategies and reader traits used by the
//! MRC codec.

pub mod seekable;
pub mod byte_order;
