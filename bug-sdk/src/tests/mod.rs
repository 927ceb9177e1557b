//! Unit tests for the Bug SDK
//!
//! This module contains tests for various components of the SDK.
