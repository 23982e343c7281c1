//! Scenario and adversarial test suite for Sluice.
//!
//! Integration tests live under `tests/`; shared fixtures live in
//! [`helpers`].

pub mod helpers;
