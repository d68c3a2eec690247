//! Service layer for file I/O.
//!
//! This module contains services that encapsulate filesystem details so the
//! engine components only deal with validated models.

pub mod templates;
