//! Hardware test modules.

pub mod adapter_tests;
pub mod utils;
