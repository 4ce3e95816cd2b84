//! Common types used across the application.

pub mod pagination;

#[cfg(test)]
mod pagination_tests;

pub use pagination::{PAGE_SIZE, PageRequest, SortOrder};
