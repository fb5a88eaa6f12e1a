//! Common test utilities for docmagen integration tests
//!
//! This module provides:
//! - `TestRepo` builder for throwaway TypeScript source trees
//! - Assertions for validating CLI output and staged files

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod assertions;
pub mod test_repo;

pub use assertions::*;
pub use test_repo::TestRepo;
