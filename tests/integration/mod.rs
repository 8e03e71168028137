//! Integration tests for ship
//!
//! Each test builds a throwaway repository with a bare "origin" remote and
//! drives the compiled binary against it.

mod helpers;
mod test_deploy;
mod test_init;
