//! Record store contract suite
//!
//! Exercises the public `agenda` surface end to end: the seven-operation
//! contract, window boundaries, error kinds and persistence.

#[path = "../common/mod.rs"]
mod common;

mod crud;
mod periods;
mod persistence;
