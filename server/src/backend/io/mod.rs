//! # IO Module
//!
//! Adapter layer between HTTP and the domain services. Only REST for now.

pub mod rest;
