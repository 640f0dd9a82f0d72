//! Rule sources

pub mod builtin;
