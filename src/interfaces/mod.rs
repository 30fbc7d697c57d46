//! Outer surfaces: CSV output for the command line.

pub mod csv;
