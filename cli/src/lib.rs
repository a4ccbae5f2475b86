//! `nnews`: command line front end for the NNews content API.
//!
//! Every command goes through the same stores and flows an application
//! would use, and prints the result as JSON.

pub mod cli;
pub mod commands;
