// lib.rs
pub mod aligned_read;
pub mod assembler;
pub mod cigar;
pub mod commands;
pub mod error;
pub mod filter;
pub mod msa_writer;
pub mod reference;
