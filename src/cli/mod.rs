//! CLI subcommand implementations for the pandavote binary.

pub mod vote_cmd;
