//! CLI module - command-line interface for cartwheel

pub mod commands;

use clap::{Parser, Subcommand};

/// Cartwheel - minimal e-commerce backend
#[derive(Parser)]
#[command(name = "cartwheel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (the default when no command is given)
    #[command(alias = "-s", alias = "--serve")]
    Serve,

    /// Create a default config.toml if missing
    #[command(alias = "--init")]
    Init,

    /// Seed the product catalog
    Seed {
        /// Drop existing products and re-seed from scratch
        #[arg(long)]
        force: bool,
    },

    /// Delete all stored data (users, sessions, carts, orders, products)
    #[command(name = "reset-db")]
    ResetDb {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
