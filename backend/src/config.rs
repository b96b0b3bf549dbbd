//! Process configuration from flags, environment and `.env`.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server", version, about = "Single-user to-do list web app")]
pub struct Config {
    /// SQLite database file
    #[arg(long, env = "TODO_DATABASE", default_value = "todos.db")]
    pub database: PathBuf,

    /// Address to listen on
    #[arg(long, env = "TODO_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Verbose logging
    #[arg(long, env = "TODO_DEBUG")]
    pub debug: bool,

    /// Allow any origin on the JSON API
    #[arg(long, env = "TODO_CORS_PERMISSIVE")]
    pub cors_permissive: bool,
}

impl Config {
    /// Default log directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            "todo_backend=debug,tower_http=debug,info"
        } else {
            "info"
        }
    }
}
