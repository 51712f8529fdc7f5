use clap::{Parser, Subcommand};

#[derive(Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// registers a new account
    Register {
        #[arg(long, env("REGISTER_BASE_URL"))]
        base_url: String,
        #[arg(long, env("REGISTER_LOGIN"))]
        login: String,
        #[arg(long, env("REGISTER_EMAIL"))]
        email: String,
        #[arg(long, env("REGISTER_PASSWORD"))]
        password: String,
        #[arg(long, env("REGISTER_LANG_KEY"))]
        lang_key: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
}
