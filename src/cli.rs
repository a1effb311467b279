//! Command line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kata-blog")]
#[command(about = "Terminal client for the Kata Academy blog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API base URL from the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List one page of articles
    List {
        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show a single article
    Show { slug: String },

    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Signup {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Password confirmation; defaults to the password
        #[arg(long)]
        confirm: Option<String>,

        /// Decline personal data processing
        #[arg(long)]
        no_agree: bool,
    },

    /// Edit the signed-in profile; omitted fields keep their value
    Profile {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        password: Option<String>,

        /// Avatar URL; pass an empty string to remove it
        #[arg(short, long)]
        image: Option<String>,
    },

    /// Create an article, or update one with --slug
    Publish {
        /// Article to update
        #[arg(long)]
        slug: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        body: Option<String>,

        /// Tag, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Delete an article
    Delete { slug: String },

    /// Toggle the favorite flag on an article
    Favorite { slug: String },

    /// Forget the cached session
    Logout,

    /// Show the cached session after checking it with the server
    Whoami,
}
