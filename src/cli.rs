use std::path::PathBuf;

use calpeek_core::{Config, Locale};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read settings from this TOML file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// OAuth client secret file
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Where the authorized token is cached
    #[arg(long, value_name = "PATH")]
    pub token: Option<PathBuf>,

    /// Language for prompts and event details (en, ja)
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Print the sign-in URL without opening a browser
    #[arg(long, action, default_value = "false")]
    pub no_browser: bool,
}

impl Cli {
    /// Flags given on the command line win over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.credentials {
            config.credentials_file = path.clone();
        }
        if let Some(path) = &self.token {
            config.token_file = path.clone();
        }
        if let Some(locale) = self.locale {
            config.display.locale = locale;
        }
        if self.no_browser {
            config.auth.open_browser = false;
        }
    }
}
