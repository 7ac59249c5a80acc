use crate::config::toml_config::TomlConfig;
use crate::config::ClientSettings;
use crate::core::export::SAMPLE_FILENAME;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "contact-import")]
#[command(about = "Import contacts from CSV into the messaging dashboard backend")]
pub struct CliConfig {
    /// Base URL of the dashboard API
    #[arg(long, global = true, env = "CONTACTS_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for the API
    #[arg(long, global = true, env = "AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upload a CSV file, map its columns and import the contacts
    Import(ImportArgs),
    /// Import pasted `phone,name,email` lines (reads stdin when no file is given)
    Manual {
        file: Option<PathBuf>,
    },
    /// Download every contact as a dated CSV file
    Export {
        #[arg(long, default_value = ".")]
        output_dir: String,
    },
    /// Write the sample CSV template
    Sample {
        #[arg(long, default_value = SAMPLE_FILENAME)]
        output: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// CSV file to import, or `-` for stdin
    pub file: String,

    /// Phone column (index or header name); overrides auto-detection
    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub tags: Option<String>,

    /// Fields to leave unmapped even if a header matches (name, email, tags)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Show the mapping and preview without sending anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Merge flags/env with the optional config file.
    pub fn settings(&self) -> Result<ClientSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path.display());
                Some(TomlConfig::from_file(path)?)
            }
            None => None,
        };
        if let Some(file) = &file {
            crate::utils::validation::Validate::validate(file)?;
        }

        Ok(ClientSettings::resolve(
            self.api_url.clone(),
            self.token.clone(),
            file.as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_command() {
        let cli = CliConfig::try_parse_from([
            "contact-import",
            "import",
            "contacts.csv",
            "--phone",
            "Mobile",
            "--skip",
            "email,tags",
            "--dry-run",
            "--api-url",
            "https://crm.example.com/api",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("https://crm.example.com/api"));
        match cli.command {
            Command::Import(args) => {
                assert_eq!(args.file, "contacts.csv");
                assert_eq!(args.phone.as_deref(), Some("Mobile"));
                assert_eq!(args.skip, vec!["email", "tags"]);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_sample_default_output() {
        let cli = CliConfig::try_parse_from(["contact-import", "sample"]).unwrap();
        match cli.command {
            Command::Sample { output } => assert_eq!(output, "contacts_sample.csv"),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
