use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Authenticity analysis cache and encrypted self-assessment profile.
#[derive(Debug, Parser)]
#[command(name = "candor", version, about)]
pub(crate) struct Cli {
    /// Configuration file (TOML or JSON). `CANDOR__*` variables override it.
    #[arg(long, short, global = true, env = "CANDOR_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Log level override (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Manage the encrypted self-assessment profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Inspect and fill the analysis cache.
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Debug, Args)]
pub(crate) struct Passphrase {
    /// Passphrase protecting the profile.
    #[arg(long, env = "CANDOR_PASSPHRASE", hide_env_values = true)]
    pub(crate) passphrase: String,
}

#[derive(Debug, Subcommand)]
pub(crate) enum ProfileCommand {
    /// Show whether a profile is saved.
    Status,
    /// Encrypt and save a profile, replacing any saved one.
    #[command(group(ArgGroup::new("source").required(true).args(["text", "file"])))]
    Save {
        /// Profile text.
        text: Option<String>,
        /// Read the profile text from a file.
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        passphrase: Passphrase,
    },
    /// Decrypt the saved profile and print it.
    Unlock {
        #[command(flatten)]
        passphrase: Passphrase,
    },
    /// Delete the saved profile. This is the only way out of a forgotten passphrase.
    Clear,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CacheCommand {
    /// Show the cached analysis for a subject.
    Lookup {
        name: String,
        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List cached subjects, oldest first.
    List,
    /// Validate a raw analysis response and cache it.
    Import {
        /// File holding the AI service's JSON response.
        file: PathBuf,
        /// Cache under this name instead of the name in the response.
        #[arg(long)]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_profile_save() {
        let cli = Cli::try_parse_from(["candor", "profile", "save", "text", "--passphrase", "pw"])
            .unwrap();
        match cli.command {
            Command::Profile(ProfileCommand::Save { text, file, passphrase }) => {
                assert_eq!(text.as_deref(), Some("text"));
                assert!(file.is_none());
                assert_eq!(passphrase.passphrase, "pw");
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_profile_save_needs_a_source() {
        assert!(Cli::try_parse_from(["candor", "profile", "save", "--passphrase", "pw"]).is_err());
        assert!(
            Cli::try_parse_from([
                "candor", "profile", "save", "t", "--file", "f", "--passphrase", "pw"
            ])
            .is_err()
        );
    }

    #[test]
    fn test_parse_cache_lookup() {
        let cli = Cli::try_parse_from(["candor", "--config", "c.toml", "cache", "lookup", "Jane Doe"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(
            cli.command,
            Command::Cache(CacheCommand::Lookup { ref name, json: false }) if name == "Jane Doe"
        ));
    }
}
