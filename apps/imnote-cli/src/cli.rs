use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file. Defaults to <config dir>/imnote/config.toml.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the vault.
    #[arg(long, global = true, default_value = ".")]
    pub vault: PathBuf,

    /// Vault-relative path of the document being edited.
    #[arg(long, global = true)]
    pub active: Option<String>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render notes and print them for insertion into the active document.
    Insert(BatchArgs),
    /// Render notes and create each one as a new file in the vault.
    Create(BatchArgs),
    /// Look up an arXiv id or ISBN and print the BibTeX.
    Resolve {
        /// arXiv reference or ISBN.
        input: String,
    },
    /// Print the effective settings.
    Config {
        /// Print the default settings path instead.
        #[arg(long, default_value_t = false)]
        path: bool,
    },
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// BibTeX text, an arXiv reference or an ISBN. Read from stdin when omitted or `-`.
    pub input: Option<String>,

    /// Read the input from a file.
    #[arg(long, short, conflicts_with = "input")]
    pub file: Option<PathBuf>,

    /// Use this type's template for every entry.
    #[arg(long, short)]
    pub template: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_insert_with_template() {
        let cli = Cli::try_parse_from(["imnote", "insert", "arXiv:2301.00001", "-t", "article"]).unwrap();
        match cli.command {
            Commands::Insert(args) => {
                assert_eq!(args.input.as_deref(), Some("arXiv:2301.00001"));
                assert_eq!(args.template.as_deref(), Some("article"));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(cli.vault, PathBuf::from("."));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "imnote", "create", "--vault", "/notes", "--active", "Papers/a.md", "-v",
        ])
        .unwrap();
        assert_eq!(cli.vault, PathBuf::from("/notes"));
        assert_eq!(cli.active.as_deref(), Some("Papers/a.md"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_file_conflicts_with_input() {
        assert!(Cli::try_parse_from(["imnote", "insert", "x", "--file", "refs.bib"]).is_err());
    }
}
