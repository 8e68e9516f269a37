use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "fgpatch",
    version,
    about = "Find DLSS games and install or roll back frame generation mods"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List installed games that ship nvngx_dlss.dll")]
    Games {
        #[arg(long, help = "Print the list as JSON")]
        json: bool,
    },

    #[command(about = "Install a mod option into a game folder")]
    Install {
        #[arg(help = "Game folder, any file inside it, or #N from `games`")]
        target: String,

        #[arg(help = "Mod option, see `options`")]
        option: String,
    },

    #[command(about = "Restore the original files of a game folder")]
    Rollback {
        #[arg(help = "Game folder, any file inside it, or #N from `games`")]
        target: String,

        #[arg(help = "Mod option that was installed")]
        option: String,
    },

    #[command(about = "Show whether a game folder is patched")]
    Status {
        #[arg(help = "Game folder, any file inside it, or #N from `games`")]
        target: String,
    },

    #[command(about = "List mod options and whether their folders exist")]
    Options,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_install() {
        let cli = Cli::parse_from(["fgpatch", "install", "#2", "dll_version"]);
        match cli.command {
            Commands::Install { target, option } => {
                assert_eq!(target, "#2");
                assert_eq!(option, "dll_version");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn parses_global_config_flag() {
        let cli = Cli::parse_from(["fgpatch", "games", "--json", "--config", "/tmp/fg.toml"]);
        assert!(matches!(cli.command, Commands::Games { json: true }));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/fg.toml")));
    }

    #[test]
    fn rollback_requires_option() {
        assert!(Cli::try_parse_from(["fgpatch", "rollback", "/games/G"]).is_err());
    }
}
