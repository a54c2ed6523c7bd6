//! Command-line interface for recipebox.
//!
//! This module provides the CLI structure for the `recipebox` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ExportCommand, FavoriteCommand,
    FavoriteState, ImportCommand, ListCommand, OutputFormat, ShowCommand, StatusCommand,
};

/// recipebox - Keep your recipes close
///
/// A local recipe catalog: add, search, favorite, edit, and delete recipes,
/// and move the whole collection around as a JSON file.
#[derive(Debug, Parser)]
#[command(name = "recipebox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new recipe
    Add(AddCommand),

    /// Change fields of an existing recipe
    Edit(EditCommand),

    /// Show a single recipe
    Show(ShowCommand),

    /// List recipes, optionally filtered
    List(ListCommand),

    /// List the categories in use
    Categories,

    /// Toggle or set the favorite mark
    Favorite(FavoriteCommand),

    /// Delete a recipe
    Delete(DeleteCommand),

    /// Export every recipe to a JSON file
    Export(ExportCommand),

    /// Import recipes from a JSON file
    Import(ImportCommand),

    /// Show catalog statistics
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "recipebox");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let args = vec![
            "recipebox", "add", "Soup", "--category", "Main", "-i", "water", "--favorite",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Add(add) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(add.name, "Soup");
        assert_eq!(add.category, "Main");
        assert_eq!(add.ingredients, "water");
        assert!(add.favorite);
    }

    #[test]
    fn test_parse_edit_image_flags_conflict() {
        let args = vec!["recipebox", "edit", "2", "--image", "a.png", "--remove-image"];
        assert!(Cli::try_parse_from(args).is_err());

        let cli = Cli::try_parse_from(vec!["recipebox", "edit", "2", "--remove-image"]).unwrap();
        let Command::Edit(edit) = cli.command else {
            panic!("expected edit command");
        };
        assert!(edit.remove_image);
        assert!(edit.image.is_none());
    }

    #[test]
    fn test_parse_add_requires_name() {
        assert!(Cli::try_parse_from(vec!["recipebox", "add"]).is_err());
    }

    #[test]
    fn test_parse_list_filters() {
        let args = vec!["recipebox", "list", "-s", "soup", "--favorites", "--format", "json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::List(list) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(list.search, "soup");
        assert!(list.favorites);
        assert_eq!(list.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_favorite_toggle_and_state() {
        let cli = Cli::try_parse_from(vec!["recipebox", "favorite", "3"]).unwrap();
        let Command::Favorite(fav) = cli.command else {
            panic!("expected favorite command");
        };
        assert_eq!(fav.id, 3);
        assert!(fav.state.is_none());

        let cli = Cli::try_parse_from(vec!["recipebox", "favorite", "3", "--state", "off"]).unwrap();
        let Command::Favorite(fav) = cli.command else {
            panic!("expected favorite command");
        };
        assert_eq!(fav.state, Some(FavoriteState::Off));
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(vec!["recipebox", "import", "recipes.json"]).unwrap();
        let Command::Import(import) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(import.file, PathBuf::from("recipes.json"));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["recipebox", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(vec!["recipebox", "-v", "categories"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = Cli::try_parse_from(vec!["recipebox", "-q", "categories"]).unwrap();
        assert!(cli.quiet);
    }
}
