mod app;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use app::App;

#[derive(Parser)]
#[command(name = "lexicard", about = "Flashcard spaced-repetition trainer", version)]
struct Cli {
    /// Database file
    #[arg(long, global = true, default_value = "lexicard.sqlite3")]
    db: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage decks
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Manage cards
    #[command(subcommand)]
    Card(CardCommand),

    /// List cards due for review
    Due {
        /// Deck name
        deck: String,
    },

    /// Review due cards interactively
    Practice {
        /// Deck name
        deck: String,
    },

    /// Show the review log for a deck
    History {
        /// Deck name
        deck: String,
    },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create an empty deck
    New { name: String },

    /// List decks with card counts
    List,

    /// Write a deck's cards to a JSON file
    Export { name: String, path: PathBuf },

    /// Create a deck and its cards from a JSON file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to a deck
    Add {
        deck: String,
        front: String,
        back: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let app = App::open(&cli.db)?;

    match cli.command {
        Command::Deck(DeckCommand::New { name }) => app.create_deck(&name),
        Command::Deck(DeckCommand::List) => app.list_decks(),
        Command::Deck(DeckCommand::Export { name, path }) => app.export_deck(&name, &path),
        Command::Deck(DeckCommand::Import { path }) => app.import_deck(&path),
        Command::Card(CardCommand::Add { deck, front, back }) => {
            app.add_card(&deck, &front, &back)
        }
        Command::Due { deck } => app.list_due(&deck),
        Command::Practice { deck } => app.practice(&deck),
        Command::History { deck } => app.history(&deck),
    }
}
