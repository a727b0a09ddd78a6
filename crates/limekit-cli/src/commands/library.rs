//! `limekit library`: Manage and borrow books.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use limekit_core::forms::LibraryField;
use limekit_core::screens::{LibraryPage, LibraryScreen};
use limekit_evm::LibraryContract;

use super::{connect, connect_read_only, load_config, progress, resolve_config_path, CliResult};

#[derive(Subcommand)]
pub enum LibraryCommand {
    /// Add a new book (owner only).
    AddBook {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        copies: String,
    },
    /// Add copies of an existing book (owner only).
    AddCopies {
        #[arg(long)]
        id: String,
        #[arg(long)]
        copies: String,
    },
    /// Delete a book (owner only).
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Borrow one copy of a book.
    Borrow {
        #[arg(long)]
        id: String,
    },
    /// Return a borrowed book.
    Return {
        #[arg(long)]
        id: String,
    },
    /// Show one book.
    Book {
        #[arg(long)]
        id: String,
    },
    /// List the books you have borrowed.
    MyBooks,
    /// List the pages available to this wallet.
    Pages,
}

impl LibraryCommand {
    fn page(&self) -> Option<LibraryPage> {
        Some(match self {
            Self::AddBook { .. } => LibraryPage::AddBook,
            Self::AddCopies { .. } => LibraryPage::AddCopies,
            Self::Delete { .. } => LibraryPage::DeleteBook,
            Self::Borrow { .. } => LibraryPage::BorrowBook,
            Self::Return { .. } => LibraryPage::ReturnBook,
            Self::Book { .. } => LibraryPage::CheckBook,
            Self::MyBooks => LibraryPage::MyBooks,
            Self::Pages => return None,
        })
    }

    /// Whether the command only reads contract state.
    fn is_read_only(&self) -> bool {
        matches!(self, Self::Book { .. } | Self::MyBooks | Self::Pages)
    }

    fn fields(&self) -> Vec<(LibraryField, &str)> {
        match self {
            Self::AddBook { id, name, copies } => vec![
                (LibraryField::BookId, id.as_str()),
                (LibraryField::BookName, name.as_str()),
                (LibraryField::Copies, copies.as_str()),
            ],
            Self::AddCopies { id, copies } => vec![
                (LibraryField::BookId, id.as_str()),
                (LibraryField::Copies, copies.as_str()),
            ],
            Self::Delete { id } | Self::Borrow { id } | Self::Return { id } | Self::Book { id } => {
                vec![(LibraryField::BookId, id.as_str())]
            }
            Self::MyBooks | Self::Pages => Vec::new(),
        }
    }
}

pub async fn run(cmd: LibraryCommand, config_path: Option<PathBuf>) -> CliResult {
    let config = load_config(&resolve_config_path(config_path)?)?;
    let adapter = if cmd.is_read_only() {
        connect_read_only(&config)?
    } else {
        connect(&config)?
    };
    let contract = LibraryContract::new(adapter, config.contracts.library);
    let screen = LibraryScreen::new(Arc::new(contract));
    screen.mount().await.map_err(|e| e.user_message().to_string())?;

    let Some(page) = cmd.page() else {
        for page in screen.available_pages() {
            println!("{page}");
        }
        return Ok(());
    };
    if !screen.available_pages().contains(&page) {
        return Err(format!("'{page}' is only available to the library owner").into());
    }

    screen.switch_page(page);
    for (field, value) in cmd.fields() {
        screen.set_field(field, value);
    }

    let explorer = config.explorer();
    let tracker = progress::track(screen.attempt(), explorer);
    let outcome = screen.submit().await;
    drop(tracker);

    match outcome {
        Ok(Some(receipt)) => progress::report(Ok(receipt), explorer),
        Ok(None) => {
            print_read_page(&screen, page);
            Ok(())
        }
        Err(e) => progress::report(Err(e), explorer),
    }
}

fn print_read_page(screen: &LibraryScreen<LibraryContract>, page: LibraryPage) {
    match page {
        LibraryPage::CheckBook => match screen.looked_up_book() {
            Some(book) => println!("{book}"),
            None => println!("No such book."),
        },
        _ => {
            let books = screen.my_books();
            if books.is_empty() {
                println!("You have not borrowed any books.");
            }
            for book in books {
                println!("{book}");
            }
        }
    }
}
