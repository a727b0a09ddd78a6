//! Library screen: book management for the owner, borrowing for everyone.

use std::fmt;
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use super::{lock, Screen};
use crate::forms::{LibraryField, LibraryForm};
use crate::gateway::{GatewayError, LibraryGateway};
use crate::lifecycle::{self, AttemptError, AttemptHandle, SubmitError};
use crate::types::{Book, TxHash, TxReceipt};

/// Sub-pages of the library screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryPage {
    #[default]
    AddBook,
    AddCopies,
    DeleteBook,
    BorrowBook,
    ReturnBook,
    CheckBook,
    MyBooks,
}

impl LibraryPage {
    pub const ALL: [LibraryPage; 7] = [
        Self::AddBook,
        Self::AddCopies,
        Self::DeleteBook,
        Self::BorrowBook,
        Self::ReturnBook,
        Self::CheckBook,
        Self::MyBooks,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::AddBook => "Add Book",
            Self::AddCopies => "Add Copies",
            Self::DeleteBook => "Delete Book",
            Self::BorrowBook => "Borrow Book",
            Self::ReturnBook => "Return Book",
            Self::CheckBook => "Check Specific Book",
            Self::MyBooks => "My Borrowed Books",
        }
    }

    /// Pages listed only to the contract owner.
    pub fn owner_only(self) -> bool {
        matches!(self, Self::AddBook | Self::AddCopies | Self::DeleteBook)
    }

    /// Inputs shown on the page.
    pub fn fields(self) -> &'static [LibraryField] {
        match self {
            Self::AddBook => &[
                LibraryField::BookId,
                LibraryField::BookName,
                LibraryField::Copies,
            ],
            Self::AddCopies => &[LibraryField::BookId, LibraryField::Copies],
            Self::DeleteBook | Self::BorrowBook | Self::ReturnBook | Self::CheckBook => {
                &[LibraryField::BookId]
            }
            Self::MyBooks => &[],
        }
    }
}

impl fmt::Display for LibraryPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A validated library write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryAction {
    AddBook { id: u64, name: String, copies: u64 },
    AddCopies { id: u64, copies: u64 },
    DeleteBook { id: u64 },
    BorrowBook { id: u64 },
    ReturnBook { id: u64 },
}

impl LibraryAction {
    /// Builds the write for `page` from the form. `None` for read-only pages.
    pub fn from_form(page: LibraryPage, form: &LibraryForm) -> Result<Option<Self>, AttemptError> {
        let action = match page {
            LibraryPage::AddBook => Self::AddBook {
                id: form.book_id()?,
                name: form.book_name()?,
                copies: form.copies()?,
            },
            LibraryPage::AddCopies => Self::AddCopies {
                id: form.book_id()?,
                copies: form.copies()?,
            },
            LibraryPage::DeleteBook => Self::DeleteBook { id: form.book_id()? },
            LibraryPage::BorrowBook => Self::BorrowBook { id: form.book_id()? },
            LibraryPage::ReturnBook => Self::ReturnBook { id: form.book_id()? },
            LibraryPage::CheckBook | LibraryPage::MyBooks => return Ok(None),
        };
        Ok(Some(action))
    }
}

#[derive(Debug, Default)]
struct LibraryState {
    page: LibraryPage,
    form: LibraryForm,
    is_owner: bool,
    looked_up: Option<Book>,
    my_books: Vec<Book>,
}

/// Controller of the library screen.
pub struct LibraryScreen<G> {
    gateway: Arc<G>,
    attempt: AttemptHandle,
    state: Mutex<LibraryState>,
}

impl<G> fmt::Debug for LibraryScreen<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryScreen")
            .field("attempt", &self.attempt.status())
            .finish_non_exhaustive()
    }
}

impl<G: LibraryGateway> LibraryScreen<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            attempt: AttemptHandle::new(),
            state: Mutex::new(LibraryState::default()),
        }
    }

    pub fn attempt(&self) -> &AttemptHandle {
        &self.attempt
    }

    pub fn page(&self) -> LibraryPage {
        lock(&self.state).page
    }

    pub fn form(&self) -> LibraryForm {
        lock(&self.state).form.clone()
    }

    pub fn is_owner(&self) -> bool {
        lock(&self.state).is_owner
    }

    /// Pages to offer in the navigation.
    pub fn available_pages(&self) -> Vec<LibraryPage> {
        let is_owner = self.is_owner();
        LibraryPage::ALL
            .into_iter()
            .filter(|page| is_owner || !page.owner_only())
            .collect()
    }

    /// Result of the last "check specific book" lookup.
    pub fn looked_up_book(&self) -> Option<Book> {
        lock(&self.state).looked_up.clone()
    }

    pub fn my_books(&self) -> Vec<Book> {
        lock(&self.state).my_books.clone()
    }

    /// Loads the owner flag and the caller's borrowed books.
    pub async fn mount(&self) -> Result<(), AttemptError> {
        let owner = self.gateway.owner().await?;
        let is_owner = owner == self.gateway.caller();
        lock(&self.state).is_owner = is_owner;
        debug!(is_owner, "library screen mounted");
        self.refresh_my_books().await?;
        Ok(())
    }

    /// Shows another page, resetting the form, the lookup and the attempt.
    pub fn switch_page(&self, page: LibraryPage) {
        {
            let mut state = lock(&self.state);
            state.page = page;
            state.form.clear();
            state.looked_up = None;
        }
        self.attempt.reset();
    }

    pub fn set_field(&self, field: LibraryField, value: impl Into<String>) {
        lock(&self.state).form.set(field, value);
        self.attempt.clear_failure();
    }

    /// Submits the current page.
    ///
    /// Write pages return the confirmed receipt; the read pages refresh their
    /// data and return `None`.
    pub async fn submit(&self) -> Result<Option<TxReceipt>, SubmitError> {
        if self.attempt.snapshot().is_pending() {
            return Err(SubmitError::InFlight);
        }
        let (page, form) = {
            let state = lock(&self.state);
            (state.page, state.form.clone())
        };

        match page {
            LibraryPage::CheckBook => {
                let id = form.book_id().map_err(|e| self.attempt.reject(e))?;
                self.lookup_book(id)
                    .await
                    .map_err(|e| self.attempt.reject(e))?;
                return Ok(None);
            }
            LibraryPage::MyBooks => {
                self.refresh_my_books()
                    .await
                    .map_err(|e| self.attempt.reject(e))?;
                return Ok(None);
            }
            _ => {}
        }

        let action = match LibraryAction::from_form(page, &form) {
            Ok(Some(action)) => action,
            Ok(None) => return Ok(None),
            Err(e) => return Err(self.attempt.reject(e)),
        };
        debug!(?action, "submitting library action");

        let receipt =
            lifecycle::submit_write(&self.attempt, &*self.gateway, self.write(&action)).await?;

        lock(&self.state).form.clear();
        if let Err(e) = self.refresh_my_books().await {
            warn!("failed to refresh borrowed books: {e}");
        }
        Ok(Some(receipt))
    }

    /// Reads one book. Unknown ids yield `None`.
    pub async fn lookup_book(&self, id: u64) -> Result<Option<Book>, AttemptError> {
        let book = self.gateway.book(id).await?;
        let found = book.exists().then_some(book);
        lock(&self.state).looked_up = found.clone();
        Ok(found)
    }

    /// Re-fetches the caller's borrowed books, one read per record entry.
    pub async fn refresh_my_books(&self) -> Result<Vec<Book>, AttemptError> {
        let ids = self.gateway.customer_record().await?;
        let mut books = Vec::with_capacity(ids.len());
        for id in ids {
            let book = self.gateway.book(id).await?;
            if book.exists() {
                books.push(book);
            }
        }
        lock(&self.state).my_books = books.clone();
        Ok(books)
    }

    fn write<'a>(&'a self, action: &'a LibraryAction) -> BoxFuture<'a, Result<TxHash, GatewayError>> {
        match action {
            LibraryAction::AddBook { id, name, copies } => {
                self.gateway.add_book(*id, name, *copies)
            }
            LibraryAction::AddCopies { id, copies } => self.gateway.add_copies(*id, *copies),
            LibraryAction::DeleteBook { id } => self.gateway.remove_book(*id),
            LibraryAction::BorrowBook { id } => self.gateway.borrow_book(*id),
            LibraryAction::ReturnBook { id } => self.gateway.return_book(*id),
        }
    }
}

impl<G: LibraryGateway> Screen for LibraryScreen<G> {
    fn reset(&self) {
        self.switch_page(LibraryPage::default());
    }
}
