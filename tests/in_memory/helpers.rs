//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tickbox::account::{
    adapters::memory::InMemoryIdentityProvider,
    domain::{EmailAddress, Password, User},
    services::{AccountDeletionService, SessionService},
};
use tickbox::screens::{ManageAccountScreen, TodoListScreen};
use tickbox::todo::{adapters::memory::InMemoryTodoStore, services::TodoService};

/// Task list screen over in-memory adapters.
pub type ListScreen = TodoListScreen<InMemoryIdentityProvider, InMemoryTodoStore, DefaultClock>;

/// Account screen over in-memory adapters.
pub type AccountScreen =
    ManageAccountScreen<InMemoryIdentityProvider, InMemoryTodoStore, DefaultClock>;

/// Hosted services replaced by in-memory doubles.
pub struct App {
    pub identity: Arc<InMemoryIdentityProvider>,
    pub store: Arc<InMemoryTodoStore>,
    pub session: SessionService<InMemoryIdentityProvider>,
    pub todos: TodoService<InMemoryTodoStore, DefaultClock>,
}

impl App {
    /// Creates an app with no accounts.
    #[must_use]
    pub fn new() -> Self {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let store = Arc::new(InMemoryTodoStore::new());
        let session = SessionService::new(Arc::clone(&identity));
        let todos = TodoService::new(Arc::clone(&store), Arc::new(DefaultClock));
        Self {
            identity,
            store,
            session,
            todos,
        }
    }

    /// Registers a verified account.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the account.
    pub fn register_verified(&self, email: &str, password: &str) -> Result<User, eyre::Report> {
        let user = self
            .identity
            .register(&EmailAddress::new(email)?, &Password::new(password)?)?;
        self.identity.mark_verified(user.id())?;
        Ok(user)
    }

    /// Builds a task list screen for the current session.
    #[must_use]
    pub fn list_screen(&self) -> ListScreen {
        TodoListScreen::new(self.session.clone(), self.todos.clone())
    }

    /// Builds an account screen for the current session.
    #[must_use]
    pub fn account_screen(&self) -> AccountScreen {
        let deletion = AccountDeletionService::new(self.session.clone(), self.todos.clone());
        ManageAccountScreen::new(self.session.clone(), deletion)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Provides a fresh app for each test.
#[fixture]
pub fn app() -> App {
    App::new()
}
