//! Owner scoping across users.

use super::helpers::{App, app};
use rstest::rstest;
use tickbox::todo::{ports::TodoStoreError, services::TodoServiceError};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_only_see_their_own_tasks(app: App) -> Result<(), eyre::Report> {
    let ada = app.register_verified("ada@example.com", "correct-horse")?;
    let bob = app.register_verified("bob@example.com", "battery-staple")?;
    app.todos.add(ada.id(), "Buy milk").await?;
    let bobs = app.todos.add(bob.id(), "Fix bike").await?;

    let listed = app.todos.list(ada.id()).await?;
    eyre::ensure!(listed.len() == 1, "ada should see one task");
    eyre::ensure!(
        listed.iter().all(|todo| todo.owner() == ada.id()),
        "foreign task listed"
    );

    let result = app.todos.set_completed(ada.id(), bobs.id(), true).await;
    eyre::ensure!(
        matches!(
            result,
            Err(TodoServiceError::Store(TodoStoreError::PermissionDenied(_)))
        ),
        "foreign update should be denied"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn account_deletion_leaves_other_users_alone(app: App) -> Result<(), eyre::Report> {
    let ada = app.register_verified("ada@example.com", "correct-horse")?;
    let bob = app.register_verified("bob@example.com", "battery-staple")?;
    app.todos.add(ada.id(), "Buy milk").await?;
    app.todos.add(bob.id(), "Fix bike").await?;
    app.session.sign_in("ada@example.com", "correct-horse").await?;

    let mut screen = app.account_screen();
    screen.set_current_password("correct-horse");
    screen.delete_account().await?;

    eyre::ensure!(app.todos.list(ada.id()).await?.is_empty(), "ada's tasks remain");
    eyre::ensure!(app.todos.list(bob.id()).await?.len() == 1, "bob lost a task");
    Ok(())
}
