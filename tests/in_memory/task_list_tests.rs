//! Task list screen driven against in-memory services.

use super::helpers::{App, app};
use rstest::rstest;
use tickbox::screens::{LoadState, RowMode};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_check_rename_delete(app: App) -> Result<(), eyre::Report> {
    app.register_verified("ada@example.com", "correct-horse")?;
    app.session.sign_in("ada@example.com", "correct-horse").await?;
    let mut screen = app.list_screen();
    screen.enter().await?;
    eyre::ensure!(screen.load_state() == LoadState::Ready, "list should load");
    eyre::ensure!(screen.rows().is_empty(), "new account has no tasks");

    screen.open_add_modal();
    screen.add_modal_mut().set_text("Buy milk");
    screen.submit_add_modal().await?;
    let id = screen
        .rows()
        .first()
        .map(|row| row.todo().id().clone())
        .ok_or_else(|| eyre::eyre!("added row missing"))?;

    screen.toggle_completed(&id).await?;
    screen.start_edit(&id)?;
    screen.edit_draft(&id, "Buy oat milk")?;
    screen.save_edit(&id).await?;

    let row = screen.row(&id).ok_or_else(|| eyre::eyre!("row missing"))?;
    eyre::ensure!(row.todo().text().as_str() == "Buy oat milk", "rename lost");
    eyre::ensure!(row.todo().completed(), "completion lost on rename");
    eyre::ensure!(row.mode() == &RowMode::Viewing, "row should leave edit mode");

    screen.delete(&id).await?;
    screen.refresh().await?;
    eyre::ensure!(screen.rows().is_empty(), "list should be empty");
    eyre::ensure!(app.store.is_empty(), "store should be empty");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rows_survive_a_new_screen(app: App) -> Result<(), eyre::Report> {
    app.register_verified("ada@example.com", "correct-horse")?;
    app.session.sign_in("ada@example.com", "correct-horse").await?;
    let mut first = app.list_screen();
    first.enter().await?;
    first.add("Buy milk").await?;
    first.add("Walk dog").await?;
    first.close();

    let mut second = app.list_screen();
    second.enter().await?;

    let texts: Vec<&str> = second
        .rows()
        .iter()
        .map(|row| row.todo().text().as_str())
        .collect();
    eyre::ensure!(texts.len() == 2, "expected two rows, found {texts:?}");
    Ok(())
}
