//! Account management against in-memory services.

use super::helpers::{App, app};
use rstest::rstest;
use tickbox::screens::{Navigation, ScreenError};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_password_then_sign_in_again(app: App) -> Result<(), eyre::Report> {
    app.register_verified("ada@example.com", "correct-horse")?;
    app.session.sign_in("ada@example.com", "correct-horse").await?;
    let mut screen = app.account_screen();

    screen.set_current_password("correct-horse");
    screen.set_new_password("battery-staple");
    eyre::ensure!(
        screen.change_password().await? == Navigation::Stay,
        "should stay on screen"
    );

    eyre::ensure!(screen.logout().await? == Navigation::PopToTop, "should unwind");
    eyre::ensure!(
        app.session
            .sign_in("ada@example.com", "correct-horse")
            .await
            .is_err(),
        "old password should fail"
    );
    app.session.sign_in("ada@example.com", "battery-staple").await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_current_password_blocks_deletion(app: App) -> Result<(), eyre::Report> {
    let user = app.register_verified("ada@example.com", "correct-horse")?;
    app.session.sign_in("ada@example.com", "correct-horse").await?;
    app.todos.add(user.id(), "Buy milk").await?;
    let mut screen = app.account_screen();

    let result = screen.delete_account().await;

    eyre::ensure!(
        matches!(result, Err(ScreenError::Deletion(_))),
        "deletion should fail"
    );
    eyre::ensure!(
        screen.error_message() == Some("Must enter the current password to delete the account"),
        "unexpected message {:?}",
        screen.error_message()
    );
    eyre::ensure!(app.store.len() == 1, "task should survive");
    eyre::ensure!(app.session.current_user().is_some(), "session should survive");
    Ok(())
}
