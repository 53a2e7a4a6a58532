//! Terminal UI components (spinner, colors, prompts).

use anyhow::Result;
use inquire::{Confirm, InquireError};

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Ctrl+C and Escape on a prompt.
const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Maps a cancelled prompt to `None`; other prompt failures stay errors.
pub fn cancellable<T>(answer: Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_prompt_cancelled(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Runs an interactive flow, treating a cancelled prompt anywhere inside it
/// as a clean exit.
pub fn handle_prompt_cancellation<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    f().or_else(|e| {
        if e.downcast_ref::<InquireError>()
            .is_some_and(is_prompt_cancelled)
        {
            println!();
            Ok(())
        } else {
            Err(e)
        }
    })
}

/// Asks a yes/no question, defaulting to no. Cancelling counts as no.
pub fn confirm(message: &str) -> Result<bool> {
    let answer = Confirm::new(message).with_default(false).prompt();
    Ok(cancellable(answer)?.unwrap_or(false))
}
