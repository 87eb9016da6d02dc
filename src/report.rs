/*!
Error printer returned from `main`.
*/

use std::error::Error as StdError;

/// Wraps any error so that `main` prints it with its full cause chain
/// instead of the derived `Debug` output.
pub struct Report(Box<dyn StdError>);

impl Report {
    fn causes(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        std::iter::successors(self.0.source(), |&e| e.source())
    }
}

impl std::fmt::Debug for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "error: {}", self.0)?;

        let mut causes = self.causes().peekable();
        if causes.peek().is_some() {
            writeln!(f, "\nCaused by:")?;
            for (depth, cause) in causes.enumerate() {
                writeln!(f, "  {}: {}", depth, cause)?;
            }
        }

        Ok(())
    }
}

impl<E: Into<Box<dyn StdError>>> From<E> for Report {
    fn from(e: E) -> Self {
        Report(e.into())
    }
}
