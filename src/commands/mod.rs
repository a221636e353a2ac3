pub mod calendar;
pub mod chat;
pub mod dashboard;
pub mod finance;
pub mod habits;
pub mod routines;
pub mod settings;
pub mod storage;
pub mod tasks;

use crate::error::{LifeError, LifeResult};

/// Missing records are not worth surfacing: the row is already gone.
pub(crate) fn tolerate_missing<T>(result: LifeResult<T>) -> Result<Option<T>, String> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            log::warn!("ignored: {}", e);
            Ok(None)
        }
        Err(e) => Err(e.to_string()),
    }
}

pub(crate) fn required_title(title: &str) -> LifeResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(LifeError::validation("title must not be empty"));
    }
    Ok(title.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_are_rejected() {
        assert!(required_title("   ").is_err());
        assert_eq!(required_title("  ler  ").unwrap(), "ler");
    }
}
