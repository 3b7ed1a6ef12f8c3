//! Authentication

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{CatalogError, CatalogReader, models::User};

/// Login failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password was blank.
    #[error("username and password are required")]
    MissingCredentials,

    /// Unknown user, wrong password, or disabled account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The user records could not be read.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Check credentials against the catalog's user records.
///
/// Unknown users, wrong passwords and inactive accounts all yield the same
/// error so callers cannot tell which part was wrong.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredentials`] for blank input,
/// [`AuthError::InvalidCredentials`] if the credentials do not match an active
/// user, or [`AuthError::Catalog`] if the lookup fails.
#[tracing::instrument(skip(catalog, password))]
pub fn login<C: CatalogReader>(catalog: &C, username: &str, password: &str) -> Result<User, AuthError> {
    let username = username.trim();

    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let Some(user) = catalog.find_user(username)? else {
        warn!("login attempt for unknown user");

        return Err(AuthError::InvalidCredentials);
    };

    if !user.active || user.password != password {
        warn!(user = %user.id, "rejected login");

        return Err(AuthError::InvalidCredentials);
    }

    info!(user = %user.id, segment = user.segment.label(), "logged in");

    Ok(user)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{catalog::{CatalogStore, MemoryCatalog}, segments::UserSegment};

    #[test]
    fn seeded_users_can_log_in() -> TestResult {
        let catalog = MemoryCatalog::seeded()?;

        let loja = login(&catalog, "loja", "loja123")?;
        let restaurante = login(&catalog, " restaurante ", "restaurante123")?;

        assert_eq!(loja.segment, UserSegment::Loja);
        assert_eq!(restaurante.name, "Restaurante Exemplo");

        Ok(())
    }

    #[test]
    fn blank_credentials_are_missing() -> TestResult {
        let catalog = MemoryCatalog::seeded()?;

        assert!(matches!(
            login(&catalog, "  ", "x"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            login(&catalog, "loja", ""),
            Err(AuthError::MissingCredentials)
        ));

        Ok(())
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() -> TestResult {
        let catalog = MemoryCatalog::seeded()?;

        assert!(matches!(
            login(&catalog, "loja", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            login(&catalog, "ghost", "loja123"),
            Err(AuthError::InvalidCredentials)
        ));

        Ok(())
    }

    #[test]
    fn inactive_user_is_rejected() -> TestResult {
        let mut catalog = MemoryCatalog::seeded()?;
        let user = login(&catalog, "loja", "loja123")?;

        catalog.delete(user.id)?;

        assert!(matches!(
            login(&catalog, "loja", "loja123"),
            Err(AuthError::InvalidCredentials)
        ));

        Ok(())
    }
}
