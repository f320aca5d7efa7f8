//! Credential store: registration, login and admin management of accounts.

use std::sync::Arc;

use uuid::Uuid;

use super::crypto::{hash_password, verify_password};
use super::errors::UserError;
use super::types::{DeletedUser, Role, User, UserSummary};
use crate::backend::{Backend, BackendError};
use crate::ids::IdAllocator;
use crate::{Clock, Error, Result};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

fn user_not_found(reference: String) -> Error {
    UserError::UserNotFound { reference }.into()
}

/// Persists user records and checks credentials.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn Backend>,
    ids: IdAllocator,
    clock: Arc<dyn Clock>,
}

impl CredentialStore {
    pub fn new(backend: Arc<dyn Backend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ids: IdAllocator::new(backend.clone()),
            backend,
            clock,
        }
    }

    /// Self-service registration: the password must be typed twice.
    pub async fn register(&self, new_user: NewUser, confirm_password: &str) -> Result<User> {
        if new_user.password != confirm_password {
            return Err(UserError::PasswordMismatch.into());
        }
        self.create(new_user).await
    }

    /// Create an account with the next sequential `user_id`.
    ///
    /// Emails are unique and compared exactly as stored.
    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let NewUser {
            email,
            password,
            role,
        } = new_user;

        if email.is_empty() {
            return Err(UserError::MissingField { field: "email" }.into());
        }
        if password.is_empty() {
            return Err(UserError::MissingField { field: "password" }.into());
        }

        if self.backend.find_user_by_email(&email).await?.is_some() {
            return Err(UserError::EmailAlreadyRegistered { email }.into());
        }

        let password_hash = hash_password(&password)?;
        let user_id = self.ids.next_user_id().await?;

        let user = User {
            id: Uuid::new_v4(),
            user_id,
            email,
            password_hash,
            role,
            created_at: self.clock.now(),
        };

        match self.backend.insert_user(user.clone()).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration of the same email
            Err(Error::Backend(BackendError::DuplicateEmail { email })) => {
                return Err(UserError::EmailAlreadyRegistered { email }.into());
            }
            Err(e) => return Err(e),
        }

        tracing::info!(
            user_id = user.user_id,
            email = %user.email,
            role = %user.role,
            "Created user"
        );
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// Unknown emails and wrong passwords both fail with
    /// `UserError::InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let Some(user) = self.backend.find_user_by_email(email).await? else {
            tracing::debug!(email, "Login for unknown email");
            return Err(UserError::InvalidCredentials.into());
        };

        verify_password(password, &user.password_hash)?;
        Ok(user)
    }

    pub async fn get(&self, id: &Uuid) -> Result<User> {
        let user = self.backend.get_user(id).await?;
        user.ok_or_else(|| user_not_found(id.to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.backend.find_user_by_email(email).await
    }

    /// Like [`CredentialStore::find_by_email`] but a missing user is an error.
    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        let user = self.find_by_email(email).await?;
        user.ok_or_else(|| user_not_found(email.to_string()))
    }

    /// All users, ascending by `user_id`.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.backend.list_users().await
    }

    /// All users with their file counts, ascending by `user_id`.
    pub async fn summaries(&self) -> Result<Vec<UserSummary>> {
        let users = self.backend.list_users().await?;
        let mut summaries = Vec::with_capacity(users.len());
        for user in users {
            let file_count = self.backend.count_files_by_owner(&user.id).await?;
            summaries.push(UserSummary {
                id: user.id,
                user_id: user.user_id,
                email: user.email,
                role: user.role,
                file_count,
            });
        }
        Ok(summaries)
    }

    pub async fn count(&self) -> Result<u64> {
        self.backend.count_users().await
    }

    /// Remove an account together with every file it owns.
    ///
    /// Files go first so that a failure part-way leaves the account in place
    /// rather than leaving orphaned files behind.
    pub async fn delete(&self, id: &Uuid) -> Result<DeletedUser> {
        let user = self.get(id).await?;

        let files_removed = self.backend.delete_files_by_owner(&user.id).await?;
        if !self.backend.delete_user(&user.id).await? {
            return Err(user_not_found(id.to_string()));
        }

        tracing::info!(
            user_id = user.user_id,
            email = %user.email,
            files_removed,
            "Deleted user"
        );
        Ok(DeletedUser {
            user_id: user.user_id,
            files_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SystemClock;
    use crate::backend::database::InMemory;

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(InMemory::new()), Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn register_requires_matching_passwords() {
        let store = store();
        let new_user = NewUser::new("alice@x.com", "pw1", Role::User);
        let err = store.register(new_user, "pw2").await.unwrap_err();
        assert!(matches!(err, Error::User(UserError::PasswordMismatch)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let store = store();
        let new_user = NewUser::new("", "pw", Role::User);
        let err = store.create(new_user).await.unwrap_err();
        assert!(err.is_validation_error());

        let new_user = NewUser::new("a@x.com", "", Role::User);
        let err = store.create(new_user).await.unwrap_err();
        assert!(matches!(
            err,
            Error::User(UserError::MissingField { field: "password" })
        ));
    }

    #[tokio::test]
    async fn authenticate_hides_which_part_was_wrong() {
        let store = store();
        let new_user = NewUser::new("alice@x.com", "pw1", Role::User);
        store.create(new_user).await.unwrap();

        assert!(store.authenticate("alice@x.com", "pw1").await.is_ok());
        let err = store.authenticate("alice@x.com", "nope").await.unwrap_err();
        assert!(err.is_invalid_credentials());
        let err = store.authenticate("nobody@x.com", "pw1").await.unwrap_err();
        assert!(err.is_invalid_credentials());
    }

    #[tokio::test]
    async fn emails_are_case_sensitive() {
        let store = store();
        for email in ["alice@x.com", "Alice@x.com"] {
            let new_user = NewUser::new(email, "pw", Role::User);
            store.create(new_user).await.unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
