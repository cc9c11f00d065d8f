use std::sync::Arc;
use tracing::{debug, info, instrument};

use models::mapper::domain_to_claim;
use models::user::{self, NewUser, User, UserPatch};

use crate::auth::TokenIssuer;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::repository::UserRepository;

/// User business service.
///
/// Owns the rules the repository cannot enforce on its own: input validation
/// and email uniqueness. The duplicate check and the insert are two separate
/// repository calls, so concurrent registrations of one email can both pass.
pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    tokens: Option<TokenIssuer>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo, tokens: None } }

    /// Enable [`UserService::issue_token`].
    pub fn with_tokens(mut self, issuer: TokenIssuer) -> Self {
        self.tokens = Some(issuer);
        self
    }

    pub fn repository(&self) -> &Arc<R> { &self.repo }

    /// Register a new user; the email must not be taken yet.
    ///
    /// # Examples
    /// ```
    /// use service::{repository::InMemoryUserRepository, user_service::UserService, errors::ServiceError};
    /// use std::sync::Arc;
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::new()));
    /// let alice = tokio_test::block_on(svc.register_user("Alice", "a@x.com")).unwrap();
    /// assert_eq!(alice.id, "1");
    /// let again = tokio_test::block_on(svc.register_user("Alice2", "a@x.com"));
    /// assert!(matches!(again, Err(ServiceError::Duplicate(_))));
    /// ```
    #[instrument(skip(self, name))]
    pub async fn register_user(&self, name: &str, email: &str) -> Result<User, ServiceError> {
        let (name, email) = (name.trim(), email.trim());
        user::validate_name(name)?;
        user::validate_email(email)?;
        if let Some(existing) = self.repo.find_by_email(email).await? {
            debug!(user_id = %existing.id, "email already registered");
            return Err(ServiceError::Duplicate(format!("email {} already registered", email)));
        }
        let created = self.repo.create(NewUser::new(name, email)).await?;
        info!(user_id = %created.id, "user_registered");
        Ok(created)
    }

    pub async fn get_profile(&self, id: &str) -> Result<Option<User>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Rename a user. Missing ids surface as [`ServiceError::NotFound`].
    #[instrument(skip(self))]
    pub async fn update_name(&self, id: &str, new_name: &str) -> Result<User, ServiceError> {
        let new_name = new_name.trim();
        user::validate_name(new_name)?;
        self.repo.update(id, UserPatch::name(new_name)).await
    }

    #[instrument(skip(self))]
    pub async fn remove_user(&self, id: &str) -> Result<(), ServiceError> {
        self.repo.delete(id).await
    }

    /// One page of users in registration order.
    pub async fn list_users(&self, opts: Pagination) -> Result<Vec<User>, ServiceError> {
        let all = self.repo.find_all().await?;
        Ok(opts.apply(all))
    }

    /// Sign a credential for the user's claim set.
    #[instrument(skip(self))]
    pub async fn issue_token(&self, id: &str) -> Result<String, ServiceError> {
        let issuer = self
            .tokens
            .as_ref()
            .ok_or_else(|| ServiceError::Token("token issuing is not configured".into()))?;
        let user = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("user", id))?;
        issuer.issue(&domain_to_claim(&user))
    }
}
