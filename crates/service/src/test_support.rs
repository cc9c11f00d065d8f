#![cfg(test)]
use std::sync::Arc;

use crate::auth::{TokenConfig, TokenIssuer};
use crate::repository::InMemoryUserRepository;
use crate::user_service::UserService;

const TEST_SECRET: &str = "test-secret";

/// Fresh service over an empty store, with `users` registered in order.
pub async fn seeded_service(users: &[(&str, &str)]) -> Result<UserService<InMemoryUserRepository>, anyhow::Error> {
    let svc = UserService::new(Arc::new(InMemoryUserRepository::new()));
    for (name, email) in users {
        svc.register_user(name, email).await?;
    }
    Ok(svc)
}

/// Like [`seeded_service`] with token issuing enabled; also returns a
/// verifier sharing the same secret.
pub async fn service_with_tokens(
    users: &[(&str, &str)],
) -> Result<(UserService<InMemoryUserRepository>, TokenIssuer), anyhow::Error> {
    let cfg = TokenConfig { secret: TEST_SECRET.into(), ttl_secs: 600 };
    let svc = seeded_service(users).await?.with_tokens(TokenIssuer::new(&cfg)?);
    Ok((svc, TokenIssuer::new(&cfg)?))
}
