use chrono::{Duration, Utc};

use errant_accounts::domain::types::TokenKind;
use errant_accounts::error::AccountsServiceError;
use errant_accounts::usecase::token::{LoginInput, LoginUseCase, ResolveUserUseCase};

use crate::helpers::{MockTokenRepo, MockUserRepo, test_passwords};

fn resolver(
    users: &MockUserRepo,
    tokens: &MockTokenRepo,
) -> ResolveUserUseCase<MockTokenRepo, MockUserRepo> {
    ResolveUserUseCase {
        tokens: tokens.clone(),
        users: users.clone(),
    }
}

#[tokio::test]
async fn should_resolve_user_from_login_token() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    let out = LoginUseCase {
        users: users.clone(),
        tokens: tokens.clone(),
        passwords: test_passwords(),
    }
    .execute(LoginInput {
        email: Some("tariq@example.com".into()),
        password: Some("sandstorm".into()),
    })
    .await
    .unwrap();

    let resolved = resolver(&users, &tokens).execute(&out.token).await.unwrap();

    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.username, "tariq");
}

#[tokio::test]
async fn should_not_accept_reset_token_as_bearer() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    tokens.seed(
        user.id,
        TokenKind::PasswordReset,
        "reset-1",
        Utc::now(),
        Duration::days(1),
    );

    let result = resolver(&users, &tokens).execute("reset-1").await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_session() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    tokens.seed(
        user.id,
        TokenKind::Session,
        "stale",
        Utc::now() - Duration::days(8),
        Duration::days(7),
    );

    let result = resolver(&users, &tokens).execute("stale").await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_unknown_token() {
    let users = MockUserRepo::empty();
    let tokens = MockTokenRepo::new(&users);

    let result = resolver(&users, &tokens).execute("deadbeef").await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_token_whose_user_is_gone() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    tokens.seed(user.id, TokenKind::Session, "orphan", Utc::now(), Duration::days(7));
    users.remove(user.id);

    let result = resolver(&users, &tokens).execute("orphan").await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}
