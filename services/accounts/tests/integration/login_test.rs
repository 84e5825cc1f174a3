use chrono::{Duration, Utc};

use errant_accounts::domain::types::TokenKind;
use errant_accounts::error::AccountsServiceError;
use errant_accounts::usecase::token::{LoginInput, LoginUseCase};
use errant_accounts::usecase::user::{RegisterInput, RegisterUseCase};

use crate::helpers::{MockTokenRepo, MockUserRepo, test_passwords};

fn login(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: Some(email.into()),
        password: Some(password.into()),
    }
}

#[tokio::test]
async fn should_issue_week_long_session_token() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    let usecase = LoginUseCase {
        users: users.clone(),
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let before = Utc::now();
    let out = usecase
        .execute(login("tariq@example.com", "sandstorm"))
        .await
        .unwrap();

    assert_eq!(out.user.id, user.id);
    assert_eq!(out.token.len(), 128);
    assert!(out.expires_at >= before + Duration::days(7));
    assert!(out.expires_at <= Utc::now() + Duration::days(7));

    let stored = tokens.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].token, out.token);
    assert_eq!(stored[0].kind, TokenKind::Session);
    assert_eq!(stored[0].user_id, user.id);
    assert!(!stored[0].is_used);
}

#[tokio::test]
async fn should_issue_distinct_tokens_per_login() {
    let users = MockUserRepo::empty();
    users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let usecase = LoginUseCase {
        users: users.clone(),
        tokens: MockTokenRepo::new(&users),
        passwords: test_passwords(),
    };

    let first = usecase
        .execute(login("tariq@example.com", "sandstorm"))
        .await
        .unwrap();
    let second = usecase
        .execute(login("tariq@example.com", "sandstorm"))
        .await
        .unwrap();

    assert_ne!(first.token, second.token);
}

#[tokio::test]
async fn should_reject_unknown_email_as_invalid_credentials() {
    let users = MockUserRepo::empty();
    let tokens = MockTokenRepo::new(&users);
    let usecase = LoginUseCase {
        users: users.clone(),
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let result = usecase.execute(login("nobody@example.com", "whatever")).await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
    assert!(tokens.all().is_empty());
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let users = MockUserRepo::empty();
    users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    let usecase = LoginUseCase {
        users: users.clone(),
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let result = usecase.execute(login("tariq@example.com", "sandstorm!")).await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidCredentials)),
        "expected InvalidCredentials, got {result:?}"
    );
    assert!(tokens.all().is_empty());
}

#[tokio::test]
async fn should_log_in_with_password_registered_as_spaces() {
    let users = MockUserRepo::empty();
    RegisterUseCase {
        users: users.clone(),
        passwords: test_passwords(),
    }
    .execute(RegisterInput {
        username: Some("tariq".into()),
        email: Some("tariq@example.com".into()),
        password: Some("   ".into()),
    })
    .await
    .unwrap();
    let usecase = LoginUseCase {
        users: users.clone(),
        tokens: MockTokenRepo::new(&users),
        passwords: test_passwords(),
    };

    let out = usecase.execute(login("tariq@example.com", "   ")).await.unwrap();

    assert_eq!(out.user.username, "tariq");
}

#[tokio::test]
async fn should_require_login_fields() {
    let users = MockUserRepo::empty();
    let usecase = LoginUseCase {
        users: users.clone(),
        tokens: MockTokenRepo::new(&users),
        passwords: test_passwords(),
    };

    let result = usecase.execute(LoginInput::default()).await;

    let Err(AccountsServiceError::Validation(errors)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    let fields: Vec<_> = errors.iter().map(|e| e.field()).collect();
    assert_eq!(fields, ["email", "password"]);
}
