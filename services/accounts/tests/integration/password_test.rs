use chrono::{Duration, Utc};

use errant_accounts::domain::repository::PasswordPort;
use errant_accounts::domain::types::TokenKind;
use errant_accounts::error::AccountsServiceError;
use errant_accounts::usecase::password::{
    ForgotPasswordInput, ForgotPasswordUseCase, RESET_MAIL_SUBJECT, ResetPasswordInput,
    ResetPasswordUseCase,
};

use crate::helpers::{
    MockMailer, MockTokenRepo, MockUserRepo, TEST_FRONTEND_URL, test_passwords,
};

fn forgot_usecase(
    users: &MockUserRepo,
    tokens: &MockTokenRepo,
    mailer: &MockMailer,
) -> ForgotPasswordUseCase<MockUserRepo, MockTokenRepo, MockMailer> {
    ForgotPasswordUseCase {
        users: users.clone(),
        tokens: tokens.clone(),
        mailer: mailer.clone(),
        frontend_url: TEST_FRONTEND_URL.into(),
    }
}

fn reset(user_id: i32, token: &str, password: &str) -> ResetPasswordInput {
    ResetPasswordInput {
        user_id,
        token: token.into(),
        password: Some(password.into()),
    }
}

// ── ForgotPasswordUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_mail_reset_link_to_known_user() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    let mailer = MockMailer::new();

    forgot_usecase(&users, &tokens, &mailer)
        .execute(ForgotPasswordInput {
            email: Some("tariq@example.com".into()),
        })
        .await
        .unwrap();

    let stored = tokens.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].kind, TokenKind::PasswordReset);
    assert!(stored[0].expires_at <= Utc::now() + Duration::days(1));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "tariq@example.com");
    assert_eq!(sent[0].subject, RESET_MAIL_SUBJECT);
    let link = format!(
        "{TEST_FRONTEND_URL}/resetPassword?id={}&token={}",
        user.id, stored[0].token
    );
    assert!(sent[0].html.contains(&link), "link missing from {}", sent[0].html);
}

#[tokio::test]
async fn should_succeed_silently_for_unknown_email() {
    let users = MockUserRepo::empty();
    let tokens = MockTokenRepo::new(&users);
    let mailer = MockMailer::new();

    forgot_usecase(&users, &tokens, &mailer)
        .execute(ForgotPasswordInput {
            email: Some("nobody@example.com".into()),
        })
        .await
        .unwrap();

    assert!(tokens.all().is_empty());
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn should_require_email() {
    let users = MockUserRepo::empty();
    let tokens = MockTokenRepo::new(&users);
    let mailer = MockMailer::new();

    let result = forgot_usecase(&users, &tokens, &mailer)
        .execute(ForgotPasswordInput {
            email: Some("   ".into()),
        })
        .await;

    assert!(
        matches!(result, Err(AccountsServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_surface_mail_failure_as_internal() {
    let users = MockUserRepo::empty();
    users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    let mailer = MockMailer::failing();

    let result = forgot_usecase(&users, &tokens, &mailer)
        .execute(ForgotPasswordInput {
            email: Some("tariq@example.com".into()),
        })
        .await;

    assert!(
        matches!(result, Err(AccountsServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
}

// ── ResetPasswordUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_and_consume_token() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    let token = tokens.seed(
        user.id,
        TokenKind::PasswordReset,
        "reset-1",
        Utc::now(),
        Duration::days(1),
    );
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    usecase
        .execute(reset(user.id, "reset-1", "oasis"))
        .await
        .unwrap();

    let stored = users.get(user.id).unwrap();
    let passwords = test_passwords();
    assert!(passwords.verify("oasis", &stored.password).await.unwrap());
    assert!(!passwords.verify("sandstorm", &stored.password).await.unwrap());
    assert!(tokens.all().iter().find(|t| t.id == token.id).unwrap().is_used);
}

#[tokio::test]
async fn should_reject_expired_token_even_when_it_matches() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    tokens.seed(
        user.id,
        TokenKind::PasswordReset,
        "reset-1",
        Utc::now() - Duration::days(2),
        Duration::days(1),
    );
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let result = usecase.execute(reset(user.id, "reset-1", "oasis")).await;

    let Err(err) = result else {
        panic!("expected ResetTokenExpired");
    };
    assert!(matches!(err, AccountsServiceError::ResetTokenExpired));
    assert_eq!(err.to_string(), "password reset link has expired");
    assert_eq!(users.get(user.id).unwrap().password, user.password);
}

#[tokio::test]
async fn should_reject_reused_token() {
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
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    usecase
        .execute(reset(user.id, "reset-1", "oasis"))
        .await
        .unwrap();
    let result = usecase.execute(reset(user.id, "reset-1", "mirage")).await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidResetToken)),
        "expected InvalidResetToken, got {result:?}"
    );
    let stored = users.get(user.id).unwrap();
    assert!(test_passwords().verify("oasis", &stored.password).await.unwrap());
}

#[tokio::test]
async fn should_let_only_one_of_two_concurrent_resets_win() {
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
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    // Both calls read the token as unused before either consumes it.
    let (first, second) = tokio::join!(
        usecase.execute(reset(user.id, "reset-1", "oasis")),
        usecase.execute(reset(user.id, "reset-1", "mirage")),
    );

    let winner = match (&first, &second) {
        (Ok(()), Err(AccountsServiceError::InvalidResetToken)) => "oasis",
        (Err(AccountsServiceError::InvalidResetToken), Ok(())) => "mirage",
        _ => panic!("expected exactly one winner, got {first:?} and {second:?}"),
    };
    let stored = users.get(user.id).unwrap();
    assert!(test_passwords().verify(winner, &stored.password).await.unwrap());
    assert!(tokens.all()[0].is_used);
}

#[tokio::test]
async fn should_only_honour_newest_reset_token() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    let now = Utc::now();
    tokens.seed(
        user.id,
        TokenKind::PasswordReset,
        "older",
        now - Duration::minutes(10),
        Duration::days(1),
    );
    tokens.seed(user.id, TokenKind::PasswordReset, "newer", now, Duration::days(1));
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let result = usecase.execute(reset(user.id, "older", "oasis")).await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidResetToken)),
        "expected InvalidResetToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_ignore_session_tokens_when_resetting() {
    let users = MockUserRepo::empty();
    let user = users.seed("tariq", "tariq@example.com", "sandstorm").await;
    let tokens = MockTokenRepo::new(&users);
    tokens.seed(user.id, TokenKind::Session, "session-1", Utc::now(), Duration::days(7));
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let result = usecase.execute(reset(user.id, "session-1", "oasis")).await;

    assert!(
        matches!(result, Err(AccountsServiceError::InvalidResetToken)),
        "expected InvalidResetToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_missing_user() {
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
    users.remove(user.id);
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let result = usecase.execute(reset(user.id, "reset-1", "oasis")).await;

    assert!(
        matches!(result, Err(AccountsServiceError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );
    assert!(!tokens.all()[0].is_used);
}

#[tokio::test]
async fn should_require_new_password() {
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
    let usecase = ResetPasswordUseCase {
        tokens: tokens.clone(),
        passwords: test_passwords(),
    };

    let result = usecase
        .execute(ResetPasswordInput {
            user_id: user.id,
            token: "reset-1".into(),
            password: None,
        })
        .await;

    assert!(
        matches!(result, Err(AccountsServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert!(!tokens.all()[0].is_used);
}
