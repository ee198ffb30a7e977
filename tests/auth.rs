use restaurant_orders_api::{
    error::AppError,
    middleware::auth::{AuthUser, Role, decode_token, ensure_admin},
    services::auth_service::{hash_password, issue_token},
};

const SECRET: &str = "test-secret";

#[test]
fn staff_token_round_trips() {
    let login = issue_token(SECRET, "staff-42", Role::Admin).expect("token");
    assert_eq!(login.token_type, "Bearer");

    let claims = decode_token(&login.token, SECRET).expect("claims");
    assert_eq!(claims.sub, "staff-42");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp as i64, login.expires_at);
}

#[test]
fn token_signed_with_another_secret_is_rejected() {
    let login = issue_token("other-secret", "user-1", Role::Client).expect("token");
    let err = decode_token(&login.token, SECRET).expect_err("bad signature");
    assert!(matches!(err, AppError::Unauthorized(_)));

    assert!(decode_token("not-a-jwt", SECRET).is_err());
}

#[test]
fn only_staff_pass_the_admin_guard() {
    assert!(ensure_admin(&AuthUser::admin("staff-1")).is_ok());
    let err = ensure_admin(&AuthUser::client("auth-1")).expect_err("client");
    assert!(matches!(err, AppError::Forbidden));
}

#[test]
fn password_hashes_are_salted() {
    let first = hash_password("secret").expect("hash");
    let second = hash_password("secret").expect("hash");
    assert_ne!(first, second);
    assert!(first.starts_with("$argon2"));
}
