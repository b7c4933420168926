use crate::{config::*, error::*, models::*, repository::*};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use logger_redacted::PiiRedactor;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Registration, login and token verification.
///
/// Password hashing runs on the blocking pool so a slow hash never stalls the
/// async workers.
pub struct IdentityService {
    accounts: Arc<dyn AccountRepository>,
    config: IdentityConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    redactor: PiiRedactor,
    /// Hash verified against when the email is unknown, so both login paths pay for argon2
    dummy_hash: OnceCell<String>,
}

impl IdentityService {
    pub fn new(accounts: Arc<dyn AccountRepository>, config: IdentityConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        Self {
            accounts,
            config,
            encoding_key,
            decoding_key,
            redactor: PiiRedactor::default(),
            dummy_hash: OnceCell::new(),
        }
    }

    pub fn with_redactor(mut self, redactor: PiiRedactor) -> Self {
        self.redactor = redactor;
        self
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse> {
        if email.trim().is_empty() {
            return Err(IdentityError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(IdentityError::MissingField("password"));
        }
        if password.chars().count() < self.config.password_min_length {
            return Err(IdentityError::WeakPassword {
                min_length: self.config.password_min_length,
            });
        }

        let password_hash = hash_password(password.to_string()).await?;
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        };

        if let Err(err) = self.accounts.create_account(&account).await {
            if matches!(err, IdentityError::EmailAlreadyInUse) {
                warn!(
                    email = %self.redactor.redact_email(email),
                    "Registration rejected: email already exists"
                );
            }
            return Err(err);
        }

        info!(
            account_id = %account.id,
            email = %self.redactor.redact_email(email),
            "Account registered"
        );
        self.auth_response(&account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        if email.is_empty() || password.is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }

        let Some(account) = self.accounts.find_by_email(email).await? else {
            debug!(email = %self.redactor.redact_email(email), "Login for unknown email");
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| hash_password(Uuid::new_v4().to_string()))
                .await?;
            // Always a mismatch; the result only matters for timing
            let _ = verify_password(password.to_string(), dummy.clone()).await;
            return Err(IdentityError::InvalidCredentials);
        };

        verify_password(password.to_string(), account.password_hash.clone()).await?;

        info!(account_id = %account.id, "Login succeeded");
        self.auth_response(&account)
    }

    /// Resolve a bearer token to the principal it was issued for.
    ///
    /// The account must still exist.
    pub async fn verify_token(&self, token: &str) -> Result<Principal> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                IdentityError::InvalidToken
            })?;

        let account_id =
            Uuid::parse_str(&data.claims.sub).map_err(|_| IdentityError::InvalidToken)?;

        match self.accounts.find_by_id(account_id).await? {
            Some(account) => Ok(Principal::new(account.id)),
            None => {
                debug!(%account_id, "Token subject no longer exists");
                Err(IdentityError::InvalidToken)
            }
        }
    }

    pub fn issue_token(&self, account_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.config.token_ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                IdentityError::JwtError(format!(
                    "token_ttl_hours {} is out of range",
                    self.config.token_ttl_hours
                ))
            })?;
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::JwtError(e.to_string()))
    }

    fn auth_response(&self, account: &Account) -> Result<AuthResponse> {
        Ok(AuthResponse {
            user: AccountProfile::from(account),
            token: self.issue_token(account.id)?,
        })
    }
}

async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| IdentityError::HashingError)
    })
    .await
    .map_err(|e| IdentityError::InternalError(e.into()))?
}

async fn verify_password(password: String, hash: String) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|_| IdentityError::HashingError)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| IdentityError::InvalidCredentials)
    })
    .await
    .map_err(|e| IdentityError::InternalError(e.into()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (IdentityService, Arc<InMemoryAccountRepository>) {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let service = IdentityService::new(repo.clone(), IdentityConfig::default());
        (service, repo)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _) = service();
        let registered = service.register("parent@example.com", "secret").await.unwrap();
        let logged_in = service.login("parent@example.com", "secret").await.unwrap();
        assert_eq!(registered.user.id, logged_in.user.id);

        let principal = service.verify_token(&logged_in.token).await.unwrap();
        assert_eq!(principal.account_id, registered.user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let (service, _) = service();
        service.register("parent@example.com", "secret").await.unwrap();
        let err = service.login("parent@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails_and_count_stays_one() {
        let (service, repo) = service();
        let first = service.register("dup@example.com", "one").await.unwrap();
        let err = service.register("dup@example.com", "two").await.unwrap_err();
        assert!(matches!(err, IdentityError::EmailAlreadyInUse));
        assert_eq!(repo.len(), 1);

        // The original password still works
        let login = service.login("dup@example.com", "one").await.unwrap();
        assert_eq!(login.user.id, first.user.id);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let (service, _) = service();
        assert!(matches!(
            service.register("", "secret").await.unwrap_err(),
            IdentityError::MissingField("email")
        ));
        assert!(matches!(
            service.register("a@example.com", "").await.unwrap_err(),
            IdentityError::MissingField("password")
        ));
        assert!(matches!(
            service.login("", "").await.unwrap_err(),
            IdentityError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_tampered_and_foreign_tokens_are_rejected() {
        let (service, _) = service();
        let auth = service.register("parent@example.com", "secret").await.unwrap();

        let tampered = format!("{}x", auth.token);
        assert!(matches!(
            service.verify_token(&tampered).await.unwrap_err(),
            IdentityError::InvalidToken
        ));

        let other = IdentityService::new(
            Arc::new(InMemoryAccountRepository::new()),
            IdentityConfig {
                jwt_secret: "another-secret-entirely".to_string(),
                ..IdentityConfig::default()
            },
        );
        let foreign = other.issue_token(auth.user.id).unwrap();
        assert!(service.verify_token(&foreign).await.is_err());
    }

    #[tokio::test]
    async fn test_token_for_unknown_account_is_rejected() {
        let (service, _) = service();
        let token = service.issue_token(Uuid::new_v4()).unwrap();
        assert!(matches!(
            service.verify_token(&token).await.unwrap_err(),
            IdentityError::InvalidToken
        ));
    }

    #[tokio::test]
    async fn test_unknown_email_still_runs_password_verification() {
        let (service, _) = service();
        assert!(!service.dummy_hash.initialized());

        let err = service.login("nobody@example.com", "secret").await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
        let dummy = service.dummy_hash.get().cloned().unwrap();
        assert!(dummy.starts_with("$argon2"));

        // The same hash is reused afterwards
        service.login("someone@example.com", "secret").await.unwrap_err();
        assert_eq!(service.dummy_hash.get(), Some(&dummy));
    }

    #[tokio::test]
    async fn test_out_of_range_ttl_is_an_error_not_a_panic() {
        let service = IdentityService::new(
            Arc::new(InMemoryAccountRepository::new()),
            IdentityConfig {
                token_ttl_hours: 10_000_000_000_000,
                ..IdentityConfig::default()
            },
        );
        let err = service.issue_token(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, IdentityError::JwtError(_)));

        let outcome = tokio::spawn(async move { service.register("a@example.com", "secret").await })
            .await
            .unwrap();
        assert!(matches!(outcome, Err(IdentityError::JwtError(_))));
    }

    #[tokio::test]
    async fn test_short_password_is_weak() {
        let repo = Arc::new(InMemoryAccountRepository::new());
        let service = IdentityService::new(
            repo,
            IdentityConfig {
                password_min_length: 8,
                ..IdentityConfig::default()
            },
        );
        let err = service.register("a@example.com", "short").await.unwrap_err();
        assert!(matches!(err, IdentityError::WeakPassword { min_length: 8 }));
    }
}
