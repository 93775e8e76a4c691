//! Authentication service over the account store

use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use kith::mail::Mailer;
use kith::models::Account;
use kith::storage::AccountStore;
use kith::validation::{username_candidate, validate_email, validate_length};

use crate::api::auth::{
    RegisterRequest, TokenPurpose, decode_token, generate_jwt_token, hash_password,
    verify_password,
};
use crate::error::{ServerError, ServerResult};

/// Authentication service
#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_secret: String,
    jwt_expiration_hours: u64,
    verification_token_hours: u64,
    base_url: String,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(jwt_secret: String, base_url: String) -> Self {
        Self {
            jwt_secret,
            jwt_expiration_hours: 24 * 7,
            verification_token_hours: 24,
            base_url,
        }
    }

    /// Override the session token lifetime
    pub fn with_expiration_hours(mut self, session: u64, verification: u64) -> Self {
        self.jwt_expiration_hours = session;
        self.verification_token_hours = verification;
        self
    }

    /// Register a new account: validate, hash the password, derive a
    /// unique username, create the account with empty relationship
    /// sets, and fire the verification mail. Mail failure is logged,
    /// never surfaced.
    pub async fn register(
        &self,
        store: &Arc<dyn AccountStore>,
        mailer: &Arc<dyn Mailer>,
        request: RegisterRequest,
    ) -> ServerResult<(Account, String, i64)> {
        if !validate_email(&request.email) {
            return Err(ServerError::Validation("invalid email address".to_string()));
        }
        if store.get_by_email(&request.email).await?.is_some() {
            return Err(ServerError::Conflict(
                "This email address already exists, try with a different email address"
                    .to_string(),
            ));
        }
        if !validate_length(&request.first_name, 3, 30) {
            return Err(ServerError::Validation(
                "first name must be between 3 and 30 characters".to_string(),
            ));
        }
        if !validate_length(&request.last_name, 3, 30) {
            return Err(ServerError::Validation(
                "last name must be between 3 and 30 characters".to_string(),
            ));
        }
        if !validate_length(&request.password, 6, 40) {
            return Err(ServerError::Validation(
                "password must be between 6 and 40 characters".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let username = self
            .unique_username(store, &request.first_name, &request.last_name)
            .await?;

        let account = Account::new(
            request.first_name,
            request.last_name,
            username,
            request.email,
            password_hash,
        )
        .with_birth_date(request.birth_year, request.birth_month, request.birth_day)
        .with_gender(request.gender);

        let account = store.create_account(account).await?;
        info!(account_id = %account.id, username = %account.username, "account registered");

        self.send_verification_mail(mailer, &account).await;

        let (token, expires_at) = self.session_token(&account)?;
        Ok((account, token, expires_at))
    }

    /// Authenticate by email and password, returning a session token
    pub async fn authenticate(
        &self,
        store: &Arc<dyn AccountStore>,
        email: &str,
        password: &str,
    ) -> ServerResult<(String, Account, i64)> {
        let account = store.get_by_email(email).await?.ok_or_else(|| {
            ServerError::Auth("The email you entered is not connected to an account".to_string())
        })?;

        if !verify_password(password, &account.password_hash)? {
            return Err(ServerError::Auth("Invalid credentials".to_string()));
        }

        let (token, expires_at) = self.session_token(&account)?;
        Ok((token, account, expires_at))
    }

    /// Consume a verification token and mark its account verified.
    /// The token must belong to the authenticated caller.
    pub async fn activate(
        &self,
        store: &Arc<dyn AccountStore>,
        caller: Uuid,
        token: &str,
    ) -> ServerResult<()> {
        let claims = decode_token(token, &self.jwt_secret)?;
        if claims.purpose != TokenPurpose::Verification {
            return Err(ServerError::Auth("Not a verification token".to_string()));
        }
        let account_id = Uuid::parse_str(&claims.sub)
            .map_err(|e| ServerError::Auth(format!("Invalid account ID in token: {}", e)))?;
        if account_id != caller {
            return Err(ServerError::Auth(
                "You don't have the authorization to complete this operation".to_string(),
            ));
        }

        let account = store
            .get_account(account_id)
            .await?
            .ok_or_else(|| ServerError::NotFound(format!("Account '{}' not found", account_id)))?;
        if account.verified {
            return Err(ServerError::BadRequest(
                "This account is already verified".to_string(),
            ));
        }

        store.set_verified(account_id, true).await?;
        info!(account_id = %account_id, "account activated");
        Ok(())
    }

    /// Re-issue a verification token and mail it, for a signed-in but
    /// not-yet-verified account
    pub async fn send_verification(
        &self,
        store: &Arc<dyn AccountStore>,
        mailer: &Arc<dyn Mailer>,
        caller: Uuid,
    ) -> ServerResult<()> {
        let account = store
            .get_account(caller)
            .await?
            .ok_or_else(|| ServerError::NotFound(format!("Account '{}' not found", caller)))?;
        if account.verified {
            return Err(ServerError::BadRequest(
                "This account is already verified".to_string(),
            ));
        }
        self.send_verification_mail(mailer, &account).await;
        Ok(())
    }

    /// Build and deliver the activation mail; failures are logged only
    async fn send_verification_mail(&self, mailer: &Arc<dyn Mailer>, account: &Account) {
        let token = match generate_jwt_token(
            &account.id,
            &account.username,
            TokenPurpose::Verification,
            &self.jwt_secret,
            self.verification_token_hours,
        ) {
            Ok((token, _)) => token,
            Err(e) => {
                warn!(account_id = %account.id, error = %e, "failed to issue verification token");
                return;
            }
        };

        let url = format!("{}/activate/{}", self.base_url, token);
        if let Err(e) = mailer
            .send_verification_email(&account.email, &account.first_name, &url)
            .await
        {
            warn!(account_id = %account.id, error = %e, "verification mail delivery failed");
        }
    }

    /// Derive a username from the name, retrying with random digit
    /// suffixes until the store reports it free
    async fn unique_username(
        &self,
        store: &Arc<dyn AccountStore>,
        first_name: &str,
        last_name: &str,
    ) -> ServerResult<String> {
        let base = username_candidate(first_name, last_name);
        let mut candidate = base.clone();
        while store.get_by_username(&candidate).await?.is_some() {
            let suffix: u32 = rand::rng().random_range(10..100_000);
            candidate = format!("{base}{suffix}");
        }
        Ok(candidate)
    }

    fn session_token(&self, account: &Account) -> ServerResult<(String, i64)> {
        generate_jwt_token(
            &account.id,
            &account.username,
            TokenPurpose::Session,
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )
    }
}
