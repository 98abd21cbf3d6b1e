//! Account use cases: register, login, logout and profile management.

use crate::domain::validation::{check_confirmation, check_password_policy, require};
use crate::domain::{Credentials, ProfileUpdate, Registration, Result, User};
use crate::infrastructure::ApiClient;

/// Input collected by the registration command.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegistrationForm {
    /// Check required fields, confirmation and password policy.
    ///
    /// # Errors
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<Registration> {
        require("Name", &self.name)?;
        require("Email", &self.email)?;
        require("Password", &self.password)?;
        require("Password confirmation", &self.confirmation)?;
        check_confirmation(&self.password, &self.confirmation)?;
        check_password_policy(&self.password)?;

        Ok(Registration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Input collected by the profile command. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub current_password: String,
    pub new_password: Option<String>,
}

impl ProfileForm {
    /// Merge with the current profile and validate.
    ///
    /// An empty new password means "keep the current one".
    ///
    /// # Errors
    /// Returns the first validation failure.
    pub fn into_update(self, current: &User) -> Result<ProfileUpdate> {
        require("Current password", &self.current_password)?;

        let name = self
            .name
            .map_or_else(|| current.name.clone(), |n| n.trim().to_string());
        let email = self
            .email
            .map_or_else(|| current.email.clone(), |e| e.trim().to_string());
        require("Email", &email)?;

        let new_password = self.new_password.filter(|p| !p.is_empty());
        if let Some(password) = &new_password {
            check_password_policy(password)?;
        }

        Ok(ProfileUpdate {
            name,
            email,
            current_password: self.current_password,
            new_password,
        })
    }
}

/// Account operations against the API.
pub struct AccountService<'a> {
    api: &'a ApiClient,
}

impl<'a> AccountService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Authenticate and remember the issued token.
    ///
    /// # Errors
    /// Returns error on missing fields, rejected credentials or API failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        require("Email", email)?;
        require("Password", password)?;

        let session = self
            .api
            .login(&Credentials {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        self.api.auth().login(session.token)?;
        tracing::info!(email = %email.trim(), "Login succeeded");
        Ok(())
    }

    /// Create an account. Does not log in.
    ///
    /// # Errors
    /// Returns error on validation failure, taken email or API failure.
    pub async fn register(&self, form: &RegistrationForm) -> Result<()> {
        let registration = form.validate()?;
        self.api.register(&registration).await?;
        tracing::info!(email = %registration.email, "Account created");
        Ok(())
    }

    /// Forget the stored token. Returns whether a session existed.
    ///
    /// # Errors
    /// Returns error if the token store cannot be cleared.
    pub fn logout(&self) -> Result<bool> {
        let was_authenticated = self.api.auth().is_authenticated();
        self.api.auth().logout()?;
        Ok(was_authenticated)
    }

    /// Fetch the current user.
    ///
    /// # Errors
    /// Returns error on missing/expired session or API failure.
    pub async fn profile(&self) -> Result<User> {
        self.api.current_user().await
    }

    /// Update the profile and return the resulting user record.
    ///
    /// # Errors
    /// Returns error on validation failure, missing/expired session or API failure.
    pub async fn update_profile(&self, form: ProfileForm) -> Result<User> {
        let current = self.api.current_user().await?;
        let update = form.into_update(&current)?;
        let changes_password = update.new_password.is_some();

        self.api.update_profile(&update).await?;
        tracing::info!(changes_password, "Profile updated");

        Ok(User {
            name: update.name,
            email: update.email,
        })
    }
}
