use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};

use shared_database::{ClinicStore, DbError};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::{NewProfile, NewUser, User};
use shared_utils::jwt::JwtService;
use shared_utils::password::{hash_password, verify_dummy_password, verify_password};
use shared_utils::AppState;

use crate::models::{AuthResponse, LoginRequest, RegisterRequest, RegistrationError};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(email) && email.len() <= 254)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks a registration request and turns it into the role, normalized
/// email and profile to persist. Admin accounts cannot self-register.
pub fn validate_registration(request: &RegisterRequest) -> Result<(Role, String, NewProfile), RegistrationError> {
    if request.full_name.trim().is_empty() {
        return Err(RegistrationError::MissingFullName);
    }

    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(RegistrationError::InvalidEmail);
    }

    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }

    let role = match request.role.parse::<Role>() {
        Ok(role @ (Role::Doctor | Role::Patient)) => role,
        _ => return Err(RegistrationError::InvalidRole),
    };

    let profile = match role {
        Role::Doctor => match &request.doctor_profile {
            Some(details) if !details.speciality.trim().is_empty() => NewProfile::Doctor(details.clone()),
            _ => return Err(RegistrationError::MissingSpeciality),
        },
        _ => NewProfile::Patient(request.patient_profile.clone().unwrap_or_default()),
    };

    Ok((role, email, profile))
}

pub struct RegistrationService {
    store: Arc<dyn ClinicStore>,
    jwt: Arc<JwtService>,
}

impl RegistrationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            jwt: state.jwt.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let (role, email, profile) = validate_registration(&request)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            debug!("Registration rejected, email already in use");
            return Err(RegistrationError::EmailTaken.into());
        }

        let new_user = NewUser {
            email,
            password_hash: hash_password(&request.password)?,
            full_name: request.full_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            role,
            profile,
        };

        // The unique index still guards the window between lookup and insert.
        let user = match self.store.create_user(new_user).await {
            Ok(user) => user,
            Err(DbError::UniqueViolation(_)) => return Err(RegistrationError::EmailTaken.into()),
            Err(e) => return Err(e.into()),
        };

        info!("Registered {} {}", user.role, user.id);
        self.respond(user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);

        let user = match self.store.find_user_by_email(&email).await? {
            Some(user) if verify_password(&user.password_hash, &request.password) => user,
            Some(_) => {
                warn!("Failed login for existing account");
                return Err(RegistrationError::InvalidCredentials.into());
            }
            None => {
                verify_dummy_password(&request.password);
                return Err(RegistrationError::InvalidCredentials.into());
            }
        };

        debug!("User {} logged in", user.id);
        self.respond(user)
    }

    fn respond(&self, user: User) -> Result<AuthResponse, AppError> {
        let issued = self.jwt.issue(user.id, user.role)?;
        Ok(AuthResponse {
            user,
            token: issued.token,
            expires_in: issued.expires_in,
            token_type: "Bearer",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_models::user::DoctorDetails;

    fn patient_request() -> RegisterRequest {
        RegisterRequest {
            full_name: "Pat Example".to_string(),
            email: "  Pat@Example.COM ".to_string(),
            password: "secret1".to_string(),
            role: "Patient".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a.b@clinic.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn test_patient_registration_normalizes_email_and_defaults_profile() {
        let (role, email, profile) = validate_registration(&patient_request()).unwrap();
        assert_eq!(role, Role::Patient);
        assert_eq!(email, "pat@example.com");
        assert_matches!(profile, NewProfile::Patient(_));
    }

    #[test]
    fn test_registration_rejections() {
        let mut request = patient_request();
        request.password = "12345".to_string();
        assert_eq!(validate_registration(&request).unwrap_err(), RegistrationError::PasswordTooShort(6));

        let mut request = patient_request();
        request.role = "admin".to_string();
        assert_eq!(validate_registration(&request).unwrap_err(), RegistrationError::InvalidRole);

        let mut request = patient_request();
        request.full_name = "   ".to_string();
        assert_eq!(validate_registration(&request).unwrap_err(), RegistrationError::MissingFullName);
    }

    #[test]
    fn test_doctor_needs_speciality() {
        let mut request = patient_request();
        request.role = "doctor".to_string();
        assert_eq!(validate_registration(&request).unwrap_err(), RegistrationError::MissingSpeciality);

        request.doctor_profile = Some(DoctorDetails {
            speciality: "Cardiology".to_string(),
            ..Default::default()
        });
        assert_matches!(validate_registration(&request), Ok((Role::Doctor, _, NewProfile::Doctor(_))));
    }
}
