use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use shared_config::{AppConfig, StoreBackend};
use shared_database::{ClinicStore, MemoryStore, DISEASE_CATALOG};
use shared_models::auth::{JwtClaims, Role};
use shared_models::user::{DoctorDetails, NewProfile, NewUser, PatientDetails, User};

use crate::password::hash_password;
use crate::state::AppState;

/// Password shared by every seeded test user.
pub const TEST_PASSWORD: &str = "password123";

fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).expect("hash test password"))
}

pub struct TestConfig {
    pub jwt_secret: String,
    pub ml_service_url: String,
    pub upload_dir: PathBuf,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            ml_service_url: "http://localhost:8000".to_string(),
            upload_dir: std::env::temp_dir().join("clinic-test-uploads"),
        }
    }
}

impl TestConfig {
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    pub fn with_ml_service_url(mut self, url: impl Into<String>) -> Self {
        self.ml_service_url = url.into();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/clinic_test".to_string(),
            store_backend: StoreBackend::Memory,
            jwt_secret: self.jwt_secret.clone(),
            token_ttl: Duration::from_secs(3600),
            ml_service_url: self.ml_service_url.clone(),
            port: 0,
            upload_dir: self.upload_dir.clone(),
        }
    }

    /// Application state over a fresh in-memory store with the disease
    /// catalog seeded.
    pub async fn build_state(&self) -> AppState {
        let store = MemoryStore::new();
        store
            .seed_diseases(&DISEASE_CATALOG)
            .await
            .expect("seed disease catalog");
        AppState::new(self.to_app_config(), Arc::new(store))
    }
}

pub struct TestUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            email: email.to_lowercase(),
            full_name: format!("Test {}", role),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::Patient)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn named(mut self, full_name: &str) -> Self {
        self.full_name = full_name.to_string();
        self
    }

    /// Persists the user (with a profile matching its role) whose password
    /// is [`TEST_PASSWORD`].
    pub async fn insert(&self, state: &AppState) -> User {
        let profile = match self.role {
            Role::Doctor => NewProfile::Doctor(DoctorDetails {
                speciality: "General Practice".to_string(),
                ..Default::default()
            }),
            Role::Patient => NewProfile::Patient(PatientDetails::default()),
            Role::Admin => NewProfile::None,
        };

        state
            .store
            .create_user(NewUser {
                email: self.email.clone(),
                password_hash: test_password_hash().to_string(),
                full_name: self.full_name.clone(),
                phone: String::new(),
                role: self.role,
                profile,
            })
            .await
            .expect("insert test user")
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    /// Token for `user` signed the way the API signs them.
    pub fn token_for(state: &AppState, user: &User) -> String {
        state.jwt.issue(user.id, user.role).expect("issue test token").token
    }

    pub fn create_test_token(user_id: Uuid, role: Role, secret: &str, exp_hours: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user_id,
            role,
            iat: now.max(0) as u64,
            exp: (now + exp_hours * 3600).max(0) as u64,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .expect("encode test token")
    }

    pub fn create_expired_token(user: &User, secret: &str) -> String {
        Self::create_test_token(user.id, user.role, secret, -1)
    }

    pub fn create_invalid_signature_token(user: &User) -> String {
        Self::create_test_token(user.id, user.role, "wrong-secret", 24)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_is_seeded() {
        let state = TestConfig::default().build_state().await;
        let diseases = state.store.list_diseases().await.unwrap();
        assert_eq!(diseases.len(), DISEASE_CATALOG.len());
    }

    #[tokio::test]
    async fn test_inserted_users_get_role_profiles() {
        let state = TestConfig::default().build_state().await;

        let doctor = TestUser::doctor("Doc@Example.com").insert(&state).await;
        assert_eq!(doctor.email, "doc@example.com");
        assert!(doctor.doctor_profile.is_some());

        let admin = TestUser::admin("admin@example.com").insert(&state).await;
        assert!(admin.doctor_profile.is_none() && admin.patient_profile.is_none());
    }

    #[tokio::test]
    async fn test_issued_token_validates() {
        let state = TestConfig::default().build_state().await;
        let patient = TestUser::patient("p@example.com").insert(&state).await;

        let token = JwtTestUtils::token_for(&state, &patient);
        assert_eq!(state.jwt.validate_token(&token).unwrap().sub, patient.id);

        let expired = JwtTestUtils::create_expired_token(&patient, &state.config.jwt_secret);
        assert!(state.jwt.validate_token(&expired).is_err());
    }
}
