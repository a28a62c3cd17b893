use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::user::User;

/// The single permission check behind every protected operation.
///
/// Admins always pass. Otherwise the caller must hold `required` (when given)
/// and satisfy the ownership predicate.
pub fn authorize<F>(caller: &User, required: Option<Role>, owns: F) -> Result<(), AppError>
where
    F: FnOnce(&User) -> bool,
{
    if caller.is_admin() {
        return Ok(());
    }

    if let Some(role) = required {
        if caller.role != role {
            return Err(AppError::Forbidden("insufficient permissions".to_string()));
        }
    }

    if owns(caller) {
        Ok(())
    } else {
        Err(AppError::Forbidden("insufficient permissions".to_string()))
    }
}

/// Role-gate: passes the required role or admin.
pub fn require_role(caller: &User, role: Role) -> Result<(), AppError> {
    authorize(caller, Some(role), |_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", role),
            password_hash: String::new(),
            full_name: "Test".to_string(),
            phone: String::new(),
            role,
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            doctor_profile: None,
            patient_profile: None,
        }
    }

    #[test]
    fn test_role_gate_admits_role_or_admin() {
        assert!(require_role(&user(Role::Doctor), Role::Doctor).is_ok());
        assert!(require_role(&user(Role::Admin), Role::Doctor).is_ok());
        assert_matches!(require_role(&user(Role::Patient), Role::Doctor), Err(AppError::Forbidden(_)));
    }

    #[test]
    fn test_ownership_predicate_applies_to_non_admins() {
        let doctor = user(Role::Doctor);
        let other = Uuid::new_v4();

        assert!(authorize(&doctor, None, |u| u.id == doctor.id).is_ok());
        assert_matches!(authorize(&doctor, None, |u| u.id == other), Err(AppError::Forbidden(_)));
        assert!(authorize(&user(Role::Admin), Some(Role::Doctor), |_| false).is_ok());
    }
}
