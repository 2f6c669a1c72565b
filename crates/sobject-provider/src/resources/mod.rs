//! # Resource Types
//!
//! The remote record types this provider manages. Each type is a schema plus
//! its [`RemoteType`](sobject_framework::RemoteType) and
//! [`ManagedResource`](sobject_framework::ManagedResource) implementations;
//! all behaviour lives in the framework's reconciler.
//!
//! | Type | Notes |
//! |------|-------|
//! | [`Account`] | `type` must be `Customer`, `Prospect` or `Partner` when set |
//! | [`User`] | locale and encoding defaults; deactivated instead of deleted |
//! | [`UserRole`] | optional parent role |
//! | [`Profile`] | user license fixed at creation; sticky `created_date` |

mod account;
mod profile;
mod user;
mod user_role;

pub use account::{Account, ACCOUNT_TYPES};
pub use profile::Profile;
pub use user::{
    User, DEFAULT_EMAIL_ENCODING_KEY, DEFAULT_LANGUAGE_LOCALE_KEY, DEFAULT_LOCALE_SID_KEY,
    DEFAULT_TIME_ZONE_SID_KEY,
};
pub use user_role::UserRole;

#[cfg(test)]
mod tests {
    use super::*;
    use sobject_framework::mock::{Call, MockStore};
    use sobject_framework::{
        AttributeKind, AttributeValues, Cancellation, DeleteStrategy, ManagedResource, PlanValue,
        Reconciler, ReconcileError, Representation, ResourceInstance, UpdateOutcome,
    };

    fn user_config() -> AttributeValues {
        AttributeValues::new()
            .with("alias", "jsmith")
            .with("email", "jsmith@example.com")
            .with("last_name", "Smith")
            .with("profile_id", "00e000000000001")
            .with("username", "jsmith@example.com.dev")
    }

    #[test]
    fn test_account_type_must_be_allowed() {
        let reconciler = Reconciler::new(Account::new(), ());
        let config = AttributeValues::new().with("name", "Acme").with("type", "Vendor");
        let Err(ReconcileError::Validation(violations)) = reconciler.validate(&config) else {
            panic!("expected a validation error");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.0[0].summary, "Invalid string");

        let config = AttributeValues::new().with("name", "Acme").with("type", "Partner");
        assert!(reconciler.validate(&config).is_ok());
    }

    #[test]
    fn test_user_email_fields_are_validated() {
        let reconciler = Reconciler::new(User::new(), ());
        let config = user_config().with("email", "not-an-email");
        let Err(ReconcileError::Validation(violations)) = reconciler.validate(&config) else {
            panic!("expected a validation error");
        };
        assert_eq!(violations.0[0].attribute, "email");
        assert_eq!(violations.0[0].summary, "Invalid email address");
    }

    #[test]
    fn test_user_defaults_are_planned() {
        let reconciler = Reconciler::new(User::new(), ());
        let mut instance = ResourceInstance::new(User::TYPE_NAME);
        let plan = reconciler.plan(&mut instance, &user_config()).unwrap();

        let resolved = plan.resolved();
        assert_eq!(resolved.get("email_encoding_key"), &PlanValue::known("UTF-8"));
        assert_eq!(resolved.get("language_locale_key"), &PlanValue::known("en_US"));
        assert_eq!(resolved.get("locale_sid_key"), &PlanValue::known("en_US"));
        assert_eq!(
            resolved.get("time_zone_sid_key"),
            &PlanValue::known("America/New_York")
        );
        assert_eq!(resolved.get("reset_password"), &PlanValue::known(false));
        assert_eq!(resolved.get("user_role_id"), &PlanValue::Null);
    }

    #[tokio::test]
    async fn test_user_create_payload() {
        let mock = MockStore::new();
        mock.expect_insert(User::TYPE_NAME)
            .return_ok("005000000000001".to_string());
        let reconciler = Reconciler::new(User::new(), mock.client());

        let mut instance = ResourceInstance::new(User::TYPE_NAME);
        reconciler
            .create(&mut instance, &user_config(), &Cancellation::none())
            .await
            .unwrap();

        let expected = Representation::new()
            .with("Alias", "jsmith")
            .with("Email", "jsmith@example.com")
            .with("EmailEncodingKey", "UTF-8")
            .with("LanguageLocaleKey", "en_US")
            .with("LastName", "Smith")
            .with("LocaleSidKey", "en_US")
            .with("ProfileId", "00e000000000001AAA")
            .with("TimeZoneSidKey", "America/New_York")
            .with("Username", "jsmith@example.com.dev");
        let Call::Insert { fields, .. } = &mock.calls()[0] else {
            panic!("expected an insert");
        };
        assert_eq!(fields, &expected);
        assert_eq!(
            instance.state().get("profile_id"),
            &PlanValue::known("00e000000000001AAA")
        );
        assert_eq!(instance.state().get("reset_password"), &PlanValue::known(false));
        mock.verify();
    }

    #[tokio::test]
    async fn test_reset_password_is_never_sent() {
        let mock = MockStore::new();
        let reconciler = Reconciler::new(User::new(), mock.client());

        let state = user_config()
            .with("profile_id", "00e000000000001AAA")
            .with("email_encoding_key", DEFAULT_EMAIL_ENCODING_KEY)
            .with("language_locale_key", DEFAULT_LANGUAGE_LOCALE_KEY)
            .with("locale_sid_key", DEFAULT_LOCALE_SID_KEY)
            .with("time_zone_sid_key", DEFAULT_TIME_ZONE_SID_KEY)
            .with("reset_password", false);
        let mut instance =
            ResourceInstance::existing(User::TYPE_NAME, "005000000000001AAA".into(), state);

        let outcome = reconciler
            .update(
                &mut instance,
                &user_config().with("reset_password", true),
                &Cancellation::none(),
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated);
        assert_eq!(instance.state().get("reset_password"), &PlanValue::known(true));
        assert!(mock.calls().is_empty());
        mock.verify();
    }

    #[test]
    fn test_profile_license_is_immutable_identifier() {
        let profile = Profile::new();
        let license = profile.schema().attribute("user_license_id").unwrap();
        assert_eq!(license.kind, AttributeKind::Identifier);
        assert!(license.required && license.immutable);
        assert!(profile.schema().attribute("created_date").unwrap().is_computed());
    }

    #[test]
    fn test_only_users_are_deactivated() {
        assert_eq!(
            User::new().delete_strategy(),
            DeleteStrategy::Deactivate { field: "IsActive" }
        );
        assert_eq!(Account::new().delete_strategy(), DeleteStrategy::Delete);
        assert_eq!(UserRole::new().delete_strategy(), DeleteStrategy::Delete);
        assert_eq!(Profile::new().delete_strategy(), DeleteStrategy::Delete);
    }
}
