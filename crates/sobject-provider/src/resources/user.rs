use sobject_framework::{
    Attribute, DeleteStrategy, ManagedResource, RemoteType, ResourceSchema, ValidationRule,
};

pub const DEFAULT_EMAIL_ENCODING_KEY: &str = "UTF-8";
pub const DEFAULT_LANGUAGE_LOCALE_KEY: &str = "en_US";
pub const DEFAULT_LOCALE_SID_KEY: &str = "en_US";
pub const DEFAULT_TIME_ZONE_SID_KEY: &str = "America/New_York";

/// A login user.
///
/// Users cannot be deleted remotely. Removing one from configuration sets
/// `IsActive` to false and stops tracking it.
///
/// `reset_password` is a local switch: it is tracked in state but never
/// written to the `User` record.
#[derive(Debug, Clone)]
pub struct User {
    schema: ResourceSchema,
}

impl User {
    pub const TYPE_NAME: &'static str = "User";

    pub fn new() -> Self {
        let schema = ResourceSchema::new("User Resource for the Salesforce Provider")
            .with(Attribute::plain("alias", "Alias").required())
            .with(
                Attribute::plain("email", "Email")
                    .required()
                    .validate(ValidationRule::Email),
            )
            .with(
                Attribute::plain("email_encoding_key", "EmailEncodingKey")
                    .default_value(DEFAULT_EMAIL_ENCODING_KEY),
            )
            .with(
                Attribute::plain("language_locale_key", "LanguageLocaleKey")
                    .default_value(DEFAULT_LANGUAGE_LOCALE_KEY),
            )
            .with(Attribute::plain("last_name", "LastName").required())
            .with(
                Attribute::plain("locale_sid_key", "LocaleSidKey")
                    .default_value(DEFAULT_LOCALE_SID_KEY),
            )
            .with(Attribute::identifier("profile_id", "ProfileId").required())
            .with(
                Attribute::plain("time_zone_sid_key", "TimeZoneSidKey")
                    .default_value(DEFAULT_TIME_ZONE_SID_KEY),
            )
            .with(
                Attribute::plain("username", "Username")
                    .required()
                    .validate(ValidationRule::Email),
            )
            .with(Attribute::identifier("user_role_id", "UserRoleId"))
            .with(Attribute::boolean("reset_password", "ResetPassword").local());
        Self { schema }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteType for User {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl ManagedResource for User {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    fn delete_strategy(&self) -> DeleteStrategy {
        DeleteStrategy::Deactivate { field: "IsActive" }
    }
}
