use sobject_framework::{Attribute, ManagedResource, RemoteType, ResourceSchema};

/// A permission profile.
///
/// Its user license is fixed at creation. Changing it fails the update with
/// `RequiresReplacement`, so the host has to replace the profile. A profile
/// that is still assigned to a user cannot be deleted remotely.
#[derive(Debug, Clone)]
pub struct Profile {
    schema: ResourceSchema,
}

impl Profile {
    pub const TYPE_NAME: &'static str = "Profile";

    pub fn new() -> Self {
        let schema = ResourceSchema::new("Profile Resource for the Salesforce Provider")
            .with(Attribute::plain("name", "Name").required())
            .with(Attribute::plain("description", "Description"))
            .with(
                Attribute::identifier("user_license_id", "UserLicenseId")
                    .required()
                    .immutable(),
            )
            .with(Attribute::computed("created_date", "CreatedDate"));
        Self { schema }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteType for Profile {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl ManagedResource for Profile {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }
}
