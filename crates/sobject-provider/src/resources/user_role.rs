use sobject_framework::{Attribute, ManagedResource, RemoteType, ResourceSchema};

#[derive(Debug, Clone)]
pub struct UserRole {
    schema: ResourceSchema,
}

impl UserRole {
    pub const TYPE_NAME: &'static str = "UserRole";

    pub fn new() -> Self {
        let schema = ResourceSchema::new("User Role Resource for the Salesforce Provider")
            .with(Attribute::plain("name", "Name").required())
            .with(Attribute::plain("developer_name", "DeveloperName").required())
            .with(Attribute::identifier("parent_role_id", "ParentRoleId"));
        Self { schema }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteType for UserRole {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

impl ManagedResource for UserRole {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }
}
