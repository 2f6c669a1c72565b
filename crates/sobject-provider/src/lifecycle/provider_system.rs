use crate::config::Credentials;
use crate::resources::{Account, Profile, User, UserRole};
use sobject_framework::{
    Cancellation, Lookup, LookupResult, RecordStore, RecordStoreClient, Reconciler, ReconcileError,
    Representation,
};
use tracing::{error, info};

/// User licenses every organisation starts with: `(LicenseDefinitionKey, Name)`.
pub const SEEDED_LICENSES: [(&str, &str); 3] = [
    ("SFDC", "Salesforce"),
    ("AUL", "Salesforce Platform"),
    ("PID_Chatter", "Chatter Free"),
];

/// Profiles every organisation starts with, all on the `SFDC` license.
pub const SEEDED_PROFILES: [&str; 2] = ["System Administrator", "Standard User"];

/// Starts the record store and hands out one reconciler per resource type.
///
/// All reconcilers share a single store client, created here and never
/// changed afterwards.
///
/// # Example
///
/// ```ignore
/// let system = ProviderSystem::new(&credentials, 32);
///
/// let mut account = ResourceInstance::new(Account::TYPE_NAME);
/// system.accounts.create(&mut account, &config, &Cancellation::none()).await?;
///
/// system.shutdown().await?;
/// ```
pub struct ProviderSystem {
    pub accounts: Reconciler<Account, RecordStoreClient>,
    pub users: Reconciler<User, RecordStoreClient>,
    pub user_roles: Reconciler<UserRole, RecordStoreClient>,
    pub profiles: Reconciler<Profile, RecordStoreClient>,
    store: RecordStoreClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ProviderSystem {
    /// Spawns the store actor with reference data already in place.
    ///
    /// `buffer_size` is the capacity of the store's request channel.
    pub fn new(credentials: &Credentials, buffer_size: usize) -> Self {
        info!(
            username = %credentials.username,
            login_url = %credentials.login_url,
            api_version = %credentials.api_version,
            "Configuring provider"
        );

        let (store, client) = RecordStore::new(buffer_size);
        let mut store = store.refuse_delete(User::TYPE_NAME);
        seed_reference_data(&mut store);
        let store_handle = tokio::spawn(store.run());

        Self {
            accounts: Reconciler::new(Account::new(), client.clone()),
            users: Reconciler::new(User::new(), client.clone()),
            user_roles: Reconciler::new(UserRole::new(), client.clone()),
            profiles: Reconciler::new(Profile::new(), client.clone()),
            store: client,
            handles: vec![store_handle],
        }
    }

    /// The shared store client.
    pub fn store(&self) -> &RecordStoreClient {
        &self.store
    }

    /// Runs a data source lookup against the store.
    pub async fn lookup(
        &self,
        lookup: &Lookup,
        value: &str,
        cancel: &Cancellation,
    ) -> Result<LookupResult, ReconcileError> {
        lookup.read_by(&self.store, value, cancel).await
    }

    /// Drops every store client and waits for the store to stop.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down provider...");

        drop(self.accounts);
        drop(self.users);
        drop(self.user_roles);
        drop(self.profiles);
        drop(self.store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("Provider shutdown complete.");
        Ok(())
    }
}

fn seed_reference_data(store: &mut RecordStore) {
    let mut sfdc_license = None;
    for (key, name) in SEEDED_LICENSES {
        let id = store.seed(
            "UserLicense",
            Representation::new()
                .with("LicenseDefinitionKey", key)
                .with("Name", name),
        );
        if key == "SFDC" {
            sfdc_license = Some(id);
        }
    }

    for name in SEEDED_PROFILES {
        let mut fields = Representation::new().with("Name", name);
        if let Some(license) = &sfdc_license {
            fields.insert("UserLicenseId", license.clone().into());
        }
        store.seed(Profile::TYPE_NAME, fields);
    }
}
