use sobject_framework::mock::{Call, MockStore};
use sobject_framework::{
    Attribute, AttributeValues, Cancellation, ManagedResource, Phase, PlanValue, ReadOutcome,
    RecordStore, Reconciler, ReconcileError, RemoteStore, RemoteType, Representation,
    ResourceInstance, ResourceSchema, UpdateOutcome, ValidationRule,
};
use std::sync::Arc;

struct Account {
    schema: ResourceSchema,
}

impl Account {
    fn new() -> Self {
        Self {
            schema: ResourceSchema::new("An account")
                .with(
                    Attribute::plain("name", "Name")
                        .required()
                        .validate(ValidationRule::NonEmpty),
                )
                .with(Attribute::plain("type", "Type").validate(ValidationRule::optional_one_of(
                    &["Customer", "Prospect", "Partner"],
                )))
                .with(Attribute::plain("phone", "Phone"))
                .with(Attribute::computed("created_date", "CreatedDate")),
        }
    }
}

impl RemoteType for Account {
    fn type_name(&self) -> &'static str {
        "Account"
    }
}

impl ManagedResource for Account {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }
}

/// Create with a null attribute: the attribute is left out of the insert.
#[tokio::test]
async fn test_create_scenario_with_scripted_store() {
    let mock = MockStore::new();
    mock.expect_insert("Account").return_ok("001XYZ".to_string());
    let reconciler = Reconciler::new(Account::new(), mock.client());

    let mut instance = ResourceInstance::new("Account");
    let config = AttributeValues::new().with("name", "Acme").with_null("type");
    let plan = reconciler.plan(&mut instance, &config).unwrap();
    assert_eq!(plan.attribute("type").unwrap().resolved, PlanValue::Null);

    reconciler
        .create(&mut instance, &config, &Cancellation::none())
        .await
        .unwrap();

    assert_eq!(instance.phase(), Phase::Created);
    assert_eq!(instance.identifier(), Some("001XYZ"));
    let Call::Insert { fields, .. } = &mock.calls()[0] else {
        panic!("expected an insert");
    };
    assert!(!fields.contains("Type"));
    mock.verify();
}

/// A record deleted behind our back is dropped from tracking on read.
#[tokio::test]
async fn test_read_after_remote_delete_removes_instance() {
    let (store, client) = RecordStore::new(10);
    tokio::spawn(store.run());
    let reconciler = Reconciler::new(Account::new(), client.clone());

    let mut instance = ResourceInstance::new("Account");
    reconciler
        .create(
            &mut instance,
            &AttributeValues::new().with("name", "Acme"),
            &Cancellation::none(),
        )
        .await
        .expect("Failed to create account");
    let id = instance.identifier().expect("No identifier").to_string();

    client.delete("Account", &id).await.unwrap();

    let outcome = reconciler
        .read(&mut instance, &Cancellation::none())
        .await
        .expect("Read must not fail on a missing record");
    assert_eq!(outcome, ReadOutcome::Removed);
    assert_eq!(instance.phase(), Phase::Removed);
}

/// Only the changed attribute reaches the store.
#[tokio::test]
async fn test_update_sends_single_changed_field() {
    let (store, client) = RecordStore::new(10);
    tokio::spawn(store.run());
    let reconciler = Reconciler::new(Account::new(), client.clone());

    let mut instance = ResourceInstance::new("Account");
    let config = AttributeValues::new()
        .with("name", "Acme")
        .with("type", "Customer")
        .with("phone", "555-0100");
    reconciler
        .create(&mut instance, &config, &Cancellation::none())
        .await
        .unwrap();
    reconciler
        .read(&mut instance, &Cancellation::none())
        .await
        .unwrap();
    assert!(instance.state().get("created_date").as_str().is_some());

    let config = config.with("phone", "555-0199");
    let plan = reconciler.plan(&mut instance.clone(), &config).unwrap();
    let changes: Vec<&str> = plan.changes().map(|a| a.name).collect();
    assert_eq!(changes, vec!["phone"]);

    let outcome = reconciler
        .update(&mut instance, &config, &Cancellation::none())
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    let id = instance.identifier().unwrap();
    let remote = client
        .get("Account", id, Some(&["Name", "Phone", "Type"]))
        .await
        .unwrap();
    assert_eq!(
        remote,
        Representation::new()
            .with("Name", "Acme")
            .with("Phone", "555-0199")
            .with("Type", "Customer")
    );

    let outcome = reconciler
        .update(&mut instance, &config, &Cancellation::none())
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Unchanged);
}

/// The sticky computed attribute survives later reads.
#[tokio::test]
async fn test_import_and_sticky_created_date() {
    let (mut store, client) = RecordStore::new(10);
    let id = store.seed("Account", Representation::new().with("Name", "Seeded"));
    tokio::spawn(store.run());
    let reconciler = Reconciler::new(Account::new(), client.clone());

    let mut instance = reconciler
        .import(&id[..15], &Cancellation::none())
        .await
        .expect("Failed to import");
    assert_eq!(instance.identifier(), Some(id.as_str()));
    assert_eq!(instance.state().get("name"), &PlanValue::known("Seeded"));
    let created = instance.state().get("created_date").clone();
    assert!(created.as_str().is_some());

    client
        .update(
            "Account",
            &id,
            Representation::new().with("CreatedDate", "1999-01-01T00:00:00.000Z"),
        )
        .await
        .unwrap();
    reconciler
        .read(&mut instance, &Cancellation::none())
        .await
        .unwrap();
    assert_eq!(instance.state().get("created_date"), &created);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let (store, client) = RecordStore::new(10);
    tokio::spawn(store.run());
    let reconciler = Reconciler::new(Account::new(), client.clone());

    let mut instance = ResourceInstance::new("Account");
    reconciler
        .create(
            &mut instance,
            &AttributeValues::new().with("name", "Acme"),
            &Cancellation::none(),
        )
        .await
        .unwrap();
    let id = instance.identifier().unwrap().to_string();
    let mut stale = instance.clone();

    reconciler
        .delete(&mut instance, &Cancellation::none())
        .await
        .unwrap();
    assert!(client.get("Account", &id, None).await.unwrap_err().is_not_found());

    // A second delete of the same record counts as success.
    reconciler
        .delete(&mut stale, &Cancellation::none())
        .await
        .unwrap();
    assert_eq!(stale.phase(), Phase::Deleted);
}

#[tokio::test]
async fn test_cancelled_create_leaves_no_identifier() {
    let mock = MockStore::new();
    mock.expect_insert("Account").hang();
    let reconciler = Reconciler::new(Account::new(), mock.client());
    let (handle, cancel) = Cancellation::new();

    let mut instance = ResourceInstance::new("Account");
    let config = AttributeValues::new().with("name", "Acme");
    let (result, _) = tokio::join!(reconciler.create(&mut instance, &config, &cancel), async {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        handle.cancel();
    });

    assert_eq!(result, Err(ReconcileError::Cancelled));
    assert_eq!(instance, ResourceInstance::new("Account"));
}

/// One reconciler shared by concurrent tasks, each with its own instance.
#[tokio::test]
async fn test_concurrent_instances_share_one_reconciler() {
    let (store, client) = RecordStore::new(32);
    tokio::spawn(store.run());
    let reconciler = Arc::new(Reconciler::new(Account::new(), client.clone()));

    let mut handles = Vec::new();
    for i in 0..10 {
        let reconciler = reconciler.clone();
        handles.push(tokio::spawn(async move {
            let mut instance = ResourceInstance::new("Account");
            let config = AttributeValues::new().with("name", format!("Account {}", i));
            reconciler
                .create(&mut instance, &config, &Cancellation::none())
                .await
                .map(|_| instance)
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let instance = handle.await.unwrap().expect("Failed to create");
        ids.push(instance.identifier().unwrap().to_string());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}
