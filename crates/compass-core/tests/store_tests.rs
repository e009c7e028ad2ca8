mod common;

use std::sync::Arc;

use common::{create_test_store, submittable_data};
use compass_core::{
    models::{ApprovalStatus, PlanStatus, PlanSummary, WizardData, WizardUpdate},
    params::{CreatePlan, ListPlans},
    CompassError, DraftStore, FileDraftStore, LaunchParams, PlanBackend, PlanFilter, Wizard,
    WizardContext,
};

fn template_params(name: &str) -> CreatePlan {
    CreatePlan {
        data: WizardData {
            name_en: name.to_string(),
            ..Default::default()
        },
        last_saved_step: 1,
        is_template: true,
        is_public: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_store_lifecycle() {
    let (_temp_dir, store) = create_test_store().await;

    let plan = store
        .create_plan(&CreatePlan {
            owner_id: Some("analyst".to_string()),
            data: submittable_data(3, 1),
            last_saved_step: 1,
            ..Default::default()
        })
        .await
        .expect("Failed to create plan");
    assert_eq!(plan.version_number, 1);
    assert_eq!(plan.status, PlanStatus::Draft);
    assert_eq!(plan.approval_status, ApprovalStatus::Draft);

    let fetched = store.get_live_plan(plan.id).await.expect("Plan should exist");
    assert_eq!(fetched.data, plan.data);

    let deleted = store.soft_delete_plan(plan.id).await.expect("Failed to delete");
    assert!(deleted.is_deleted);
    assert!(deleted.deleted_at.is_some());
    assert!(matches!(
        store.get_live_plan(plan.id).await,
        Err(CompassError::PlanNotFound { .. })
    ));
    // The row survives in the recycle bin
    assert!(store.get_plan(plan.id).await.unwrap().is_some());

    let bin = store
        .list_plans(&PlanFilter::from(&ListPlans {
            deleted: true,
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(bin.len(), 1);

    let restored = store.restore_plan(plan.id).await.expect("Failed to restore");
    assert!(!restored.is_deleted);
    assert!(restored.deleted_at.is_none());
}

#[tokio::test]
async fn test_templates_are_listed_separately() {
    let (_temp_dir, store) = create_test_store().await;

    let template = store
        .create_plan(&template_params("Smart Mobility Template"))
        .await
        .unwrap();
    store
        .create_plan(&CreatePlan {
            data: submittable_data(0, 0),
            last_saved_step: 1,
            ..Default::default()
        })
        .await
        .unwrap();

    let templates = store.list_plans(&PlanFilter::templates()).await.unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates[0].id, template.id);

    let plans = store
        .list_plans(&PlanFilter::from(&ListPlans::default()))
        .await
        .unwrap();
    assert_eq!(plans.len(), 1);
    assert!(!plans[0].is_template);

    assert_eq!(
        store.get_template(template.id).await.unwrap().title(),
        "Smart Mobility Template"
    );
    assert!(matches!(
        store.get_template(plans[0].id).await,
        Err(CompassError::TemplateNotFound { .. })
    ));
}

#[tokio::test]
async fn test_list_filters_by_name_and_owner() {
    let (_temp_dir, store) = create_test_store().await;

    for (name, owner) in [
        ("Riyadh Innovation", "alice"),
        ("Jeddah Innovation", "bob"),
        ("Dammam Mobility", "alice"),
    ] {
        store
            .create_plan(&CreatePlan {
                owner_id: Some(owner.to_string()),
                data: WizardData {
                    name_en: name.to_string(),
                    ..Default::default()
                },
                last_saved_step: 1,
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let innovation = store
        .list_plans(&PlanFilter::from(&ListPlans {
            name_contains: Some("innovation".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(innovation.len(), 2);

    let alice = store
        .list_plans(&PlanFilter::from(&ListPlans {
            owner: Some("alice".to_string()),
            ..Default::default()
        }))
        .await
        .unwrap();
    let names: Vec<_> = alice.iter().map(|p| p.title().to_string()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Dammam Mobility".to_string()));
}

#[tokio::test]
async fn test_wizard_session_over_sqlite() {
    let (temp_dir, store) = create_test_store().await;
    let drafts = Arc::new(FileDraftStore::new(temp_dir.path().join("draft.json")));
    let store = Arc::new(store);

    let context = WizardContext::new(store.clone(), drafts.clone()).with_user("analyst");
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    wizard.update_data(submittable_data(3, 1).to_full_update());
    let receipt = wizard.save_draft().await.unwrap();
    assert!(!drafts.path().exists(), "local slot removed after a remote save");

    let stored = store.get_live_plan(receipt.plan_id).await.unwrap();
    assert_eq!(stored.status, PlanStatus::Draft);
    let summary = PlanSummary::from(&stored);
    assert_eq!(summary.objective_count, 3);
    assert_eq!(summary.kpi_count, 1);

    // Reopen in edit mode, change the name and submit
    let context = WizardContext::new(store.clone(), drafts.clone());
    let mut wizard = Wizard::open(context, &LaunchParams::edit(receipt.plan_id))
        .await
        .unwrap();
    wizard.update_data(WizardUpdate {
        name_en: Some("Smart City 2040".to_string()),
        ..Default::default()
    });
    let submitted = wizard.submit().await.unwrap();

    assert_eq!(submitted.id, receipt.plan_id);
    assert_eq!(submitted.version_number, 2);
    assert_eq!(submitted.approval_status, ApprovalStatus::Pending);
    assert_eq!(submitted.data.name_en, "Smart City 2040");
    assert!(submitted.draft_data.is_none());
    assert!(submitted.submitted_at.is_some());
    assert!(drafts.load().unwrap().is_none());
}
