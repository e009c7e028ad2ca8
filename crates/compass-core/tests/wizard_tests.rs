mod common;

use std::time::Duration;

use common::{submittable_data, test_context, RecordingBackend};
use compass_core::{
    autosave::LocalDraft,
    models::{PlanStatus, WizardData, WizardUpdate},
    params::UpdatePlan,
    wizard::Hydration,
    CompassError, DraftStore, LaunchParams, NoticeLevel, PlanBackend, Wizard, WizardMode,
};
use tokio::time::sleep;

const SETTLE: Duration = Duration::from_secs(5);

fn name_update(name: &str) -> WizardUpdate {
    WizardUpdate {
        name_en: Some(name.to_string()),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_updates_merge_last_write_wins() {
    let backend = RecordingBackend::new();
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();

    assert!(wizard.update_data(name_update("First name")));
    assert!(wizard.update_data(WizardUpdate {
        vision_en: Some("Innovative services".to_string()),
        ..Default::default()
    }));
    assert!(wizard.update_data(name_update("Final name")));
    assert!(!wizard.update_data(WizardUpdate::default()));

    assert_eq!(wizard.data().name_en, "Final name");
    assert_eq!(wizard.data().vision_en, "Innovative services");

    sleep(SETTLE).await;
    assert_eq!(backend.writes(), 1);
    let plan = backend.plan(1).unwrap();
    assert_eq!(plan.data.name_en, "Final name");
    assert_eq!(plan.owner_id.as_deref(), Some("planner@municipality.gov"));
}

#[tokio::test(start_paused = true)]
async fn test_handle_next_validates_step_one() {
    let backend = RecordingBackend::new();
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();

    assert!(!wizard.handle_next());
    assert_eq!(wizard.current_step(), 1);
    let notices = wizard.take_notices();
    assert!(notices
        .iter()
        .all(|n| n.level == NoticeLevel::Error));
    let messages: Vec<_> = notices.iter().map(|n| n.message.as_str()).collect();
    assert!(messages.contains(&"Plan name is required"));

    wizard.update_data(WizardUpdate {
        name_en: Some("Smart City 2030".to_string()),
        description_en: Some("Digital services".to_string()),
        ..Default::default()
    });
    assert!(wizard.handle_next());
    assert_eq!(wizard.current_step(), 2);
    assert!(wizard.completed_steps().contains(&1));
}

#[tokio::test(start_paused = true)]
async fn test_handle_next_never_duplicates_completed_steps() {
    let backend = RecordingBackend::new();
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    wizard.update_data(submittable_data(3, 1).to_full_update());

    assert!(wizard.handle_next());
    assert!(wizard.handle_back());
    assert!(wizard.handle_next());
    assert!(wizard.handle_back());
    assert!(!wizard.handle_back(), "already on the first step");
    assert!(wizard.handle_next());

    assert_eq!(wizard.completed_steps().iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(wizard.current_step(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_last_step_stays_in_place() {
    let backend = RecordingBackend::new();
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();

    wizard.go_to_step(18).unwrap();
    assert!(wizard.handle_next());
    assert_eq!(wizard.current_step(), 18);
    assert!(wizard.completed_steps().contains(&18));

    assert!(wizard.go_to_step(0).is_err());
    assert!(wizard.go_to_step(19).is_err());
    assert_eq!(wizard.current_step(), 18);
}

#[tokio::test(start_paused = true)]
async fn test_review_mode_is_read_only() {
    let backend = RecordingBackend::new();
    let plan = backend.insert(submittable_data(3, 1), false);
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::review(plan.id)).await.unwrap();

    assert_eq!(wizard.mode(), WizardMode::Review);
    assert!(wizard.is_read_only());
    assert!(!wizard.update_data(name_update("Changed")));
    assert_eq!(wizard.data().name_en, "Smart City 2030");

    assert!(wizard.handle_next());
    assert!(matches!(wizard.save_draft().await, Err(CompassError::ReadOnly)));
    assert!(matches!(wizard.submit().await, Err(CompassError::ReadOnly)));

    sleep(SETTLE).await;
    assert_eq!(backend.writes(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_submit_rejects_two_objectives() {
    let backend = RecordingBackend::new();
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    wizard.update_data(submittable_data(2, 1).to_full_update());

    let Err(CompassError::SubmissionBlocked { errors }) = wizard.submit().await else {
        panic!("submission should be blocked");
    };
    assert!(errors.contains(&"At least 3 objectives required".to_string()));
    assert!(wizard
        .take_notices()
        .iter()
        .any(|n| n.level == NoticeLevel::Error && n.message == "At least 3 objectives required"));
}

#[tokio::test(start_paused = true)]
async fn test_submit_new_plan() {
    let backend = RecordingBackend::new();
    let (context, drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    wizard.update_data(submittable_data(3, 1).to_full_update());
    wizard.go_to_step(18).unwrap();

    let plan = wizard.submit().await.unwrap();
    assert_eq!(plan.status, PlanStatus::Active);
    assert_eq!(plan.version_number, 1);
    assert!(plan.submitted_at.is_some());
    assert_eq!(plan.data.objectives.len(), 3);
    assert_eq!(wizard.plan_id(), Some(plan.id));
    assert!(wizard
        .take_notices()
        .iter()
        .any(|n| n.message == "Plan submitted for approval"));

    sleep(SETTLE).await;
    assert_eq!(backend.writes(), 1, "pending auto-save folded into the submit");
    assert!(drafts.load().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_edit_mode_submit_bumps_version() {
    let backend = RecordingBackend::new();
    let plan = backend.insert(submittable_data(3, 2), false);
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::edit(plan.id)).await.unwrap();

    assert_eq!(wizard.mode(), WizardMode::Edit);
    assert_eq!(wizard.hydration(), &Hydration::FromPlan { plan_id: plan.id });
    wizard.update_data(name_update("Smart City 2035"));
    wizard.save_draft().await.unwrap();

    let stored = backend.plan(plan.id).unwrap();
    assert_eq!(stored.data.name_en, "Smart City 2030", "drafts leave committed data alone");
    assert_eq!(stored.working_data().name_en, "Smart City 2035");

    let submitted = wizard.submit().await.unwrap();
    assert_eq!(submitted.version_number, 2);
    assert_eq!(submitted.data.name_en, "Smart City 2035");
    assert!(submitted.draft_data.is_none());
    assert_eq!(wizard.save_status().version_number, Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_open_applies_draft_overlay_and_saved_step() {
    let backend = RecordingBackend::new();
    let plan = backend.insert(submittable_data(3, 1), false);
    backend
        .update_plan(&UpdatePlan {
            id: plan.id,
            draft_data: Some(Some(WizardUpdate {
                vision_en: Some("Draft vision".to_string()),
                ..Default::default()
            })),
            last_saved_step: Some(7),
            ..Default::default()
        })
        .await
        .unwrap();
    let (context, _drafts) = test_context(&backend);

    let wizard = Wizard::open(context, &LaunchParams::edit(plan.id)).await.unwrap();
    assert_eq!(wizard.data().vision_en, "Draft vision");
    assert_eq!(wizard.data().name_en, "Smart City 2030");
    assert_eq!(wizard.current_step(), 7);
    assert_eq!(wizard.plan_id(), Some(plan.id));
}

#[tokio::test(start_paused = true)]
async fn test_template_seeds_a_new_plan() {
    let backend = RecordingBackend::new();
    let template = backend.insert(
        WizardData {
            name_en: "Municipal Innovation Template".to_string(),
            vision_en: "Template vision".to_string(),
            ..Default::default()
        },
        true,
    );
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::from_template(template.id))
        .await
        .unwrap();

    assert_eq!(wizard.mode(), WizardMode::Create);
    assert_eq!(
        wizard.hydration(),
        &Hydration::FromTemplate {
            template_id: template.id
        }
    );
    assert_eq!(wizard.data().vision_en, "Template vision");
    assert_eq!(wizard.plan_id(), None);

    wizard.update_data(name_update("Jeddah Innovation Plan"));
    sleep(SETTLE).await;

    let created = wizard.plan_id().expect("a new plan is created");
    assert_ne!(created, template.id);
    let plan = backend.plan(created).unwrap();
    assert!(!plan.is_template);
    assert_eq!(plan.data.vision_en, "Template vision");
    assert_eq!(
        backend.plan(template.id).unwrap().data.name_en,
        "Municipal Innovation Template"
    );
}

#[tokio::test(start_paused = true)]
async fn test_open_rejects_missing_sources() {
    let backend = RecordingBackend::new();
    let plan = backend.insert(WizardData::default(), false);

    let (context, _drafts) = test_context(&backend);
    let result = Wizard::open(context, &LaunchParams::edit(99)).await;
    assert!(matches!(result, Err(CompassError::PlanNotFound { id: 99 })));

    let (context, _drafts) = test_context(&backend);
    let result = Wizard::open(context, &LaunchParams::from_template(plan.id)).await;
    assert!(matches!(result, Err(CompassError::TemplateNotFound { .. })));

    backend.soft_delete_plan(plan.id).await.unwrap();
    let (context, _drafts) = test_context(&backend);
    let result = Wizard::open(context, &LaunchParams::edit(plan.id)).await;
    assert!(matches!(result, Err(CompassError::PlanNotFound { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_local_draft_recovery() {
    let backend = RecordingBackend::new();
    let (context, drafts) = test_context(&backend);
    drafts
        .save(&LocalDraft::new(submittable_data(1, 0), 4, None))
        .unwrap();

    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    assert!(wizard.hydration().recovery_pending());
    assert!(matches!(
        wizard.hydration(),
        Hydration::RecoveryAvailable { step: 4, plan_id: None, .. }
    ));
    assert!(wizard
        .take_notices()
        .iter()
        .any(|n| n.level == NoticeLevel::Info));
    assert!(wizard.data().name_en.is_empty(), "nothing loaded before the decision");

    assert!(wizard.recover_local_draft().await.unwrap());
    assert_eq!(wizard.data().name_en, "Smart City 2030");
    assert_eq!(wizard.current_step(), 4);
    assert_eq!(wizard.hydration(), &Hydration::Recovered { plan_id: None });

    sleep(SETTLE).await;
    assert_eq!(backend.writes(), 1);
    assert!(drafts.load().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_recovered_draft_resumes_its_plan() {
    let backend = RecordingBackend::new();
    let plan = backend.insert(submittable_data(3, 1), false);
    let (context, drafts) = test_context(&backend);
    let mut draft_data = submittable_data(3, 1);
    draft_data.mission_en = "Recovered mission".to_string();
    drafts
        .save(&LocalDraft::new(draft_data, 9, Some(plan.id)))
        .unwrap();

    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    assert!(wizard.recover_local_draft().await.unwrap());
    assert_eq!(wizard.mode(), WizardMode::Edit);
    assert_eq!(wizard.plan_id(), Some(plan.id));

    sleep(SETTLE).await;
    let update = backend.last_update().unwrap();
    assert_eq!(update.id, plan.id);
    assert_eq!(update.last_saved_step, Some(9));
    assert_eq!(
        backend.plan(plan.id).unwrap().working_data().mission_en,
        "Recovered mission"
    );
}

#[tokio::test(start_paused = true)]
async fn test_discard_local_draft() {
    let backend = RecordingBackend::new();
    let (context, drafts) = test_context(&backend);
    drafts
        .save(&LocalDraft::new(WizardData::default(), 2, None))
        .unwrap();

    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    wizard.discard_local_draft().unwrap();

    assert_eq!(wizard.hydration(), &Hydration::Fresh);
    assert!(drafts.load().unwrap().is_none());
    assert!(!wizard.recover_local_draft().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_save_failure_is_reported_and_retried() {
    let backend = RecordingBackend::new();
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    wizard.update_data(name_update("Unsaved"));

    backend.set_failing(true);
    assert!(wizard.save_draft().await.is_err());
    assert!(wizard
        .take_notices()
        .iter()
        .any(|n| n.level == NoticeLevel::Error));
    let status = wizard.save_status();
    assert!(status.has_pending);
    assert!(status.last_error.is_some());

    backend.set_failing(false);
    let receipt = wizard.save_draft().await.unwrap();
    assert_eq!(wizard.plan_id(), Some(receipt.plan_id));
    assert!(wizard
        .take_notices()
        .iter()
        .any(|n| n.message == "Draft saved"));
    assert_eq!(wizard.data().name_en, "Unsaved");
}

#[tokio::test(start_paused = true)]
async fn test_failed_submit_keeps_edits_recoverable() {
    let backend = RecordingBackend::new();
    let (context, drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    wizard.update_data(submittable_data(3, 1).to_full_update());

    backend.set_failing(true);
    assert!(wizard.submit().await.is_err());
    assert!(wizard
        .take_notices()
        .iter()
        .any(|n| n.level == NoticeLevel::Error));
    assert!(wizard.save_status().has_pending);
    let local = drafts.load().unwrap().expect("edits mirrored locally");
    assert_eq!(local.data.objectives.len(), 3);

    backend.set_failing(false);
    let receipt = wizard.flush().await.unwrap().expect("pending edits written");
    let stored = backend.plan(receipt.plan_id).unwrap();
    assert_eq!(stored.status, PlanStatus::Draft);
    assert_eq!(stored.working_data().name_en, "Smart City 2030");
    assert_eq!(stored.working_data().kpis.len(), 1);
    assert!(drafts.load().unwrap().is_none());

    let plan = wizard.submit().await.unwrap();
    assert_eq!(plan.id, receipt.plan_id);
    assert_eq!(plan.status, PlanStatus::Active);
}
