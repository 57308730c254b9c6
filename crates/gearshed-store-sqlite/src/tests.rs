//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use gearshed_core::{
  material::{MaterialPatch, NewMaterial},
  movement::{MovementKind, NewMovement},
  store::{DeleteOutcome, InventoryStore},
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn any_user(s: &SqliteStore) -> User {
  s.add_user(NewUser {
    name:          "Alice".into(),
    email:         format!("{}@example.com", Uuid::new_v4()),
    password_hash: "$argon2id$stub".into(),
    role:          None,
  })
  .await
  .unwrap()
  .expect("fresh email")
}

async fn material(s: &SqliteStore, name: &str, quantity: i64, minimum: i64) -> gearshed_core::material::Material {
  s.add_material(NewMaterial {
    name: name.into(),
    quantity,
    minimum_quantity: minimum,
  })
  .await
  .unwrap()
}

fn loan(material_id: Uuid, user_id: Uuid, quantity: i64) -> NewMovement {
  NewMovement::new(material_id, user_id, MovementKind::Loan, quantity)
}

fn giveback(material_id: Uuid, user_id: Uuid, quantity: i64) -> NewMovement {
  NewMovement::new(material_id, user_id, MovementKind::Return, quantity)
}

// ─── Materials ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_material() {
  let s = store().await;

  let added = material(&s, "Cone", 10, 2).await;
  assert_eq!(added.name, "Cone");
  assert_eq!(added.quantity, 10);
  assert_eq!(added.minimum_quantity, 2);
  assert!(!added.below_minimum);

  let fetched = s.get_material(added.material_id).await.unwrap().unwrap();
  assert_eq!(fetched.material_id, added.material_id);
  assert_eq!(fetched.quantity, 10);
  assert!(!fetched.below_minimum);
}

#[tokio::test]
async fn get_material_missing_returns_none() {
  let s = store().await;
  assert!(s.get_material(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn add_material_quantities_default_to_zero() {
  let s = store().await;
  let m = s.add_material(NewMaterial::new("Whistle")).await.unwrap();
  assert_eq!(m.quantity, 0);
  assert_eq!(m.minimum_quantity, 0);
  assert!(!m.below_minimum);
}

#[tokio::test]
async fn add_material_empty_name_rejected() {
  let s = store().await;
  let err = s.add_material(NewMaterial::new("   ")).await.unwrap_err();
  assert!(matches!(err, crate::Error::Core(gearshed_core::Error::EmptyName)));
}

#[tokio::test]
async fn list_materials_ordered_by_name() {
  let s = store().await;
  material(&s, "Net", 1, 0).await;
  material(&s, "Ball", 1, 0).await;
  material(&s, "Cone", 1, 0).await;

  let names: Vec<String> = s
    .list_materials(None)
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.name)
    .collect();
  assert_eq!(names, ["Ball", "Cone", "Net"]);
}

#[tokio::test]
async fn list_materials_filter_is_case_insensitive_substring() {
  let s = store().await;
  material(&s, "Cone", 1, 0).await;
  material(&s, "Ball", 1, 0).await;

  let hits = s.list_materials(Some("cO".into())).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "Cone");
}

#[tokio::test]
async fn listing_twice_without_mutation_is_identical() {
  let s = store().await;
  material(&s, "Net", 4, 1).await;
  material(&s, "Ball", 2, 3).await;

  let first = s.list_materials(None).await.unwrap();
  let second = s.list_materials(None).await.unwrap();

  let ids = |v: &[gearshed_core::material::Material]| {
    v.iter().map(|m| m.material_id).collect::<Vec<_>>()
  };
  assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn update_material_patches_only_given_fields() {
  let s = store().await;
  let m = material(&s, "Cone", 10, 2).await;

  let patched = s
    .update_material(m.material_id, MaterialPatch { quantity: Some(4), ..Default::default() })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(patched.name, "Cone");
  assert_eq!(patched.quantity, 4);
  assert_eq!(patched.minimum_quantity, 2);

  let renamed = s
    .update_material(
      m.material_id,
      MaterialPatch { name: Some("Training cone".into()), ..Default::default() },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(renamed.name, "Training cone");
  assert_eq!(renamed.quantity, 4);
}

#[tokio::test]
async fn update_material_missing_returns_none() {
  let s = store().await;
  let result = s
    .update_material(Uuid::new_v4(), MaterialPatch { quantity: Some(1), ..Default::default() })
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn update_material_rejects_blank_name() {
  let s = store().await;
  let m = material(&s, "Cone", 1, 0).await;

  let err = s
    .update_material(m.material_id, MaterialPatch { name: Some("  ".into()), ..Default::default() })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Core(gearshed_core::Error::EmptyName)));
}

#[tokio::test]
async fn delete_material_removes_row() {
  let s = store().await;
  let m = material(&s, "Cone", 1, 0).await;

  assert_eq!(s.delete_material(m.material_id).await.unwrap(), DeleteOutcome::Deleted);
  assert!(s.get_material(m.material_id).await.unwrap().is_none());
  assert_eq!(s.delete_material(m.material_id).await.unwrap(), DeleteOutcome::NotFound);
}

#[tokio::test]
async fn delete_material_with_movements_is_refused() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 2).await;

  s.record_movement(loan(m.material_id, user.user_id, 1))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(s.delete_material(m.material_id).await.unwrap(), DeleteOutcome::InUse);
  assert!(s.get_material(m.material_id).await.unwrap().is_some());
}

// ─── Movements ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn loan_decrements_quantity_and_records_magnitude() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 2).await;

  let recorded = s
    .record_movement(loan(m.material_id, user.user_id, 3))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(recorded.material.quantity, 7);
  assert!(!recorded.material.below_minimum);
  assert_eq!(recorded.movement.kind, MovementKind::Loan);
  assert_eq!(recorded.movement.quantity, 3);
  assert_eq!(recorded.movement.status, "loaned");

  let fresh = s.get_material(m.material_id).await.unwrap().unwrap();
  assert_eq!(fresh.quantity, 7);
}

#[tokio::test]
async fn return_increments_quantity() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 7, 2).await;

  let recorded = s
    .record_movement(giveback(m.material_id, user.user_id, 3))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(recorded.material.quantity, 10);
  assert_eq!(recorded.movement.quantity, 3);
  assert_eq!(recorded.movement.kind, MovementKind::Return);
  assert_eq!(recorded.movement.status, "returned");
}

#[tokio::test]
async fn non_positive_quantity_rejected_before_any_mutation() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 2).await;

  for bad in [0, -4] {
    let err = s
      .record_movement(loan(m.material_id, user.user_id, bad))
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      crate::Error::Core(gearshed_core::Error::NonPositiveQuantity(_))
    ));
  }

  let fresh = s.get_material(m.material_id).await.unwrap().unwrap();
  assert_eq!(fresh.quantity, 10);
  assert!(s.list_movements(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn movement_against_unknown_material_commits_nothing() {
  let s = store().await;
  let user = any_user(&s).await;

  let result = s
    .record_movement(loan(Uuid::new_v4(), user.user_id, 2))
    .await
    .unwrap();
  assert!(result.is_none());

  // Atomicity: no movement row was left behind.
  assert!(s.list_movements(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_loans_do_not_lose_updates() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 0).await;

  let (a, b) = tokio::join!(
    s.record_movement(loan(m.material_id, user.user_id, 5)),
    s.record_movement(loan(m.material_id, user.user_id, 3)),
  );
  assert!(a.unwrap().is_some());
  assert!(b.unwrap().is_some());

  let fresh = s.get_material(m.material_id).await.unwrap().unwrap();
  assert_eq!(fresh.quantity, 2);
}

#[tokio::test]
async fn moved_at_and_status_default_when_unset() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 2).await;

  let before = Utc::now();
  let recorded = s
    .record_movement(giveback(m.material_id, user.user_id, 1))
    .await
    .unwrap()
    .unwrap();
  let after = Utc::now();

  assert!(recorded.movement.moved_at >= before && recorded.movement.moved_at <= after);
  assert_eq!(recorded.movement.status, "returned");
  assert!(recorded.movement.due_back.is_none());
}

#[tokio::test]
async fn explicit_movement_fields_round_trip() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 2).await;

  let moved_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
  let due_back = Utc.with_ymd_and_hms(2026, 3, 8, 9, 30, 0).unwrap();

  let mut input = loan(m.material_id, user.user_id, 2);
  input.moved_at = Some(moved_at);
  input.due_back = Some(due_back);
  input.status = Some("loaned to team B".into());

  let recorded = s.record_movement(input).await.unwrap().unwrap();
  assert_eq!(recorded.movement.moved_at, moved_at);
  assert_eq!(recorded.movement.due_back, Some(due_back));
  assert_eq!(recorded.movement.status, "loaned to team B");

  let entries = s.list_movements(None).await.unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].movement.moved_at, moved_at);
  assert_eq!(entries[0].movement.due_back, Some(due_back));
  assert_eq!(entries[0].movement.status, "loaned to team B");
}

#[tokio::test]
async fn loan_may_drive_quantity_negative() {
  // Sufficiency is a caller concern; the store applies whatever signed
  // delta a validated movement implies.
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 3, 0).await;

  let recorded = s
    .record_movement(loan(m.material_id, user.user_id, 5))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(recorded.material.quantity, -2);
}

#[tokio::test]
async fn below_minimum_flag_is_recomputed_on_every_read() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 5, 4).await;
  assert!(!m.below_minimum);

  let recorded = s
    .record_movement(loan(m.material_id, user.user_id, 2))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(recorded.material.quantity, 3);
  assert!(recorded.material.below_minimum);

  let restocked = s
    .record_movement(giveback(m.material_id, user.user_id, 6))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(restocked.material.quantity, 9);
  assert!(!restocked.material.below_minimum);
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ledger_is_enriched_and_newest_first() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 2).await;

  let mut first = loan(m.material_id, user.user_id, 1);
  first.moved_at = Some(Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap());
  let mut second = giveback(m.material_id, user.user_id, 1);
  second.moved_at = Some(Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap());

  let first = s.record_movement(first).await.unwrap().unwrap();
  let second = s.record_movement(second).await.unwrap().unwrap();

  let entries = s.list_movements(None).await.unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].movement.movement_id, second.movement.movement_id);
  assert_eq!(entries[1].movement.movement_id, first.movement.movement_id);
  assert_eq!(entries[0].material_name, "Cone");
  assert_eq!(entries[0].user_name, "Alice");
}

#[tokio::test]
async fn ledger_same_instant_ties_resolve_to_latest_insert() {
  let s = store().await;
  let user = any_user(&s).await;
  let m = material(&s, "Cone", 10, 2).await;

  let instant = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
  let mut earlier = loan(m.material_id, user.user_id, 1);
  earlier.moved_at = Some(instant);
  let mut later = loan(m.material_id, user.user_id, 2);
  later.moved_at = Some(instant);

  s.record_movement(earlier).await.unwrap().unwrap();
  let later = s.record_movement(later).await.unwrap().unwrap();

  let entries = s.list_movements(None).await.unwrap();
  assert_eq!(entries[0].movement.movement_id, later.movement.movement_id);
}

#[tokio::test]
async fn ledger_filters_by_material() {
  let s = store().await;
  let user = any_user(&s).await;
  let cone = material(&s, "Cone", 10, 2).await;
  let ball = material(&s, "Ball", 10, 2).await;

  s.record_movement(loan(cone.material_id, user.user_id, 1))
    .await
    .unwrap()
    .unwrap();
  s.record_movement(loan(ball.material_id, user.user_id, 2))
    .await
    .unwrap()
    .unwrap();

  let entries = s.list_movements(Some(cone.material_id)).await.unwrap();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].movement.material_id, cone.material_id);
  assert_eq!(entries[0].material_name, "Cone");
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_user_and_find_by_email() {
  let s = store().await;

  let user = s
    .add_user(NewUser {
      name:          "Bruna".into(),
      email:         "bruna@example.com".into(),
      password_hash: "$argon2id$stub".into(),
      role:          None,
    })
    .await
    .unwrap()
    .unwrap();
  assert_eq!(user.role, "student");

  let found = s.find_user_by_email("bruna@example.com").await.unwrap().unwrap();
  assert_eq!(found.user_id, user.user_id);
  assert_eq!(found.password_hash, "$argon2id$stub");
}

#[tokio::test]
async fn add_user_duplicate_email_returns_none() {
  let s = store().await;

  let input = NewUser {
    name:          "Bruna".into(),
    email:         "bruna@example.com".into(),
    password_hash: "$argon2id$stub".into(),
    role:          Some("instructor".into()),
  };
  assert!(s.add_user(input.clone()).await.unwrap().is_some());
  assert!(s.add_user(input).await.unwrap().is_none());
}

#[tokio::test]
async fn find_user_missing_returns_none() {
  let s = store().await;
  assert!(s.find_user_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn ping_succeeds() {
  let s = store().await;
  s.ping().await.unwrap();
}
