//! End-to-end flows through the runtime: events in, windows and effects out.

use ngo_discovery::app::{Action, AppState, Event};
use ngo_discovery::discovery::PageState;
use ngo_discovery::domain::{
    Category, ErrorSignal, NeedEntry, OrganizationId, OrganizationRecord, Radius, Selection, Urgency,
    VerificationStatus,
};
use ngo_discovery::runtime::Runtime;
use ngo_discovery::storage::{CatalogFile, JsonStorage, MemoryStorage};
use ngo_discovery::worker::DiscoveryWorker;

fn catalog() -> Vec<OrganizationRecord> {
    vec![
        OrganizationRecord::new("h-far", "Mountain Health Post", Category::Healthcare).with_distance(11.0),
        OrganizationRecord::new("h-2", "Riverside Clinic", Category::Healthcare)
            .with_distance(3.5)
            .with_rating(4.1),
        OrganizationRecord::new("f-1", "Community Kitchen", Category::FoodSecurity)
            .with_distance(1.5)
            .with_need(NeedEntry::new("Rice", Urgency::Critical, 500, 150)),
        OrganizationRecord::new("h-1", "Hope Clinic", Category::Healthcare)
            .with_distance(0.8)
            .with_rating(4.8)
            .with_email("care@hope.example")
            .with_need(NeedEntry::new("Bandages", Urgency::High, 200, 20))
            .with_need(NeedEntry::new("Insulin", Urgency::Critical, 40, 4)),
        OrganizationRecord::new("e-1", "Book Bus", Category::Education).with_distance(2.2),
        OrganizationRecord::new("h-3", "Mobile Dental Van", Category::Healthcare)
            .with_distance(4.9)
            .with_verification(VerificationStatus::Pending),
        OrganizationRecord::new("f-2", "Food Bank North", Category::FoodSecurity)
            .with_distance(6.0)
            .with_need(NeedEntry::new("Canned goods", Urgency::Low, 100, 90)),
        OrganizationRecord::new("w-1", "Clean Water Trust", Category::Environment).with_distance(7.5),
    ]
}

fn loaded(page_size: usize, storage: &MemoryStorage) -> Runtime {
    let state = AppState::new(page_size, 300).with_page_load_delay(1000);
    let mut runtime = Runtime::new(state, DiscoveryWorker::new(storage.clone()));
    runtime.dispatch(Event::Refresh).expect("refresh");
    runtime.settle().expect("settle");
    runtime
}

fn window_ids(runtime: &Runtime) -> Vec<String> {
    runtime.state().window().iter().map(|r| r.id.to_string()).collect()
}

#[test]
fn nearby_healthcare_pages_in_distance_order() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(2, &storage);
    assert_eq!(rt.state().result_count(), 8);

    rt.dispatch(Event::CategorySelected(Selection::Only(Category::Healthcare)))
        .expect("category");
    rt.dispatch(Event::RadiusSelected(Radius::Km(5.0))).expect("radius");

    assert_eq!(rt.state().result_count(), 3);
    assert_eq!(window_ids(&rt), ["h-1", "h-2"]);
    assert!(rt.state().has_more());

    rt.dispatch(Event::LoadMore).expect("load more");
    rt.advance(1000).expect("advance");
    assert_eq!(window_ids(&rt), ["h-1", "h-2", "h-3"]);
    assert!(!rt.state().has_more());

    let render = rt.dispatch(Event::LoadMore).expect("load more");
    assert!(!render);
    assert_eq!(rt.pending_jobs(), 0);
}

#[test]
fn category_and_urgency_combine() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(6, &storage);

    rt.dispatch(Event::CategorySelected(Selection::Only(Category::FoodSecurity)))
        .expect("category");
    assert_eq!(window_ids(&rt), ["f-1", "f-2"]);

    rt.dispatch(Event::UrgencySelected(Selection::Only(Urgency::Critical)))
        .expect("urgency");
    assert_eq!(window_ids(&rt), ["f-1"]);
    assert!(!rt.state().has_more());
    assert_eq!(rt.state().active_filter_count(), 2);

    rt.dispatch(Event::ClearFilters).expect("clear");
    assert_eq!(rt.state().result_count(), 8);
    assert_eq!(rt.state().active_filter_count(), 0);
}

#[test]
fn criteria_change_discards_in_flight_page() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(2, &storage);

    rt.dispatch(Event::LoadMore).expect("load more");
    rt.advance(400).expect("advance");
    rt.dispatch(Event::RadiusSelected(Radius::Km(3.0))).expect("radius");
    let epoch = rt.state().epoch();

    rt.settle().expect("settle");
    assert_eq!(rt.state().epoch(), epoch);
    assert_eq!(window_ids(&rt), ["h-1", "f-1"]);
    assert!(rt.state().has_more());

    rt.dispatch(Event::LoadMore).expect("load more");
    rt.settle().expect("settle");
    assert_eq!(window_ids(&rt), ["h-1", "f-1", "e-1"]);
    assert_eq!(rt.state().result_count(), 3);
}

#[test]
fn refresh_abandons_in_flight_page() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(2, &storage);
    assert_eq!(window_ids(&rt), ["h-1", "f-1"]);

    rt.dispatch(Event::LoadMore).expect("load more");
    rt.advance(400).expect("advance");
    storage.set_catalog(
        catalog()
            .into_iter()
            .filter(|r| r.id.as_str() != "h-1" && r.id.as_str() != "f-1")
            .collect(),
    );
    rt.dispatch(Event::Refresh).expect("refresh");
    rt.settle().expect("settle");

    assert_eq!(rt.state().result_count(), 6);
    assert_eq!(window_ids(&rt), ["e-1", "h-2"]);
    assert_eq!(rt.state().pagination().state(), PageState::Idle);

    rt.dispatch(Event::LoadMore).expect("load more");
    rt.settle().expect("settle");
    assert_eq!(window_ids(&rt), ["e-1", "h-2", "h-3"]);
}

#[test]
fn typing_commits_once_after_quiet_period() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(6, &storage);
    let epoch = rt.state().epoch();

    for text in ["c", "cl", "cli"] {
        rt.dispatch(Event::QueryChanged { text: text.to_string() }).expect("type");
        rt.advance(100).expect("advance");
    }
    assert_eq!(rt.state().criteria.query, "");
    assert_eq!(rt.state().query_input, "cli");

    rt.advance(200).expect("advance");
    assert_eq!(rt.state().criteria.query, "cli");
    assert_eq!(rt.state().epoch(), epoch + 1);
    assert_eq!(window_ids(&rt), ["h-1", "h-2"]);

    let card = &rt.state().compute_viewmodel().cards[0];
    assert_eq!(card.name, "Hope Clinic");
    assert!(!card.highlight_ranges.is_empty());
}

#[test]
fn failed_favorite_write_rolls_back_and_surfaces() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(6, &storage);
    let id = OrganizationId::new("h-1");

    storage.fail_favorite(&id);
    rt.dispatch(Event::ToggleFavorite { id: id.clone() }).expect("toggle");
    assert!(rt.state().is_favorite(&id));

    rt.settle().expect("settle");
    assert!(!rt.state().is_favorite(&id));
    assert!(matches!(
        &rt.state().last_error,
        Some(ErrorSignal::PersistenceFailure { id: failed, .. }) if failed == &id
    ));
    assert!(matches!(rt.take_effects().as_slice(), [Action::Surface(_)]));

    storage.heal_favorite(&id);
    rt.dispatch(Event::ToggleFavorite { id: id.clone() }).expect("toggle");
    rt.settle().expect("settle");
    assert!(rt.state().is_favorite(&id));
    assert_eq!(rt.state().last_error, None);
    assert_eq!(storage.stored_favorite(&id), Some(true));
}

#[test]
fn stale_favorite_failure_is_superseded() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(6, &storage).with_worker_latency(50);
    let id = OrganizationId::new("e-1");

    storage.fail_favorite(&id);
    rt.dispatch(Event::ToggleFavorite { id: id.clone() }).expect("toggle");
    rt.advance(10).expect("advance");
    rt.dispatch(Event::ToggleFavorite { id: id.clone() }).expect("toggle");

    rt.advance(40).expect("advance");
    assert!(!rt.state().is_favorite(&id));
    assert_eq!(rt.state().last_error, None);

    storage.heal_favorite(&id);
    rt.settle().expect("settle");
    assert!(!rt.state().is_favorite(&id));
    assert!(rt.take_effects().is_empty());
    assert_eq!(storage.stored_favorite(&id), Some(false));
}

#[test]
fn repeated_failed_toggles_settle_on_stored_value() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(6, &storage).with_worker_latency(50);
    let id = OrganizationId::new("e-1");

    storage.fail_favorite(&id);
    rt.dispatch(Event::ToggleFavorite { id: id.clone() }).expect("toggle");
    rt.advance(10).expect("advance");
    rt.dispatch(Event::ToggleFavorite { id: id.clone() }).expect("toggle");
    rt.settle().expect("settle");

    let stored = storage.stored_favorite(&id).unwrap_or(false);
    assert_eq!(rt.state().is_favorite(&id), stored);
    assert!(!rt.state().favorites().confirmed(&id));
    assert!(matches!(rt.take_effects().as_slice(), [Action::Surface(_)]));

    rt.dispatch(Event::Refresh).expect("refresh");
    rt.settle().expect("settle");
    assert_eq!(rt.state().is_favorite(&id), stored);
}

#[test]
fn refresh_failure_keeps_last_snapshot() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(3, &storage);
    let before = window_ids(&rt);

    storage.fail_catalog("upstream timeout");
    rt.dispatch(Event::Refresh).expect("refresh");
    assert!(rt.state().refreshing);
    rt.settle().expect("settle");

    assert_eq!(window_ids(&rt), before);
    assert!(!rt.state().refreshing);
    let banner = rt.state().compute_viewmodel().error_banner.expect("banner");
    assert!(banner.retryable);
    assert!(banner.message.contains("upstream timeout"));

    storage.heal_catalog();
    storage.set_catalog(catalog().into_iter().take(2).collect());
    rt.dispatch(Event::Refresh).expect("refresh");
    rt.settle().expect("settle");
    assert_eq!(rt.state().last_error, None);
    assert_eq!(rt.state().result_count(), 2);
}

#[test]
fn donate_and_contact_resolve_against_snapshot() {
    let storage = MemoryStorage::with_catalog(catalog());
    let mut rt = loaded(6, &storage);
    let id = OrganizationId::new("h-1");

    rt.dispatch(Event::DonateNow {
        id: id.clone(),
        need_index: Some(1),
    })
    .expect("donate");
    rt.dispatch(Event::Contact { id: id.clone() }).expect("contact");

    let effects = rt.take_effects();
    assert!(matches!(
        &effects[0],
        Action::NavigateToDonation { need: Some(need), .. } if need.item == "Insulin"
    ));
    assert!(matches!(
        &effects[1],
        Action::OpenContact { email: Some(email), subject, .. }
            if email == "care@hope.example" && subject == "Inquiry about donation to Hope Clinic"
    ));

    assert!(rt
        .dispatch(Event::DonateNow {
            id: id.clone(),
            need_index: Some(9),
        })
        .is_err());
    assert!(rt.dispatch(Event::Contact { id: OrganizationId::new("nope") }).is_err());
}

#[test]
fn json_favorites_survive_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog_path = dir.path().join("catalog.json");
    let favorites_path = dir.path().join("favorites.json");
    let file = CatalogFile {
        organizations: catalog(),
    };
    std::fs::write(&catalog_path, serde_json::to_string(&file).expect("serialize")).expect("write catalog");

    let open = || {
        let storage = JsonStorage::new(catalog_path.clone(), favorites_path.clone()).expect("storage");
        let mut rt = Runtime::new(AppState::new(6, 300), DiscoveryWorker::new(storage));
        rt.dispatch(Event::Refresh).expect("refresh");
        rt.settle().expect("settle");
        rt
    };

    let id = OrganizationId::new("w-1");
    {
        let mut rt = open();
        assert!(!rt.state().is_favorite(&id));
        rt.dispatch(Event::ToggleFavorite { id: id.clone() }).expect("toggle");
        rt.settle().expect("settle");
    }

    let rt = open();
    assert!(rt.state().is_favorite(&id));
}
