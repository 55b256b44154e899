//! Property-based tests for filtering, ranking, pagination and favorites.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ngo_discovery::discovery::{filter, matches, rank, FavoriteStore, PageState, PaginationController};
use ngo_discovery::domain::{
    Category, FilterCriteria, NeedEntry, OrganizationId, OrganizationRecord, Radius, Selection, Urgency,
    VerificationStatus,
};
use proptest::prelude::*;
use std::collections::HashSet;

const NAMES: [&str; 6] = [
    "Hope Clinic",
    "Community Kitchen",
    "Book Bus",
    "Clean Water Trust",
    "Food Bank North",
    "Shelter Alliance",
];

const QUERIES: [&str; 6] = ["", "clinic", "FOOD", " bank ", "a", "zzz"];

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn arb_verification() -> impl Strategy<Value = VerificationStatus> {
    prop::sample::select(VerificationStatus::ALL.to_vec())
}

fn arb_urgency() -> impl Strategy<Value = Urgency> {
    prop::sample::select(Urgency::ALL.to_vec())
}

/// Distances on a coarse grid so ties are common.
fn arb_distance() -> impl Strategy<Value = f64> {
    (0u32..80).prop_map(|quarter_km| f64::from(quarter_km) / 4.0)
}

fn arb_record() -> impl Strategy<Value = OrganizationRecord> {
    (
        prop::sample::select(NAMES.to_vec()),
        arb_category(),
        arb_verification(),
        arb_distance(),
        (0u32..=50).prop_map(|tenths| f64::from(tenths) / 10.0),
        prop::collection::vec(arb_urgency(), 0..3),
    )
        .prop_map(|(name, category, verification, distance, rating, urgencies)| {
            urgencies.into_iter().fold(
                OrganizationRecord::new("placeholder", name, category)
                    .with_verification(verification)
                    .with_distance(distance)
                    .with_rating(rating),
                |record, urgency| record.with_need(NeedEntry::new("Supplies", urgency, 10, 3)),
            )
        })
}

/// Catalogs with unique ids.
fn arb_catalog() -> impl Strategy<Value = Vec<OrganizationRecord>> {
    prop::collection::vec(arb_record(), 0..30).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                record.id = OrganizationId::new(format!("ngo-{i:02}"));
                record
            })
            .collect()
    })
}

fn arb_selection<T: Clone + std::fmt::Debug + 'static>(
    values: impl Strategy<Value = T> + 'static,
) -> impl Strategy<Value = Selection<T>> {
    prop_oneof![Just(Selection::All), values.prop_map(Selection::Only)]
}

fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        prop::sample::select(QUERIES.to_vec()),
        prop_oneof![Just(Radius::Unbounded), arb_distance().prop_map(Radius::Km)],
        arb_selection(arb_category()),
        arb_selection(arb_verification()),
        arb_selection(arb_urgency()),
    )
        .prop_map(|(query, radius, category, verification, urgency)| {
            FilterCriteria::default()
                .with_query(query)
                .with_radius(radius)
                .with_category(category)
                .with_verification(verification)
                .with_urgency(urgency)
        })
}

fn ids(records: &[OrganizationRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.to_string()).collect()
}

fn id_set(records: &[OrganizationRecord]) -> HashSet<String> {
    records.iter().map(|r| r.id.to_string()).collect()
}

proptest! {
    #[test]
    fn filter_keeps_an_ordered_subset(catalog in arb_catalog(), criteria in arb_criteria()) {
        let filtered = filter(&catalog, &criteria);

        let expected: Vec<String> = catalog
            .iter()
            .filter(|record| matches(record, &criteria))
            .map(|record| record.id.to_string())
            .collect();
        prop_assert_eq!(ids(&filtered), expected);
    }

    #[test]
    fn tightening_radius_never_grows_result(
        catalog in arb_catalog(),
        criteria in arb_criteria(),
        limit in arb_distance(),
    ) {
        let wide = filter(&catalog, &criteria);
        let tighter = match criteria.radius {
            Radius::Km(current) => Radius::Km(current.min(limit)),
            Radius::Unbounded => Radius::Km(limit),
        };
        let narrow = filter(&catalog, &criteria.clone().with_radius(tighter));

        prop_assert!(id_set(&narrow).is_subset(&id_set(&wide)));
    }

    #[test]
    fn picking_a_category_never_grows_result(
        catalog in arb_catalog(),
        criteria in arb_criteria(),
        category in arb_category(),
    ) {
        let base = criteria.with_category(Selection::All);
        let wide = filter(&catalog, &base);
        let narrow = filter(&catalog, &base.clone().with_category(Selection::Only(category)));

        prop_assert!(id_set(&narrow).is_subset(&id_set(&wide)));
        prop_assert!(narrow.iter().all(|r| r.category == category));
    }

    #[test]
    fn rank_is_idempotent_and_order_independent(
        (catalog, shuffled) in arb_catalog().prop_flat_map(|c| (Just(c.clone()), Just(c).prop_shuffle())),
    ) {
        let ranked = rank(catalog);
        prop_assert_eq!(ids(&rank(ranked.clone())), ids(&ranked));
        prop_assert_eq!(ids(&rank(shuffled)), ids(&ranked));

        for pair in ranked.windows(2) {
            prop_assert!(pair[0].distance_km <= pair[1].distance_km);
        }
    }

    #[test]
    fn paging_reveals_everything_once_in_order(catalog in arb_catalog(), page_size in 0usize..8) {
        let ranked = rank(catalog);
        let mut pages = PaginationController::new(page_size);
        pages.reset(ranked.clone(), FilterCriteria::default());

        let mut rounds = 0;
        while let Some(request) = pages.request_more() {
            prop_assert_eq!(pages.state(), PageState::LoadingMore);
            prop_assert!(pages.request_more().is_none());
            let batch = pages.fetch(&request);
            prop_assert!(pages.complete(batch).is_ok());
            rounds += 1;
            prop_assert!(rounds <= ranked.len());
        }

        prop_assert_eq!(ids(pages.window()), ids(&ranked));
        prop_assert!(!pages.has_more());
        prop_assert_eq!(pages.state(), PageState::Exhausted);
    }

    #[test]
    fn in_flight_page_never_crosses_a_reset(
        catalog in arb_catalog(),
        criteria in arb_criteria(),
        page_size in 1usize..5,
    ) {
        let mut pages = PaginationController::new(page_size);
        pages.reset(rank(catalog.clone()), FilterCriteria::default());

        if let Some(request) = pages.request_more() {
            let batch = pages.fetch(&request);
            let narrowed = rank(filter(&catalog, &criteria));
            pages.reset(narrowed.clone(), criteria);
            let window_before = ids(pages.window());

            prop_assert!(pages.complete(batch).is_err());
            prop_assert_eq!(ids(pages.window()), window_before);
            prop_assert_eq!(pages.window().len(), page_size.min(narrowed.len()));
        }
    }

    #[test]
    fn double_toggle_restores_value(
        seeded in any::<bool>(),
        noise in prop::collection::vec(0usize..3, 0..10),
    ) {
        let keys: Vec<OrganizationId> = (0..3).map(|i| OrganizationId::new(format!("ngo-{i}"))).collect();
        let mut store = FavoriteStore::new();
        store.seed(&keys[0], seeded);
        for i in noise {
            store.toggle(&keys[i]);
        }

        let before = store.is_favorite(&keys[1]);
        store.toggle(&keys[1]);
        store.toggle(&keys[1]);
        prop_assert_eq!(store.is_favorite(&keys[1]), before);
    }
}
