//! Probe ordering across slow and failing candidate stores.
//!
//! The tokio clock is paused so per-store delays decide completion order
//! deterministically; the chosen store must depend on catalog order only.

use std::time::Duration;

use folio::{DocumentId, FragmentStoreLocator, ReassemblyConfig};
use folio_testing::{MemoryCatalog, MemoryStore};
use rstest::rstest;

const ASIN: &str = "B0";
const MAP: &str = r#"{"fragmentMetadata":{"numberOfFragments":1}}"#;

fn titled(title: &str) -> String { format!(r#"{{"title":"{title}"}}"#) }

async fn locate(catalog: &MemoryCatalog) -> folio::LocatedStores {
    FragmentStoreLocator::new(&ReassemblyConfig::default())
        .locate(catalog, &DocumentId::from(ASIN))
        .await
        .expect("locate")
}

#[rstest]
#[case::first_slower(Duration::from_secs(5), Duration::ZERO)]
#[case::second_slower(Duration::ZERO, Duration::from_secs(5))]
#[tokio::test(start_paused = true)]
async fn fragments_come_from_the_only_store_exposing_them(
    #[case] first_delay: Duration,
    #[case] second_delay: Duration,
) {
    let catalog = MemoryCatalog::new(vec![
        MemoryStore::new("first")
            .with_info(ASIN, &titled("one"), MAP)
            .delayed(first_delay),
        MemoryStore::new("second")
            .with_info(ASIN, &titled("two"), MAP)
            .with_fragment(ASIN, 0, "<p/>", None, None)
            .delayed(second_delay),
    ]);
    let located = locate(&catalog).await;
    assert_eq!(located.info.0, "first");
    assert_eq!(located.info.1.metadata.title, "one");
    let (store, fragments) = located.fragments.expect("fragments");
    assert_eq!(store, "second");
    assert_eq!(fragments.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn earlier_candidate_wins_even_when_it_answers_last() {
    let catalog = MemoryCatalog::new(vec![
        MemoryStore::new("a")
            .with_info(ASIN, &titled("slow"), MAP)
            .delayed(Duration::from_secs(30)),
        MemoryStore::new("b").with_info(ASIN, &titled("fast"), MAP),
    ]);
    assert_eq!(locate(&catalog).await.info.1.metadata.title, "slow");
}

#[tokio::test]
async fn unopenable_and_broken_candidates_are_skipped() {
    let catalog = MemoryCatalog::new(vec![
        MemoryStore::new("broken").with_info(ASIN, &titled("bad"), MAP).broken(),
        MemoryStore::new("good").with_info(ASIN, &titled("good"), MAP),
    ])
    .with_unopenable("locked");
    let located = locate(&catalog).await;
    assert_eq!(located.info.0, "good");
    assert_eq!(catalog.open_attempts(), 3);
}
