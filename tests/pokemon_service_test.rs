mod helpers;

use std::sync::Arc;
use std::time::Duration;

use dexcache::adapters::sqlite::SqlitePokemonStore;
use dexcache::domain::errors::DomainError;
use dexcache::domain::ports::FetchError;
use dexcache::services::PokemonService;
use serde_json::json;

use helpers::database::{row_count, setup_file_db, setup_test_db, teardown_test_db};
use helpers::source::{pokemon_payload, FakeSource};

fn service_with(
    pool: &sqlx::SqlitePool,
    source: FakeSource,
) -> (PokemonService<SqlitePokemonStore, FakeSource>, Arc<FakeSource>) {
    let source = Arc::new(source);
    let store = Arc::new(SqlitePokemonStore::new(pool.clone()));
    (PokemonService::new(store, Arc::clone(&source)), source)
}

#[tokio::test]
async fn test_get_or_fetch_caches_on_first_call() {
    let pool = setup_test_db().await;
    let (service, source) =
        service_with(&pool, FakeSource::new().with_payload(1, pokemon_payload(1, "Bulbasaur")));

    let first = service
        .get_or_fetch(1)
        .await
        .expect("get_or_fetch failed")
        .expect("pokemon should exist");
    assert_eq!(first.pokemon_id, 1);
    assert_eq!(first.name, "bulbasaur");
    assert!((first.height - 0.7).abs() < 1e-9);
    assert!((first.weight - 6.9).abs() < 1e-9);
    assert_eq!(first.types, vec!["grass", "poison"]);
    assert_eq!(first.abilities, vec!["overgrow", "chlorophyll"]);
    assert_eq!(first.stats.get("hp"), Some(&45));
    assert_eq!(first.sprite_front.as_deref(), Some("https://img.example/1.png"));
    assert!(first.sprite_back.is_none());

    let second = service.get_or_fetch(1).await.unwrap().unwrap();
    assert_eq!(second, first, "second read must come from the cache");
    assert_eq!(source.calls(), 1, "remote source must be contacted exactly once");
    assert_eq!(row_count(&pool).await, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_get_or_fetch_unknown_id_returns_none() {
    let pool = setup_test_db().await;
    let (service, source) = service_with(&pool, FakeSource::new());

    let result = service.get_or_fetch(99999).await.unwrap();
    assert!(result.is_none());
    assert_eq!(source.calls(), 1);
    assert_eq!(row_count(&pool).await, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_unavailable_remote_collapses_to_none() {
    let pool = setup_test_db().await;
    let (service, _source) = service_with(
        &pool,
        FakeSource::new().with_error(25, FetchError::Unavailable("timed out".to_string())),
    );

    assert!(service.get_or_fetch(25).await.unwrap().is_none());
    assert!(service.force_fetch_and_upsert(25).await.unwrap().is_none());
    assert_eq!(row_count(&pool).await, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_remote_miss_is_not_cached() {
    let pool = setup_test_db().await;
    let (service, source) = service_with(&pool, FakeSource::new());

    assert!(service.get_or_fetch(151).await.unwrap().is_none());
    assert!(service.get_or_fetch(151).await.unwrap().is_none());
    assert_eq!(source.calls(), 2, "a miss must be retried on the next read");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_force_fetch_is_idempotent() {
    let pool = setup_test_db().await;
    let (service, source) =
        service_with(&pool, FakeSource::new().with_payload(25, pokemon_payload(25, "pikachu")));

    let first = service.force_fetch_and_upsert(25).await.unwrap().unwrap();
    let second = service.force_fetch_and_upsert(25).await.unwrap().unwrap();

    assert_eq!(first.id, second.id, "surrogate id must survive an overwrite");
    assert_eq!(first.created_at, second.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(first.fields(), second.fields());
    assert_eq!(source.calls(), 2);
    assert_eq!(row_count(&pool).await, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_force_fetch_overwrites_every_field() {
    let pool = setup_test_db().await;
    let (service, source) =
        service_with(&pool, FakeSource::new().with_payload(7, pokemon_payload(7, "squirtle")));

    let original = service.get_or_fetch(7).await.unwrap().unwrap();
    assert_eq!(original.base_experience, 64);

    // The refreshed payload is sparse: absent fields must reset, not linger.
    source.set_payload(7, json!({"id": 7, "name": "Squirtle"}));
    let refreshed = service.force_fetch_and_upsert(7).await.unwrap().unwrap();

    assert_eq!(refreshed.id, original.id);
    assert_eq!(refreshed.name, "squirtle");
    assert_eq!(refreshed.height, 0.0);
    assert_eq!(refreshed.weight, 0.0);
    assert_eq!(refreshed.base_experience, 0);
    assert!(refreshed.types.is_empty());
    assert!(refreshed.abilities.is_empty());
    assert!(refreshed.stats.is_empty());
    assert!(refreshed.sprite_front.is_none());

    let cached = service.get_or_fetch(7).await.unwrap().unwrap();
    assert_eq!(cached, refreshed);
    assert_eq!(source.calls(), 2);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_force_fetch_inserts_when_absent() {
    let pool = setup_test_db().await;
    let (service, _source) =
        service_with(&pool, FakeSource::new().with_payload(4, pokemon_payload(4, "charmander")));

    let inserted = service.force_fetch_and_upsert(4).await.unwrap().unwrap();
    assert_eq!(inserted.name, "charmander");
    assert_eq!(row_count(&pool).await, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_malformed_payload_errors_and_stores_nothing() {
    let pool = setup_test_db().await;
    let (service, _source) =
        service_with(&pool, FakeSource::new().with_payload(3, json!({"name": "venusaur"})));

    let err = service.get_or_fetch(3).await.unwrap_err();
    assert!(matches!(err, DomainError::MalformedPayload(_)), "got {err:?}");

    let err = service.force_fetch_and_upsert(3).await.unwrap_err();
    assert!(matches!(err, DomainError::MalformedPayload(_)), "got {err:?}");

    assert_eq!(row_count(&pool).await, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_search_by_name_is_case_insensitive_and_local() {
    let pool = setup_test_db().await;
    let (service, source) =
        service_with(&pool, FakeSource::new().with_payload(25, pokemon_payload(25, "Pikachu")));

    assert!(service.search_by_name("pikachu").await.unwrap().is_none());
    assert_eq!(source.calls(), 0, "search must never contact the remote source");

    service.get_or_fetch(25).await.unwrap().unwrap();

    for query in ["pikachu", "PIKACHU", "PiKaChU"] {
        let found = service.search_by_name(query).await.unwrap();
        assert_eq!(found.map(|p| p.pokemon_id), Some(25), "query {query}");
    }
    assert!(service.search_by_name("pika").await.unwrap().is_none());
    assert_eq!(source.calls(), 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_list_empty_store() {
    let pool = setup_test_db().await;
    let (service, _source) = service_with(&pool, FakeSource::new());

    let (items, total) = service.list(0, 10).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(total, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_list_pages_in_insertion_order() {
    let pool = setup_test_db().await;
    let source = [9_i64, 3, 6, 1, 4]
        .into_iter()
        .fold(FakeSource::new(), |source, id| {
            source.with_payload(id, pokemon_payload(id, &format!("mon-{id}")))
        });
    let (service, _source) = service_with(&pool, source);

    for id in [9, 3, 6, 1, 4] {
        service.get_or_fetch(id).await.unwrap().unwrap();
    }

    let (first, total) = service.list(0, 2).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(first.iter().map(|p| p.pokemon_id).collect::<Vec<_>>(), vec![9, 3]);

    let (last, total) = service.list(4, 2).await.unwrap();
    assert_eq!(total, 5);
    assert_eq!(last.iter().map(|p| p.pokemon_id).collect::<Vec<_>>(), vec![4]);

    let (beyond, total) = service.list(10, 2).await.unwrap();
    assert!(beyond.is_empty());
    assert_eq!(total, 5, "total is store-wide, not page-local");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_concurrent_reads_of_distinct_ids() {
    let pool = setup_test_db().await;
    let (service, source) = service_with(
        &pool,
        FakeSource::new()
            .with_payload(1, pokemon_payload(1, "bulbasaur"))
            .with_payload(4, pokemon_payload(4, "charmander"))
            .with_payload(7, pokemon_payload(7, "squirtle")),
    );

    let (a, b, c) = tokio::join!(
        service.get_or_fetch(1),
        service.get_or_fetch(4),
        service.get_or_fetch(7)
    );
    assert_eq!(a.unwrap().unwrap().name, "bulbasaur");
    assert_eq!(b.unwrap().unwrap().name, "charmander");
    assert_eq!(c.unwrap().unwrap().name, "squirtle");
    assert_eq!(source.calls(), 3);
    assert_eq!(row_count(&pool).await, 3);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_concurrent_misses_on_distinct_ids_with_pooled_connections() {
    // Id 1 commits while id 2 is still waiting on the remote source.
    let (_dir, pool) = setup_file_db().await;
    let (service, source) = service_with(
        &pool,
        FakeSource::new()
            .with_payload(1, pokemon_payload(1, "bulbasaur"))
            .with_delay(1, Duration::from_millis(50))
            .with_payload(2, pokemon_payload(2, "ivysaur"))
            .with_delay(2, Duration::from_millis(300)),
    );

    let (a, b) = tokio::join!(service.get_or_fetch(1), service.get_or_fetch(2));
    assert_eq!(a.expect("first miss failed").unwrap().name, "bulbasaur");
    assert_eq!(b.expect("second miss failed").unwrap().name, "ivysaur");
    assert_eq!(source.calls(), 2);
    assert_eq!(row_count(&pool).await, 2);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_refresh_alongside_cold_read_with_pooled_connections() {
    let (_dir, pool) = setup_file_db().await;
    let (service, _source) = service_with(
        &pool,
        FakeSource::new()
            .with_payload(4, pokemon_payload(4, "charmander"))
            .with_delay(4, Duration::from_millis(300))
            .with_payload(7, pokemon_payload(7, "squirtle"))
            .with_delay(7, Duration::from_millis(50)),
    );
    service.get_or_fetch(7).await.unwrap().unwrap();

    let (cold, refreshed) = tokio::join!(service.get_or_fetch(4), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        service.force_fetch_and_upsert(7).await
    });
    assert_eq!(cold.expect("cold read failed").unwrap().pokemon_id, 4);
    assert_eq!(refreshed.expect("refresh failed").unwrap().pokemon_id, 7);
    assert_eq!(row_count(&pool).await, 2);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_concurrent_misses_on_same_id_store_one_row() {
    // Both callers miss before either has stored anything. The losing insert
    // hits the unique index and surfaces as a conflict.
    let (_dir, pool) = setup_file_db().await;
    let (service, _source) = service_with(
        &pool,
        FakeSource::new()
            .with_payload(25, pokemon_payload(25, "pikachu"))
            .with_delay(25, Duration::from_millis(100)),
    );

    let (a, b) = tokio::join!(service.get_or_fetch(25), service.get_or_fetch(25));

    let mut stored = 0;
    for result in [a, b] {
        match result {
            Ok(Some(pokemon)) => {
                assert_eq!(pokemon.pokemon_id, 25);
                stored += 1;
            }
            Err(DomainError::DuplicatePokemon(25)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert!(stored >= 1, "at least one caller must get the record");
    assert_eq!(row_count(&pool).await, 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_refresh_keys_on_payload_id() {
    // A payload whose id disagrees with the requested one is stored under
    // the payload's id.
    let pool = setup_test_db().await;
    let (service, _source) =
        service_with(&pool, FakeSource::new().with_payload(10, pokemon_payload(11, "metapod")));

    let stored = service.force_fetch_and_upsert(10).await.unwrap().unwrap();
    assert_eq!(stored.pokemon_id, 11);

    let again = service.force_fetch_and_upsert(10).await.unwrap().unwrap();
    assert_eq!(again.id, stored.id);
    assert_eq!(row_count(&pool).await, 1);

    teardown_test_db(pool).await;
}
