//! `PlayerStatsStore` contract over the in-memory adapter.

use std::sync::Arc;

use futures::future::join_all;
use numdraw_backend::adapters::InMemoryPlayerStore;
use numdraw_backend::errors::domain::{ConflictKind, DomainError};
use numdraw_backend::repos::PlayerStatsStore;
use numdraw_test_support::unique_helpers::{unique_username, unique_usernames};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_are_not_lost() -> Result<(), DomainError> {
    let store = Arc::new(InMemoryPlayerStore::new());
    let player = store.register(unique_username("busy"))?;

    let bumps = (0..64).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if i % 4 == 0 {
                store.increment_wins(player.id).await
            } else {
                store.increment_losses(player.id).await
            }
        })
    });
    for bump in join_all(bumps).await {
        bump.expect("bump task")?;
    }

    let stored = store.find_player(player.id).await?.expect("player exists");
    assert_eq!((stored.wins, stored.losses), (16, 48));
    assert_eq!(stored.games_played(), 64);
    Ok(())
}

#[tokio::test]
async fn usernames_are_trimmed_before_uniqueness() -> Result<(), DomainError> {
    let store = InMemoryPlayerStore::new();
    let name = unique_username("spacey");
    store.register(format!("  {name} "))?;

    let err = store.register(name.clone()).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::UniqueUsername, _)
    ));
    Ok(())
}

#[tokio::test]
async fn top_players_truncates_to_limit() -> Result<(), DomainError> {
    let store: Arc<InMemoryPlayerStore> = Arc::new(InMemoryPlayerStore::new());
    for name in unique_usernames("p", 6) {
        store.register(name)?;
    }
    store.increment_wins(6).await?;

    let dyn_store: Arc<dyn PlayerStatsStore> = store.clone();
    let top = dyn_store.top_players(3).await?;
    assert_eq!(top.iter().map(|p| p.id).collect::<Vec<_>>(), vec![6, 1, 2]);
    assert_eq!(dyn_store.top_players(100).await?.len(), 6);
    Ok(())
}
