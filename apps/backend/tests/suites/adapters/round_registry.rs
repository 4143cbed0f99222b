//! `RoundRegistry` contract over the in-memory adapter.

use std::sync::Arc;

use futures::future::join_all;
use numdraw_backend::adapters::InMemoryRoundRegistry;
use numdraw_backend::domain::{Participation, RoundState};
use numdraw_backend::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use numdraw_backend::repos::{NewParticipation, NewRound, RoundRegistry};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const NOW: OffsetDateTime = datetime!(2026-04-10 08:30:00 UTC);

fn registry() -> Arc<dyn RoundRegistry> {
    Arc::new(InMemoryRoundRegistry::new())
}

fn seat(round_id: i64, player_id: i64) -> NewParticipation {
    NewParticipation {
        round_id,
        player_id,
        selected_number: None,
        joined_at: NOW,
        capacity: 10,
    }
}

#[tokio::test]
async fn resolved_rounds_accept_no_participants() -> Result<(), DomainError> {
    let reg = registry();
    let (round, _) = reg
        .insert_round(NewRound::new(1, NOW, Duration::seconds(20)))
        .await?;
    reg.insert_participation(seat(round.id, 2)).await?;
    reg.compare_and_set_state(round.id, RoundState::Waiting, RoundState::Active, NOW)
        .await?;
    reg.compare_and_set_state(round.id, RoundState::Active, RoundState::Resolved, NOW)
        .await?;

    let err = reg.insert_participation(seat(round.id, 3)).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::InvalidState, _)));

    // Membership of a resolved round no longer counts as live
    assert_eq!(reg.find_live_participation(2).await?, None);
    assert!(reg.find_participation(round.id, 2).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn unknown_rows_are_not_found() -> Result<(), DomainError> {
    let reg = registry();
    assert_eq!(reg.find_round(9).await?, None);
    assert!(!reg.remove_participation(9, 1).await?);
    assert_eq!(reg.count_participations(9).await?, 0);

    let ghost = Participation {
        id: 77,
        round_id: 9,
        player_id: 1,
        selected_number: None,
        is_winner: true,
        is_creator: false,
        joined_at: NOW,
    };
    let err = reg.update_participation(&ghost).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Participation, _)
    ));

    let err = reg
        .compare_and_set_state(9, RoundState::Active, RoundState::Resolved, NOW)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Round, _)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn live_uniqueness_holds_without_service_locks() -> Result<(), DomainError> {
    let reg = registry();
    let mut rounds = Vec::new();
    for creator in 100..108 {
        rounds.push(
            reg.insert_round(NewRound::new(creator, NOW, Duration::seconds(20)))
                .await?
                .0
                .id,
        );
    }

    let inserts = rounds.iter().map(|&round_id| {
        let reg = Arc::clone(&reg);
        tokio::spawn(async move { reg.insert_participation(seat(round_id, 1)).await })
    });
    let results = join_all(inserts).await;

    let ok = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    assert_eq!(ok, 1);
    assert!(reg.find_live_participation(1).await?.is_some());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn seat_limit_holds_without_service_locks() -> Result<(), DomainError> {
    let reg = registry();
    let (round, _) = reg
        .insert_round(NewRound::new(1, NOW, Duration::seconds(20)))
        .await?;

    let inserts = (200..220).map(|player_id| {
        let reg = Arc::clone(&reg);
        let limited = NewParticipation {
            capacity: 4,
            ..seat(round.id, player_id)
        };
        tokio::spawn(async move { reg.insert_participation(limited).await })
    });
    let results = join_all(inserts).await;

    let full = results
        .iter()
        .filter(|r| matches!(r, Ok(Err(DomainError::Conflict(ConflictKind::RoundFull, _)))))
        .count();
    assert_eq!(full, 17);
    assert_eq!(reg.count_participations(round.id).await?, 4);

    let first = &reg.participations_for_round(round.id).await?[0];
    assert_eq!((first.player_id, first.is_creator), (1, true));
    Ok(())
}
