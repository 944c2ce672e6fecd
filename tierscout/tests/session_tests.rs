//! Integration tests for the scouting session state machine
//!
//! Covers tier exclusivity, the notes lifecycle, defensive no-ops, snapshot
//! round-trips through SQLite, cache-first hydration, and the color
//! enrichment merge.

use std::collections::HashMap;
use tempfile::TempDir;
use tierscout::fetch::colors::VerifiedColors;
use tierscout::{Session, SnapshotStore};
use tierscout_common::db::init_database;
use tierscout_common::events::{EventBus, SessionEvent};
use tierscout_common::{ScoutNotes, Team, Tier};

const EVENT: &str = "2026tuis";

struct Fixture {
    store: SnapshotStore,
    bus: EventBus,
    // Holds the scratch database alive for the test's duration.
    _dir: TempDir,
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("tierscout.db")).await.unwrap();
    Fixture {
        store: SnapshotStore::new(pool),
        bus: EventBus::new(64),
        _dir: dir,
    }
}

fn roster() -> Vec<Team> {
    [33, 118, 254, 1678].into_iter().map(Team::from_number).collect()
}

async fn seeded_session(fx: &Fixture) -> Session {
    Session::seed(EVENT, "Riley", roster(), fx.store.clone(), fx.bus.clone())
        .await
        .unwrap()
}

fn notes(driver_skill: &str) -> ScoutNotes {
    ScoutNotes {
        driver_skill: driver_skill.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn scenario_a_place_with_notes() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    assert!(session.place(Tier::S, 254, notes("excellent")).await.unwrap());

    assert!(!session.pool().contains(254));
    let tier_s: Vec<u32> = session.board().tier(Tier::S).iter().map(|t| t.id).collect();
    assert_eq!(tier_s, vec![254]);

    let entry = session.notes_for(Tier::S, 254).unwrap();
    assert_eq!(entry.notes.driver_skill, "excellent");
    assert_eq!(entry.scout_name, "Riley");
}

#[tokio::test]
async fn scenario_b_moving_tiers_replaces_notes() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    session.place(Tier::S, 254, notes("excellent")).await.unwrap();
    session.place(Tier::A, 254, notes("solid")).await.unwrap();

    assert!(session.board().tier(Tier::S).is_empty());
    let tier_a: Vec<u32> = session.board().tier(Tier::A).iter().map(|t| t.id).collect();
    assert_eq!(tier_a, vec![254]);

    assert!(session.notes_for(Tier::S, 254).is_none());
    assert_eq!(session.notes_for(Tier::A, 254).unwrap().notes.driver_skill, "solid");
}

#[tokio::test]
async fn scenario_c_double_remove_restores_once() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    session.place(Tier::A, 254, notes("solid")).await.unwrap();

    assert!(session.remove(Tier::A, 254).await.unwrap());
    assert!(!session.remove(Tier::A, 254).await.unwrap());

    let count = session.pool().iter().filter(|t| t.id == 254).count();
    assert_eq!(count, 1);
    assert!(session.notes_for(Tier::A, 254).is_none());
}

#[tokio::test]
async fn p1_exclusivity_through_arbitrary_sequences() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    session.place(Tier::S, 254, notes("a")).await.unwrap();
    session.place(Tier::B, 1678, notes("b")).await.unwrap();
    session.place(Tier::B, 254, notes("c")).await.unwrap();
    session.remove(Tier::B, 1678).await.unwrap();
    session.place(Tier::D, 33, notes("d")).await.unwrap();
    session.place(Tier::S, 33, notes("e")).await.unwrap();
    session.remove(Tier::S, 254).await.unwrap();

    for team_id in [33, 118, 254, 1678] {
        let in_pool = session.pool().contains(team_id);
        let tiers_holding = Tier::ALL
            .iter()
            .filter(|t| session.board().tier(**t).iter().any(|team| team.id == team_id))
            .count();

        assert!(tiers_holding <= 1, "team {} in {} tiers", team_id, tiers_holding);
        assert_eq!(
            in_pool,
            tiers_holding == 0,
            "team {} must be pooled exactly when untiered",
            team_id
        );
    }
}

#[tokio::test]
async fn p2_replacing_within_a_tier_edits_notes() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    session.place(Tier::S, 254, notes("first pass")).await.unwrap();
    session.place(Tier::S, 254, notes("second pass")).await.unwrap();

    // Re-placing into the same tier is the edit path: no duplicate entry,
    // notes overwritten.
    assert_eq!(session.board().tier(Tier::S).len(), 1);
    assert_eq!(
        session.notes_for(Tier::S, 254).unwrap().notes.driver_skill,
        "second pass"
    );
}

#[tokio::test]
async fn p3_removal_from_wrong_tier_is_a_full_noop() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    session.place(Tier::S, 254, notes("excellent")).await.unwrap();
    let before = session.to_snapshot();

    assert!(!session.remove(Tier::A, 254).await.unwrap());
    assert_eq!(session.to_snapshot(), before);

    // And the stored snapshot was not rewritten either.
    let stored = fx.store.load(EVENT).await.unwrap().unwrap();
    assert_eq!(stored, before);
}

#[tokio::test]
async fn placing_an_unknown_team_is_a_noop() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;
    let before = session.to_snapshot();

    assert!(!session.place(Tier::S, 9999, notes("ghost")).await.unwrap());
    assert_eq!(session.to_snapshot(), before);
}

#[tokio::test]
async fn p4_snapshot_round_trips_through_storage() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    session.place(Tier::S, 254, notes("excellent")).await.unwrap();
    session
        .place(
            Tier::B,
            1678,
            ScoutNotes {
                driver_skill: "smooth".to_string(),
                hardware_electro: "clean wiring".to_string(),
                communication: "responsive".to_string(),
                basic_game_knowledge: "knows the rules".to_string(),
                under_trench: true,
            },
        )
        .await
        .unwrap();

    let stored = fx.store.load(EVENT).await.unwrap().unwrap();
    assert_eq!(stored, session.to_snapshot());
}

#[tokio::test]
async fn scenario_d_hydration_skips_the_roster_fetch() {
    let fx = fixture().await;
    {
        let mut session = seeded_session(&fx).await;
        session.place(Tier::S, 254, notes("excellent")).await.unwrap();
        session.place(Tier::C, 33, notes("slow cycles")).await.unwrap();
    }

    // A stored snapshot means hydrate returns a session directly; the
    // caller never reaches for the network.
    let session = Session::hydrate(EVENT, "Riley", fx.store.clone(), fx.bus.clone())
        .await
        .unwrap()
        .expect("snapshot should hydrate");

    assert_eq!(session.board().tier_of(254), Some(Tier::S));
    assert_eq!(session.board().tier_of(33), Some(Tier::C));
    assert_eq!(session.notes_for(Tier::S, 254).unwrap().notes.driver_skill, "excellent");
    assert_eq!(session.pool().len(), 2);

    // A different event code has its own keys and hydrates nothing.
    let other = Session::hydrate("2025cur", "Riley", fx.store.clone(), fx.bus.clone())
        .await
        .unwrap();
    assert!(other.is_none());
}

#[tokio::test]
async fn color_enrichment_merges_without_moving_teams() {
    let fx = fixture().await;
    let mut session = seeded_session(&fx).await;

    // Placement happens while the (simulated) color fetch is in flight.
    session.place(Tier::S, 254, notes("excellent")).await.unwrap();

    let mut colors = HashMap::new();
    colors.insert(254, VerifiedColors { primary: "#0d47a1".into(), secondary: "#ffffff".into() });
    colors.insert(1678, VerifiedColors { primary: "#1b5e20".into(), secondary: "#ffd600".into() });
    colors.insert(9999, VerifiedColors { primary: "#000000".into(), secondary: "#ffffff".into() });

    let updated = session.apply_colors(&colors).await.unwrap();
    assert_eq!(updated, 2);

    // The placed team stays placed, now colored.
    assert_eq!(session.board().tier_of(254), Some(Tier::S));
    let placed = &session.board().tier(Tier::S)[0];
    assert_eq!(placed.primary_color.as_deref(), Some("#0d47a1"));

    // The pooled team is colored in place.
    let pooled = session.pool().get(1678).unwrap();
    assert_eq!(pooled.secondary_color.as_deref(), Some("#ffd600"));
}

#[tokio::test]
async fn mutations_announce_themselves_on_the_bus() {
    let fx = fixture().await;
    let mut rx = fx.bus.subscribe();
    let mut session = seeded_session(&fx).await;

    session.place(Tier::S, 254, notes("excellent")).await.unwrap();
    session.remove(Tier::S, 254).await.unwrap();

    let mut placed = 0;
    let mut removed = 0;
    let mut saved = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            SessionEvent::TeamPlaced { tier, team_id } => {
                assert_eq!((tier, team_id), (Tier::S, 254));
                placed += 1;
            }
            SessionEvent::TeamRemoved { tier, team_id } => {
                assert_eq!((tier, team_id), (Tier::S, 254));
                removed += 1;
            }
            SessionEvent::SnapshotSaved { event_key } => {
                assert_eq!(event_key, EVENT);
                saved += 1;
            }
            SessionEvent::SessionSeeded { .. } => {}
            other => panic!("unexpected event {:?}", other),
        }
    }

    assert_eq!(placed, 1);
    assert_eq!(removed, 1);
    // Seed + place + remove each persisted once.
    assert_eq!(saved, 3);
}
