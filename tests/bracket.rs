//! Integration tests for bracket generation, byes and advancement.

use karate_bracket_web::logic::total_match_count;
use karate_bracket_web::{
    add_player, bracket_summary, build_bracket, complete_match, create_tournament,
    generate_bracket, record_point, ErrorKind, Match, MatchStatus, MemoryStore, Player,
    PointChange, ScoreCategory, Side, Store, Tournament, TournamentError, TournamentId,
    TournamentStatus,
};

/// Tournament with `n` players named S1..Sn in seed order. `size` may be any
/// power of two; it is patched in after creation for small brackets.
fn tournament_with_players(store: &mut MemoryStore, size: u32, n: usize) -> TournamentId {
    let mut t = create_tournament(store, "Kumite Open", 16).unwrap();
    if size != 16 {
        t.size = size;
        t.total_rounds = size.trailing_zeros();
        store.update_tournament(t.clone()).unwrap();
    }
    for i in 1..=n {
        add_player(store, t.id, &format!("S{i}")).unwrap();
    }
    t.id
}

fn player_named(store: &MemoryStore, tid: TournamentId, name: &str) -> Player {
    store
        .players_by_tournament(tid)
        .into_iter()
        .find(|p| p.name == name)
        .unwrap()
}

/// Give the first player an ippon and complete the match.
fn first_player_wins(store: &mut MemoryStore, m: &Match) -> Match {
    let p1 = m.player1_id.unwrap();
    record_point(store, m.id, p1, ScoreCategory::Ippon, PointChange::Add).unwrap();
    complete_match(store, m.id).unwrap()
}

#[test]
fn full_brackets_have_log2_rounds_and_a_single_final() {
    for size in [16, 32] {
        let mut store = MemoryStore::new();
        let tid = tournament_with_players(&mut store, size, size as usize);
        let matches = generate_bracket(&mut store, tid).unwrap();
        let t = store.tournament(tid).unwrap();

        assert_eq!(t.total_rounds, size.trailing_zeros());
        assert_eq!(matches.len() as u32, total_match_count(size));
        for round in 1..=t.total_rounds {
            assert_eq!(
                store.matches_by_round(tid, round).len() as u32,
                size >> round,
                "round {round} of {size}"
            );
        }
        assert_eq!(store.matches_by_round(tid, t.total_rounds).len(), 1);
        assert_eq!(t.status, TournamentStatus::Active);
        assert_eq!(t.current_round, 1);
    }
}

#[test]
fn first_round_pairs_seeds_in_order() {
    let mut store = MemoryStore::new();
    let tid = tournament_with_players(&mut store, 16, 16);
    generate_bracket(&mut store, tid).unwrap();
    let players = store.players_by_tournament(tid);

    for m in store.matches_by_round(tid, 1) {
        let i = (m.position as usize - 1) * 2;
        assert_eq!(m.player1_id, Some(players[i].id));
        assert_eq!(m.player2_id, Some(players[i + 1].id));
        assert_eq!(m.status, MatchStatus::Pending);
    }
    for m in store.matches_by_round(tid, 2) {
        assert_eq!((m.player1_id, m.player2_id), (None, None));
    }
}

#[test]
fn builder_checks_player_count() {
    let t = Tournament::new("Open", 16).unwrap();
    let players: Vec<Player> = (1..=17).map(|i| Player::new(t.id, format!("P{i}"), i)).collect();
    assert_eq!(
        build_bracket(&t, &players),
        Err(TournamentError::TooManyPlayers {
            capacity: 16,
            count: 17
        })
    );
    assert_eq!(
        build_bracket(&t, &players[..1]),
        Err(TournamentError::NotEnoughPlayers)
    );
}

#[test]
fn bracket_can_only_be_generated_once() {
    let mut store = MemoryStore::new();
    let tid = tournament_with_players(&mut store, 16, 4);
    generate_bracket(&mut store, tid).unwrap();
    let err = generate_bracket(&mut store, tid).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(store.matches_by_tournament(tid).len(), 15);
}

#[test]
fn winner_moves_to_half_position_in_parity_slot() {
    let mut store = MemoryStore::new();
    let tid = tournament_with_players(&mut store, 16, 16);
    generate_bracket(&mut store, tid).unwrap();
    let round_one = store.matches_by_round(tid, 1);

    let odd = first_player_wins(&mut store, &round_one[2]);
    let next = store.match_at(tid, 2, 2).unwrap();
    assert_eq!(next.player1_id, odd.winner_id);
    assert_eq!(next.player2_id, None);
    assert!(!next.is_ready());

    let even = first_player_wins(&mut store, &round_one[3]);
    let next = store.match_at(tid, 2, 2).unwrap();
    assert_eq!(next.player2_id, even.winner_id);
    assert!(next.is_ready());
}

#[test]
fn single_player_match_is_a_bye() {
    let mut store = MemoryStore::new();
    let tid = tournament_with_players(&mut store, 4, 3);
    generate_bracket(&mut store, tid).unwrap();
    let c = player_named(&store, tid, "S3");

    let bye = store.match_at(tid, 1, 2).unwrap();
    assert!(bye.bye);
    assert_eq!(bye.status, MatchStatus::Completed);
    assert_eq!(bye.winner_id, Some(c.id));

    let final_match = store.match_at(tid, 2, 1).unwrap();
    assert_eq!(final_match.player2_id, Some(c.id));
    assert_eq!(final_match.status, MatchStatus::Pending);
    assert_eq!(store.tournament(tid).unwrap().current_round, 1);

    let first = store.match_at(tid, 1, 1).unwrap();
    let won = first_player_wins(&mut store, &first);
    let final_match = store.match_at(tid, 2, 1).unwrap();
    assert_eq!(final_match.player1_id, won.winner_id);
    assert!(final_match.is_ready());
    assert_eq!(store.tournament(tid).unwrap().current_round, 2);
}

#[test]
fn empty_half_gives_the_final_as_a_bye() {
    let mut store = MemoryStore::new();
    let tid = tournament_with_players(&mut store, 4, 2);
    generate_bracket(&mut store, tid).unwrap();

    let first = store.match_at(tid, 1, 1).unwrap();
    let won = first_player_wins(&mut store, &first);

    let final_match = store.match_at(tid, 2, 1).unwrap();
    assert!(final_match.bye);
    assert_eq!(final_match.winner_id, won.winner_id);
    let t = store.tournament(tid).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.champion, won.winner_id);
}

#[test]
fn summary_skips_void_matches() {
    let mut store = MemoryStore::new();
    let tid = tournament_with_players(&mut store, 16, 10);
    generate_bracket(&mut store, tid).unwrap();

    let summary = bracket_summary(&store, tid).unwrap();
    // Round one 6..8 and round two 4 can never be fought.
    assert_eq!(summary.total_matches, 11);
    assert_eq!(summary.completed_matches, 0);
    assert_eq!(summary.rounds.len(), 4);
    assert_eq!(summary.rounds[3].name, "Final");
    assert_eq!(summary.rounds[0].name, "Round 1");
    assert_eq!(
        summary.next_match,
        Some(store.match_at(tid, 1, 1).unwrap().id)
    );

    // Seed 9 beats seed 10 and walks through round two and the semi final.
    let fifth = store.match_at(tid, 1, 5).unwrap();
    let won = first_player_wins(&mut store, &fifth);
    for (round, position) in [(2, 3), (3, 2)] {
        let walkover = store.match_at(tid, round, position).unwrap();
        assert!(walkover.bye, "round {round} position {position}");
        assert_eq!(walkover.winner_id, won.winner_id);
    }
    let final_match = store.match_at(tid, 4, 1).unwrap();
    assert_eq!(final_match.player2_id, won.winner_id);
    assert_eq!(final_match.player1_id, None);

    let summary = bracket_summary(&store, tid).unwrap();
    assert_eq!(summary.completed_matches, 3);
    assert_eq!(store.tournament(tid).unwrap().current_round, 1);
}

#[test]
fn playing_every_match_completes_the_tournament() {
    let mut store = MemoryStore::new();
    let tid = tournament_with_players(&mut store, 16, 16);
    generate_bracket(&mut store, tid).unwrap();
    let seed_one = player_named(&store, tid, "S1");

    for round in 1..=4 {
        for m in store.matches_by_round(tid, round) {
            first_player_wins(&mut store, &m);
        }
    }

    let t = store.tournament(tid).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.champion, Some(seed_one.id));
    for m in store.matches_by_tournament(tid) {
        assert_eq!(m.status, MatchStatus::Completed);
        let winner = m.winner_id.unwrap();
        let side = m.side_of(winner).unwrap();
        assert!(m.score(side) >= m.score(side.opponent()));
        assert_eq!(side, Side::First);
    }
    let summary = bracket_summary(&store, tid).unwrap();
    assert_eq!(summary.completed_matches, 15);
    assert_eq!(summary.next_match, None);
}
