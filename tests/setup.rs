//! Integration tests for the setup phase: registration, seeding, roster import.

use karate_bracket_web::{
    add_player, create_tournament, delete_tournament, generate_bracket, import_roster,
    remove_player, rename_player, shuffle_seeds, ErrorKind, MemoryStore, Store, TournamentError,
    TournamentId,
};

fn new_tournament(store: &mut MemoryStore) -> TournamentId {
    create_tournament(store, "Spring Kumite", 16).unwrap().id
}

fn names(store: &MemoryStore, tid: TournamentId) -> Vec<String> {
    store
        .players_by_tournament(tid)
        .into_iter()
        .map(|p| p.name)
        .collect()
}

fn positions(store: &MemoryStore, tid: TournamentId) -> Vec<u32> {
    store
        .players_by_tournament(tid)
        .iter()
        .map(|p| p.position)
        .collect()
}

#[test]
fn create_rejects_unsupported_sizes() {
    let mut store = MemoryStore::new();
    let err = create_tournament(&mut store, "Open", 24).unwrap_err();
    assert_eq!(err, TournamentError::InvalidBracketSize(24));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(store.tournaments().is_empty());
}

#[test]
fn players_get_contiguous_seed_positions() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    for name in ["Hana", "Kenji", " Mei "] {
        add_player(&mut store, tid, name).unwrap();
    }
    assert_eq!(names(&store, tid), ["Hana", "Kenji", "Mei"]);
    assert_eq!(positions(&store, tid), [1, 2, 3]);
}

#[test]
fn names_must_be_present_and_unique() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    add_player(&mut store, tid, "Hana").unwrap();
    assert_eq!(
        add_player(&mut store, tid, "hana"),
        Err(TournamentError::DuplicatePlayerName("hana".to_string()))
    );
    assert_eq!(add_player(&mut store, tid, "  "), Err(TournamentError::EmptyName));
}

#[test]
fn bracket_capacity_is_enforced() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    for i in 1..=16 {
        add_player(&mut store, tid, &format!("P{i}")).unwrap();
    }
    assert_eq!(
        add_player(&mut store, tid, "P17"),
        Err(TournamentError::TooManyPlayers {
            capacity: 16,
            count: 17
        })
    );
}

#[test]
fn removing_a_player_closes_the_gap() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    let ids: Vec<_> = ["A", "B", "C", "D"]
        .iter()
        .map(|n| add_player(&mut store, tid, n).unwrap().id)
        .collect();

    remove_player(&mut store, ids[1]).unwrap();
    assert_eq!(names(&store, tid), ["A", "C", "D"]);
    assert_eq!(positions(&store, tid), [1, 2, 3]);

    let e = add_player(&mut store, tid, "E").unwrap();
    assert_eq!(e.position, 4);
}

#[test]
fn shuffle_keeps_every_seed_once() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    for i in 1..=12 {
        add_player(&mut store, tid, &format!("P{i}")).unwrap();
    }
    let shuffled = shuffle_seeds(&mut store, tid).unwrap();
    let mut seen: Vec<u32> = shuffled.iter().map(|p| p.position).collect();
    seen.sort_unstable();
    assert_eq!(seen, (1..=12).collect::<Vec<u32>>());
    assert_eq!(shuffled.len(), 12);
}

#[test]
fn rename_checks_duplicates_but_allows_own_name() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    let a = add_player(&mut store, tid, "Aki").unwrap();
    add_player(&mut store, tid, "Ren").unwrap();

    assert_eq!(rename_player(&mut store, a.id, "AKI").unwrap().name, "AKI");
    assert_eq!(
        rename_player(&mut store, a.id, "ren"),
        Err(TournamentError::DuplicatePlayerName("ren".to_string()))
    );
    assert_eq!(store.player(a.id).unwrap().position, 1);
}

#[test]
fn roster_changes_are_locked_once_the_bracket_exists() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    let a = add_player(&mut store, tid, "A").unwrap();
    add_player(&mut store, tid, "B").unwrap();
    generate_bracket(&mut store, tid).unwrap();

    assert_eq!(
        add_player(&mut store, tid, "C").unwrap_err().kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        remove_player(&mut store, a.id).unwrap_err().kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        shuffle_seeds(&mut store, tid).unwrap_err().kind(),
        ErrorKind::Conflict
    );
    rename_player(&mut store, a.id, "Akira").unwrap();
}

#[test]
fn roster_import_skips_header_and_blank_rows() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    add_player(&mut store, tid, "Existing").unwrap();

    let csv = "name,club\nHana,Tokyo\n\n  Kenji ,Osaka\nMei\n";
    let added = import_roster(&mut store, tid, csv.as_bytes()).unwrap();
    assert_eq!(added.len(), 3);
    assert_eq!(names(&store, tid), ["Existing", "Hana", "Kenji", "Mei"]);
    assert_eq!(positions(&store, tid), [1, 2, 3, 4]);
}

#[test]
fn bad_roster_imports_nobody() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    let csv = "Hana\nKenji\nhana\n";
    assert_eq!(
        import_roster(&mut store, tid, csv.as_bytes()),
        Err(TournamentError::DuplicatePlayerName("hana".to_string()))
    );
    assert!(store.players_by_tournament(tid).is_empty());

    let too_many: String = (1..=17).map(|i| format!("P{i}\n")).collect();
    assert!(matches!(
        import_roster(&mut store, tid, too_many.as_bytes()),
        Err(TournamentError::TooManyPlayers { capacity: 16, .. })
    ));
    assert!(store.players_by_tournament(tid).is_empty());
}

#[test]
fn deleting_a_tournament_removes_everything() {
    let mut store = MemoryStore::new();
    let tid = new_tournament(&mut store);
    add_player(&mut store, tid, "A").unwrap();
    add_player(&mut store, tid, "B").unwrap();
    generate_bracket(&mut store, tid).unwrap();

    delete_tournament(&mut store, tid).unwrap();
    assert_eq!(
        store.tournament(tid),
        Err(TournamentError::TournamentNotFound(tid))
    );
    assert!(store.matches_by_tournament(tid).is_empty());
    assert_eq!(
        delete_tournament(&mut store, tid).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
