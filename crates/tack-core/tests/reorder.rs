//! Scenario coverage for the reorder engine: minimal-span shifts, lane
//! transfers, bounds rejection, and the soft-delete/restore policy.

use tack_core::{CardDraft, CardFilter, CardScope, Error, Lane, Store, TargetError};

fn scope(lane: Lane) -> CardScope {
    CardScope::new(None, lane)
}

/// Create `titles.len()` cards in `lane`, returning their ids in rank order.
fn seed(store: &mut Store, lane: Lane, titles: &[&str]) -> Vec<String> {
    titles
        .iter()
        .map(|title| {
            store
                .create_card(&scope(lane), CardDraft::titled(*title))
                .expect("seed card")
                .id
        })
        .collect()
}

fn ordered_ids(store: &Store, lane: Lane) -> Vec<String> {
    store
        .cards(&CardFilter {
            lane: Some(lane),
            ..CardFilter::default()
        })
        .expect("list lane")
        .into_iter()
        .map(|card| card.id)
        .collect()
}

#[test]
fn move_to_front_rotates_the_span() {
    let mut store = Store::open_in_memory().expect("open");
    let ids = seed(&mut store, Lane::Backlog, &["a", "b", "c"]);

    let result = store
        .move_card(&ids[2], &scope(Lane::Backlog), 0)
        .expect("move c to front");

    let got: Vec<(&str, i64)> = result
        .iter()
        .map(|card| (card.id.as_str(), card.rank))
        .collect();
    assert_eq!(
        got,
        vec![(ids[2].as_str(), 0), (ids[0].as_str(), 1), (ids[1].as_str(), 2)]
    );
}

#[test]
fn cross_lane_move_closes_and_opens() {
    let mut store = Store::open_in_memory().expect("open");
    let backlog = seed(&mut store, Lane::Backlog, &["a", "b"]);
    let done = seed(&mut store, Lane::Done, &["x"]);

    let result = store
        .move_card(&backlog[0], &scope(Lane::Done), 1)
        .expect("move a to done tail");

    // Returned set covers both partitions, source first, each rank-ordered.
    let got: Vec<(&str, Lane, i64)> = result
        .iter()
        .map(|card| (card.id.as_str(), card.lane, card.rank))
        .collect();
    assert_eq!(
        got,
        vec![
            (backlog[1].as_str(), Lane::Backlog, 0),
            (done[0].as_str(), Lane::Done, 0),
            (backlog[0].as_str(), Lane::Done, 1),
        ]
    );

    assert_eq!(ordered_ids(&store, Lane::Backlog), vec![backlog[1].clone()]);
    assert_eq!(
        ordered_ids(&store, Lane::Done),
        vec![done[0].clone(), backlog[0].clone()]
    );
}

#[test]
fn unknown_id_is_not_found_and_leaves_store_unchanged() {
    let mut store = Store::open_in_memory().expect("open");
    seed(&mut store, Lane::Backlog, &["a", "b", "c"]);
    let before = store.cards(&CardFilter::default()).expect("snapshot");

    let err = store
        .move_card("cd-nonexistent", &scope(Lane::Backlog), 0)
        .expect_err("unknown id");
    assert!(matches!(err, Error::NotFound { .. }));

    let after = store.cards(&CardFilter::default()).expect("snapshot");
    assert_eq!(before, after);
}

#[test]
fn deleted_card_cannot_be_moved() {
    let mut store = Store::open_in_memory().expect("open");
    let ids = seed(&mut store, Lane::Backlog, &["a", "b"]);
    store.delete_card(&ids[0]).expect("delete");

    let err = store
        .move_card(&ids[0], &scope(Lane::Backlog), 0)
        .expect_err("deleted mover");
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn noop_move_is_byte_for_byte_idempotent() {
    let mut store = Store::open_in_memory().expect("open");
    let ids = seed(&mut store, Lane::Backlog, &["a", "b", "c"]);
    let before = store
        .cards(&CardFilter {
            include_deleted: true,
            ..CardFilter::default()
        })
        .expect("snapshot");

    let current_rank = store.get_card(&ids[1]).expect("get").rank;
    let result = store
        .move_card(&ids[1], &scope(Lane::Backlog), current_rank)
        .expect("no-op move");
    assert_eq!(result.len(), 3);

    let after = store
        .cards(&CardFilter {
            include_deleted: true,
            ..CardFilter::default()
        })
        .expect("snapshot");
    assert_eq!(before, after, "no-op must not write anything, timestamps included");
}

#[test]
fn shift_is_proportional_to_distance() {
    let mut store = Store::open_in_memory().expect("open");
    let titles: Vec<String> = (0..10).map(|i| format!("card {i}")).collect();
    let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let ids = seed(&mut store, Lane::Backlog, &title_refs);
    let before = store.cards(&CardFilter::default()).expect("snapshot");

    store
        .move_card(&ids[5], &scope(Lane::Backlog), 2)
        .expect("move 5 -> 2");

    let after = store.cards(&CardFilter::default()).expect("snapshot");
    for prev in before.iter().filter(|card| card.id != ids[5]) {
        let row = after
            .iter()
            .find(|card| card.id == prev.id)
            .expect("row survives");
        if (2..5).contains(&prev.rank) {
            // Exactly the three cards at ranks 2, 3, 4 slide up by one.
            assert_eq!(row.rank, prev.rank + 1, "card {}", prev.title);
        } else {
            // Everything outside [2, 5] is untouched entirely.
            assert_eq!(row, prev, "card {}", prev.title);
        }
    }
    assert_eq!(
        store.get_card(&ids[5]).expect("mover").rank,
        2,
        "mover lands exactly at the requested rank"
    );
    assert!(store.audit().expect("audit").is_empty());
}

#[test]
fn cross_partition_conservation() {
    let mut store = Store::open_in_memory().expect("open");
    let a_ids = seed(&mut store, Lane::Backlog, &["a0", "a1", "a2", "a3"]);
    let _b_ids = seed(&mut store, Lane::Review, &["b0", "b1", "b2"]);

    let k = 2;
    store
        .move_card(&a_ids[1], &scope(Lane::Review), k)
        .expect("transfer");

    let source = store
        .cards(&CardFilter {
            lane: Some(Lane::Backlog),
            ..CardFilter::default()
        })
        .expect("source");
    let dest = store
        .cards(&CardFilter {
            lane: Some(Lane::Review),
            ..CardFilter::default()
        })
        .expect("dest");

    assert_eq!(source.len(), 3);
    assert_eq!(dest.len(), 4);
    let source_ranks: Vec<i64> = source.iter().map(|card| card.rank).collect();
    let dest_ranks: Vec<i64> = dest.iter().map(|card| card.rank).collect();
    assert_eq!(source_ranks, vec![0, 1, 2]);
    assert_eq!(dest_ranks, vec![0, 1, 2, 3]);
    assert_eq!(dest[usize::try_from(k).expect("k fits")].id, a_ids[1]);
}

#[test]
fn rank_bounds_are_enforced() {
    let mut store = Store::open_in_memory().expect("open");
    let ids = seed(&mut store, Lane::Backlog, &["a", "b", "c"]);
    seed(&mut store, Lane::Done, &["x"]);

    // Within one lane the tail is len - 1.
    let err = store
        .move_card(&ids[0], &scope(Lane::Backlog), 3)
        .expect_err("beyond same-lane tail");
    assert!(matches!(
        err,
        Error::InvalidTarget(TargetError::RankOutOfRange { requested: 3, max: 2 })
    ));

    let err = store
        .move_card(&ids[0], &scope(Lane::Backlog), -1)
        .expect_err("negative rank");
    assert!(matches!(
        err,
        Error::InvalidTarget(TargetError::RankOutOfRange { requested: -1, .. })
    ));

    // Across lanes the tail append (rank == len) is legal...
    store
        .move_card(&ids[0], &scope(Lane::Done), 1)
        .expect("tail append into done");
    // ...but one past it is not.
    let err = store
        .move_card(&ids[1], &scope(Lane::Done), 3)
        .expect_err("beyond cross-lane tail");
    assert!(matches!(
        err,
        Error::InvalidTarget(TargetError::RankOutOfRange { requested: 3, max: 2 })
    ));

    // Rejected moves leave no partial shifts behind.
    assert!(store.audit().expect("audit").is_empty());
}

#[test]
fn move_to_unknown_board_is_invalid_target() {
    let mut store = Store::open_in_memory().expect("open");
    let ids = seed(&mut store, Lane::Backlog, &["a"]);

    let dest = CardScope::new(Some("bd-missing".into()), Lane::Backlog);
    let err = store
        .move_card(&ids[0], &dest, 0)
        .expect_err("unknown board");
    assert!(matches!(
        err,
        Error::InvalidTarget(TargetError::UnknownBoard { .. })
    ));

    // A soft-deleted board is no better a target.
    let board = store.create_board("old").expect("board");
    store.delete_board(&board.id).expect("delete board");
    let dest = CardScope::new(Some(board.id.clone()), Lane::Backlog);
    let err = store
        .move_card(&ids[0], &dest, 0)
        .expect_err("deleted board");
    assert!(matches!(
        err,
        Error::InvalidTarget(TargetError::UnknownBoard { .. })
    ));
}

#[test]
fn restore_appends_at_tail() {
    let mut store = Store::open_in_memory().expect("open");
    let ids = seed(&mut store, Lane::Backlog, &["a", "b", "c"]);

    store.delete_card(&ids[0]).expect("delete a");
    // The old rank 0 is immediately reused by the compaction...
    assert_eq!(ordered_ids(&store, Lane::Backlog), vec![ids[1].clone(), ids[2].clone()]);

    // ...so restore cannot go back to it and appends instead.
    let restored = store.restore_card(&ids[0]).expect("restore a");
    assert_eq!(restored.rank, 2);
    assert_eq!(
        ordered_ids(&store, Lane::Backlog),
        vec![ids[1].clone(), ids[2].clone(), ids[0].clone()]
    );
    assert!(store.audit().expect("audit").is_empty());
}

#[test]
fn moves_between_boards_keep_both_dense() {
    let mut store = Store::open_in_memory().expect("open");
    let roadmap = store.create_board("roadmap").expect("roadmap");
    let launch = store.create_board("launch").expect("launch");

    let src = CardScope::new(Some(roadmap.id.clone()), Lane::InProgress);
    let dst = CardScope::new(Some(launch.id.clone()), Lane::InProgress);
    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(
            store
                .create_card(&src, CardDraft::titled(format!("c{i}")))
                .expect("create")
                .id,
        );
    }

    store.move_card(&ids[1], &dst, 0).expect("cross-board move");

    let src_cards = store
        .cards(&CardFilter {
            board: Some(roadmap.id.clone()),
            ..CardFilter::default()
        })
        .expect("src");
    let dst_cards = store
        .cards(&CardFilter {
            board: Some(launch.id.clone()),
            ..CardFilter::default()
        })
        .expect("dst");
    assert_eq!(src_cards.len(), 2);
    assert_eq!(dst_cards.len(), 1);
    assert_eq!(dst_cards[0].id, ids[1]);
    assert_eq!(dst_cards[0].rank, 0);
    assert!(store.audit().expect("audit").is_empty());
}
