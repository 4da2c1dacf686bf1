//! Three-way merge of keyed snapshots.
//!
//! The merge runs in two phases. First every snapshot is indexed by merge
//! identity and every identity in the union is classified (see
//! [`classify`](crate::decision::classify)). Only when classification
//! succeeded for all identities are the sinks invoked, so duplicate
//! identities or a rejected timestamp tie never leave partial output.
//!
//! Identities are visited in first-seen order across reference, then theirs,
//! then mine. For an identity that adopts theirs, the local record (if any)
//! is emitted to `removed` before the incoming record (if any) is emitted to
//! `added`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use reconcile_diff::Sink;

use crate::changeset::Changeset;
use crate::config::MergeConfig;
use crate::decision::{classify, Decision, Resolution};
use crate::entity::{MergeIdentity, Timestamped};
use crate::error::{MergeError, MergeResult, Side};

/// A conflict encountered during a merge, with its identity rendered via `Debug`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    /// The conflicting merge identity.
    pub id: String,
    /// How the conflict was settled.
    pub resolution: Resolution,
}

/// Summary of one merge: how every identity was classified and how many
/// operations were emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Distinct identities across all three snapshots.
    pub identities: usize,
    /// Identities neither side changed.
    pub unchanged: usize,
    /// Identities only theirs changed.
    pub adopted: usize,
    /// Identities only mine changed.
    pub kept_mine: usize,
    /// Identities both sides changed identically.
    pub converged: usize,
    /// Identities both sides changed differently.
    pub conflicts: Vec<ConflictRecord>,
    /// Records emitted to the `added` sink.
    pub added: usize,
    /// Records emitted to the `removed` sink.
    pub removed: usize,
}

impl MergeReport {
    /// Returns `true` if the merge emitted nothing.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }

    fn record(&mut self, decision: &Decision) {
        match decision {
            Decision::Unchanged => self.unchanged += 1,
            Decision::AdoptTheirs => self.adopted += 1,
            Decision::KeepMine => self.kept_mine += 1,
            Decision::Converged => self.converged += 1,
            Decision::Conflict(_) => {}
        }
    }
}

/// One classified identity waiting to be emitted.
struct Planned<'a, E> {
    decision: Decision,
    theirs: Option<&'a E>,
    mine: Option<&'a E>,
}

/// Merge with default configuration and collect the result.
///
/// ```
/// use reconcile_merge::three_way;
/// use reconcile_types::{Record, RecordId};
/// use serde_json::json;
///
/// let rec = |id: &str| Record::new(RecordId::new(id).unwrap(), json!(null));
/// let reference = [rec("a"), rec("b"), rec("c")];
/// let theirs = [rec("a"), rec("b"), rec("d")];
/// let mine = [rec("a"), rec("c"), rec("e")];
///
/// let changeset = three_way(&reference, &theirs, &mine).unwrap();
/// assert_eq!(changeset.added, vec![&theirs[2]]);
/// assert_eq!(changeset.removed, vec![&mine[1]]);
/// ```
pub fn three_way<'a, E>(
    reference: &'a [E],
    theirs: &'a [E],
    mine: &'a [E],
) -> MergeResult<Changeset<'a, E>>
where
    E: MergeIdentity + Timestamped + PartialEq,
{
    let mut changeset = Changeset::new();
    three_way_into(
        reference,
        theirs,
        mine,
        &mut changeset.added,
        &mut changeset.removed,
    )?;
    Ok(changeset)
}

/// Merge with default configuration, reporting operations through sinks.
pub fn three_way_into<'a, E, A, R>(
    reference: &'a [E],
    theirs: &'a [E],
    mine: &'a [E],
    added: A,
    removed: R,
) -> MergeResult<MergeReport>
where
    E: MergeIdentity + Timestamped + PartialEq,
    A: Sink<&'a E>,
    R: Sink<&'a E>,
{
    three_way_with(
        &MergeConfig::default(),
        reference,
        theirs,
        mine,
        added,
        removed,
    )
}

/// Merge with explicit configuration, reporting operations through sinks.
pub fn three_way_with<'a, E, A, R>(
    config: &MergeConfig,
    reference: &'a [E],
    theirs: &'a [E],
    mine: &'a [E],
    added: A,
    removed: R,
) -> MergeResult<MergeReport>
where
    E: MergeIdentity + Timestamped + PartialEq,
    A: Sink<&'a E>,
    R: Sink<&'a E>,
{
    three_way_by(
        config,
        reference,
        theirs,
        mine,
        E::merge_id,
        E::timestamp,
        added,
        removed,
    )
}

/// Merge using accessor closures for identity and timestamp.
///
/// Content equality is `E`'s [`PartialEq`]. `key` must yield a value unique
/// within each snapshot; a repeated key fails the merge with
/// [`MergeError::DuplicateIdentity`] before anything is emitted.
#[allow(clippy::too_many_arguments)]
pub fn three_way_by<'a, E, K, S, KF, SF, A, R>(
    config: &MergeConfig,
    reference: &'a [E],
    theirs: &'a [E],
    mine: &'a [E],
    key: KF,
    stamp: SF,
    mut added: A,
    mut removed: R,
) -> MergeResult<MergeReport>
where
    E: PartialEq,
    K: Eq + Hash + Debug,
    S: Ord,
    KF: Fn(&'a E) -> K,
    SF: Fn(&E) -> S,
    A: Sink<&'a E>,
    R: Sink<&'a E>,
{
    let reference_index = index_snapshot(Side::Reference, reference, &key)?;
    let theirs_index = index_snapshot(Side::Theirs, theirs, &key)?;
    let mine_index = index_snapshot(Side::Mine, mine, &key)?;

    let mut report = MergeReport::default();
    let mut plan: Vec<Planned<'a, E>> = Vec::new();

    let candidates = reference
        .iter()
        .map(|e| (Side::Reference, e))
        .chain(theirs.iter().map(|e| (Side::Theirs, e)))
        .chain(mine.iter().map(|e| (Side::Mine, e)));

    for (side, element) in candidates {
        let id = key(element);
        let seen_earlier = match side {
            Side::Reference => false,
            Side::Theirs => reference_index.contains_key(&id),
            Side::Mine => reference_index.contains_key(&id) || theirs_index.contains_key(&id),
        };
        if seen_earlier {
            continue;
        }

        let r = reference_index.get(&id).copied();
        let t = theirs_index.get(&id).copied();
        let m = mine_index.get(&id).copied();
        let decision = classify(r, t, m, &stamp, config.tie_break);

        report.identities += 1;
        report.record(&decision);

        if let Decision::Conflict(resolution) = decision {
            if resolution == Resolution::TieRejected {
                warn!(id = ?id, "conflicting edits share a timestamp; rejecting merge");
                return Err(MergeError::TimestampTie {
                    id: format!("{id:?}"),
                });
            }
            debug!(id = ?id, resolution = ?resolution, "conflict resolved");
            report.conflicts.push(ConflictRecord {
                id: format!("{id:?}"),
                resolution,
            });
        }

        plan.push(Planned {
            decision,
            theirs: t,
            mine: m,
        });
    }

    for step in plan.into_iter().filter(|p| p.decision.adopts_theirs()) {
        if let Some(local) = step.mine {
            removed.accept(local);
            report.removed += 1;
        }
        if let Some(incoming) = step.theirs {
            added.accept(incoming);
            report.added += 1;
        }
    }

    debug!(
        identities = report.identities,
        unchanged = report.unchanged,
        adopted = report.adopted,
        kept_mine = report.kept_mine,
        converged = report.converged,
        conflicts = report.conflicts.len(),
        added = report.added,
        removed = report.removed,
        "three-way merge complete"
    );
    Ok(report)
}

fn index_snapshot<'a, E, K, KF>(
    side: Side,
    snapshot: &'a [E],
    key: &KF,
) -> MergeResult<HashMap<K, &'a E>>
where
    K: Eq + Hash + Debug,
    KF: Fn(&'a E) -> K,
{
    let mut index = HashMap::with_capacity(snapshot.len());
    for element in snapshot {
        let id = key(element);
        if index.contains_key(&id) {
            warn!(side = %side, id = ?id, "duplicate merge identity");
            return Err(MergeError::DuplicateIdentity {
                side,
                id: format!("{id:?}"),
            });
        }
        index.insert(id, element);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TieBreak;
    use proptest::prelude::*;
    use reconcile_diff::from_fn;
    use reconcile_types::{Record, RecordId, Timestamp};
    use serde_json::{json, Value};

    fn rec(id: &str) -> Record {
        Record::new(RecordId::new(id).unwrap(), Value::Null)
    }

    fn rec_at(id: &str, data: &str, (y, m, d): (i32, u32, u32)) -> Record {
        Record::new(RecordId::new(id).unwrap(), json!(data))
            .modified_at(Timestamp::from_ymd(y, m, d).unwrap())
    }

    fn list(ids: &[&str]) -> Vec<Record> {
        ids.iter().map(|id| rec(id)).collect()
    }

    fn panicking<'a>(kind: &'static str) -> impl Sink<&'a Record> {
        from_fn(move |e: &'a Record| panic!("{e:?} should not be detected as {kind}"))
    }

    #[test]
    fn identical_sides_emit_nothing() {
        let snapshot = list(&["1"]);
        let report = three_way_into(
            &[],
            &snapshot,
            &snapshot,
            panicking("added"),
            panicking("removed"),
        )
        .unwrap();
        assert!(report.is_noop());
        assert_eq!(report.identities, 1);
        assert_eq!(report.converged, 1);
    }

    #[test]
    fn adds_and_removes() {
        let reference = list(&["a", "b", "c"]);
        let theirs = list(&["a", "b", "d"]);
        let mine = list(&["a", "c", "e"]);

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let report = three_way_into(&reference, &theirs, &mine, &mut added, &mut removed).unwrap();

        assert_eq!(added, vec![&rec("d")]);
        assert_eq!(removed, vec![&rec("c")]);
        // b: mine deleted it, theirs did not touch it. e: mine added it.
        assert_eq!(report.kept_mine, 2);
        assert_eq!(report.adopted, 2);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.identities, 5);
    }

    #[test]
    fn modifications_and_conflicts() {
        let reference = list(&["a", "b", "c", "d", "e"]);
        let theirs = vec![
            rec("a"),
            rec_at("b", "123", (2000, 1, 1)),
            rec("c"),
            rec_at("d", "456", (2000, 1, 1)),
            rec_at("e", "789", (2999, 1, 1)),
        ];
        let mine = vec![
            rec("a"),
            rec("b"),
            rec_at("c", "abc", (2000, 1, 1)),
            rec_at("d", "def", (2999, 1, 1)),
            rec_at("e", "ghi", (2000, 1, 1)),
        ];

        let changeset = three_way(&reference, &theirs, &mine).unwrap();

        assert_eq!(changeset.removed, vec![&mine[1], &mine[4]]);
        assert_eq!(changeset.added, vec![&theirs[1], &theirs[4]]);
        // Pointer identity: emitted records are borrows of the inputs.
        assert!(std::ptr::eq(changeset.added[1], &theirs[4]));
        assert!(std::ptr::eq(changeset.removed[1], &mine[4]));
    }

    #[test]
    fn conflict_report_lists_both_resolutions() {
        let reference = list(&["d", "e"]);
        let theirs = vec![
            rec_at("d", "456", (2000, 1, 1)),
            rec_at("e", "789", (2999, 1, 1)),
        ];
        let mine = vec![
            rec_at("d", "def", (2999, 1, 1)),
            rec_at("e", "ghi", (2000, 1, 1)),
        ];

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let report = three_way_into(&reference, &theirs, &mine, &mut added, &mut removed).unwrap();

        assert_eq!(
            report.conflicts,
            vec![
                ConflictRecord {
                    id: "RecordId(d)".into(),
                    resolution: Resolution::MineNewer,
                },
                ConflictRecord {
                    id: "RecordId(e)".into(),
                    resolution: Resolution::TheirsNewer,
                },
            ]
        );
        assert_eq!(added, vec![&theirs[1]]);
        assert_eq!(removed, vec![&mine[1]]);
    }

    #[test]
    fn theirs_deletes_unchanged_record() {
        let reference = list(&["a", "b"]);
        let theirs = list(&["a"]);
        let mine = list(&["a", "b"]);

        let changeset = three_way(&reference, &theirs, &mine).unwrap();
        assert!(changeset.added.is_empty());
        assert_eq!(changeset.removed, vec![&mine[1]]);
    }

    #[test]
    fn touched_record_counts_as_unchanged() {
        let reference = vec![rec_at("a", "x", (2000, 1, 1))];
        let theirs = vec![rec_at("a", "x", (2500, 1, 1))];
        let mine = vec![rec_at("a", "y", (2001, 1, 1))];

        let changeset = three_way(&reference, &theirs, &mine).unwrap();
        assert!(changeset.is_empty());
    }

    #[test]
    fn edit_restored_over_local_delete() {
        let reference = list(&["a"]);
        let theirs = vec![rec_at("a", "edited", (2000, 1, 1))];
        let mine: Vec<Record> = Vec::new();

        let changeset = three_way(&reference, &theirs, &mine).unwrap();
        assert_eq!(changeset.added, vec![&theirs[0]]);
        assert!(changeset.removed.is_empty());
    }

    #[test]
    fn local_edit_survives_remote_delete() {
        let reference = list(&["a"]);
        let theirs: Vec<Record> = Vec::new();
        let mine = vec![rec_at("a", "edited", (2000, 1, 1))];

        let changeset = three_way(&reference, &theirs, &mine).unwrap();
        assert!(changeset.is_empty());
    }

    #[test]
    fn emission_follows_first_seen_order() {
        let reference = list(&["r1", "r2"]);
        let theirs = list(&["t1", "r1", "t2"]);
        let mine = list(&["r1", "r2"]);

        let mut order = Vec::new();
        three_way_into(
            &reference,
            &theirs,
            &mine,
            from_fn(|e: &Record| order.push(format!("+{}", e.id))),
            &mut Vec::<&Record>::new(),
        )
        .unwrap();
        assert_eq!(order, vec!["+t1", "+t2"]);
    }

    #[test]
    fn removal_precedes_addition_for_one_identity() {
        let reference = list(&["a"]);
        let theirs = vec![rec_at("a", "new", (2000, 1, 1))];
        let mine = list(&["a"]);

        let events = std::cell::RefCell::new(Vec::new());
        three_way_into(
            &reference,
            &theirs,
            &mine,
            from_fn(|e: &Record| events.borrow_mut().push(format!("+{}", e.id))),
            from_fn(|e: &Record| events.borrow_mut().push(format!("-{}", e.id))),
        )
        .unwrap();
        assert_eq!(events.into_inner(), vec!["-a", "+a"]);
    }

    #[test]
    fn duplicate_identity_fails_without_output() {
        let reference = list(&["a"]);
        let theirs = list(&["b", "b"]);
        let mine = list(&["c"]);

        let err = three_way_into(
            &reference,
            &theirs,
            &mine,
            panicking("added"),
            panicking("removed"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MergeError::DuplicateIdentity {
                side: Side::Theirs,
                id: "RecordId(b)".into(),
            }
        );
    }

    #[test]
    fn duplicate_in_reference_detected() {
        let reference = list(&["a", "a"]);
        let err = three_way(&reference, &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            MergeError::DuplicateIdentity {
                side: Side::Reference,
                ..
            }
        ));
    }

    fn tie_inputs() -> (Vec<Record>, Vec<Record>, Vec<Record>) {
        (
            list(&["a", "z"]),
            vec![
                rec_at("a", "new", (2001, 1, 1)),
                rec_at("z", "theirs", (2020, 5, 5)),
            ],
            // `a` is adopted before `z` is seen, so a rejected tie must still
            // leave the sinks untouched.
            vec![rec("a"), rec_at("z", "mine", (2020, 5, 5))],
        )
    }

    #[test]
    fn tie_keeps_mine_by_default() {
        let (reference, theirs, mine) = tie_inputs();
        let mut added = Vec::new();
        let mut removed = Vec::new();
        let report = three_way_into(&reference, &theirs, &mine, &mut added, &mut removed).unwrap();

        assert_eq!(added, vec![&theirs[0]]);
        assert_eq!(removed, vec![&mine[0]]);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].resolution, Resolution::TieKeptMine);
    }

    #[test]
    fn tie_adopts_theirs_when_configured() {
        let (reference, theirs, mine) = tie_inputs();
        let mut added = Vec::new();
        let mut removed = Vec::new();
        three_way_with(
            &MergeConfig::with_tie_break(TieBreak::AdoptTheirs),
            &reference,
            &theirs,
            &mine,
            &mut added,
            &mut removed,
        )
        .unwrap();

        assert_eq!(added, vec![&theirs[0], &theirs[1]]);
        assert_eq!(removed, vec![&mine[0], &mine[1]]);
    }

    #[test]
    fn tie_rejected_without_output() {
        let (reference, theirs, mine) = tie_inputs();
        let err = three_way_with(
            &MergeConfig::with_tie_break(TieBreak::Reject),
            &reference,
            &theirs,
            &mine,
            panicking("added"),
            panicking("removed"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MergeError::TimestampTie {
                id: "RecordId(z)".into()
            }
        );
    }

    #[test]
    fn accessor_functions_on_plain_tuples() {
        // (key, content, stamp); equality over the whole tuple would count
        // timestamps, so content is compared through a wrapper.
        #[derive(Debug)]
        struct Row(&'static str, i32, u64);
        impl PartialEq for Row {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0 && self.1 == other.1
            }
        }

        let reference = [Row("k", 1, 0)];
        let theirs = [Row("k", 2, 10)];
        let mine = [Row("k", 3, 5)];

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let report = three_way_by(
            &MergeConfig::default(),
            &reference,
            &theirs,
            &mine,
            |r: &Row| r.0,
            |r: &Row| r.2,
            &mut added,
            &mut removed,
        )
        .unwrap();

        assert_eq!(added, vec![&theirs[0]]);
        assert_eq!(removed, vec![&mine[0]]);
        assert_eq!(report.conflicts[0].id, "\"k\"");
    }

    #[test]
    fn empty_inputs() {
        let empty: Vec<Record> = Vec::new();
        let changeset = three_way(&empty, &empty, &empty).unwrap();
        assert!(changeset.is_empty());
    }

    #[test]
    fn report_serializes() {
        let report = MergeReport {
            identities: 1,
            conflicts: vec![ConflictRecord {
                id: "x".into(),
                resolution: Resolution::TieKeptMine,
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["conflicts"][0]["resolution"], "tie-kept-mine");
    }

    // ---------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------

    #[derive(Clone, Debug)]
    struct Item {
        id: u8,
        data: u8,
        ts: u8,
    }

    impl PartialEq for Item {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id && self.data == other.data
        }
    }

    impl MergeIdentity for Item {
        type Id = u8;
        fn merge_id(&self) -> &u8 {
            &self.id
        }
    }

    impl Timestamped for Item {
        type Stamp = u8;
        fn timestamp(&self) -> u8 {
            self.ts
        }
    }

    fn snapshot() -> impl Strategy<Value = Vec<Item>> {
        proptest::collection::btree_map(0u8..8, (0u8..3, 0u8..5), 0..8).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(id, (data, ts))| Item { id, data, ts })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn identical_sides_are_noop(reference in snapshot(), both in snapshot()) {
            let changeset = three_way(&reference, &both, &both).unwrap();
            prop_assert!(changeset.is_empty());
        }

        #[test]
        fn unchanged_theirs_preserves_mine(reference in snapshot(), mine in snapshot()) {
            let theirs = reference.clone();
            let changeset = three_way(&reference, &theirs, &mine).unwrap();
            prop_assert!(changeset.is_empty());
        }

        #[test]
        fn later_timestamp_survives(
            t_data in 0u8..3,
            m_shift in 1u8..3,
            t_ts in 0u8..10,
            m_ts in 0u8..10,
        ) {
            prop_assume!(t_ts != m_ts);
            let m_data = (t_data + m_shift) % 3;
            let reference = vec![Item { id: 1, data: 100, ts: 0 }];
            let theirs = vec![Item { id: 1, data: t_data, ts: t_ts }];
            let mine = vec![Item { id: 1, data: m_data, ts: m_ts }];

            let merged = three_way(&reference, &theirs, &mine).unwrap().apply(&mine);
            prop_assert_eq!(merged.len(), 1);
            let expected = if t_ts > m_ts { &theirs[0] } else { &mine[0] };
            prop_assert_eq!(&merged[0], expected);
        }

        #[test]
        fn at_most_one_operation_pair_per_identity(
            reference in snapshot(),
            theirs in snapshot(),
            mine in snapshot(),
        ) {
            let changeset = three_way(&reference, &theirs, &mine).unwrap();
            let mut added: Vec<u8> = changeset.added.iter().map(|e| e.id).collect();
            let mut removed: Vec<u8> = changeset.removed.iter().map(|e| e.id).collect();
            added.sort_unstable();
            added.dedup();
            removed.sort_unstable();
            removed.dedup();
            prop_assert_eq!(added.len(), changeset.added.len());
            prop_assert_eq!(removed.len(), changeset.removed.len());

            // Applying never leaves two records with one identity.
            let merged = changeset.apply(&mine);
            let mut ids: Vec<u8> = merged.iter().map(|e| e.id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), merged.len());
        }
    }
}
