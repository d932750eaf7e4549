#![forbid(unsafe_code)]
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use roulement::{Enterprise, Registry, ShiftResolver, ShiftTemplate, WorkMode, WorkModeId};

/// Découpe la journée aux minutes `cuts` ; la numérotation commence au segment `rotation`.
fn partition(cuts: &[u32], rotation: usize) -> (Registry, WorkModeId) {
    let mut reg = Registry::default();
    let ent = reg.add_enterprise(Enterprise::new("Usine", "UTC")).unwrap();
    let wm = reg.add_work_mode(WorkMode::new(ent, "cycle")).unwrap();
    let k = cuts.len();
    for i in 0..k {
        let start = cuts[i] * 60;
        let end = cuts[(i + 1) % k] * 60;
        let number = ((i + k - rotation % k) % k + 1) as u16;
        let t = ShiftTemplate::new(wm.clone(), format!("P{number}"), number, start, end).unwrap();
        reg.add_shift(t).unwrap();
    }
    (reg, wm)
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
}

fn cuts_strategy() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::btree_set(0u32..1440, 2..6).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #[test]
    fn resolved_window_contains_the_instant(
        cuts in cuts_strategy(),
        rotation in 0usize..6,
        offset in 0i64..(86_400 * 40),
    ) {
        let (reg, wm) = partition(&cuts, rotation);
        let at = base() + TimeDelta::seconds(offset);
        let shift = ShiftResolver::new(&reg).resolve(&wm, &at).unwrap();
        prop_assert!(shift.start <= at && at < shift.end);
    }

    #[test]
    fn next_then_prev_is_identity(
        cuts in cuts_strategy(),
        rotation in 0usize..6,
        offset in 0i64..(86_400 * 40),
    ) {
        let (reg, wm) = partition(&cuts, rotation);
        let resolver = ShiftResolver::new(&reg);
        let at = base() + TimeDelta::seconds(offset);
        let shift = resolver.resolve(&wm, &at).unwrap();
        let back = resolver.prev(&resolver.next(&shift).unwrap()).unwrap();
        prop_assert_eq!(&back.template, &shift.template);
        prop_assert_eq!(back.start, shift.start);
        prop_assert_eq!(back.end, shift.end);
    }

    #[test]
    fn counted_sequences_are_contiguous(
        cuts in cuts_strategy(),
        rotation in 0usize..6,
        offset in 0i64..(86_400 * 40),
        count in 2i64..20,
        backward in any::<bool>(),
    ) {
        let (reg, wm) = partition(&cuts, rotation);
        let at = base() + TimeDelta::seconds(offset);
        let limit = if backward { -count } else { count };
        let shifts = ShiftResolver::new(&reg).sequence(&wm, &at, limit).unwrap();
        prop_assert_eq!(shifts.len() as i64, count);
        for pair in shifts.windows(2) {
            if backward {
                prop_assert_eq!(pair[0].start, pair[1].end);
            } else {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }

    #[test]
    fn instant_sequences_end_on_the_target(
        cuts in cuts_strategy(),
        rotation in 0usize..6,
        offset in 0i64..(86_400 * 10),
        distance in -(86_400i64 * 5)..(86_400 * 5),
    ) {
        let (reg, wm) = partition(&cuts, rotation);
        let at = base() + TimeDelta::days(10) + TimeDelta::seconds(offset);
        let target = at + TimeDelta::seconds(distance);
        let shifts = ShiftResolver::new(&reg).sequence(&wm, &at, target).unwrap();
        let last = shifts.last().unwrap();
        prop_assert!(last.contains(&target));
        prop_assert!(shifts[..shifts.len() - 1].iter().all(|s| !s.contains(&target)));
    }
}
