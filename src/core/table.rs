//! Static table of manually requestable transitions.

use super::state::HaulerStatus;

/// Targets reachable from `from` by a manual intent.
///
/// Every non-idle status can abort to `STANDBY`; otherwise the table only
/// admits moving forward around the cycle, plus the `SPOTTING -> QUEUING`
/// back-off when a loader turns a hauler away.
pub const fn allowed_targets(from: HaulerStatus) -> &'static [HaulerStatus] {
    use HaulerStatus::*;
    match from {
        Standby => &[Queuing],
        Queuing => &[Spotting, Standby],
        Spotting => &[Loading, Queuing, Standby],
        Loading => &[HaulingLoad, Standby],
        HaulingLoad => &[Dumping, Standby],
        Dumping => &[HaulingEmpty, Standby],
        HaulingEmpty => &[Queuing, Standby],
    }
}

/// Check table membership for `from -> to` (pure).
pub fn is_allowed(from: HaulerStatus, to: HaulerStatus) -> bool {
    allowed_targets(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use HaulerStatus::*;

    #[test]
    fn standby_only_leads_to_queuing() {
        assert_eq!(allowed_targets(Standby), &[Queuing]);
        assert!(!is_allowed(Standby, Standby));
        assert!(!is_allowed(Standby, Loading));
    }

    #[test]
    fn every_other_status_can_abort_to_standby() {
        for status in HaulerStatus::ALL {
            if status != Standby {
                assert!(is_allowed(status, Standby), "{status} cannot abort");
            }
        }
    }

    #[test]
    fn happy_path_loop_is_allowed() {
        let path = [
            HaulingEmpty,
            Queuing,
            Spotting,
            Loading,
            HaulingLoad,
            Dumping,
            HaulingEmpty,
        ];
        for pair in path.windows(2) {
            assert!(is_allowed(pair[0], pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn skipping_ahead_is_rejected() {
        assert!(!is_allowed(Queuing, Loading));
        assert!(!is_allowed(Loading, Dumping));
        assert!(!is_allowed(HaulingEmpty, Spotting));
        assert!(!is_allowed(Dumping, Queuing));
    }

    #[test]
    fn spotting_can_back_off_to_queuing() {
        assert!(is_allowed(Spotting, Queuing));
    }
}
