use crate::{Availability, StateResult};

/// Aggregate counts over the accumulated state results. `unknown` and
/// `error` results count towards `checked` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub available: usize,
    pub taken: usize,
    pub similar: usize,
    pub checked: usize,
}

impl Summary {
    pub fn headline(&self) -> String {
        format!(
            "{} available, {} taken, {} similar of {} checked",
            self.available, self.taken, self.similar, self.checked
        )
    }

    pub fn inconclusive(&self) -> usize {
        self.checked - self.available - self.taken - self.similar
    }
}

pub fn project(results: &[StateResult]) -> Summary {
    results.iter().fold(
        Summary {
            checked: results.len(),
            ..Summary::default()
        },
        |mut summary, result| {
            match result.availability {
                Availability::Available => summary.available += 1,
                Availability::Taken => summary.taken += 1,
                Availability::Similar => summary.similar += 1,
                Availability::Unknown | Availability::Error => {}
            }
            summary
        },
    )
}
