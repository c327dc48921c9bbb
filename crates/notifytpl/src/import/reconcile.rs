//! Per-candidate import decisions and rename id generation

use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use tracing::debug;

use super::{ImportDecision, ImportPolicy};
use crate::template::{Template, TemplateId};

/// Fallback base for ids that contain no usable characters
const EMPTY_BASE: &str = "template";

/// Digits of randomness appended to generated ids
const RANDOM_DIGITS: usize = 6;

/// Clock and randomness used to build rename ids
pub trait IdSource {
    /// Milliseconds since the Unix epoch
    fn now_millis(&mut self) -> u64;

    /// A value in `[0, 1)`
    fn random_fraction(&mut self) -> f64;
}

/// System clock plus thread-local randomness
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdSource;

impl IdSource for SystemIdSource {
    fn now_millis(&mut self) -> u64 {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        u64::try_from(millis).unwrap_or(0)
    }

    fn random_fraction(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// A candidate together with the decision taken for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedImport {
    /// Id the candidate arrived with
    pub original_id: TemplateId,

    /// The candidate, carrying its new id when renamed
    pub template: Template,

    pub decision: ImportDecision,
}

/// Decides what to do with each import candidate
///
/// Holds the live-store view: every id known to be taken, starting from the
/// store snapshot and growing as the caller commits created templates.
#[derive(Debug)]
pub struct Reconciler<S = SystemIdSource> {
    taken: HashSet<TemplateId>,
    policy: ImportPolicy,
    ids: S,
}

impl<S: IdSource> Reconciler<S> {
    pub fn new<'a>(
        existing: impl IntoIterator<Item = &'a TemplateId>,
        policy: ImportPolicy,
        ids: S,
    ) -> Self {
        Self {
            taken: existing.into_iter().cloned().collect(),
            policy,
            ids,
        }
    }

    pub fn policy(&self) -> ImportPolicy {
        self.policy
    }

    pub fn is_taken(&self, id: &str) -> bool {
        self.taken.contains(id)
    }

    /// Decide the action for one candidate without changing the view
    pub fn decide(&mut self, candidate: &Template) -> ImportDecision {
        let decision = if !self.is_taken(candidate.id.as_ref()) {
            ImportDecision::Create
        } else if self.policy.overwrite {
            ImportDecision::Overwrite
        } else if self.policy.generate_new_ids {
            ImportDecision::Rename(self.generate_id(&candidate.id))
        } else {
            ImportDecision::Skip
        };

        debug!(id = %candidate.id, decision = %decision, "import decision");
        decision
    }

    /// Decide and pair the candidate with the id it will be stored under
    pub fn plan(&mut self, candidate: &Template) -> PlannedImport {
        let decision = self.decide(candidate);
        let template = match &decision {
            ImportDecision::Rename(new_id) => candidate.renamed(new_id.clone()),
            _ => candidate.clone(),
        };

        PlannedImport {
            original_id: candidate.id.clone(),
            template,
            decision,
        }
    }

    /// Record an id as taken
    pub fn commit(&mut self, id: &TemplateId) {
        self.taken.insert(id.clone());
    }

    /// Build an id derived from `original` that is not taken
    ///
    /// Shape: `<base>_<base36 millis>_<6 random base36 digits>`, with `_1`,
    /// `_2`, ... appended while the result collides.
    pub fn generate_id(&mut self, original: &TemplateId) -> TemplateId {
        let candidate = format!(
            "{}_{}_{}",
            sanitize_id_base(original.as_ref()),
            to_base36(self.ids.now_millis()),
            fraction_to_base36(self.ids.random_fraction(), RANDOM_DIGITS),
        );

        if !self.is_taken(&candidate) {
            return TemplateId(candidate);
        }

        let mut suffix = 1u64;
        loop {
            let next = format!("{}_{}", candidate, suffix);
            if !self.is_taken(&next) {
                return TemplateId(next);
            }
            suffix += 1;
        }
    }
}

/// Plan a whole batch against a store snapshot
///
/// Every create and rename is committed to the live view as it is planned,
/// so later candidates see the ids chosen for earlier ones.
pub fn plan_import<S: IdSource>(
    candidates: &[Template],
    existing: &HashMap<TemplateId, Template>,
    policy: ImportPolicy,
    ids: S,
) -> Vec<PlannedImport> {
    let mut reconciler = Reconciler::new(existing.keys(), policy, ids);
    candidates
        .iter()
        .map(|candidate| {
            let planned = reconciler.plan(candidate);
            if matches!(
                planned.decision,
                ImportDecision::Create | ImportDecision::Rename(_)
            ) {
                reconciler.commit(&planned.template.id);
            }
            planned
        })
        .collect()
}

/// Keep only `[A-Za-z0-9_-]` from an id
pub fn sanitize_id_base(id: &str) -> String {
    let base: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if base.is_empty() {
        EMPTY_BASE.to_string()
    } else {
        base
    }
}

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// First `len` base-36 digits after the point of a fraction in `[0, 1)`
fn fraction_to_base36(fraction: f64, len: usize) -> String {
    let mut f = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    (0..len)
        .map(|_| {
            f *= 36.0;
            let digit = (f.floor() as usize).min(35);
            f -= digit as f64;
            DIGITS[digit] as char
        })
        .collect()
}
