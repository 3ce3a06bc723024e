use super::*;

/// What a cycle is allowed to drain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// As many nodes as `max_nodes` are draining already, nothing more may start.
    RateLimited { draining: usize, max_nodes: usize },
    /// Nodes past their best-before age, oldest first.
    Candidates(Vec<Candidate>),
}

impl Selection {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            Self::RateLimited { .. } => &[],
            Self::Candidates(candidates) => candidates,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Picks the oldest eligible nodes older than `max_age`, as long as the drain budget lasts.
///
/// The budget is `max_nodes` minus the nodes already draining. Candidates exactly
/// `max_age` old are not selected. Candidates created at the same instant keep their
/// snapshot order.
pub fn select(
    mut eligible: Vec<Candidate>,
    draining: usize,
    config: &CycleConfig,
    now: Timestamp,
) -> Selection {
    let max_nodes = config.max_nodes;
    let budget = max_nodes.saturating_sub(draining);
    if budget == 0 {
        return Selection::RateLimited {
            draining,
            max_nodes,
        };
    }

    eligible.sort_by_key(|candidate| candidate.created);

    let mut selected = Vec::with_capacity(budget);
    for candidate in eligible {
        let age = candidate.age_at(now).as_secs();
        tracing::debug!(node = %candidate.name, age, "Node age in seconds");

        if u64::try_from(age).is_ok_and(|age| age > config.max_age) {
            tracing::warn!(node = %candidate.name, age, "Node max-age expired");
            selected.push(candidate);
            if selected.len() == budget {
                tracing::debug!(budget, "Drain budget exhausted");
                break;
            }
        } else {
            tracing::debug!(node = %candidate.name, "Node has not reached best-before");
        }
    }

    Selection::Candidates(selected)
}
