//! Move every dataset and model of an organization to another one
use std::fmt;

use chrono::Local;

use crate::errors::HubError;
use crate::exceptions::ExceptionSet;
use crate::hub::{HubClient, RepoKind, RepositoryDescriptor};
use crate::reporter::Reporter;

/// Format of the suffix appended to a repository renamed because of a conflict
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp shared by every conflict rename of a run
pub fn run_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Keep the repositories whose bare name is not in `exceptions`, in listing order
pub fn filter_candidates(
    repos: Vec<RepositoryDescriptor>,
    exceptions: &ExceptionSet,
) -> Vec<RepositoryDescriptor> {
    repos
        .into_iter()
        .filter(|repo| !exceptions.contains(repo.bare_name()))
        .collect()
}

/// Result of moving one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Id before the move
    pub source_id: String,

    /// Last destination tried; the real new id when `succeeded`
    pub final_destination_id: String,

    /// Kind of repository
    pub kind: RepoKind,

    /// Whether the repository was moved
    pub succeeded: bool,
}

/// Tally of the moves of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSummary {
    /// Kind of repository
    pub kind: RepoKind,

    /// Repositories moved
    pub succeeded: usize,

    /// Repositories attempted
    pub attempted: usize,
}

impl KindSummary {
    /// Share of attempted repositories that moved, in percent
    pub fn percentage(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.attempted as f64 * 100.0
    }
}

impl fmt::Display for KindSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} moved successfully ({:.1}%)",
            self.succeeded,
            self.attempted,
            self.percentage()
        )
    }
}

/// Outcomes of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// One outcome per attempted repository, in attempt order
    pub outcomes: Vec<MigrationOutcome>,
}

impl Summary {
    /// Tally for `kind`, `None` when nothing of that kind was attempted
    pub fn for_kind(&self, kind: RepoKind) -> Option<KindSummary> {
        let (attempted, succeeded) = self
            .outcomes
            .iter()
            .filter(|outcome| outcome.kind == kind)
            .fold((0, 0), |(attempted, succeeded), outcome| {
                (attempted + 1, succeeded + usize::from(outcome.succeeded))
            });
        if attempted == 0 {
            return None;
        }
        Some(KindSummary {
            kind,
            succeeded,
            attempted,
        })
    }

    /// Summary lines, one per kind with at least one candidate
    pub fn lines(&self) -> Vec<String> {
        RepoKind::ALL
            .iter()
            .filter_map(|kind| self.for_kind(*kind))
            .map(|s| format!("{} {}: {s}", s.kind.icon(), s.kind.label()))
            .collect()
    }
}

/// Destination tried for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// Same name in the target organization
    Original,
    /// Name suffixed with the run timestamp, after a conflict
    Renamed,
}

impl Attempt {
    /// Attempt to make when this one hits a conflict
    fn fallback(self) -> Option<Attempt> {
        match self {
            Attempt::Original => Some(Attempt::Renamed),
            Attempt::Renamed => None,
        }
    }

    /// Destination id for this attempt
    fn destination(self, target_org: &str, name: &str, timestamp: &str) -> String {
        match self {
            Attempt::Original => format!("{target_org}/{name}"),
            Attempt::Renamed => format!("{target_org}/{name}_{timestamp}"),
        }
    }
}

/// Moves the repositories of `source_org` into `target_org`
pub struct OrgMover<'a> {
    /// Hub access
    client: &'a dyn HubClient,

    /// Event sink
    reporter: &'a dyn Reporter,

    /// Organization the repositories come from
    source_org: String,

    /// Organization the repositories go to
    target_org: String,

    /// Suffix for conflict renames
    timestamp: String,

    /// Make a repository listed as public public again when its move fails
    restore_visibility: bool,
}

impl<'a> OrgMover<'a> {
    /// Create a mover; the run timestamp is taken now
    pub fn new(
        client: &'a dyn HubClient,
        reporter: &'a dyn Reporter,
        source_org: impl Into<String>,
        target_org: impl Into<String>,
    ) -> Self {
        Self {
            client,
            reporter,
            source_org: source_org.into(),
            target_org: target_org.into(),
            timestamp: run_timestamp(),
            restore_visibility: false,
        }
    }

    /// Use a fixed run timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Restore public visibility of repositories whose move failed
    pub fn restore_visibility(mut self, restore: bool) -> Self {
        self.restore_visibility = restore;
        self
    }

    /// Move every dataset and model of the source organization.
    ///
    /// Individual failures end up in the returned [`Summary`].
    /// # Errors
    /// Error if the repositories of the source organization can't be listed
    pub async fn migrate(&self, exceptions: &ExceptionSet) -> Result<Summary, HubError> {
        self.reporter
            .debug(&format!("📝 Fetching repositories from {}", self.source_org));
        let mut listed = Vec::with_capacity(RepoKind::ALL.len());
        for kind in RepoKind::ALL {
            let repos = self.client.list_repos(kind, &self.source_org).await?;
            listed.push((kind, filter_candidates(repos, exceptions)));
        }

        if !exceptions.is_empty() {
            self.reporter
                .info(&format!("🔍 Found {} exceptions to exclude", exceptions.len()));
            self.reporter.debug(&format!(
                "🚫 Excluded repositories: {}",
                exceptions.names().join(", ")
            ));
        }

        let mut summary = Summary::default();
        for (kind, candidates) in listed {
            if candidates.is_empty() {
                self.reporter.info(&format!(
                    "ℹ️  No {} to move",
                    kind.label().to_lowercase()
                ));
                continue;
            }
            self.reporter.info(&format!(
                "{} Moving {} {}...",
                kind.icon(),
                candidates.len(),
                kind.label()
            ));
            for repo in &candidates {
                summary.outcomes.push(self.move_with_retry(repo).await);
            }
        }

        self.reporter.info("📊 Summary:");
        for line in summary.lines() {
            self.reporter.info(&line);
        }
        Ok(summary)
    }

    /// Move one repository, retrying once under a new name on conflict
    pub async fn move_with_retry(&self, repo: &RepositoryDescriptor) -> MigrationOutcome {
        let name = repo.bare_name();
        let mut attempt = Attempt::Original;
        loop {
            let destination = attempt.destination(&self.target_org, name, &self.timestamp);
            let error = match self.attempt_move(repo, &destination).await {
                Ok(()) => {
                    let renamed = match attempt {
                        Attempt::Original => "",
                        Attempt::Renamed => " (renamed due to conflict)",
                    };
                    self.reporter.success(&format!(
                        "Successfully moved {} to {destination}{renamed}",
                        repo.id
                    ));
                    return self.outcome(repo, destination, true);
                }
                Err(e) => e,
            };
            match attempt.fallback() {
                Some(next) if error.is_conflict() => {
                    self.reporter.debug(&format!(
                        "{destination} already exists, retrying with a timestamped name"
                    ));
                    attempt = next;
                }
                _ => {
                    match attempt {
                        Attempt::Original => self
                            .reporter
                            .error(&format!("Failed to move {}: {error}", repo.id)),
                        Attempt::Renamed => self.reporter.error(&format!(
                            "Failed to move {} even with rename: {error}",
                            repo.id
                        )),
                    }
                    if self.restore_visibility && repo.is_known_public() {
                        self.set_visibility(&repo.id, repo.kind, false).await;
                    }
                    return self.outcome(repo, destination, false);
                }
            }
        }
    }

    /// Private before, move, private after
    async fn attempt_move(
        &self,
        repo: &RepositoryDescriptor,
        destination: &str,
    ) -> Result<(), HubError> {
        self.set_visibility(&repo.id, repo.kind, true).await;
        self.client
            .move_repo(&repo.id, destination, repo.kind)
            .await?;
        self.set_visibility(destination, repo.kind, true).await;
        Ok(())
    }

    /// Best-effort visibility change, failures are only reported
    async fn set_visibility(&self, repo_id: &str, kind: RepoKind, private: bool) {
        let visibility = if private { "private" } else { "public" };
        match self.client.update_visibility(repo_id, kind, private).await {
            Ok(()) => {
                let icon = if private { "🔒" } else { "🔓" };
                self.reporter
                    .debug(&format!("{icon} Set {repo_id} to {visibility}"));
            }
            Err(e) => {
                self.reporter
                    .error(&format!("Failed to set {repo_id} to {visibility}: {e}"));
            }
        }
    }

    /// Build the outcome of a finished repository
    fn outcome(
        &self,
        repo: &RepositoryDescriptor,
        destination: String,
        succeeded: bool,
    ) -> MigrationOutcome {
        MigrationOutcome {
            source_id: repo.id.clone(),
            final_destination_id: destination,
            kind: repo.kind,
            succeeded,
        }
    }
}
