//! # Editing Session
//!
//! One session per family page. It owns the live tree the user edits, the
//! baseline snapshot of what the member store last confirmed, and the focus
//! waitlist. Dropping the session drops all of it; loading another family
//! means building a new session.
//!
//! ## Change tracking
//!
//! Nothing is recorded while editing. Pending changes are always derived by
//! diffing the live tree against the baseline, so an edit can't be missed or
//! counted twice and discarding is just rebuilding from the baseline.
//!
//! ## Committing
//!
//! - [`EditSession::commit`] dispatches every call and rebaselines at once,
//!   without waiting for the store. A call that later fails leaves the store
//!   behind the local tree; the transport only logs it.
//! - [`EditSession::commit_confirmed`] waits for every call, retries the ones
//!   that fail, and only folds confirmed calls into the baseline.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use uuid::Uuid;

use crate::family_tree::commit::{CommitError, CommitPlan, CommitReport, RemoteCall};
use crate::family_tree::config::Config;
use crate::family_tree::diff::{compute_diff, Diff};
use crate::family_tree::member::Member;
use crate::family_tree::retry::RetryPolicy;
use crate::family_tree::transport::{MemberTransport, TransportError};
use crate::family_tree::waitlist::{Action, Waitlist};
use crate::shared::member::RawMember;

#[derive(Debug)]
pub struct EditSession {
    live: Member,
    baseline: RawMember,
    /// Whether the member store knows this family at all
    persisted: bool,
    waitlist: Waitlist,
    config: Config,
    last_synced_at: Option<DateTime<Utc>>,
}

impl EditSession {
    /// Start a family that only exists locally until the first commit
    pub fn new_family(name: &str, config: Config) -> Self {
        let live = Member::new(name.trim());
        let baseline = live.to_raw();
        tracing::info!(id = %live.id(), name = %live.name, "started new family");
        Self {
            live,
            baseline,
            persisted: false,
            waitlist: Waitlist::new(),
            config,
            last_synced_at: None,
        }
    }

    /// Session over a family the member store already holds
    pub fn from_raw(raw: RawMember, config: Config) -> Self {
        let live = Member::from(raw.clone());
        Self {
            live,
            baseline: raw,
            persisted: true,
            waitlist: Waitlist::new(),
            config,
            last_synced_at: Some(Utc::now()),
        }
    }

    /// Session over a stored family with edits made elsewhere, e.g. a draft
    /// saved before the page was closed
    pub fn resume(baseline: RawMember, live: RawMember, config: Config) -> Self {
        Self {
            live: Member::from(live),
            baseline,
            persisted: true,
            waitlist: Waitlist::new(),
            config,
            last_synced_at: None,
        }
    }

    /// Fetch `id` from the member store and open a session on it
    pub async fn load<T: MemberTransport>(
        transport: &T,
        id: Uuid,
        config: Config,
    ) -> Result<Self, TransportError> {
        let raw = transport.fetch(id).await?;
        tracing::info!(%id, members = raw.len(), "loaded family");
        Ok(Self::from_raw(raw, config))
    }

    pub fn live(&self) -> &Member {
        &self.live
    }

    pub fn baseline(&self) -> &RawMember {
        &self.baseline
    }

    pub fn root_id(&self) -> Uuid {
        self.live.id()
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn waitlist(&self) -> &Waitlist {
        &self.waitlist
    }

    pub fn waitlist_mut(&mut self) -> &mut Waitlist {
        &mut self.waitlist
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// Open an action panel on a member of this tree
    pub fn begin_action(&mut self, id: Uuid, action: Action) -> bool {
        if self.live.find(id).is_none() {
            return false;
        }
        self.waitlist.begin(id, action);
        true
    }

    pub fn cancel_action(&mut self, id: Uuid) {
        self.waitlist.finish(id);
    }

    pub fn is_focused(&self, id: Uuid) -> bool {
        self.waitlist.is_focused(id)
    }

    /// Add sons under `parent_id` from the add form's input.
    ///
    /// `input` is a comma-separated list of lineage strings; each one becomes
    /// a chain merged into the parent by name. Blank entries are skipped.
    /// Returns how many chains brought at least one new member; a chain that
    /// only retraces existing sons is not counted.
    pub fn add_sons(&mut self, parent_id: Uuid, input: &str, is_male: bool) -> usize {
        let separator = self.config.lineage_separator().to_string();
        let Some(parent) = self.live.find_mut(parent_id) else {
            tracing::debug!(%parent_id, "add sons: no such member");
            return 0;
        };

        let mut submitted = false;
        let mut added = 0;
        for lineage in input.split(',') {
            let mut son = Member::from_lineage(lineage, &separator);
            if son.name.is_empty() {
                continue;
            }
            submitted = true;
            son.set_sex(is_male);
            let before = parent.len();
            parent.add_son(son);
            if parent.len() > before {
                added += 1;
            }
        }

        if submitted {
            self.waitlist.finish(parent_id);
        }
        added
    }

    /// Rename a member; blank names are ignored
    pub fn rename(&mut self, id: Uuid, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(member) = self.live.find_mut(id) else {
            return false;
        };
        member.rename(name);
        self.waitlist.finish(id);
        true
    }

    pub fn set_sex(&mut self, id: Uuid, is_male: bool) -> bool {
        let Some(member) = self.live.find_mut(id) else {
            return false;
        };
        member.set_sex(is_male);
        self.waitlist.finish(id);
        true
    }

    /// Submit the update form: name and sex together.
    ///
    /// A blank name drops the whole submit, sex included.
    pub fn update(&mut self, id: Uuid, name: &str, is_male: bool) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(member) = self.live.find_mut(id) else {
            return false;
        };
        member.rename(name);
        member.set_sex(is_male);
        self.waitlist.finish(id);
        true
    }

    /// Remove the listed direct sons of `parent_id`, with their subtrees
    pub fn remove_sons(&mut self, parent_id: Uuid, ids: &[Uuid]) -> usize {
        let Some(parent) = self.live.find_mut(parent_id) else {
            return 0;
        };
        let removed = parent.remove_sons(ids);
        for member in removed.iter().flat_map(Member::iter) {
            self.waitlist.forget(member.id());
        }
        self.waitlist.finish(parent_id);
        removed.len()
    }

    /// Changes between the baseline and the live tree
    pub fn pending(&self) -> Diff {
        compute_diff(&self.baseline, &self.live.to_raw())
    }

    pub fn is_dirty(&self) -> bool {
        !self.persisted || !self.pending().is_empty()
    }

    /// The calls a commit would issue right now
    pub fn plan(&self) -> CommitPlan {
        if self.persisted {
            CommitPlan::from_diff(self.pending())
        } else {
            CommitPlan::create_family(self.live.to_raw())
        }
    }

    /// Dispatch every pending call and treat the live tree as synced.
    ///
    /// Returns the calls that were dispatched.
    pub fn commit<T: MemberTransport>(&mut self, transport: &T) -> CommitPlan {
        let plan = self.plan();
        for call in plan.iter() {
            transport.dispatch(call.clone());
        }
        tracing::info!(calls = plan.len(), "commit dispatched");
        self.rebaseline();
        plan
    }

    /// Send every pending call, retrying failures, and advance the baseline
    /// only by what the member store confirmed.
    ///
    /// Deletes that detach moved members are sent and awaited first. If one
    /// of them fails, the creates that would re-add its members are not sent
    /// and are reported as failed with it.
    pub async fn commit_confirmed<T: MemberTransport>(
        &mut self,
        transport: &T,
        policy: &RetryPolicy,
    ) -> Result<CommitReport, CommitError> {
        let (plan, detaching) = if self.persisted {
            let diff = self.pending();
            let detaching = diff.detaching.clone();
            (CommitPlan::from_diff(diff), detaching)
        } else {
            (self.plan(), BTreeSet::new())
        };

        let (first, rest): (Vec<RemoteCall>, Vec<RemoteCall>) = plan
            .into_iter()
            .partition(|call| matches!(call, RemoteCall::Delete(id) if detaching.contains(id)));

        let mut outcomes = send_all(transport, first, policy).await;

        let stuck: BTreeSet<Uuid> = outcomes
            .iter()
            .filter(|(_, result)| result.is_err())
            .filter_map(|(call, _)| match call {
                RemoteCall::Delete(id) => self.baseline.find_son(*id),
                _ => None,
            })
            .flat_map(RawMember::ids)
            .collect();
        let (blocked, rest): (Vec<RemoteCall>, Vec<RemoteCall>) =
            rest.into_iter().partition(|call| match call {
                RemoteCall::AppendChildren { sons, .. } => sons
                    .iter()
                    .flat_map(RawMember::ids)
                    .any(|id| stuck.contains(&id)),
                _ => false,
            });

        outcomes.extend(send_all(transport, rest, policy).await);

        let mut confirmed = Vec::new();
        let mut failed: Vec<(RemoteCall, String)> = blocked
            .into_iter()
            .map(|call| (call, "not sent: moved members are still attached elsewhere".to_string()))
            .collect();
        for (call, result) in outcomes {
            match result {
                Ok(()) => {
                    if matches!(call, RemoteCall::CreateFamily(_)) {
                        self.persisted = true;
                    }
                    if !call.apply_to(&mut self.baseline) {
                        tracing::warn!(path = %call.path(), "confirmed call does not match baseline");
                    }
                    confirmed.push(call);
                }
                Err(e) => failed.push((call, e.to_string())),
            }
        }

        if failed.is_empty() {
            tracing::info!(calls = confirmed.len(), "commit confirmed");
            self.rebaseline();
            Ok(CommitReport { confirmed })
        } else {
            tracing::warn!(
                failed = failed.len(),
                confirmed = confirmed.len(),
                "commit partially failed"
            );
            if !confirmed.is_empty() {
                self.last_synced_at = Some(Utc::now());
            }
            Err(CommitError::Partial { failed, confirmed })
        }
    }

    /// Throw away every pending edit
    pub fn discard(&mut self) {
        self.live = Member::from(self.baseline.clone());
        self.waitlist.clear();
        tracing::debug!(id = %self.live.id(), "discarded pending edits");
    }

    fn rebaseline(&mut self) {
        self.baseline = self.live.to_raw();
        self.persisted = true;
        self.last_synced_at = Some(Utc::now());
    }
}

async fn send_all<T: MemberTransport>(
    transport: &T,
    calls: Vec<RemoteCall>,
    policy: &RetryPolicy,
) -> Vec<(RemoteCall, Result<(), TransportError>)> {
    join_all(
        calls
            .into_iter()
            .map(|call| send_with_retry(transport, call, policy)),
    )
    .await
}

async fn send_with_retry<T: MemberTransport>(
    transport: &T,
    call: RemoteCall,
    policy: &RetryPolicy,
) -> (RemoteCall, Result<(), TransportError>) {
    let mut attempt = 1;
    loop {
        let delay = policy.delay_for(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match transport.send(call.clone()).await {
            Ok(()) => return (call, Ok(())),
            Err(e) if attempt < policy.max_attempts && e.is_retryable() => {
                tracing::warn!(attempt, path = %call.path(), error = %e, "member call failed, retrying");
                attempt += 1;
            }
            Err(e) => return (call, Err(e)),
        }
    }
}
