//! Scripted in-memory `RemoteStore` and fixtures for engine tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use reqwest::StatusCode;

use crate::models::{Problem, ProblemId, RelationKind, UserProfile, UserRelationSets};
use crate::remote::{RemoteError, RemoteResult, RemoteStore};
use crate::session::{Credential, MemoryCredentialStore, SessionGuard};
use crate::state::{SharedBoard, WeakBoard};

pub fn problem(id: &str, rating: Option<u32>) -> Problem {
    Problem {
        id: ProblemId::from(id),
        name: format!("Problem {id}"),
        rating,
        tags: vec!["implementation".to_string()],
        contest_id: Some(1),
        index: Some("A".to_string()),
    }
}

pub fn signed_in_guard(token: &str) -> SessionGuard<MemoryCredentialStore> {
    let credential = Credential::new(token).unwrap();
    SessionGuard::new(MemoryCredentialStore::with_credential(credential))
}

/// Canned response for one remote operation.
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Ok(T),
    Status(StatusCode),
    Malformed,
}

impl<T: Clone> Scripted<T> {
    fn respond(&self) -> RemoteResult<T> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Status(status) => Err(RemoteError::Status {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            Self::Malformed => Err(RemoteError::Malformed("scripted payload".to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchCatalog,
    FetchRelations,
    FetchProfile,
    Add(RelationKind, ProblemId),
    Remove(RelationKind, ProblemId),
}

pub struct FakeRemote {
    catalog: RefCell<Scripted<Vec<Problem>>>,
    relations: RefCell<Scripted<UserRelationSets>>,
    profile: RefCell<Scripted<UserProfile>>,
    mutation_failure: Cell<Option<StatusCode>>,
    yield_on_mutation: Cell<bool>,
    watched: RefCell<Option<WeakBoard>>,
    seen: RefCell<Vec<Option<bool>>>,
    calls: RefCell<Vec<Call>>,
    authorizations: RefCell<Vec<String>>,
}

impl FakeRemote {
    pub fn new(catalog: Vec<Problem>) -> Self {
        Self {
            catalog: RefCell::new(Scripted::Ok(catalog)),
            relations: RefCell::new(Scripted::Ok(UserRelationSets::default())),
            profile: RefCell::new(Scripted::Ok(UserProfile::default())),
            mutation_failure: Cell::new(None),
            yield_on_mutation: Cell::new(false),
            watched: RefCell::new(None),
            seen: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            authorizations: RefCell::new(Vec::new()),
        }
    }

    pub fn script_catalog(&self, script: Scripted<Vec<Problem>>) {
        *self.catalog.borrow_mut() = script;
    }

    pub fn script_relations(&self, script: Scripted<UserRelationSets>) {
        *self.relations.borrow_mut() = script;
    }

    pub fn script_profile(&self, script: Scripted<UserProfile>) {
        *self.profile.borrow_mut() = script;
    }

    pub fn fail_mutations(&self, status: StatusCode) {
        self.mutation_failure.set(Some(status));
    }

    /// Make add/remove suspend once before answering.
    pub fn yield_on_mutation(&self) {
        self.yield_on_mutation.set(true);
    }

    /// Record the visible value of each mutated cell at call time.
    pub fn watch(&self, board: &SharedBoard) {
        *self.watched.borrow_mut() = Some(Rc::downgrade(board));
    }

    pub fn seen_during_mutation(&self) -> Vec<Option<bool>> {
        self.seen.borrow().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Add(..) | Call::Remove(..)))
            .collect()
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.authorizations.borrow().clone()
    }

    async fn mutate(
        &self,
        authorization: &str,
        call: Call,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> RemoteResult<()> {
        self.calls.borrow_mut().push(call);
        self.authorizations
            .borrow_mut()
            .push(authorization.to_string());
        if let Some(board) = self.watched.borrow().as_ref().and_then(WeakBoard::upgrade) {
            let value = board
                .borrow()
                .view
                .find(problem_id)
                .map(|entry| entry.relation(kind).value());
            self.seen.borrow_mut().push(value);
        }
        if self.yield_on_mutation.get() {
            tokio::task::yield_now().await;
        }
        match self.mutation_failure.get() {
            Some(status) => Scripted::<()>::Status(status).respond(),
            None => Ok(()),
        }
    }
}

impl RemoteStore for FakeRemote {
    async fn fetch_catalog(&self) -> RemoteResult<Vec<Problem>> {
        self.calls.borrow_mut().push(Call::FetchCatalog);
        self.catalog.borrow().respond()
    }

    async fn fetch_relations(&self, authorization: &str) -> RemoteResult<UserRelationSets> {
        self.calls.borrow_mut().push(Call::FetchRelations);
        self.authorizations
            .borrow_mut()
            .push(authorization.to_string());
        self.relations.borrow().respond()
    }

    async fn fetch_profile(&self, authorization: &str) -> RemoteResult<UserProfile> {
        self.calls.borrow_mut().push(Call::FetchProfile);
        self.authorizations
            .borrow_mut()
            .push(authorization.to_string());
        self.profile.borrow().respond()
    }

    async fn add_relation(
        &self,
        authorization: &str,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> RemoteResult<()> {
        self.mutate(
            authorization,
            Call::Add(kind, problem_id.clone()),
            kind,
            problem_id,
        )
        .await
    }

    async fn remove_relation(
        &self,
        authorization: &str,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> RemoteResult<()> {
        self.mutate(
            authorization,
            Call::Remove(kind, problem_id.clone()),
            kind,
            problem_id,
        )
        .await
    }
}
