//! Resource State Containers
//!
//! One container per trip resource, provided via context. Each wraps an
//! [`OptimisticStore`] in a signal: user actions change the collection and
//! its statistics right away, the request runs in the background, and a
//! rejected request is rolled back and followed by a refetch. A fetch that
//! races local changes is dropped and repeated once they have settled.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::resources::{
    Category, ChecklistItem, Expense, ItineraryItem, ListFilter, Member, MemberPatch, PackingItem, Resource, StatusField,
};
use trip_api::{ApiError, ApiResult};
use trip_store::{Generation, Mutation, OptimisticStore, Reconcile, StoreResult, Tracked};

use crate::context::AppContext;

pub struct ResourceState<R: Resource> {
    ctx: AppContext,
    /// Items of the current filter and the trip-wide statistics
    pub store: RwSignal<OptimisticStore<R>>,
    /// Last statistics as sent by the server
    pub statistics: RwSignal<Option<R::Statistics>>,
    /// Bumped to force a refetch
    pub generation: RwSignal<Generation>,
    pub loading: RwSignal<bool>,
    /// Notice channel: last failure, shown until dismissed
    pub error: RwSignal<Option<String>>,
    /// Categories/types for filters and forms
    pub categories: RwSignal<Vec<Category>>,
    pub filter: RwSignal<R::Filter>,
}

impl<R: Resource> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Resource> Copy for ResourceState<R> {}

impl<R: Resource> ResourceState<R> {
    pub fn new(ctx: AppContext) -> Self {
        let store = match R::sort() {
            Some(sort) => OptimisticStore::new().with_sort(sort),
            None => OptimisticStore::new(),
        };
        let state = Self {
            ctx,
            store: RwSignal::new(store),
            statistics: RwSignal::new(None),
            generation: RwSignal::new(Generation::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            categories: RwSignal::new(Vec::new()),
            filter: RwSignal::new(R::Filter::default()),
        };
        state.watch();
        state
    }

    // ========================
    // Fetching
    // ========================

    fn watch(self) {
        // Reference lists, once signed in
        Effect::new(move |_| {
            if R::CATEGORIES.is_none() || self.ctx.user.get().is_none() {
                return;
            }
            spawn_local(async move {
                match self.ctx.api().categories::<R>().await {
                    Ok(categories) => self.categories.set(categories),
                    Err(e) => tracing::warn!(resource = R::SEGMENT, error = %e, "failed to load categories"),
                }
            });
        });

        // Items and statistics, on every generation/filter/trip change
        Effect::new(move |_| {
            let generation = self.generation.get();
            let filter = self.filter.get();
            let trip_id = self.ctx.trip_id.get();
            let signed_in = self.ctx.user.with(Option::is_some);
            let Some(trip_id) = trip_id.filter(|_| signed_in) else {
                return;
            };
            self.loading.set(true);
            spawn_local(async move {
                self.fetch(trip_id, filter, generation).await;
            });
        });
    }

    async fn fetch(self, trip_id: String, filter: R::Filter, generation: Generation) {
        tracing::debug!(resource = R::SEGMENT, trip = %trip_id, %generation, "fetching");
        let since = self.store.with_untracked(OptimisticStore::revision);
        let api = self.ctx.api();
        let items = api.list::<R>(&trip_id, &filter).await;
        let statistics = api.statistics::<R>(&trip_id).await;

        // A newer fetch owns the state
        let current = self.generation.get_untracked() == generation
            && self.filter.with_untracked(|f| *f == filter)
            && self.ctx.trip().as_deref() == Some(trip_id.as_str());
        if !current {
            return;
        }

        match (items, statistics) {
            (Ok(items), Ok(statistics)) => {
                let count = items.len();
                let summary = R::summarize(&statistics);
                match self.store.try_update(|store| store.apply_fetch(since, items, summary)) {
                    Some(Reconcile::Applied) => {
                        tracing::debug!(resource = R::SEGMENT, count, "loaded");
                        self.statistics.set(Some(statistics));
                        self.error.set(None);
                    }
                    Some(Reconcile::Refetch) => self.invalidate(),
                    Some(Reconcile::Deferred) | None => {}
                }
            }
            (Err(e), _) | (_, Err(e)) => self.fail(&e, "Failed to load data. Please try again later."),
        }
        self.loading.set(false);
    }

    /// Refetch items and statistics
    pub fn invalidate(&self) {
        self.generation.update(Generation::bump);
    }

    pub fn set_filter(&self, filter: R::Filter) {
        self.filter.set(filter);
    }

    // ========================
    // Mutations
    // ========================

    /// Create through the API, then add the returned item locally
    ///
    /// An item outside the current filter is not listed; the statistics are
    /// refetched instead.
    pub async fn create(self, draft: R::Draft) -> ApiResult<()> {
        let Some(trip_id) = self.ctx.trip() else {
            return Err(ApiError::Config("no trip selected".to_string()));
        };
        match self.ctx.api().create::<R>(&trip_id, &draft).await {
            Ok(item) => {
                tracing::debug!(resource = R::SEGMENT, id = %item.id(), "created");
                if self.filter.with_untracked(|filter| filter.matches(&item)) {
                    self.store.update(|store| {
                        store.insert(item);
                    });
                } else {
                    self.invalidate();
                }
                self.error.set(None);
                Ok(())
            }
            Err(e) => {
                self.fail(&e, "An error occurred while creating the item. Please try again later.");
                Err(e)
            }
        }
    }

    /// Remove locally, then DELETE in the background
    pub fn delete(self, id: String) {
        let Some(trip_id) = self.ctx.trip() else {
            return;
        };
        let Some(mutation) = self.apply(|store| store.remove(&id)) else {
            return;
        };
        let api = self.ctx.api();
        self.dispatch(mutation, async move { api.remove::<R>(&trip_id, &id).await });
    }

    fn apply<U>(&self, change: impl FnOnce(&mut OptimisticStore<R>) -> StoreResult<U>) -> Option<U> {
        match self.store.try_update(change)? {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(resource = R::SEGMENT, error = %e, "local change rejected");
                self.error.set(Some(e.to_string()));
                None
            }
        }
    }

    /// Run the request for an applied mutation; undo it if the request fails
    fn dispatch<F>(self, mutation: Mutation<R>, request: F)
    where
        F: Future<Output = ApiResult<()>> + 'static,
    {
        spawn_local(async move {
            let id = mutation.id();
            let kind = mutation.kind();
            match request.await {
                Ok(()) => {
                    tracing::debug!(resource = R::SEGMENT, %id, kind, "confirmed");
                    let refetch = self
                        .store
                        .try_update(|store| store.confirm(&mutation))
                        .unwrap_or(false);
                    if refetch {
                        self.invalidate();
                    }
                }
                Err(e) => {
                    let undone = self
                        .store
                        .try_update(|store| store.rollback(mutation))
                        .unwrap_or(false);
                    tracing::warn!(resource = R::SEGMENT, %id, kind, undone, error = %e, "change rejected");
                    self.fail(&e, "Your change could not be saved. Please try again later.");
                    self.invalidate();
                }
            }
        });
    }

    fn fail(&self, error: &ApiError, fallback: &str) {
        tracing::warn!(resource = R::SEGMENT, error = %error, "request failed");
        self.error.set(Some(error.user_message(fallback)));
        self.ctx.handle_error(error);
    }
}

impl<R: StatusField> ResourceState<R> {
    /// Move an item to another status (members, itinerary)
    pub fn set_status(self, id: String, status: R::Status) {
        let Some(trip_id) = self.ctx.trip() else {
            return;
        };
        let Some(mutation) = self.apply(|store| store.set_status(&id, status.clone())).flatten() else {
            return;
        };
        let api = self.ctx.api();
        self.dispatch(mutation, async move { api.update_status::<R>(&trip_id, &id, &status).await });
    }
}

impl<R: StatusField<Status = bool>> ResourceState<R> {
    /// Flip the item's flag (packed, completed)
    pub fn toggle(self, id: String) {
        let Some(trip_id) = self.ctx.trip() else {
            return;
        };
        let Some(mutation) = self.apply(|store| store.toggle(&id)) else {
            return;
        };
        let flag = mutation.item().status();
        let api = self.ctx.api();
        self.dispatch(mutation, async move { api.update_status::<R>(&trip_id, &id, &flag).await });
    }
}

impl ResourceState<Member> {
    /// Change role and/or status of a member
    pub fn update_member(self, id: String, patch: MemberPatch) {
        if patch.is_empty() {
            return;
        }
        let Some(trip_id) = self.ctx.trip() else {
            return;
        };
        let Some(mutation) = self.apply(|store| store.update(&id, |member| patch.apply(member))).flatten() else {
            return;
        };
        let api = self.ctx.api();
        self.dispatch(mutation, async move { api.update::<Member, _>(&trip_id, &id, &patch).await });
    }
}

impl ResourceState<Expense> {
    /// Budget minus spending in cents, following local changes
    pub fn budget_remaining(&self) -> Option<i64> {
        let budget = self.statistics.with(|stats| stats.as_ref().map(|stats| stats.budget))?;
        Some(budget - self.store.with(|store| store.summary().amount))
    }
}

/// Provide one container per resource
pub fn provide_resources(ctx: AppContext) {
    provide_context(ResourceState::<Member>::new(ctx));
    provide_context(ResourceState::<Expense>::new(ctx));
    provide_context(ResourceState::<PackingItem>::new(ctx));
    provide_context(ResourceState::<ChecklistItem>::new(ctx));
    provide_context(ResourceState::<ItineraryItem>::new(ctx));
}

pub fn use_resource<R: Resource>() -> ResourceState<R> {
    expect_context::<ResourceState<R>>()
}
