//! Trip State
//!
//! The user's trips (owned, joined, public) and the open trip with its
//! itinerary day summary. Trips are not edited optimistically: every change
//! waits for the server and then reloads the lists.

use leptos::prelude::*;
use leptos::task::spawn_local;
use trip_api::{ApiError, ApiResult, DaySummary, Trip, TripDraft};
use trip_store::Generation;

use crate::context::AppContext;

#[derive(Clone, Copy)]
pub struct TripsState {
    ctx: AppContext,
    pub mine: RwSignal<Vec<Trip>>,
    pub joined: RwSignal<Vec<Trip>>,
    pub public: RwSignal<Vec<Trip>>,
    /// Details of the open trip
    pub current: RwSignal<Option<Trip>>,
    /// Itinerary per day of the open trip
    pub days: RwSignal<Vec<DaySummary>>,
    pub generation: RwSignal<Generation>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    /// Confirmations (join request sent)
    pub notice: RwSignal<Option<String>>,
}

impl TripsState {
    pub fn new(ctx: AppContext) -> Self {
        let state = Self {
            ctx,
            mine: RwSignal::new(Vec::new()),
            joined: RwSignal::new(Vec::new()),
            public: RwSignal::new(Vec::new()),
            current: RwSignal::new(None),
            days: RwSignal::new(Vec::new()),
            generation: RwSignal::new(Generation::new()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            notice: RwSignal::new(None),
        };
        state.watch();
        state
    }

    fn watch(self) {
        // Trip lists, once signed in
        Effect::new(move |_| {
            let generation = self.generation.get();
            if self.ctx.user.with(Option::is_none) {
                return;
            }
            self.loading.set(true);
            spawn_local(async move {
                self.fetch_lists(generation).await;
            });
        });

        // Open trip details and day summary
        Effect::new(move |_| {
            let generation = self.generation.get();
            let trip_id = self.ctx.trip_id.get();
            let signed_in = self.ctx.user.with(Option::is_some);
            let Some(trip_id) = trip_id.filter(|_| signed_in) else {
                self.current.set(None);
                self.days.set(Vec::new());
                return;
            };
            spawn_local(async move {
                self.fetch_current(trip_id, generation).await;
            });
        });
    }

    async fn fetch_lists(self, generation: Generation) {
        let api = self.ctx.api();
        let mine = api.my_trips().await;
        let joined = api.joined_trips().await;
        let public = api.public_trips().await;
        if self.generation.get_untracked() != generation {
            return;
        }

        match (mine, joined, public) {
            (Ok(mine), Ok(joined), Ok(public)) => {
                tracing::debug!(mine = mine.len(), joined = joined.len(), public = public.len(), "trips loaded");
                self.mine.set(mine);
                self.joined.set(joined);
                self.public.set(public);
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                self.fail(&e, "Failed to load trips. Please try again later.")
            }
        }
        self.loading.set(false);
    }

    async fn fetch_current(self, trip_id: String, generation: Generation) {
        let api = self.ctx.api();
        let trip = api.trip(&trip_id).await;
        // The summary is an overview extra; a trip without one still opens
        let days = api.itinerary_summary(&trip_id).await.unwrap_or_else(|e| {
            tracing::warn!(trip = %trip_id, error = %e, "failed to load itinerary summary");
            Vec::new()
        });
        let current = self.generation.get_untracked() == generation
            && self.ctx.trip().as_deref() == Some(trip_id.as_str());
        if !current {
            return;
        }

        match trip {
            Ok(trip) => {
                self.current.set(Some(trip));
                self.days.set(days);
            }
            Err(e) => self.fail(&e, "Failed to load the trip."),
        }
    }

    pub fn reload(&self) {
        self.generation.update(Generation::bump);
    }

    pub fn open(&self, trip_id: String) {
        tracing::info!(trip = %trip_id, "opening trip");
        self.ctx.trip_id.set(Some(trip_id));
    }

    pub fn close(&self) {
        self.ctx.trip_id.set(None);
    }

    // ========================
    // Changes
    // ========================

    /// Create a trip and open it
    pub async fn create(self, draft: TripDraft) -> ApiResult<()> {
        draft.validate().map_err(ApiError::Validation)?;
        let trip = self.ctx.api().create_trip(&draft).await?;
        tracing::info!(trip = %trip.id, "trip created");
        self.reload();
        self.open(trip.id);
        Ok(())
    }

    /// Replace the open trip's details
    pub async fn update(self, trip_id: String, draft: TripDraft) -> ApiResult<()> {
        draft.validate().map_err(ApiError::Validation)?;
        let trip = self.ctx.api().update_trip(&trip_id, &draft).await?;
        tracing::info!(trip = %trip.id, "trip updated");
        self.current.set(Some(trip));
        self.reload();
        Ok(())
    }

    /// Ask to join a public trip
    pub fn join(self, trip_id: String) {
        spawn_local(async move {
            match self.ctx.api().join_trip(&trip_id).await {
                Ok(()) => {
                    self.error.set(None);
                    self.notice
                        .set(Some("Join request sent. The organizer will review it.".to_string()));
                    self.reload();
                }
                Err(e) => self.fail(&e, "Failed to send join request. Please try again later."),
            }
        });
    }

    fn fail(&self, error: &ApiError, fallback: &str) {
        tracing::warn!(error = %error, "trip request failed");
        self.error.set(Some(error.user_message(fallback)));
        self.loading.set(false);
        self.ctx.handle_error(error);
    }
}

pub fn provide_trips(ctx: AppContext) {
    provide_context(TripsState::new(ctx));
}

pub fn use_trips() -> TripsState {
    expect_context::<TripsState>()
}
