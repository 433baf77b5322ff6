//! Reducer logic for the registry controller.
//!
//! Every remote call follows the same shape: set the loading flag, issue a
//! request token, and return the call as an effect. The result comes back as
//! an action carrying that token, which decides whether it is still wanted.

use super::actions::AppAction;
use super::environment::AppEnvironment;
use super::state::{AppState, RequestId};
use crate::client::CreateOutcome;
use crate::config::ResponsePolicy;
use crate::types::{NewTaxpayer, TaxpayerId};
use registry_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Reducer for the registry view
#[derive(Clone, Debug)]
pub struct AppReducer;

impl AppReducer {
    /// Creates a new `AppReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn begin_request(state: &mut AppState) -> RequestId {
        state.is_loading = true;
        state.last_error = None;
        state.issue_request()
    }

    fn fetch_all(state: &mut AppState, env: &AppEnvironment) -> Effect<AppAction> {
        let request = Self::begin_request(state);
        tracing::debug!(%request, "Fetching all taxpayers");

        let call = env.client.get_all_taxpayers();
        Effect::future(async move {
            Some(AppAction::TaxpayersLoaded {
                request,
                result: call.await,
            })
        })
    }

    fn search(state: &mut AppState, tid: TaxpayerId, env: &AppEnvironment) -> Effect<AppAction> {
        let request = Self::begin_request(state);
        tracing::debug!(%request, %tid, "Searching taxpayer");

        let call = env.client.get_taxpayer_by_tid(tid);
        Effect::future(async move {
            Some(AppAction::SearchCompleted {
                request,
                tid,
                result: call.await,
            })
        })
    }

    fn create(state: &mut AppState, taxpayer: NewTaxpayer, env: &AppEnvironment) -> Effect<AppAction> {
        let request = Self::begin_request(state);
        tracing::debug!(%request, "Creating taxpayer");

        let call = env.client.create_taxpayer(taxpayer);
        Effect::future(async move {
            Some(AppAction::CreateCompleted {
                request,
                result: call.await,
            })
        })
    }

    /// Whether a list or search response may replace the records
    fn accepts(state: &AppState, request: RequestId, env: &AppEnvironment) -> bool {
        match env.response_policy {
            ResponsePolicy::LastWriteWins => true,
            ResponsePolicy::LatestRequest => {
                let latest = state.is_latest(request);
                if !latest {
                    tracing::debug!(
                        %request,
                        latest = ?state.latest_request(),
                        "Ignoring response to superseded request"
                    );
                }
                latest
            },
        }
    }

    /// Clear the loading flag unless a newer call is still in flight
    fn settle(state: &mut AppState, request: RequestId, env: &AppEnvironment) {
        match env.response_policy {
            ResponsePolicy::LastWriteWins => state.is_loading = false,
            ResponsePolicy::LatestRequest => {
                if state.is_latest(request) {
                    state.is_loading = false;
                }
            },
        }
    }
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per action, each short
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Lifecycle ==========
            AppAction::Mounted => {
                if state.mounted {
                    tracing::debug!("Already mounted, initial load skipped");
                    return SmallVec::new();
                }
                state.mounted = true;
                smallvec![Self::fetch_all(state, env)]
            },

            // ========== Controller commands ==========
            AppAction::FetchAll => smallvec![Self::fetch_all(state, env)],

            AppAction::SubmitSearch { tid } => smallvec![Self::search(state, tid, env)],

            AppAction::SubmitCreate(taxpayer) => smallvec![Self::create(state, taxpayer, env)],

            AppAction::OpenForm => {
                state.is_form_open = true;
                SmallVec::new()
            },

            AppAction::CloseForm => {
                state.is_form_open = false;
                SmallVec::new()
            },

            // ========== Remote call results ==========
            AppAction::TaxpayersLoaded { request, result } => {
                if !Self::accepts(state, request, env) {
                    return SmallVec::new();
                }
                state.is_loading = false;

                match result {
                    Ok(records) => {
                        tracing::debug!(%request, count = records.len(), "Taxpayers loaded");
                        state.replace_records(records);
                    },
                    Err(error) => {
                        tracing::error!(%request, %error, "Error fetching tax payers");
                        state.last_error = Some(format!("Error fetching tax payers: {error}"));
                    },
                }
                SmallVec::new()
            },

            AppAction::SearchCompleted { request, tid, result } => {
                if !Self::accepts(state, request, env) {
                    return SmallVec::new();
                }
                state.is_loading = false;

                match result {
                    Ok(found) => {
                        tracing::debug!(%request, %tid, found = found.is_some(), "Search completed");
                        state.replace_records(found.into_iter().collect());
                    },
                    Err(error) => {
                        tracing::error!(%request, %tid, %error, "Error searching for tax payer");
                        state.last_error = Some(format!("Error searching for tax payer: {error}"));
                    },
                }
                SmallVec::new()
            },

            AppAction::CreateCompleted { request, result } => match result {
                Ok(CreateOutcome::Created(taxpayer)) => {
                    tracing::info!(%request, tid = %taxpayer.tid, "Taxpayer created");
                    state.is_form_open = false;
                    smallvec![Self::fetch_all(state, env)]
                },
                Ok(CreateOutcome::Rejected(reason)) => {
                    tracing::warn!(%request, %reason, "Backend rejected tax payer");
                    Self::settle(state, request, env);
                    state.last_error = Some(format!("Error creating tax payer: {reason}"));
                    SmallVec::new()
                },
                Err(error) => {
                    tracing::error!(%request, %error, "Error creating tax payer");
                    Self::settle(state, request, env);
                    state.last_error = Some(format!("Error creating tax payer: {error}"));
                    SmallVec::new()
                },
            },

            // ========== View input ==========
            AppAction::SearchInputChanged(input) => {
                state.search.set_input(input);
                SmallVec::new()
            },

            AppAction::SearchRequested => match state.search.submit() {
                Some(tid) => smallvec![Self::search(state, tid, env)],
                None => SmallVec::new(),
            },

            AppAction::FormFieldChanged { field, value } => {
                state.form.set_field(field, value);
                SmallVec::new()
            },

            AppAction::FormSubmitted if !state.is_form_open => {
                tracing::debug!("Ignoring submit, form is closed");
                SmallVec::new()
            },

            AppAction::FormSubmitted => match state.form.submit() {
                Some(taxpayer) => smallvec![Self::create(state, taxpayer, env)],
                None => SmallVec::new(),
            },

            AppAction::SortBy(column) => {
                state.table.sort_by(column);
                SmallVec::new()
            },

            AppAction::PageChanged(page) => {
                state.table.go_to_page(page, state.records.len());
                SmallVec::new()
            },

            AppAction::RowsPerPageChanged(rows_per_page) => {
                if !state.table.set_rows_per_page(rows_per_page) {
                    tracing::debug!(rows_per_page, "Ignoring page size");
                }
                SmallVec::new()
            },

            AppAction::DismissError => {
                state.last_error = None;
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::{ClientError, InMemoryTaxpayerClient};
    use crate::form::FormField;
    use crate::table::Column;
    use crate::types::Taxpayer;
    use registry_testing::{ReducerTest, assertions, collect_actions};

    fn ann() -> Taxpayer {
        Taxpayer::new(TaxpayerId::new(1), "Ann", "Lee", "1 Main St")
    }

    fn bo() -> Taxpayer {
        Taxpayer::new(TaxpayerId::new(2), "Bo", "Ng", "2 Oak Rd")
    }

    fn env_with(records: Vec<Taxpayer>) -> AppEnvironment {
        AppEnvironment::new(InMemoryTaxpayerClient::with_taxpayers(records).shared())
    }

    fn loaded(request: u64, records: Vec<Taxpayer>) -> AppAction {
        AppAction::TaxpayersLoaded {
            request: RequestId::new(request),
            result: Ok(records),
        }
    }

    fn unavailable() -> ClientError {
        ClientError::Transport("connection refused".to_string())
    }

    #[tokio::test]
    async fn mount_loads_all_records() {
        let effects = ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![ann(), bo()]))
            .given_state(AppState::default())
            .when_action(AppAction::Mounted)
            .then_state(|state| {
                assert!(state.mounted);
                assert!(state.is_loading);
                assert_eq!(state.latest_request(), Some(RequestId::new(1)));
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();

        assert_eq!(collect_actions(effects).await, vec![loaded(1, vec![ann(), bo()])]);
    }

    #[test]
    fn second_mount_does_nothing() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([AppAction::Mounted, loaded(1, vec![])])
            .when_action(AppAction::Mounted)
            .then_state(|state| {
                assert!(!state.is_loading);
                assert_eq!(state.latest_request(), Some(RequestId::new(1)));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn loaded_records_replace_the_working_set() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                records: vec![ann()],
                ..AppState::default()
            })
            .given_actions([AppAction::FetchAll])
            .when_action(loaded(1, vec![bo(), ann()]))
            .then_state(|state| {
                assert_eq!(state.records, vec![bo(), ann()]);
                assert!(!state.is_loading);
                assert_eq!(state.table.page(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn empty_result_clears_records() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                records: vec![ann()],
                ..AppState::default()
            })
            .given_actions([AppAction::FetchAll])
            .when_action(loaded(1, vec![]))
            .then_state(|state| assert!(state.records.is_empty()))
            .run();
    }

    #[test]
    fn failed_fetch_keeps_records_and_shows_banner() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                records: vec![ann()],
                ..AppState::default()
            })
            .given_actions([AppAction::FetchAll])
            .when_action(AppAction::TaxpayersLoaded {
                request: RequestId::new(1),
                result: Err(unavailable()),
            })
            .then_state(|state| {
                assert_eq!(state.records, vec![ann()]);
                assert!(!state.is_loading);
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("Error fetching tax payers: Request failed: connection refused")
                );
            })
            .run();
    }

    #[test]
    fn superseded_response_is_ignored_by_default() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([AppAction::FetchAll, AppAction::SubmitSearch { tid: TaxpayerId::new(2) }])
            .when_action(loaded(1, vec![ann(), bo()]))
            .then_state(|state| {
                assert!(state.records.is_empty());
                assert!(state.is_loading);
            })
            .run();
    }

    #[test]
    fn last_write_wins_applies_every_response() {
        let env = env_with(vec![]).with_response_policy(ResponsePolicy::LastWriteWins);

        ReducerTest::new(AppReducer::new())
            .with_env(env)
            .given_state(AppState::default())
            .given_actions([AppAction::FetchAll, AppAction::SubmitSearch { tid: TaxpayerId::new(2) }])
            .when_action(loaded(1, vec![ann(), bo()]))
            .then_state(|state| {
                assert_eq!(state.records, vec![ann(), bo()]);
                assert!(!state.is_loading);
            })
            .run();
    }

    #[test]
    fn search_hit_and_miss_replace_records() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                records: vec![ann(), bo()],
                ..AppState::default()
            })
            .given_actions([AppAction::SubmitSearch { tid: TaxpayerId::new(2) }])
            .when_action(AppAction::SearchCompleted {
                request: RequestId::new(1),
                tid: TaxpayerId::new(2),
                result: Ok(Some(bo())),
            })
            .then_state(|state| assert_eq!(state.records, vec![bo()]))
            .run();

        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                records: vec![ann(), bo()],
                ..AppState::default()
            })
            .given_actions([AppAction::SubmitSearch { tid: TaxpayerId::new(9) }])
            .when_action(AppAction::SearchCompleted {
                request: RequestId::new(1),
                tid: TaxpayerId::new(9),
                result: Ok(None),
            })
            .then_state(|state| {
                assert!(state.records.is_empty());
                assert!(!state.is_loading);
            })
            .run();
    }

    #[tokio::test]
    async fn created_closes_form_and_refetches() {
        let effects = ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![ann(), bo()]))
            .given_state(AppState::default())
            .given_actions([
                AppAction::OpenForm,
                AppAction::SubmitCreate(NewTaxpayer::new("Bo", "Ng", "2 Oak Rd")),
            ])
            .when_action(AppAction::CreateCompleted {
                request: RequestId::new(1),
                result: Ok(CreateOutcome::Created(bo())),
            })
            .then_state(|state| {
                assert!(!state.is_form_open);
                assert!(state.is_loading);
                assert!(state.is_latest(RequestId::new(2)));
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();

        assert_eq!(collect_actions(effects).await, vec![loaded(2, vec![ann(), bo()])]);
    }

    #[test]
    fn rejected_create_keeps_form_open() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                records: vec![ann()],
                ..AppState::default()
            })
            .given_actions([
                AppAction::OpenForm,
                AppAction::SubmitCreate(NewTaxpayer::new("Ann", "Lee", "1 Main St")),
            ])
            .when_action(AppAction::CreateCompleted {
                request: RequestId::new(1),
                result: Ok(CreateOutcome::Rejected("duplicate entry".to_string())),
            })
            .then_state(|state| {
                assert!(state.is_form_open);
                assert!(!state.is_loading);
                assert_eq!(state.records, vec![ann()]);
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("Error creating tax payer: duplicate entry")
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn failed_create_keeps_form_open() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([
                AppAction::OpenForm,
                AppAction::SubmitCreate(NewTaxpayer::new("Ann", "Lee", "1 Main St")),
            ])
            .when_action(AppAction::CreateCompleted {
                request: RequestId::new(1),
                result: Err(unavailable()),
            })
            .then_state(|state| {
                assert!(state.is_form_open);
                assert!(!state.is_loading);
                assert!(state.last_error.is_some());
            })
            .run();
    }

    #[test]
    fn failed_create_leaves_newer_call_loading() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([
                AppAction::SubmitCreate(NewTaxpayer::new("Ann", "Lee", "1 Main St")),
                AppAction::FetchAll,
            ])
            .when_action(AppAction::CreateCompleted {
                request: RequestId::new(1),
                result: Err(unavailable()),
            })
            .then_state(|state| assert!(state.is_loading))
            .run();
    }

    #[test]
    fn invalid_search_never_calls_the_backend() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([AppAction::SearchInputChanged("12a".to_string())])
            .when_action(AppAction::SearchRequested)
            .then_state(|state| {
                assert!(!state.is_loading);
                assert_eq!(state.latest_request(), None);
                assert!(state.search.error().is_some());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[tokio::test]
    async fn valid_search_looks_up_the_parsed_id() {
        let effects = ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![ann()]))
            .given_state(AppState::default())
            .given_actions([AppAction::SearchInputChanged(" 1 ".to_string())])
            .when_action(AppAction::SearchRequested)
            .then_state(|state| assert!(state.is_loading))
            .run();

        assert_eq!(
            collect_actions(effects).await,
            vec![AppAction::SearchCompleted {
                request: RequestId::new(1),
                tid: TaxpayerId::new(1),
                result: Ok(Some(ann())),
            }]
        );
    }

    #[test]
    fn incomplete_form_is_not_submitted() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([
                AppAction::OpenForm,
                AppAction::FormFieldChanged {
                    field: FormField::FirstName,
                    value: "Bo".to_string(),
                },
            ])
            .when_action(AppAction::FormSubmitted)
            .then_state(|state| {
                assert!(!state.is_loading);
                assert_eq!(state.form.error(FormField::LastName), Some("Last name is required"));
                assert_eq!(state.form.value(FormField::FirstName), "Bo");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn valid_form_submits_and_clears() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([
                AppAction::OpenForm,
                AppAction::FormFieldChanged { field: FormField::FirstName, value: "Bo".to_string() },
                AppAction::FormFieldChanged { field: FormField::LastName, value: "Ng".to_string() },
                AppAction::FormFieldChanged { field: FormField::Address, value: "2 Oak Rd".to_string() },
            ])
            .when_action(AppAction::FormSubmitted)
            .then_state(|state| {
                assert!(state.is_loading);
                assert!(state.is_form_open);
                assert_eq!(state.form.value(FormField::FirstName), "");
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn submit_while_form_is_closed_does_nothing() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![ann()]))
            .given_state(AppState::default())
            .given_actions([
                AppAction::FormFieldChanged { field: FormField::FirstName, value: "Bo".to_string() },
                AppAction::FormFieldChanged { field: FormField::LastName, value: "Ng".to_string() },
                AppAction::FormFieldChanged { field: FormField::Address, value: "2 Oak Rd".to_string() },
            ])
            .when_action(AppAction::FormSubmitted)
            .then_state(|state| {
                assert!(!state.is_loading);
                assert!(!state.is_form_open);
                assert_eq!(state.latest_request(), None);
                assert_eq!(state.form.value(FormField::FirstName), "Bo");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn closing_the_form_keeps_its_contents() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState::default())
            .given_actions([
                AppAction::OpenForm,
                AppAction::FormFieldChanged { field: FormField::Address, value: "2 Oak Rd".to_string() },
                AppAction::FormSubmitted,
            ])
            .when_action(AppAction::CloseForm)
            .then_state(|state| {
                assert!(!state.is_form_open);
                assert_eq!(state.form.value(FormField::Address), "2 Oak Rd");
                assert!(state.form.has_errors());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn new_request_and_dismiss_clear_the_banner() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                last_error: Some("Error fetching tax payers".to_string()),
                ..AppState::default()
            })
            .when_action(AppAction::FetchAll)
            .then_state(|state| assert_eq!(state.last_error, None))
            .run();

        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                last_error: Some("Error fetching tax payers".to_string()),
                ..AppState::default()
            })
            .when_action(AppAction::DismissError)
            .then_state(|state| assert_eq!(state.last_error, None))
            .run();
    }

    #[test]
    fn table_actions_stay_local() {
        ReducerTest::new(AppReducer::new())
            .with_env(env_with(vec![]))
            .given_state(AppState {
                records: (1..=25).map(|i| Taxpayer::new(TaxpayerId::new(i), "A", "B", "C")).collect(),
                ..AppState::default()
            })
            .given_actions([AppAction::SortBy(Column::Tid), AppAction::SortBy(Column::Tid)])
            .when_action(AppAction::PageChanged(7))
            .then_state(|state| {
                assert_eq!(state.table.page(), 3);
                assert!(!state.is_loading);
                assert_eq!(state.latest_request(), None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
