//! Loading/error/data state machine around a `Retrieve` call.

use super::retrievers::Retrieve;
use crate::service::ServiceResult;
use log::debug;

/// Visible retrieval state.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalState<O> {
    /// Last successfully retrieved value; kept across failed fetches.
    pub data: Option<O>,
    /// True while the latest dispatched fetch is outstanding.
    pub loading: bool,
    /// Message of the last failure; cleared by the next success.
    pub error: Option<String>,
}

impl<O> Default for RetrievalState<O> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Tag for one dispatched fetch. Tickets increase monotonically per hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Retrieval adapter for one input/output shape.
///
/// `mount`, `set_input` and `refetch` run the fetch inline. Callers that run
/// fetches elsewhere use `dispatch` + `complete`; only the completion of the
/// latest ticket is applied, so an overtaken response can never overwrite
/// a newer one.
pub struct RetrievalHook<R: Retrieve> {
    retriever: R,
    input: R::Input,
    state: RetrievalState<R::Output>,
    latest_ticket: u64,
    mounted: bool,
}

impl<R: Retrieve> RetrievalHook<R> {
    /// Mounts the hook and runs the initial fetch.
    pub fn mount(retriever: R, input: R::Input) -> Self {
        let mut hook = Self::unmounted(retriever, input);
        hook.mounted = true;
        hook.refetch();
        hook
    }

    /// Mounts the hook in `loading` state and hands back the initial ticket
    /// for the caller to complete.
    pub fn mount_deferred(retriever: R, input: R::Input) -> (Self, FetchTicket) {
        let mut hook = Self::unmounted(retriever, input);
        hook.mounted = true;
        let ticket = hook.next_ticket();
        (hook, ticket)
    }

    fn unmounted(retriever: R, input: R::Input) -> Self {
        Self {
            retriever,
            input,
            state: RetrievalState::default(),
            latest_ticket: 0,
            mounted: false,
        }
    }

    pub fn state(&self) -> &RetrievalState<R::Output> {
        &self.state
    }

    pub fn data(&self) -> Option<&R::Output> {
        self.state.data.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn input(&self) -> &R::Input {
        &self.input
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Re-runs the fetch with the current input. No-op once unmounted.
    pub fn refetch(&mut self) {
        let Some(ticket) = self.dispatch() else {
            return;
        };
        let result = self.retriever.retrieve(&self.input);
        self.complete(ticket, result);
    }

    /// Replaces the input and refetches when it differs structurally.
    ///
    /// Returns whether a fetch ran; an unmounted hook only records the input.
    pub fn set_input(&mut self, input: R::Input) -> bool {
        match self.set_input_deferred(input) {
            Some(ticket) => {
                let result = self.retriever.retrieve(&self.input);
                self.complete(ticket, result);
                true
            }
            None => false,
        }
    }

    /// Replaces the input and, when it differs structurally, dispatches a
    /// fetch for the caller to complete.
    pub fn set_input_deferred(&mut self, input: R::Input) -> Option<FetchTicket> {
        if input == self.input {
            return None;
        }
        self.input = input;
        self.dispatch()
    }

    /// Marks a new fetch as in flight and returns its ticket.
    ///
    /// Any ticket handed out earlier becomes stale. Returns `None`, and
    /// leaves state untouched, after `unmount`.
    pub fn dispatch(&mut self) -> Option<FetchTicket> {
        if !self.mounted {
            debug!("event=retrieval_skip module=retrieval reason=unmounted");
            return None;
        }
        Some(self.next_ticket())
    }

    fn next_ticket(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.state.loading = true;
        FetchTicket(self.latest_ticket)
    }

    /// Applies a fetch result if `ticket` is still the latest one.
    ///
    /// Returns whether visible state changed.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: ServiceResult<Option<R::Output>>,
    ) -> bool {
        if !self.mounted || ticket.0 != self.latest_ticket {
            debug!(
                "event=retrieval_discard module=retrieval ticket={} latest={} mounted={}",
                ticket.0, self.latest_ticket, self.mounted
            );
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(data) => {
                self.state.data = data;
                self.state.error = None;
            }
            Err(err) => {
                debug!(
                    "event=retrieval_failed module=retrieval ticket={} error_code={}",
                    ticket.0,
                    err.code()
                );
                self.state.error = Some(err.to_string());
            }
        }
        true
    }

    /// Detaches the hook; later completions are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.state.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::RetrievalHook;
    use crate::retrieval::Retrieve;
    use crate::service::{ServiceError, ServiceResult};
    use crate::store::StoreError;
    use std::cell::Cell;

    /// Echoes the input back, or fails when `fail` is set.
    struct Echo {
        calls: Cell<u32>,
        fail: Cell<bool>,
    }

    impl Echo {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail: Cell::new(false),
            }
        }
    }

    impl Retrieve for Echo {
        type Input = String;
        type Output = String;

        fn retrieve(&self, input: &String) -> ServiceResult<Option<String>> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(ServiceError::Store(StoreError::Unavailable(
                    "offline".to_string(),
                )));
            }
            Ok(Some(input.clone()))
        }
    }

    #[test]
    fn mount_fetches_once_and_equal_input_does_not_refetch() {
        let echo = Echo::new();
        let mut hook = RetrievalHook::mount(&echo, "a".to_string());
        assert_eq!(hook.data().map(String::as_str), Some("a"));
        assert!(!hook.loading());

        assert!(!hook.set_input("a".to_string()));
        assert_eq!(echo.calls.get(), 1);

        assert!(hook.set_input("b".to_string()));
        assert_eq!(hook.data().map(String::as_str), Some("b"));
        assert_eq!(echo.calls.get(), 2);
    }

    #[test]
    fn failure_keeps_stale_data_and_success_clears_error() {
        let echo = Echo::new();
        let mut hook = RetrievalHook::mount(&echo, "a".to_string());

        echo.fail.set(true);
        hook.refetch();
        assert_eq!(hook.data().map(String::as_str), Some("a"));
        assert!(hook.error().unwrap().contains("offline"));
        assert!(!hook.loading());

        echo.fail.set(false);
        hook.refetch();
        assert_eq!(hook.error(), None);
    }

    #[test]
    fn overtaken_completion_is_discarded() {
        let echo = Echo::new();
        let (mut hook, first) = RetrievalHook::mount_deferred(&echo, "a".to_string());
        let second = hook.set_input_deferred("b".to_string()).unwrap();
        assert!(hook.loading());

        assert!(hook.complete(second, Ok(Some("b".to_string()))));
        assert!(!hook.complete(first, Ok(Some("a".to_string()))));
        assert_eq!(hook.data().map(String::as_str), Some("b"));
        assert!(!hook.loading());
    }

    #[test]
    fn stale_completion_does_not_end_loading_of_newer_fetch() {
        let echo = Echo::new();
        let (mut hook, first) = RetrievalHook::mount_deferred(&echo, "a".to_string());
        let _second = hook.dispatch().unwrap();
        assert!(!hook.complete(first, Ok(Some("a".to_string()))));
        assert!(hook.loading());
        assert_eq!(hook.data(), None);
    }

    #[test]
    fn completion_after_unmount_is_ignored() {
        let echo = Echo::new();
        let (mut hook, ticket) = RetrievalHook::mount_deferred(&echo, "a".to_string());
        hook.unmount();
        assert!(!hook.complete(ticket, Ok(Some("late".to_string()))));
        assert_eq!(hook.data(), None);
        assert!(!hook.is_mounted());
    }

    #[test]
    fn unmounted_hook_starts_no_fetch() {
        let echo = Echo::new();
        let mut hook = RetrievalHook::mount(&echo, "a".to_string());
        hook.unmount();

        hook.refetch();
        assert!(!hook.set_input("b".to_string()));
        assert!(hook.dispatch().is_none());

        assert!(!hook.loading());
        assert_eq!(echo.calls.get(), 1);
        assert_eq!(hook.data().map(String::as_str), Some("a"));
        assert_eq!(hook.input(), "b");
    }
}
