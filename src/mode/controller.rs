use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, bail, Result};
use tokio::{
    sync::{Mutex, Notify},
    task::JoinSet,
};

use crate::{
    keyboard::{KeyInput, KeyboardModifiers},
    log_debug, log_error, log_info, log_warn,
    memory::ModeSnapshot,
    menu::MenuName,
    models::{Bounds, NoteEditInfo, RendererMessage, WindowId, WindowRole},
    services::Searcher,
    windows::{
        layout::{default_bounds, settings_bounds, stacked_write_position, SHOW_DELAY},
        WindowEntry, WindowHost, WindowSpec,
    },
};

use super::{AppMode, ControllerState, OpenOptions};

const ENABLE_LOGS: bool = true;

const SHOW_DELAY_ENV: &str = "JOTTER_SHOW_DELAY_MS";

/// Re-entrancy flag for transitions, plus a wakeup for whoever waits for
/// the running one to finish.
#[derive(Default)]
struct Switching {
    flag: AtomicBool,
    released: Notify,
}

/// Held for the duration of one transition. Dropping it releases the flag
/// even when the transition bails out early.
struct SwitchGuard {
    switching: Arc<Switching>,
}

impl SwitchGuard {
    fn acquire(switching: &Arc<Switching>) -> Option<Self> {
        switching
            .flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                switching: switching.clone(),
            })
    }
}

impl Drop for SwitchGuard {
    fn drop(&mut self) {
        self.switching.flag.store(false, Ordering::Release);
        self.switching.released.notify_waiters();
    }
}

/// A window about to be built, with the note it should open on.
struct WindowPlan {
    spec: WindowSpec,
    note: Option<NoteEditInfo>,
}

pub struct ModeController<H: WindowHost> {
    state: Arc<Mutex<ControllerState>>,
    switching: Arc<Switching>,
    host: Arc<H>,
    searcher: Arc<Searcher>,
    keyboard: Arc<KeyboardModifiers>,
    show_delay: Duration,
}

impl<H: WindowHost> Clone for ModeController<H> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            switching: self.switching.clone(),
            host: self.host.clone(),
            searcher: self.searcher.clone(),
            keyboard: self.keyboard.clone(),
            show_delay: self.show_delay,
        }
    }
}

impl<H: WindowHost> ModeController<H> {
    pub fn new(host: Arc<H>, searcher: Arc<Searcher>, keyboard: Arc<KeyboardModifiers>) -> Self {
        let show_delay = std::env::var(SHOW_DELAY_ENV)
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(SHOW_DELAY);

        Self {
            state: Arc::new(Mutex::new(ControllerState::new())),
            switching: Arc::new(Switching::default()),
            host,
            searcher,
            keyboard,
            show_delay,
        }
    }

    pub fn with_show_delay(mut self, show_delay: Duration) -> Self {
        self.show_delay = show_delay;
        self
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn searcher(&self) -> &Arc<Searcher> {
        &self.searcher
    }

    pub fn keyboard(&self) -> &Arc<KeyboardModifiers> {
        &self.keyboard
    }

    pub async fn mode(&self) -> AppMode {
        self.state.lock().await.mode
    }

    pub fn is_switching(&self) -> bool {
        self.switching.flag.load(Ordering::Acquire)
    }

    /// Resolves once no transition is running.
    async fn wait_until_idle(&self) {
        loop {
            let released = self.switching.released.notified();
            if !self.is_switching() {
                return;
            }
            released.await;
        }
    }

    /// Window requests from menus, hotkeys and renderers only act on a
    /// settled Open mode. During a transition they are dropped like a
    /// second `switch_to`; outside Open there is no layout to add to.
    async fn accepts_window_request(&self, request: &str) -> bool {
        if self.is_switching() {
            log_debug!("Dropping {}: transition in progress", request);
            return false;
        }
        let mode = self.mode().await;
        if mode != AppMode::Open {
            log_debug!("Ignoring {} in {:?} mode", request, mode);
            return false;
        }
        true
    }

    pub async fn focus_history(&self) -> Vec<WindowId> {
        self.state.lock().await.focus.entries().to_vec()
    }

    pub async fn window(&self, id: WindowId) -> Option<WindowEntry> {
        self.state.lock().await.registry.get(id).cloned()
    }

    pub async fn windows_of_role(&self, role: WindowRole) -> Vec<WindowId> {
        self.state.lock().await.registry.ids_by_role(role)
    }

    pub async fn unique_window(&self, role: WindowRole) -> Option<WindowId> {
        self.state.lock().await.registry.unique(role)
    }

    pub async fn window_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    pub async fn has_memory(&self) -> bool {
        self.state.lock().await.memory.has_snapshot()
    }

    pub async fn save_search_query(&self, query: &str) {
        self.state.lock().await.memory.save_search_query(query);
    }

    /// Moves to `target`. Returns `Ok(false)` when another transition is
    /// still running; that request is dropped, not queued.
    pub async fn switch_to(&self, target: AppMode, options: OpenOptions) -> Result<bool> {
        let Some(_guard) = SwitchGuard::acquire(&self.switching) else {
            log_debug!("Dropping switch to {:?}: transition in progress", target);
            return Ok(false);
        };

        let current = self.mode().await;
        if current == target {
            self.refocus_last_window().await;
            return Ok(true);
        }

        self.exit_mode(current).await;
        self.state.lock().await.enter(target);
        log_info!("Mode {:?} -> {:?}", current, target);

        let entered = match target {
            AppMode::Closed => {
                self.host.use_menu(MenuName::Default);
                Ok(())
            }
            AppMode::Open => self.enter_open(options).await,
            AppMode::Settings | AppMode::Intro => self.enter_single(target).await,
        };

        if let Err(err) = entered {
            log_error!("Failed to enter {:?}: {:#}", target, err);
            self.exit_mode(target).await;
            self.state.lock().await.enter(AppMode::Closed);
            self.host.use_menu(MenuName::Default);
            return Err(err);
        }

        Ok(true)
    }

    async fn refocus_last_window(&self) {
        let last = self.state.lock().await.last_live();
        if let Some(id) = last {
            self.host.focus_window(id);
        }
    }

    /// Tears down the windows of `mode`. Bookkeeping happens here, so the OS
    /// close events that follow find nothing to do.
    async fn exit_mode(&self, mode: AppMode) {
        let closing = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            match mode {
                AppMode::Closed => Vec::new(),
                AppMode::Open => {
                    if state
                        .memory
                        .save(&state.registry, &state.focus, &self.searcher)
                        .is_none()
                    {
                        log_debug!("Nothing to remember from Open mode");
                    }
                    let ids = state.registry.ids();
                    for id in &ids {
                        state.registry.deregister(*id);
                    }
                    state.focus.clear();
                    ids
                }
                AppMode::Settings | AppMode::Intro => {
                    let role = mode.sole_role().unwrap_or(WindowRole::Settings);
                    let ids = state.registry.ids_by_role(role);
                    for id in &ids {
                        state.registry.deregister(*id);
                        state.focus.remove_all(*id);
                    }
                    ids
                }
            }
        };

        for id in closing {
            self.host.close_window(id);
        }
    }

    async fn enter_open(&self, options: OpenOptions) -> Result<()> {
        let snapshot = self.state.lock().await.memory.load();
        let mut order = match snapshot {
            Some(snapshot) => self.rebuild(snapshot).await,
            None => self.build_default_layout().await,
        };

        self.apply_open_options(options, &mut order).await;
        if order.is_empty() {
            bail!("no window could be opened");
        }

        tokio::time::sleep(self.show_delay).await;

        let mut state = self.state.lock().await;
        order.retain(|id| state.registry.contains(*id));
        for id in &order {
            state.registry.mark_visible(*id, true);
            self.host.show_window(*id);
        }
        if let Some(last) = order.last() {
            self.host.focus_window(*last);
        }
        log_info!("Opened {} windows", order.len());
        state.focus.replace(order);
        Ok(())
    }

    /// Recreates a remembered layout. Returns the new ids in the remembered
    /// focus order; windows that failed to build are left out.
    async fn rebuild(&self, snapshot: ModeSnapshot) -> Vec<WindowId> {
        let ModeSnapshot {
            windows,
            focus_order,
            search_query,
        } = snapshot;

        let mut remap = HashMap::with_capacity(windows.len());
        let plans: Vec<WindowPlan> = {
            let mut state = self.state.lock().await;
            windows
                .into_iter()
                .map(|memory| {
                    let id = state.registry.allocate_id();
                    remap.insert(memory.id, id);
                    WindowPlan {
                        spec: WindowSpec {
                            id,
                            role: memory.role,
                            bounds: memory.bounds,
                        },
                        note: memory.note.and_then(|note| self.current_note(&note)),
                    }
                })
                .collect()
        };

        let built = self.build_windows(plans).await;
        let order: Vec<WindowId> = focus_order
            .iter()
            .filter_map(|old| remap.get(old).copied())
            .filter(|id| built.contains(id))
            .collect();

        if !search_query.is_empty() {
            let search = self.state.lock().await.registry.unique(WindowRole::Search);
            if let Some(search) = search {
                self.host
                    .send(search, RendererMessage::SetSearchQuery(search_query));
            }
        }

        order
    }

    async fn build_default_layout(&self) -> Vec<WindowId> {
        let screen = self.host.active_screen_bounds();
        let note = self.searcher.get_most_recent_note();

        let plans = {
            let mut state = self.state.lock().await;
            vec![
                WindowPlan {
                    spec: WindowSpec {
                        id: state.registry.allocate_id(),
                        role: WindowRole::Search,
                        bounds: default_bounds(WindowRole::Search, &screen),
                    },
                    note: None,
                },
                WindowPlan {
                    spec: WindowSpec {
                        id: state.registry.allocate_id(),
                        role: WindowRole::Write,
                        bounds: default_bounds(WindowRole::Write, &screen),
                    },
                    note,
                },
            ]
        };

        self.build_windows(plans).await
    }

    /// Builds every planned window in parallel and registers the ones that
    /// came up, in plan order.
    async fn build_windows(&self, plans: Vec<WindowPlan>) -> Vec<WindowId> {
        let mut tasks = JoinSet::new();
        for (slot, plan) in plans.iter().enumerate() {
            let host = self.host.clone();
            let spec = plan.spec;
            tasks.spawn(async move { (slot, host.create_window(spec).await) });
        }

        let mut built: Vec<Option<Bounds>> = vec![None; plans.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, Ok(bounds))) => built[slot] = Some(bounds),
                Ok((slot, Err(err))) => {
                    log_warn!(
                        "Failed to build {} window: {:#}",
                        plans[slot].spec.role.as_str(),
                        err
                    );
                }
                Err(err) => log_error!("Window build task failed: {}", err),
            }
        }

        let mut state = self.state.lock().await;
        plans
            .into_iter()
            .zip(built)
            .filter_map(|(plan, bounds)| {
                let bounds = bounds?;
                let id = plan.spec.id;
                self.register(&mut state, plan, bounds);
                Some(id)
            })
            .collect()
    }

    fn register(&self, state: &mut ControllerState, plan: WindowPlan, bounds: Bounds) {
        let WindowPlan { spec, note } = plan;
        state.registry.register(spec.id, spec.role, bounds);
        if let Some(note) = note {
            state.registry.bind_note(spec.id, note.searcher_index);
            self.host
                .send(spec.id, RendererMessage::SendNoteForEdit(note));
        }
    }

    async fn apply_open_options(&self, options: OpenOptions, order: &mut Vec<WindowId>) {
        if options.new_write_window {
            match self.create_write_window(None, order).await {
                Ok(id) => move_to_end(order, id),
                Err(err) => log_warn!("Failed to open a new write window: {:#}", err),
            }
        }

        if options.write_afterwards {
            let existing = {
                let state = self.state.lock().await;
                order
                    .iter()
                    .rev()
                    .copied()
                    .find(|id| state.registry.role_of(*id) == Some(WindowRole::Write))
            };
            let write = match existing {
                Some(id) => Ok(id),
                None => self.create_write_window(None, order).await,
            };
            match write {
                Ok(id) => move_to_end(order, id),
                Err(err) => log_warn!("Failed to open a write window: {:#}", err),
            }
        }

        if options.search_afterwards {
            let existing = self.unique_window(WindowRole::Search).await;
            let search = match existing {
                Some(id) => Ok(id),
                None => {
                    let bounds = default_bounds(WindowRole::Search, &self.host.active_screen_bounds());
                    self.create_window(WindowRole::Search, bounds, None).await
                }
            };
            match search {
                Ok(id) => move_to_end(order, id),
                Err(err) => log_warn!("Failed to open the search window: {:#}", err),
            }
        }
    }

    /// Settings and Intro: one window, shown as soon as it exists.
    async fn enter_single(&self, mode: AppMode) -> Result<()> {
        let role = mode
            .sole_role()
            .ok_or_else(|| anyhow!("{:?} has no window of its own", mode))?;
        let screen = self.host.active_screen_bounds();
        let bounds = match role {
            WindowRole::Settings => settings_bounds(self.host.tray_position(), &screen),
            _ => default_bounds(role, &screen),
        };

        let id = self.create_window(role, bounds, None).await?;
        self.show_and_focus(id).await;
        Ok(())
    }

    /// Builds one window outside a batch. Search and write windows only
    /// belong to Open mode. If the mode changes while the window is being
    /// built, it is closed again.
    async fn create_window(
        &self,
        role: WindowRole,
        bounds: Bounds,
        note: Option<NoteEditInfo>,
    ) -> Result<WindowId> {
        let (id, mode) = {
            let mut state = self.state.lock().await;
            if state.mode.sole_role() != Some(role) && state.mode != AppMode::Open {
                bail!("no {} window outside Open mode", role.as_str());
            }
            (state.registry.allocate_id(), state.mode)
        };
        let spec = WindowSpec { id, role, bounds };
        let applied = self.host.create_window(spec).await?;

        let mut state = self.state.lock().await;
        if state.mode != mode {
            drop(state);
            self.host.close_window(id);
            bail!("mode changed while building {} window {}", role.as_str(), id);
        }
        self.register(&mut state, WindowPlan { spec, note }, applied);
        Ok(id)
    }

    /// A write window stacked on the last focused one, or on the last write
    /// window in `order` when none has been focused yet.
    async fn create_write_window(
        &self,
        note: Option<NoteEditInfo>,
        order: &[WindowId],
    ) -> Result<WindowId> {
        let mut bounds = default_bounds(WindowRole::Write, &self.host.active_screen_bounds());
        let anchor = {
            let state = self.state.lock().await;
            state
                .last_live_of_role(WindowRole::Write)
                .or_else(|| {
                    order
                        .iter()
                        .rev()
                        .copied()
                        .find(|id| state.registry.role_of(*id) == Some(WindowRole::Write))
                })
                .or_else(|| state.registry.ids_by_role(WindowRole::Write).last().copied())
                .and_then(|id| state.registry.get(id).map(|entry| entry.bounds.position))
        };
        if let Some(anchor) = anchor {
            bounds.position = stacked_write_position(anchor);
        }

        self.create_window(WindowRole::Write, bounds, note).await
    }

    async fn show_and_focus(&self, id: WindowId) {
        let mut state = self.state.lock().await;
        if !state.registry.contains(id) {
            return;
        }
        state.registry.mark_visible(id, true);
        state.focus.record(id);
        self.host.show_window(id);
        self.host.focus_window(id);
    }

    async fn show_after_delay(&self, id: WindowId) {
        tokio::time::sleep(self.show_delay).await;
        self.show_and_focus(id).await;
    }

    async fn focus(&self, id: WindowId) {
        let mut state = self.state.lock().await;
        if state.registry.contains(id) {
            state.focus.record(id);
            self.host.focus_window(id);
        }
    }

    /// `note` if its index still resolves to the same file, refreshed from
    /// the searcher; `None` otherwise.
    fn current_note(&self, note: &NoteEditInfo) -> Option<NoteEditInfo> {
        let current = self.searcher.get_note_edit_info(note.searcher_index);
        match current {
            Some(current) if current.filepath == note.filepath => Some(current),
            _ => {
                log_debug!("Note {} no longer resolves; opening unbound", note.searcher_index);
                None
            }
        }
    }

    /// `None` when the request was dropped (see `accepts_window_request`).
    pub async fn focus_or_create_search(&self) -> Result<Option<WindowId>> {
        if !self.accepts_window_request("search window request").await {
            return Ok(None);
        }
        let existing = {
            let state = self.state.lock().await;
            state
                .registry
                .unique(WindowRole::Search)
                .and_then(|id| state.registry.get(id).map(|entry| (id, entry.visible)))
        };

        match existing {
            Some((id, true)) => {
                self.focus(id).await;
                Ok(Some(id))
            }
            Some((id, false)) => {
                self.show_and_focus(id).await;
                Ok(Some(id))
            }
            None => {
                let bounds = default_bounds(WindowRole::Search, &self.host.active_screen_bounds());
                let id = self.create_window(WindowRole::Search, bounds, None).await?;
                let query = self.state.lock().await.memory.search_query().to_string();
                if !query.is_empty() {
                    self.host.send(id, RendererMessage::SetSearchQuery(query));
                }
                self.show_after_delay(id).await;
                Ok(Some(id))
            }
        }
    }

    pub async fn focus_or_create_last_write(&self) -> Result<Option<WindowId>> {
        if !self.accepts_window_request("write window request").await {
            return Ok(None);
        }
        let last = self.state.lock().await.last_live_of_role(WindowRole::Write);
        match last {
            Some(id) => {
                self.focus(id).await;
                Ok(Some(id))
            }
            None => self.open_write_window(None, true).await,
        }
    }

    /// Blank note: reuses the last focused write window, or opens one.
    /// Only meaningful while Open.
    pub async fn handle_new_note(&self) -> Result<Option<WindowId>> {
        if !self.accepts_window_request("new note").await {
            return Ok(None);
        }
        let last = self.state.lock().await.last_live_of_role(WindowRole::Write);
        match last {
            Some(id) => {
                self.reset_write_window(id).await;
                self.focus(id).await;
                Ok(Some(id))
            }
            None => self.open_write_window(None, true).await,
        }
    }

    /// A note that no longer resolves opens an unbound window.
    pub async fn open_write_window(
        &self,
        note: Option<NoteEditInfo>,
        show: bool,
    ) -> Result<Option<WindowId>> {
        if !self.accepts_window_request("new write window").await {
            return Ok(None);
        }
        let note = note.and_then(|note| self.current_note(&note));
        let id = self.create_write_window(note, &[]).await?;
        if show {
            self.show_after_delay(id).await;
        }
        Ok(Some(id))
    }

    /// Focuses the window already editing the note, or opens a new one.
    pub async fn open_write_window_for_note(&self, info: NoteEditInfo) -> Result<Option<WindowId>> {
        if !self.accepts_window_request("open note in new window").await {
            return Ok(None);
        }
        let existing = self.bound_window(info.searcher_index).await;
        match existing {
            Some(id) => {
                self.focus(id).await;
                Ok(Some(id))
            }
            None => self.open_write_window(Some(info), true).await,
        }
    }

    /// Loads the note into the last focused write window unless some window
    /// is already editing it.
    pub async fn send_note_for_edit(&self, info: NoteEditInfo) -> Result<Option<WindowId>> {
        if !self.accepts_window_request("send note for edit").await {
            return Ok(None);
        }
        if let Some(id) = self.bound_window(info.searcher_index).await {
            self.focus(id).await;
            return Ok(Some(id));
        }

        let target = {
            let mut state = self.state.lock().await;
            let target = state.last_live_of_role(WindowRole::Write);
            if let Some(id) = target {
                state.registry.bind_note(id, info.searcher_index);
            }
            target
        };

        match target {
            Some(id) => {
                self.host
                    .send(id, RendererMessage::SendNoteForEdit(info));
                self.focus(id).await;
                Ok(Some(id))
            }
            None => self.open_write_window_for_note(info).await,
        }
    }

    async fn bound_window(&self, searcher_index: usize) -> Option<WindowId> {
        self.state
            .lock()
            .await
            .registry
            .windows_bound_to(searcher_index)
            .first()
            .copied()
    }

    /// Requests closes; registry cleanup happens in [`Self::on_window_closed`].
    pub async fn close_windows_for_note(&self, searcher_index: usize) {
        let ids = self
            .state
            .lock()
            .await
            .registry
            .windows_bound_to(searcher_index);
        for id in ids {
            self.host.close_window(id);
        }
    }

    pub async fn close_all_write_windows(&self) {
        self.close_role(WindowRole::Write).await;
    }

    pub async fn close_role(&self, role: WindowRole) {
        let ids = self.windows_of_role(role).await;
        for id in ids {
            self.host.close_window(id);
        }
    }

    pub async fn close_focused_window(&self) {
        let last = self.state.lock().await.last_live();
        if let Some(id) = last {
            self.host.close_window(id);
        }
    }

    pub async fn focus_search_window(&self) {
        if let Some(id) = self.unique_window(WindowRole::Search).await {
            self.focus(id).await;
        }
    }

    pub async fn bind_note(&self, id: WindowId, searcher_index: usize) {
        self.state
            .lock()
            .await
            .registry
            .bind_note(id, searcher_index);
    }

    pub async fn unbind_note(&self, id: WindowId) {
        self.state.lock().await.registry.unbind_note(id);
    }

    /// Clears the window's binding and empties its editor.
    pub async fn reset_write_window(&self, id: WindowId) {
        let known = {
            let mut state = self.state.lock().await;
            state.registry.unbind_note(id);
            state.registry.role_of(id) == Some(WindowRole::Write)
        };
        if known {
            self.host.send(id, RendererMessage::ResetWriteWindow);
        }
    }

    pub async fn retrigger_search(&self) {
        if let Some(id) = self.unique_window(WindowRole::Search).await {
            self.host.send(id, RendererMessage::RetriggerSearch);
        }
    }

    pub async fn on_window_focused(&self, id: WindowId) {
        let role = {
            let mut state = self.state.lock().await;
            let Some(role) = state.registry.role_of(id) else {
                log_debug!("Focus event for unknown window {}", id);
                return;
            };
            state.focus.record(id);
            role
        };
        self.host.use_menu(MenuName::for_role(role));
        self.host.send(id, RendererMessage::WindowFocused(true));
    }

    /// Settings is a popover: losing focus closes it.
    pub async fn on_window_blurred(&self, id: WindowId) {
        let Some(role) = self.state.lock().await.registry.role_of(id) else {
            return;
        };
        self.host.send(id, RendererMessage::WindowFocused(false));
        if role == WindowRole::Settings {
            self.host.close_window(id);
        }
    }

    pub async fn on_window_moved(&self, id: WindowId, bounds: Bounds) {
        self.state.lock().await.registry.update_bounds(id, bounds);
    }

    pub fn on_key_input(&self, input: &KeyInput) {
        self.keyboard.handle_input(input);
    }

    /// Bookkeeping for a window the OS has closed. Unknown ids are ignored,
    /// which covers windows already torn down by a transition.
    pub async fn on_window_closed(&self, id: WindowId) -> Result<()> {
        let (entry, mode, from_open, next_focus, empty) = {
            let mut state = self.state.lock().await;
            let Some(entry) = state.registry.deregister(id) else {
                log_debug!("Close event for unknown window {}", id);
                return Ok(());
            };
            state.focus.remove_all(id);

            let next_focus = match entry.role {
                WindowRole::Write => state
                    .last_live_of_role(WindowRole::Write)
                    .or_else(|| state.last_live()),
                _ => None,
            };
            (
                entry,
                state.mode,
                state.entered_from(AppMode::Open),
                next_focus,
                state.focus.is_empty(),
            )
        };

        if let Some(next) = next_focus {
            self.focus(next).await;
            return Ok(());
        }

        if entry.role == WindowRole::Settings && mode == AppMode::Settings && from_open {
            self.switch_to(AppMode::Open, OpenOptions::default()).await?;
            return Ok(());
        }

        if empty && mode != AppMode::Closed {
            log_info!("Last window closed; closing to tray");
            self.close_if_windowless().await?;
        }
        Ok(())
    }

    /// Forces Closed once no window is left. A running transition keeps the
    /// guard, so wait for it and look again: it may have opened windows of
    /// its own, or left the mode empty.
    async fn close_if_windowless(&self) -> Result<()> {
        loop {
            if self
                .switch_to(AppMode::Closed, OpenOptions::default())
                .await?
            {
                return Ok(());
            }
            log_debug!("Close to tray deferred: transition in progress");
            self.wait_until_idle().await;

            let state = self.state.lock().await;
            if state.mode == AppMode::Closed || state.last_live().is_some() {
                return Ok(());
            }
        }
    }
}

fn move_to_end(order: &mut Vec<WindowId>, id: WindowId) {
    order.retain(|existing| *existing != id);
    order.push(id);
}
