// Stream lifecycle on the client: restore from storage, (re)connect with backoff,
// suspend while the page is hidden, and feed every snapshot through one pipeline.

use std::collections::HashSet;
use std::time::Duration;

use super::backoff::Backoff;
use super::history::{EntityKey, HistoryBuffer, MetricKind};
use super::store::SnapshotStore;
use super::DecodeError;
use crate::models::{ContainerSnapshot, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Streaming,
    /// Stream failed; a reconnect is scheduled.
    Error,
    /// Stream closed because the page is not visible.
    Hidden,
}

impl ConnectionState {
    fn has_live_stream(self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Streaming)
    }
}

/// Transient status line shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusHint {
    /// Showing the snapshot restored from storage; live data not yet received.
    FromCache,
    Reconnecting { delay: Duration },
    ServerError(String),
}

/// Work the embedding page must carry out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenStream,
    CloseStream,
    ScheduleReconnect(Duration),
    CancelReconnect,
    Render { snapshot: Snapshot, from_cache: bool },
    /// Destroy the charts of containers that disappeared.
    RemoveCharts(Vec<String>),
    ShowStatus(StatusHint),
    ClearStatus,
    /// Install a one-shot focus listener that calls `page_visible`.
    ArmResumeOnFocus,
}

pub fn decode_snapshot(raw: &str) -> Result<Snapshot, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

pub struct StreamClient<S: SnapshotStore> {
    state: ConnectionState,
    backoff: Backoff,
    reconnect_pending: bool,
    resume_armed: bool,
    status: Option<StatusHint>,
    history: HistoryBuffer,
    store: S,
}

impl<S: SnapshotStore> StreamClient<S> {
    pub fn new(store: S) -> Self {
        Self::with_parts(store, Backoff::default(), HistoryBuffer::default())
    }

    pub fn with_parts(store: S, backoff: Backoff, history: HistoryBuffer) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            backoff,
            reconnect_pending: false,
            resume_armed: false,
            status: None,
            history,
            store,
        }
    }

    /// Render the persisted snapshot, if any, then open the live stream.
    pub fn page_load(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(raw) = self.store.load() {
            match decode_snapshot(&raw) {
                Ok(snapshot @ Snapshot::Metrics { .. }) => {
                    effects.push(self.set_status(StatusHint::FromCache));
                    effects.extend(self.process_snapshot(snapshot, true));
                }
                Ok(Snapshot::Error { .. }) => {}
                Err(e) => tracing::debug!(error = %e, "ignoring unreadable persisted snapshot"),
            }
        }
        effects.extend(self.connect());
        effects
    }

    pub fn stream_opened(&mut self) -> Vec<Effect> {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Streaming;
        }
        Vec::new()
    }

    /// One pushed message, in receipt order.
    pub fn message(&mut self, raw: &str) -> Vec<Effect> {
        let snapshot = match decode_snapshot(raw) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable stream message");
                return Vec::new();
            }
        };

        // Late delivery from a stream that was already closed.
        if !self.state.has_live_stream() {
            tracing::debug!(state = ?self.state, "ignoring message from closed stream");
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Streaming;
        }
        self.backoff.reset();
        if self.reconnect_pending {
            self.reconnect_pending = false;
            effects.push(Effect::CancelReconnect);
        }

        match snapshot {
            Snapshot::Error { error } => {
                effects.push(self.set_status(StatusHint::ServerError(error)));
            }
            snapshot @ Snapshot::Metrics { .. } => {
                if let Err(e) = self.store.save(raw) {
                    tracing::debug!(error = %e, "snapshot not persisted");
                }
                effects.extend(self.clear_status());
                effects.extend(self.process_snapshot(snapshot, false));
            }
        }
        effects
    }

    pub fn stream_error(&mut self) -> Vec<Effect> {
        if matches!(
            self.state,
            ConnectionState::Hidden | ConnectionState::Disconnected
        ) || self.reconnect_pending
        {
            return Vec::new();
        }

        let delay = self.backoff.next_delay();
        self.state = ConnectionState::Error;
        self.reconnect_pending = true;
        tracing::info!(delay_ms = delay.as_millis() as u64, "stream lost; reconnect scheduled");

        let mut effects = vec![Effect::CloseStream];
        effects.push(self.set_status(StatusHint::Reconnecting { delay }));
        effects.push(Effect::ScheduleReconnect(delay));
        effects
    }

    pub fn reconnect_timer_fired(&mut self) -> Vec<Effect> {
        if !self.reconnect_pending {
            return Vec::new();
        }
        self.reconnect_pending = false;
        if self.state == ConnectionState::Hidden {
            return Vec::new();
        }
        self.connect()
    }

    pub fn page_hidden(&mut self) -> Vec<Effect> {
        if self.state == ConnectionState::Hidden {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.state.has_live_stream() {
            effects.push(Effect::CloseStream);
        }
        if self.reconnect_pending {
            self.reconnect_pending = false;
            effects.push(Effect::CancelReconnect);
        }
        self.state = ConnectionState::Hidden;
        if !self.resume_armed {
            self.resume_armed = true;
            effects.push(Effect::ArmResumeOnFocus);
        }
        effects
    }

    /// Focus or visibility change to visible.
    pub fn page_visible(&mut self) -> Vec<Effect> {
        self.resume_armed = false;
        let mut effects = self.clear_status();
        if self.state.has_live_stream() {
            return effects;
        }
        if self.reconnect_pending {
            self.reconnect_pending = false;
            effects.push(Effect::CancelReconnect);
        }
        effects.extend(self.connect());
        effects
    }

    /// `persisted` is true when the page came back from the back/forward cache; whatever
    /// stream object survived the freeze is not trusted.
    pub fn page_show(&mut self, persisted: bool) -> Vec<Effect> {
        if !persisted {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.state.has_live_stream() {
            effects.push(Effect::CloseStream);
        }
        if self.reconnect_pending {
            self.reconnect_pending = false;
            effects.push(Effect::CancelReconnect);
        }
        self.resume_armed = false;
        self.state = ConnectionState::Disconnected;
        effects.extend(self.connect());
        effects
    }

    /// Render, record history, then drop the series of containers that are gone.
    pub fn process_snapshot(&mut self, snapshot: Snapshot, from_cache: bool) -> Vec<Effect> {
        let Snapshot::Metrics { containers, host } = &snapshot else {
            return Vec::new();
        };

        self.history
            .observe(EntityKey::Host, MetricKind::Cpu, host.cpu_usage);
        self.history
            .observe(EntityKey::Host, MetricKind::Ram, host.memory_usage_percent);
        for c in containers {
            let key = EntityKey::Container(c.id.clone());
            self.history.observe(key.clone(), MetricKind::Cpu, c.cpu);
            self.history
                .observe(key, MetricKind::Ram, ram_percent(c, host.total_memory));
        }
        let active: HashSet<String> = containers.iter().map(|c| c.id.clone()).collect();
        let removed = self.history.cleanup(&active);

        let mut effects = vec![Effect::Render {
            snapshot,
            from_cache,
        }];
        if !removed.is_empty() {
            effects.push(Effect::RemoveCharts(removed));
        }
        effects
    }

    fn connect(&mut self) -> Vec<Effect> {
        if self.state.has_live_stream() {
            return Vec::new();
        }
        self.state = ConnectionState::Connecting;
        vec![Effect::OpenStream]
    }

    fn set_status(&mut self, hint: StatusHint) -> Effect {
        self.status = Some(hint.clone());
        Effect::ShowStatus(hint)
    }

    fn clear_status(&mut self) -> Vec<Effect> {
        match self.status.take() {
            Some(_) => vec![Effect::ClearStatus],
            None => Vec::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn status(&self) -> Option<&StatusHint> {
        self.status.as_ref()
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Container memory as a percentage of its limit, or of host memory when unlimited.
fn ram_percent(c: &ContainerSnapshot, host_total_mib: u64) -> f64 {
    let limit = if c.ram_limit == 0 {
        host_total_mib
    } else {
        c.ram_limit
    };
    if limit == 0 {
        0.0
    } else {
        c.ram_usage as f64 / limit as f64 * 100.0
    }
}
