//! Playback of a parsed script against a `Renderer`.
//!
//! The timeline owns the command list, a cursor and the run state. Commands
//! run strictly in order; after a camera move or a `wait` the executor sleeps
//! for the command's settle time before looking at the next one. A stop
//! request is only honoured between commands.
//!
//! Stepping backward is a replay: the surface is cleared and every command
//! before the new cursor is dispatched again with no delays, so the surface
//! at cursor `N` is always "cleared + commands `[0..N)`".

mod control;
mod dispatch;
mod events;

pub use control::StopControl;
pub use events::{Status, TimelineEvent};

use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use crate::geo::GeoResolver;
use crate::model::Config;
use crate::processor::ast::Script;
use crate::processor::{script_parser, validate};
use crate::render::Renderer;
use dispatch::{Context, dispatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Running,
    Stopped,
}

pub struct Timeline<R: Renderer, G: GeoResolver> {
    script: Script,
    cursor: usize,
    state: State,
    renderer: R,
    resolver: G,
    config: Config,
    control: StopControl,
    subscribers: Vec<Sender<TimelineEvent>>,
}

impl<R: Renderer, G: GeoResolver> Timeline<R, G> {
    pub fn new(renderer: R, resolver: G, config: Config) -> Self {
        Self {
            script: Script::new(),
            cursor: 0,
            state: State::Idle,
            renderer,
            resolver,
            config,
            control: StopControl::new(),
            subscribers: Vec::new(),
        }
    }

    /// Replace the command list with the commands of `text`.
    ///
    /// Cursor and state are reset; the render surface is left as it is until
    /// the next fresh run or step.
    pub fn load(&mut self, text: &str) {
        self.load_script(script_parser::parse(text));
    }

    pub fn load_script(&mut self, script: Script) {
        self.control.request_stop();
        log::info!(
            "Loaded {} commands ({} lines rejected)",
            script.len(),
            script.rejected_lines().len()
        );
        self.emit(TimelineEvent::Loaded {
            commands: script.len(),
            rejected: script.rejected_lines().len(),
        });
        self.script = script;
        self.cursor = 0;
        self.state = State::Idle;
    }

    /// Play from the cursor until the end or a stop request.
    ///
    /// At cursor 0 this is a fresh run: the script is checked for advisory
    /// diagnostics and the surface is cleared first.
    pub async fn run(&mut self) -> Status {
        if self.script.is_empty() {
            log::info!("Nothing to run");
            return self.finish(Status::NothingToRun);
        }

        if self.cursor == 0 {
            let diagnostics = validate::check(&self.script, &self.config);
            for d in &diagnostics {
                log::warn!("{d}");
            }
            if !diagnostics.is_empty() {
                self.emit(TimelineEvent::Warnings { diagnostics });
            }
            self.renderer.clear_all();
        }

        self.control.reset();
        self.state = State::Running;
        log::debug!("Running from command {}", self.cursor);
        self.emit(TimelineEvent::Started {
            cursor: self.cursor,
        });

        while self.cursor < self.script.len() {
            if self.control.is_stopped() {
                break;
            }
            self.execute(self.cursor).await;
            self.cursor += 1;
            self.emit_progress();
        }

        if self.cursor >= self.script.len() {
            self.state = State::Idle;
            self.finish(Status::Done)
        } else {
            self.state = State::Stopped;
            log::debug!("Stopped before command {}", self.cursor);
            self.finish(Status::Stopped)
        }
    }

    /// Execute the command at the cursor, awaiting its settle time.
    pub async fn step_forward(&mut self) -> Status {
        if self.cursor >= self.script.len() {
            return self.finish(Status::AtEnd);
        }
        self.state = State::Idle;
        if self.cursor == 0 {
            self.renderer.clear_all();
        }

        self.execute(self.cursor).await;
        self.cursor += 1;
        self.emit_progress();
        self.finish(self.stepped())
    }

    /// Move the cursor back one command and rebuild the surface by replay.
    pub fn step_backward(&mut self) -> Status {
        if self.cursor == 0 {
            return self.finish(Status::AtStart);
        }
        self.state = State::Idle;
        self.cursor -= 1;
        self.replay();
        self.emit_progress();
        self.finish(self.stepped())
    }

    /// Stop a run at its next command boundary.
    ///
    /// While `run` is in progress use the handle from `stop_handle`; this
    /// method covers a run future that was dropped mid-way.
    pub fn stop(&mut self) {
        self.control.request_stop();
        if self.state == State::Running {
            self.state = State::Stopped;
        }
    }

    /// Clear the surface and rewind to the first command, keeping the script.
    pub fn restart(&mut self) {
        self.control.request_stop();
        self.renderer.clear_all();
        self.cursor = 0;
        self.state = State::Idle;
        self.emit_progress();
    }

    pub fn stop_handle(&self) -> StopControl {
        self.control.clone()
    }

    /// Receive every `TimelineEvent` from now on.
    pub fn subscribe(&mut self) -> Receiver<TimelineEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// `(executed, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.script.len())
    }

    /// Source line of the next command to execute.
    pub fn current_source_line(&self) -> Option<usize> {
        self.script.source_line(self.cursor)
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn resolver(&self) -> &G {
        &self.resolver
    }

    // ─────────────────────────────────────────────────────

    fn replay(&mut self) {
        self.renderer.clear_all();
        for index in 0..self.cursor {
            self.apply(index);
        }
    }

    /// Dispatch one command and await its settle time.
    ///
    /// Skipped commands do not wait. Replay calls `apply` directly instead.
    async fn execute(&mut self, index: usize) {
        if !self.apply(index) {
            return;
        }
        let settle = match self.script.get(index) {
            Some(cmd) => self.config.settle.for_command(cmd),
            None => Duration::ZERO,
        };
        if !settle.is_zero() {
            tokio::time::sleep(settle).await;
        }
    }

    /// Dispatch one command; `false` when it had no visual effect.
    fn apply(&mut self, index: usize) -> bool {
        let Some(cmd) = self.script.get(index) else {
            return false;
        };
        log::debug!("[{index}] {}", cmd.kind());

        let ctx = Context {
            resolver: &self.resolver,
            config: &self.config,
            script: &self.script,
        };
        match dispatch(cmd, &mut self.renderer, &ctx) {
            Ok(()) => true,
            Err(reason) => {
                log::debug!("[{index}] skipped: {reason}");
                let source_line = self.script.source_line(index).unwrap_or_default();
                self.emit(TimelineEvent::Skipped {
                    index,
                    source_line,
                    reason,
                });
                false
            }
        }
    }

    fn stepped(&self) -> Status {
        Status::Stepped {
            current: self.cursor,
            total: self.script.len(),
        }
    }

    fn finish(&mut self, status: Status) -> Status {
        self.emit(TimelineEvent::Finished(status));
        status
    }

    fn emit_progress(&mut self) {
        self.emit(TimelineEvent::Progress {
            current: self.cursor,
            total: self.script.len(),
            source_line: self.current_source_line(),
        });
    }

    fn emit(&mut self, event: TimelineEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
