use std::path::Path;

use super::error::{SessionError, SessionResult};
use super::model::{
    Dimensions, DownloadTarget, EditOperation, EditRecord, EditedImage, PendingMutation,
    ResetImage, SessionState, UploadedFile,
};
use super::resolver::{resolve_current_file, resolve_download_target};
use crate::state::{SessionEvent, SessionPhase};
use crate::transport::{ImageServer, TransportResult};
use crate::upload::{CandidateFile, UploadPolicy};

/// Issued when an edit request is started. Hand it back with the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTicket {
    generation: u64,
    target: String,
    operation: EditOperation,
}

impl EditTicket {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn operation(&self) -> EditOperation {
        self.operation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTicket {
    generation: u64,
    original_filename: String,
}

impl ResetTicket {
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    /// The reply belonged to a session that a newer upload replaced.
    Discarded,
}

/// Owns one tab's [`SessionState`]. Every mutation goes through here.
///
/// Edits and resets are split into `begin_*` / `complete_*` so a front end
/// can run the request on a worker and feed the reply back later; `edit`
/// and `reset` do both halves inline.
#[derive(Debug, Default)]
pub struct EditSession {
    state: SessionState,
    generation: u64,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_filename(&self) -> Option<&str> {
        resolve_current_file(&self.state)
    }

    /// Validates locally, uploads, and starts a fresh session on success.
    /// Rejected or failed uploads leave the existing session untouched.
    pub fn upload<S: ImageServer>(
        &mut self,
        server: &S,
        policy: &UploadPolicy,
        file: &CandidateFile,
    ) -> SessionResult<&UploadedFile> {
        if let Err(rejection) = policy.validate(file) {
            tracing::warn!(name = %file.name, %rejection, "upload rejected locally");
            return Err(rejection.into());
        }

        let uploaded = server.upload(file).inspect_err(|err| {
            tracing::warn!(name = %file.name, %err, "upload failed");
        })?;
        let dimensions = local_dimensions(&file.path);
        self.accept_upload(uploaded, dimensions)
    }

    /// Replaces the whole session with a server-confirmed upload.
    pub fn accept_upload(
        &mut self,
        file: UploadedFile,
        dimensions: Option<Dimensions>,
    ) -> SessionResult<&UploadedFile> {
        self.state.machine.transition(SessionEvent::Uploaded)?;
        self.generation += 1;
        self.state.history.clear();
        self.state.pending = None;
        self.state.original_dimensions = dimensions;
        self.state.dimensions = dimensions;
        tracing::info!(
            filename = %file.filename,
            original_name = %file.original_name,
            generation = self.generation,
            "upload accepted"
        );
        Ok(&*self.state.current_file.insert(file))
    }

    fn begin_mutation(&mut self, pending: PendingMutation) -> SessionResult<()> {
        match self.state.phase() {
            SessionPhase::Idle => return Err(SessionError::NoFile),
            SessionPhase::Busy => {
                tracing::warn!(?pending, "mutation refused while busy");
                return Err(SessionError::Busy);
            }
            SessionPhase::Ready => {}
        }
        self.state.machine.transition(SessionEvent::BeginMutation)?;
        self.state.pending = Some(pending);
        Ok(())
    }

    /// Returns `false` for a stale ticket, leaving the live session alone.
    fn settle(&mut self, generation: u64) -> SessionResult<bool> {
        if generation != self.generation {
            tracing::info!(
                ticket = generation,
                current = self.generation,
                "discarding reply from a superseded session"
            );
            return Ok(false);
        }
        self.state.pending = None;
        self.state.machine.transition(SessionEvent::MutationSettled)?;
        Ok(true)
    }

    pub fn begin_edit(&mut self, operation: EditOperation) -> SessionResult<EditTicket> {
        let target = self
            .current_filename()
            .ok_or(SessionError::NoFile)?
            .to_string();
        self.begin_mutation(PendingMutation::Edit(operation))?;
        tracing::debug!(file = %target, %operation, "edit started");
        Ok(EditTicket {
            generation: self.generation,
            target,
            operation,
        })
    }

    /// Always releases the busy guard for a live ticket, then applies the
    /// reply if it was a success.
    pub fn complete_edit(
        &mut self,
        ticket: EditTicket,
        reply: TransportResult<EditedImage>,
    ) -> SessionResult<Settled> {
        if !self.settle(ticket.generation)? {
            return Ok(Settled::Discarded);
        }
        let edited = reply.inspect_err(|err| {
            tracing::warn!(file = %ticket.target, operation = %ticket.operation, %err, "edit failed");
        })?;

        tracing::info!(
            from = %ticket.target,
            to = %edited.filename,
            operation = %ticket.operation,
            "edit applied"
        );
        self.state.dimensions = Some(edited.dimensions);
        self.state.history.append(EditRecord {
            operation: ticket.operation,
            filename: edited.filename,
            url: edited.url,
        });
        Ok(Settled::Applied)
    }

    pub fn edit<S: ImageServer>(
        &mut self,
        server: &S,
        operation: EditOperation,
    ) -> SessionResult<Settled> {
        let ticket = self.begin_edit(operation)?;
        let reply = server.edit(ticket.target(), operation);
        self.complete_edit(ticket, reply)
    }

    /// `confirm` is asked only once the session could actually reset.
    /// Returns `None` when the user declines.
    pub fn begin_reset<F>(&mut self, confirm: F) -> SessionResult<Option<ResetTicket>>
    where
        F: FnOnce() -> bool,
    {
        let original_filename = match (&self.state.current_file, self.state.phase()) {
            (None, _) => return Err(SessionError::NoFile),
            (Some(_), SessionPhase::Busy) => return Err(SessionError::Busy),
            (Some(file), _) => file.filename.clone(),
        };
        if !confirm() {
            tracing::debug!("reset declined");
            return Ok(None);
        }
        self.begin_mutation(PendingMutation::Reset)?;
        Ok(Some(ResetTicket {
            generation: self.generation,
            original_filename,
        }))
    }

    pub fn complete_reset(
        &mut self,
        ticket: ResetTicket,
        reply: TransportResult<ResetImage>,
    ) -> SessionResult<Settled> {
        if !self.settle(ticket.generation)? {
            return Ok(Settled::Discarded);
        }
        let reset = reply.inspect_err(|err| {
            tracing::warn!(original = %ticket.original_filename, %err, "reset failed");
        })?;

        tracing::info!(
            filename = %reset.filename,
            discarded_edits = self.state.history.count(),
            "session reset to original"
        );
        self.state.history.clear();
        self.state.dimensions = self.state.original_dimensions;
        Ok(Settled::Applied)
    }

    /// Returns `Ok(None)` when the user declined the confirmation.
    pub fn reset<S, F>(&mut self, server: &S, confirm: F) -> SessionResult<Option<Settled>>
    where
        S: ImageServer,
        F: FnOnce() -> bool,
    {
        let Some(ticket) = self.begin_reset(confirm)? else {
            return Ok(None);
        };
        let reply = server.reset(ticket.original_filename());
        self.complete_reset(ticket, reply).map(Some)
    }

    pub fn download_target(&self) -> SessionResult<DownloadTarget> {
        resolve_download_target(&self.state).ok_or(SessionError::NoFile)
    }

    pub fn download<S: ImageServer>(&self, server: &S) -> SessionResult<(DownloadTarget, Vec<u8>)> {
        let target = self.download_target()?;
        let bytes = server.download(&target.url)?;
        tracing::info!(file_name = %target.file_name, bytes = bytes.len(), "downloaded image");
        Ok((target, bytes))
    }
}

fn local_dimensions(path: &Path) -> Option<Dimensions> {
    match image::image_dimensions(path) {
        Ok((width, height)) => Some(Dimensions::new(width, height)),
        Err(err) => {
            tracing::debug!(path = %path.display(), ?err, "could not read local image dimensions");
            None
        }
    }
}
