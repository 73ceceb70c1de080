#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AptProgressEventKind {
    Begin,
    Report,
    End,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AptProgressEvent {
    pub kind: AptProgressEventKind,
    pub message: String,
    /// Qualified name of the class the event is about, if any.
    pub class_name: Option<String>,
}

impl AptProgressEvent {
    pub fn begin(message: impl Into<String>) -> Self {
        Self {
            kind: AptProgressEventKind::Begin,
            message: message.into(),
            class_name: None,
        }
    }

    pub fn report(message: impl Into<String>) -> Self {
        Self {
            kind: AptProgressEventKind::Report,
            message: message.into(),
            class_name: None,
        }
    }

    pub fn end() -> Self {
        Self {
            kind: AptProgressEventKind::End,
            message: "done".to_string(),
            class_name: None,
        }
    }

    pub(crate) fn for_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }
}

pub trait ProgressReporter {
    fn event(&mut self, event: AptProgressEvent) {
        match event.kind {
            AptProgressEventKind::Begin => self.begin(&event.message),
            AptProgressEventKind::Report => self.report(&event.message),
            AptProgressEventKind::End => self.end(),
        }
    }

    fn begin(&mut self, _title: &str) {}
    fn report(&mut self, _message: &str) {}
    fn end(&mut self) {}
}

pub struct NoopProgressReporter;

impl ProgressReporter for NoopProgressReporter {}

/// Collects every event; handy for tests and for batching output.
#[derive(Debug, Default)]
pub struct RecordingProgressReporter {
    pub events: Vec<AptProgressEvent>,
}

impl ProgressReporter for RecordingProgressReporter {
    fn event(&mut self, event: AptProgressEvent) {
        self.events.push(event);
    }
}
