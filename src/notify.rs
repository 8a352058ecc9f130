/// Fire-and-forget notification surface. The pipeline reports outcomes
/// here and never reads back an acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str, description: Option<&str>);
}

/// Routes notifications to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str, description: Option<&str>) {
        let line = match description {
            Some(description) => format!("{}: {}", message, description),
            None => message.to_string(),
        };
        match kind {
            NoticeKind::Success | NoticeKind::Info => log::info!("{}", line),
            NoticeKind::Error => log::error!("{}", line),
        }
    }
}
