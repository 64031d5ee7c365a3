use quotes_core::notify::{Notice, NoticeLevel, Notifier};

/// Prints notices to stderr so stdout stays usable for data output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => eprintln!("{}", notice.message),
            NoticeLevel::Warning => eprintln!("Warning: {}", notice.message),
        }
    }
}
