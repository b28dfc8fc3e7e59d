//! Panic hook that records panics as traceback lines.

use std::sync::Arc;

use crate::observability::record::LogRecord;
use crate::observability::traceback::ExceptionInfo;
use crate::observability::Logger;

/// Install a process-wide panic hook that logs every panic through `logger`.
///
/// Outside debug mode the previous hook still runs afterwards; in debug
/// mode the logger already echoes the traceback to stdout.
pub fn install_panic_hook(logger: Arc<Logger>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let exc = ExceptionInfo::from_panic(info.payload());

        let mut fields = LogRecord::new();
        fields.insert("panic", exc.message());
        if let Some(location) = info.location() {
            fields.insert("location", location.to_string());
        }
        if let Some(name) = std::thread::current().name() {
            fields.insert("thread", name);
        }

        logger.traceback(Some(&exc), fields);

        if !logger.debug() {
            previous(info);
        }
    }));
}
