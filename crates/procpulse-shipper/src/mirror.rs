/// Diagnostic sink invoked once per dequeued payload, before the network
/// send and regardless of its outcome.
pub trait EventMirror: Send + Sync {
    fn mirror(&self, payload: &str);
}

/// Mirrors every payload to stdout, one ` ---` separator per report.
pub struct ConsoleMirror;

impl EventMirror for ConsoleMirror {
    fn mirror(&self, payload: &str) {
        println!(" ---");
        println!("{payload}");
    }
}
