//! Adapter tests driven through a scripted transport.

mod amootsms_tests;
mod farazsms_tests;
mod twilio_tests;

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::log::{InMemoryLogStore, SmsLogStore, SmsRecorder};
use crate::test_util::ScriptedTransport;

struct Harness {
    transport: Arc<ScriptedTransport>,
    store: Arc<InMemoryLogStore>,
    recorder: SmsRecorder,
}

fn harness() -> Harness {
    let transport = Arc::new(ScriptedTransport::new());
    let store = Arc::new(InMemoryLogStore::new());
    let recorder = SmsRecorder::new(
        Arc::clone(&store) as Arc<dyn SmsLogStore>,
        &GatewayConfig::default(),
    );
    Harness {
        transport,
        store,
        recorder,
    }
}
